//! Wire formats of the mobile API: the semicolon point lines posted to
//! `/track`, the `key=value` text replies and the timestamp layouts.

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fmt::Display;
use std::io::{Read, Write};

/// `2016-01-01 00:00:01 UTC`; the suffix is literal, never an offset.
pub const WIRE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

const POINT_FIELDS: usize = 9;

pub fn format_wire_time(t: DateTime<Utc>) -> String {
    t.format(WIRE_TIME_FORMAT).to_string()
}

/// Strict parse of the `YYYY-MM-DD HH:MM:SS UTC` layout.
pub fn parse_wire_time(s: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s.trim(), WIRE_TIME_FORMAT)
        .map(|n| n.and_utc())
        .map_err(|source| Error::Timestamp {
            value: s.to_string(),
            source,
        })
}

/// Accepts the wire layout, RFC 3339 and `2014-06-04T18:05:32+0000`.
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(t) = parse_wire_time(s) {
        return Ok(t.fixed_offset());
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t);
    }
    DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z").map_err(|source| Error::Timestamp {
        value: s.to_string(),
        source,
    })
}

/// Point instruction tag of the track protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Pause,
    Resume,
    Start,
    Stop,
    None,
    GpsOff,
    Lap,
}

impl Instruction {
    pub const fn code(self) -> u8 {
        match self {
            Self::Pause => 0,
            Self::Resume => 1,
            Self::Start => 2,
            Self::Stop => 3,
            Self::None => 4,
            Self::GpsOff => 5,
            Self::Lap => 6,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Pause,
            1 => Self::Resume,
            2 => Self::Start,
            3 => Self::Stop,
            4 => Self::None,
            5 => Self::GpsOff,
            6 => Self::Lap,
            _ => return None,
        })
    }
}

/// One line of a track batch. Distance is kept in metres and written in km.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    pub time: DateTime<Utc>,
    pub instruction: Instruction,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub distance_m: Option<f64>,
    /// km/h
    pub speed: Option<f64>,
    pub elevation: Option<f64>,
    pub heart_rate: Option<u16>,
    pub cadence: Option<u16>,
}

impl PointRecord {
    /// `timestamp;type;lat;lon;distance_km;speed;elevation;heart_rate;cadence;`
    pub fn to_line(&self) -> String {
        format!(
            "{};{};{};{};{};{};{};{};{};",
            format_wire_time(self.time),
            self.instruction.code(),
            opt(self.lat),
            opt(self.lon),
            opt(self.distance_m.map(|m| m / 1000.0)),
            opt(self.speed),
            opt(self.elevation),
            opt(self.heart_rate),
            opt(self.cadence),
        )
    }

    pub fn parse_line(line: &str) -> Result<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let body = line
            .strip_suffix(';')
            .ok_or_else(|| malformed(line, "missing trailing ';'"))?;
        let fields: Vec<&str> = body.split(';').collect();
        if fields.len() != POINT_FIELDS {
            return Err(malformed(line, "expected 9 fields"));
        }

        let code: u8 = fields[1]
            .parse()
            .map_err(|_| malformed(line, "bad instruction"))?;
        let instruction =
            Instruction::from_code(code).ok_or_else(|| malformed(line, "unknown instruction"))?;

        Ok(Self {
            time: parse_wire_time(fields[0])?,
            instruction,
            lat: field(line, fields[2])?,
            lon: field(line, fields[3])?,
            distance_m: field::<f64>(line, fields[4])?.map(|km| km * 1000.0),
            speed: field(line, fields[5])?,
            elevation: field(line, fields[6])?,
            heart_rate: field(line, fields[7])?,
            cadence: field(line, fields[8])?,
        })
    }
}

fn opt<T: Display>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn field<T: std::str::FromStr>(line: &str, raw: &str) -> Result<Option<T>> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| malformed(line, &format!("bad field {raw:?}")))
}

fn malformed(line: &str, why: &str) -> Error {
    Error::InvalidPoint(format!("{why} in line {line:?}"))
}

/// Reply of the text endpoints: a status line followed by `key=value` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueReply {
    status: String,
    values: Vec<(String, String)>,
}

impl KeyValueReply {
    pub fn parse(body: &str) -> Self {
        let mut lines = body.lines();
        let status = lines.next().unwrap_or_default().trim().to_string();

        let values = std::iter::once(status.as_str())
            .chain(lines)
            .filter_map(|line| line.split_once('='))
            .map(|(k, v)| (k.trim().to_string(), unquote(v.trim()).to_string()))
            .collect();

        Self { status, values }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn unquote(v: &str) -> &str {
    v.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(v)
}

pub fn gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data)?;
    Ok(enc.finish()?)
}

pub fn gunzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> PointRecord {
        PointRecord {
            time: Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 1).unwrap(),
            instruction: Instruction::Start,
            lat: Some(53.5248),
            lon: Some(10.000_001),
            distance_m: Some(5.0),
            speed: Some(0.0),
            elevation: Some(1.0),
            heart_rate: None,
            cadence: None,
        }
    }

    #[test]
    fn writes_nine_fields_with_km_distance() {
        assert_eq!(
            record().to_line(),
            "2016-01-01 00:00:01 UTC;2;53.5248;10.000001;0.005;0;1;;;"
        );
    }

    #[test]
    fn line_parses_back() {
        let rec = PointRecord {
            heart_rate: Some(141),
            ..record()
        };
        let back = PointRecord::parse_line(&rec.to_line()).unwrap();
        assert_eq!(back.time, rec.time);
        assert_eq!(back.instruction, Instruction::Start);
        assert!((back.lat.unwrap() - 53.5248).abs() < 1e-6);
        assert!((back.lon.unwrap() - 10.000_001).abs() < 1e-6);
        assert!((back.distance_m.unwrap() - 5.0).abs() < 1e-9);
        assert_eq!(back.heart_rate, Some(141));
        assert_eq!(back.cadence, None);
    }

    #[test]
    fn rejects_short_lines() {
        assert!(PointRecord::parse_line("2016-01-01 00:00:01 UTC;2;1;2;").is_err());
        assert!(PointRecord::parse_line("2016-01-01 00:00:01 UTC;9;;;;;;;;").is_err());
        assert!(PointRecord::parse_line("2016-01-01 00:00:01 UTC;2;;;;;;;").is_err());
    }

    #[test]
    fn wire_time_is_always_utc() {
        let t = DateTime::parse_from_rfc3339("2016-01-01T02:00:00+02:00").unwrap();
        assert_eq!(format_wire_time(t.with_timezone(&Utc)), "2016-01-01 00:00:00 UTC");
        assert_eq!(
            parse_wire_time("2014-07-24 18:45:00 UTC").unwrap(),
            Utc.with_ymd_and_hms(2014, 7, 24, 18, 45, 0).unwrap()
        );
        assert!(parse_wire_time("2014-07-24T18:45:00Z").is_err());
    }

    #[test]
    fn lenient_timestamps() {
        let want = Utc.with_ymd_and_hms(2014, 6, 4, 18, 5, 32).unwrap();
        for s in [
            "2014-06-04 18:05:32 UTC",
            "2014-06-04T18:05:32Z",
            "2014-06-04T18:05:32+0000",
            "2014-06-04T20:05:32+02:00",
        ] {
            assert_eq!(parse_timestamp(s).unwrap(), want, "{s}");
        }
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn key_value_reply() {
        let reply = KeyValueReply::parse(
            "OK\naction=PAIRED\nauthToken= my_token \r\nmeasure=METRIC\nsecureToken=a=b",
        );
        assert!(reply.is_ok());
        assert_eq!(reply.get("authToken"), Some("my_token"));
        assert_eq!(reply.get("secureToken"), Some("a=b"));
        assert_eq!(reply.get("missing"), None);

        let failed = KeyValueReply::parse("USER_UNKNOWN");
        assert!(!failed.is_ok());
        assert_eq!(failed.status(), "USER_UNKNOWN");
    }

    #[test]
    fn key_value_reply_without_status_line() {
        let reply = KeyValueReply::parse("workout.id=\"123456789\"\n\nfoo=bar\n");
        assert_eq!(reply.get("workout.id"), Some("123456789"));
    }

    #[test]
    fn gzip_is_reversible() {
        let data = b"a;b;c;\nd;e;f;";
        assert_eq!(gunzip(&gzip(data).unwrap()).unwrap(), data);
    }
}

use crate::dlog;
use crate::sport::Sport;
use crate::types::{Extension, Track, TrackPoint};
use anyhow::{Context, Result};
use chrono::DateTime;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use std::fs;
use std::path::Path;

pub fn read_gpx_track(path: &Path, sport: Sport) -> Result<Track> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading GPX: {}", path.display()))?;
    parse_gpx_track(&text, sport).with_context(|| format!("parsing GPX: {}", path.display()))
}

/// Track points in document order. Points without position or time are skipped.
pub fn parse_gpx_track(xml_text: &str, sport: Sport) -> Result<Track> {
    let mut track = Track::new(Vec::new(), sport);
    if xml_text.trim().is_empty() {
        return Ok(track);
    }

    let mut xml = Reader::from_str(xml_text);
    xml.config_mut().trim_text(true);

    let mut st = GpxState::default();

    loop {
        match xml.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => handle_gpx_start(&mut st, &e),
            Ok(Event::End(e)) => handle_gpx_end(&mut st, &e, &mut track),
            Ok(Event::Text(e)) => handle_gpx_text(&mut st, &e),
            Err(e) => anyhow::bail!("GPX XML parse error: {e}"),
            _ => {}
        }
    }

    Ok(track)
}

#[derive(Default)]
struct GpxState {
    in_trkpt: bool,
    field: Option<Field>,

    cur_pos: Option<(f64, f64)>,
    cur_time: Option<DateTime<chrono::FixedOffset>>,
    cur_ele: Option<f64>,
    cur_hr: Option<u16>,
}

#[derive(Clone, Copy)]
enum Field {
    Time,
    Ele,
    Hr,
}

fn handle_gpx_start(st: &mut GpxState, e: &BytesStart<'_>) {
    match e.local_name().as_ref() {
        b"trkpt" => {
            st.in_trkpt = true;
            st.field = None;
            st.cur_time = None;
            st.cur_ele = None;
            st.cur_hr = None;
            st.cur_pos = trkpt_position(e);
        }
        b"time" if st.in_trkpt => st.field = Some(Field::Time),
        b"ele" if st.in_trkpt => st.field = Some(Field::Ele),
        // Garmin TrackPointExtension and friends all use a local name of `hr`.
        b"hr" if st.in_trkpt => st.field = Some(Field::Hr),
        _ => {}
    }
}

fn handle_gpx_end(st: &mut GpxState, e: &BytesEnd<'_>, track: &mut Track) {
    match e.local_name().as_ref() {
        b"time" | b"ele" | b"hr" => st.field = None,
        b"trkpt" => {
            st.in_trkpt = false;

            let point = match (st.cur_pos, st.cur_time) {
                (Some((lat, lon)), Some(t)) => TrackPoint::new(lat, lon, t).ok(),
                _ => None,
            };
            let Some(mut point) = point else {
                tracing::warn!(index = track.points().len(), "skipping incomplete GPX point");
                return;
            };
            if let Some(ele) = st.cur_ele {
                point = point.with_elevation(ele);
            }
            if let Some(hr) = st.cur_hr {
                point = point.with_extension(Extension::HeartRate(hr));
            }
            track.push(point);
        }
        _ => {}
    }
}

fn handle_gpx_text(st: &mut GpxState, e: &BytesText<'_>) {
    let Some(field) = st.field else {
        return;
    };
    let Ok(s) = e.decode() else {
        return;
    };
    let s = s.trim();

    match field {
        Field::Time => st.cur_time = DateTime::parse_from_rfc3339(s).ok(),
        Field::Ele => st.cur_ele = s.parse::<f64>().ok(),
        Field::Hr => st.cur_hr = s.parse::<u16>().ok(),
    }
}

/// `lat`/`lon` attributes, kept only when both parse and lie on the globe.
fn trkpt_position(e: &BytesStart<'_>) -> Option<(f64, f64)> {
    let attr = |name: &[u8]| {
        e.attributes()
            .with_checks(false)
            .flatten()
            .find(|a| a.key.as_ref() == name)
            .and_then(|a| a.unescape_value().ok()?.trim().parse::<f64>().ok())
    };

    let (lat, lon) = (attr(b"lat")?, attr(b"lon")?);
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Some((lat, lon))
    } else {
        dlog!("gpx_out_of_range lat={lat} lon={lon}");
        None
    }
}

use crate::error::{Error, Result};
use crate::sport::Sport;
use crate::utils::haversine_m;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExtensionKind {
    HeartRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    /// Beats per minute.
    HeartRate(u16),
}

impl Extension {
    pub const fn kind(self) -> ExtensionKind {
        match self {
            Self::HeartRate(_) => ExtensionKind::HeartRate,
        }
    }

    pub fn value(self) -> i64 {
        match self {
            Self::HeartRate(bpm) => i64::from(bpm),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackPoint {
    lat: f64,
    lon: f64,
    time: DateTime<FixedOffset>,
    elevation: Option<f64>,
    /// Cumulative metres from the start of the track.
    distance: Option<f64>,
    extensions: Vec<Extension>,
}

impl TrackPoint {
    pub fn new(lat: f64, lon: f64, time: DateTime<FixedOffset>) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(Error::InvalidPoint(format!("latitude {lat} out of range")));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(Error::InvalidPoint(format!("longitude {lon} out of range")));
        }
        Ok(Self {
            lat,
            lon,
            time,
            elevation: None,
            distance: None,
            extensions: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    #[must_use]
    pub fn with_distance(mut self, distance_m: f64) -> Self {
        self.distance = Some(distance_m);
        self
    }

    /// Adds an extension, replacing one of the same kind.
    #[must_use]
    pub fn with_extension(mut self, ext: Extension) -> Self {
        self.extensions.retain(|e| e.kind() != ext.kind());
        self.extensions.push(ext);
        self
    }

    pub const fn latitude(&self) -> f64 {
        self.lat
    }

    pub const fn longitude(&self) -> f64 {
        self.lon
    }

    pub const fn time(&self) -> DateTime<FixedOffset> {
        self.time
    }

    pub fn time_utc(&self) -> DateTime<Utc> {
        self.time.with_timezone(&Utc)
    }

    pub const fn elevation(&self) -> Option<f64> {
        self.elevation
    }

    pub const fn distance(&self) -> Option<f64> {
        self.distance
    }

    pub fn extension(&self, kind: ExtensionKind) -> Option<Extension> {
        self.extensions.iter().copied().find(|e| e.kind() == kind)
    }

    pub fn heart_rate(&self) -> Option<u16> {
        match self.extension(ExtensionKind::HeartRate)? {
            Extension::HeartRate(bpm) => Some(bpm),
        }
    }

    /// Great-circle metres to `other`.
    pub fn distance_from(&self, other: &Self) -> f64 {
        haversine_m(self.lat, self.lon, other.lat, other.lon)
    }

    /// km/h travelled from `previous` to this point; 0 when no time elapsed.
    pub fn speed_from(&self, previous: &Self) -> f64 {
        let elapsed_ms = (self.time - previous.time).num_milliseconds();
        if elapsed_ms <= 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let secs = elapsed_ms as f64 / 1000.0;
        self.distance_from(previous) / secs * 3.6
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    points: Vec<TrackPoint>,
    sport: Sport,
}

impl Track {
    pub const fn new(points: Vec<TrackPoint>, sport: Sport) -> Self {
        Self { points, sport }
    }

    pub fn push(&mut self, point: TrackPoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub const fn sport(&self) -> Sport {
        self.sport
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_point(&self) -> Option<&TrackPoint> {
        self.points.first()
    }

    pub fn last_point(&self) -> Option<&TrackPoint> {
        self.points.last()
    }

    pub fn start_time(&self) -> Option<DateTime<FixedOffset>> {
        self.first_point().map(TrackPoint::time)
    }

    pub fn end_time(&self) -> Option<DateTime<FixedOffset>> {
        self.last_point().map(TrackPoint::time)
    }

    pub fn duration(&self) -> Duration {
        match (self.start_time(), self.end_time()) {
            (Some(start), Some(end)) => end - start,
            _ => Duration::zero(),
        }
    }

    /// Metres: the last point's declared distance, else the summed legs.
    pub fn length(&self) -> f64 {
        if let Some(d) = self.last_point().and_then(TrackPoint::distance) {
            return d;
        }
        self.points
            .windows(2)
            .fold(0.0, |total, w| total + w[1].distance_from(&w[0]))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workout {
    tracks: Vec<Track>,
}

impl Workout {
    pub const fn new() -> Self {
        Self { tracks: Vec::new() }
    }

    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkoutId(String);

impl WorkoutId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for WorkoutId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutSummary {
    pub id: WorkoutId,
    pub sport: Sport,
    pub start: DateTime<Utc>,
}

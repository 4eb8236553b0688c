use crate::codec::{format_wire_time, parse_timestamp, parse_wire_time};
use crate::error::Result;
use crate::sport::{Sport, SportCode, code_from_sport, sport_from_code};
use crate::types::{Extension, Track, TrackPoint, Workout, WorkoutId, WorkoutSummary};
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

/// Ids and sport codes come as numbers or numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    fn text(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    fn sport(&self) -> Sport {
        self.text()
            .trim()
            .parse::<SportCode>()
            .map_or(Sport::Other, sport_from_code)
    }
}

#[derive(Debug, Deserialize)]
struct DetailPayload {
    sport: Option<Scalar>,
    #[serde(default)]
    points: Vec<DetailPoint>,
}

#[derive(Debug, Deserialize)]
struct DetailPoint {
    lat: f64,
    lng: f64,
    time: String,
    alt: Option<f64>,
    hr: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct SummaryEntry {
    id: Scalar,
    sport: Option<Scalar>,
    start_time: String,
}

fn sport_of(code: Option<&Scalar>) -> Sport {
    code.map_or(Sport::Other, Scalar::sport)
}

/// Builds a one-track workout from a detail payload.
pub fn workout_from_detail(json: &JsonValue) -> Result<Workout> {
    let payload = DetailPayload::deserialize(json)?;
    let mut track = Track::new(
        Vec::with_capacity(payload.points.len()),
        sport_of(payload.sport.as_ref()),
    );

    for p in payload.points {
        let mut point = TrackPoint::new(p.lat, p.lng, parse_timestamp(&p.time)?)?;
        if let Some(alt) = p.alt {
            point = point.with_elevation(alt);
        }
        if let Some(hr) = p.hr {
            point = point.with_extension(Extension::HeartRate(hr));
        }
        track.push(point);
    }

    let mut workout = Workout::new();
    workout.add_track(track);
    Ok(workout)
}

pub fn summaries_from_list(entries: &[JsonValue]) -> Result<Vec<WorkoutSummary>> {
    entries
        .iter()
        .map(|entry| -> Result<WorkoutSummary> {
            let e = SummaryEntry::deserialize(entry)?;
            Ok(WorkoutSummary {
                id: WorkoutId::new(e.id.text()),
                sport: sport_of(e.sport.as_ref()),
                start: parse_wire_time(&e.start_time)?,
            })
        })
        .collect()
}

/// The list-entry shape of a summary.
pub fn summary_to_json(summary: &WorkoutSummary) -> JsonValue {
    json!({
        "id": summary.id.as_str(),
        "sport": code_from_sport(summary.sport),
        "start_time": format_wire_time(summary.start),
    })
}

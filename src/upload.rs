//! Track upload in the mobile client's streaming shape.
//!
//! Points go out in batches of [`BATCH_SIZE`] under one client-generated
//! device workout id, followed by a single `stop` point carrying the track
//! totals. The id returned for that last post is the permanent workout id.
//! Batches are posted strictly in order; a failure midway leaves the earlier
//! batches stored remotely.

use crate::codec::{Instruction, PointRecord};
use crate::dlog;
use crate::error::{Error, Result};
use crate::gateway::Workouts;
use crate::sport::SportCode;
use crate::transport::HttpTransport;
use crate::types::{Track, TrackPoint, WorkoutId};
use crate::utils::duration_seconds;
use chrono::{DateTime, Utc};
use rand::Rng;

/// Points per post, as the mobile app sends them.
pub const BATCH_SIZE: usize = 100;

const DEVICE_ID_DIGITS: usize = 19;

/// `-` followed by 19 random decimal digits.
pub fn generate_device_workout_id<R: Rng>(rng: &mut R) -> String {
    let mut id = String::with_capacity(DEVICE_ID_DIGITS + 1);
    id.push('-');
    for _ in 0..DEVICE_ID_DIGITS {
        id.push(char::from(b'0' + rng.gen_range(0..10u8)));
    }
    id
}

/// Running distance and speed carried across the whole track.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accumulator<'a> {
    /// Metres.
    pub distance: f64,
    /// km/h from the previous point.
    pub speed: f64,
    previous: Option<&'a TrackPoint>,
}

impl<'a> Accumulator<'a> {
    /// Folds `point` in and returns the state it should be written with.
    #[must_use]
    pub fn advance(self, point: &'a TrackPoint) -> Self {
        let distance = match (point.distance(), self.previous) {
            (Some(d), _) => d,
            (None, Some(prev)) => self.distance + point.distance_from(prev),
            (None, None) => self.distance,
        };
        let speed = self.previous.map_or(self.speed, |prev| point.speed_from(prev));

        Self {
            distance,
            speed,
            previous: Some(point),
        }
    }
}

fn point_record(point: &TrackPoint, acc: &Accumulator<'_>) -> PointRecord {
    PointRecord {
        time: point.time_utc(),
        instruction: Instruction::Start,
        lat: Some(point.latitude()),
        lon: Some(point.longitude()),
        distance_m: Some(acc.distance),
        speed: Some(acc.speed),
        elevation: point.elevation(),
        heart_rate: point.heart_rate(),
        cadence: None,
    }
}

/// Serializes one batch, threading the accumulator through it.
pub fn build_batch<'a>(
    points: &'a [TrackPoint],
    acc: Accumulator<'a>,
) -> (Vec<String>, Accumulator<'a>) {
    points.iter().fold(
        (Vec::with_capacity(points.len()), acc),
        |(mut lines, acc), point| {
            let acc = acc.advance(point);
            lines.push(point_record(point, &acc).to_line());
            (lines, acc)
        },
    )
}

/// Closing `stop` line. Elevation is the last point's, not a total ascent.
pub fn terminal_line(track: &Track, speed: f64, started: DateTime<Utc>) -> String {
    let last = track.last_point();
    let record = PointRecord {
        time: last.map_or(started, TrackPoint::time_utc),
        instruction: Instruction::Stop,
        lat: last.map(TrackPoint::latitude),
        lon: last.map(TrackPoint::longitude),
        distance_m: Some(track.length()),
        speed: Some(speed),
        elevation: last.and_then(TrackPoint::elevation),
        heart_rate: last.and_then(TrackPoint::heart_rate),
        cadence: None,
    };
    record.to_line()
}

/// Uploads `track` as a new remote workout of sport `sport`.
pub fn upload_track<T, R>(
    gateway: &Workouts<T>,
    track: &Track,
    sport: SportCode,
    rng: &mut R,
) -> Result<WorkoutId>
where
    T: HttpTransport,
    R: Rng,
{
    let started = Utc::now();
    let device_workout_id = generate_device_workout_id(rng);
    let duration = duration_seconds(track.duration());
    let batches = track.points().len().div_ceil(BATCH_SIZE);

    tracing::info!(
        device_workout_id = %device_workout_id,
        points = track.points().len(),
        batches,
        sport,
        duration,
        "uploading track"
    );

    let mut acc = Accumulator::default();
    for (i, chunk) in track.points().chunks(BATCH_SIZE).enumerate() {
        let (lines, next) = build_batch(chunk, acc);
        acc = next;

        gateway
            .post_track_batch(&device_workout_id, sport, duration, &lines)
            .inspect_err(|e| warn_partial(&device_workout_id, i, e))?;
        dlog!("posted batch index={i} points={} distance_m={}", lines.len(), acc.distance);
    }

    let stop = terminal_line(track, acc.speed, started);
    let id = gateway
        .post_track_batch(&device_workout_id, sport, duration, &[stop])
        .inspect_err(|e| warn_partial(&device_workout_id, batches, e))?;

    tracing::info!(workout_id = %id, "track uploaded");
    Ok(id)
}

fn warn_partial(device_workout_id: &str, batch: usize, err: &Error) {
    if batch > 0 {
        tracing::warn!(
            device_workout_id,
            accepted_batches = batch,
            err = %err,
            "upload aborted after earlier batches were accepted"
        );
    }
}

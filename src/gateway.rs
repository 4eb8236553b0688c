use crate::codec::{KeyValueReply, format_wire_time, gzip};
use crate::config::ApiConfig;
use crate::dlog;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::sport::SportCode;
use crate::transport::{HttpRequest, HttpTransport};
use crate::types::WorkoutId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, de};
use serde_json::Value as JsonValue;

/// Fields requested for a workout detail read.
pub const DETAIL_FIELDS: &str = "device,simple,basic,motivation,interval,hr_zones,weather,polyline_encoded_small,points,lcp_count,tagged_users,pictures";

/// Listing is done in one request; callers bound the date range instead.
pub const LIST_MAX_RESULTS: u32 = 100_000;

#[derive(Deserialize)]
#[serde(untagged)]
enum DetailReply {
    Failed {
        #[serde(deserialize_with = "present")]
        error: JsonValue,
    },
    Detail(JsonValue),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListReply {
    Failed {
        #[serde(deserialize_with = "present")]
        error: JsonValue,
    },
    List {
        data: Vec<JsonValue>,
    },
}

/// `"error": null` counts as no error.
fn present<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<JsonValue, D::Error> {
    match JsonValue::deserialize(d)? {
        JsonValue::Null => Err(de::Error::custom("null error")),
        value => Ok(value),
    }
}

/// Remote workout endpoints, all authenticated with the session token.
pub struct Workouts<T> {
    session: Session,
    transport: T,
    config: ApiConfig,
}

impl<T: HttpTransport> Workouts<T> {
    pub const fn new(session: Session, transport: T, config: ApiConfig) -> Self {
        Self {
            session,
            transport,
            config,
        }
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Full detail of one workout, returned as decoded.
    pub fn get_workout(&self, id: &WorkoutId) -> Result<JsonValue> {
        let request = HttpRequest::get(self.config.workout_get_url())
            .query("authToken", self.session.token())
            .query("fields", DETAIL_FIELDS)
            .query("workoutId", id);

        let response = self.transport.execute(request)?;
        match serde_json::from_slice::<DetailReply>(&response.body)? {
            DetailReply::Failed { error } => Err(Error::BadResponse(error)),
            DetailReply::Detail(json) => Ok(json),
        }
    }

    /// The `data` entries of workouts started between `start` and `end`.
    pub fn list_workouts(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<JsonValue>> {
        let request = HttpRequest::get(self.config.workouts_url())
            .query("authToken", self.session.token())
            .query("fields", "simple")
            .query("maxResults", LIST_MAX_RESULTS)
            .query("after", format_wire_time(start))
            .query("before", format_wire_time(end));

        let response = self.transport.execute(request)?;
        match serde_json::from_slice::<ListReply>(&response.body)? {
            ListReply::Failed { error } => Err(Error::BadResponse(error)),
            ListReply::List { data } => {
                dlog!("listed workouts count={}", data.len());
                Ok(data)
            }
        }
    }

    /// Posts one batch of point lines to the in-progress upload `device_workout_id`.
    pub fn post_track_batch(
        &self,
        device_workout_id: &str,
        sport: SportCode,
        duration_secs: u64,
        lines: &[String],
    ) -> Result<WorkoutId> {
        let body = gzip(lines.join("\n").as_bytes())?;

        let request = HttpRequest::post(self.config.track_url(), body)
            .query("authToken", self.session.token())
            .query("gzip", "true")
            .query("workoutId", device_workout_id)
            .query("sport", sport)
            .query("duration", duration_secs)
            .query("audioMessage", "false")
            .query("goalType", "BASIC")
            .query("extendedResponse", "true")
            .header("Content-Type", "application/octet-stream");

        let response = self.transport.execute(request)?;
        let Ok(body) = String::from_utf8(response.body) else {
            return Err(Error::UnexpectedResponse("<non UTF-8 body>".to_string()));
        };

        match KeyValueReply::parse(&body).get("workout.id") {
            Some(id) if !id.is_empty() => Ok(WorkoutId::new(id)),
            _ => Err(Error::UnexpectedResponse(body)),
        }
    }
}

use crate::error::Result;
use crate::gateway::Workouts;
use crate::mapper::{summaries_from_list, workout_from_detail};
use crate::sport::code_from_sport;
use crate::transport::HttpTransport;
use crate::types::{Workout, WorkoutId, WorkoutSummary};
use crate::upload::upload_track;
use chrono::{DateTime, Utc};
use rand::Rng;

/// Domain-level access to Endomondo: fetch, list and post workouts.
pub struct EndomondoTracker<T> {
    workouts: Workouts<T>,
}

impl<T: HttpTransport> EndomondoTracker<T> {
    pub const ID: &'static str = "endomondo";

    pub const fn new(workouts: Workouts<T>) -> Self {
        Self { workouts }
    }

    pub const fn gateway(&self) -> &Workouts<T> {
        &self.workouts
    }

    pub fn workout(&self, id: &WorkoutId) -> Result<Workout> {
        let json = self.workouts.get_workout(id)?;
        workout_from_detail(&json)
    }

    pub fn workouts(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<WorkoutSummary>> {
        let data = self.workouts.list_workouts(start, end)?;
        summaries_from_list(&data)
    }

    /// Uploads every track; one remote id per track, in track order.
    pub fn post(&self, workout: &Workout) -> Result<Vec<WorkoutId>> {
        self.post_with_rng(workout, &mut rand::thread_rng())
    }

    pub fn post_with_rng<R: Rng>(
        &self,
        workout: &Workout,
        rng: &mut R,
    ) -> Result<Vec<WorkoutId>> {
        workout
            .tracks()
            .iter()
            .map(|track| upload_track(&self.workouts, track, code_from_sport(track.sport()), rng))
            .collect()
    }
}

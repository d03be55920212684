use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Rating;
use crate::scheduler::ScheduleState;

/// One submitted review and the scheduling state it produced
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::review_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReviewLog {
    /// Unique identifier for the log entry (UUID v4 as string)
    id: String,

    /// The study record that was reviewed
    study_record_id: String,

    /// The rating given
    rating: Rating,

    /// Ease factor after the review
    ease_factor: f64,

    /// Interval after the review
    interval_days: i32,

    /// Repetitions after the review
    repetitions: i32,

    /// When the review happened
    reviewed_at: NaiveDateTime,
}

impl ReviewLog {
    /// Records that `study_record_id` was rated `rating` and moved to `state`
    pub fn new(study_record_id: &str, rating: Rating, state: &ScheduleState, reviewed_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            study_record_id: study_record_id.to_string(),
            rating,
            ease_factor: state.ease_factor,
            interval_days: state.interval_days,
            repetitions: state.repetitions,
            reviewed_at: reviewed_at.naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_study_record_id(&self) -> String {
        self.study_record_id.clone()
    }

    pub fn get_rating(&self) -> Rating {
        self.rating
    }

    pub fn get_ease_factor(&self) -> f64 {
        self.ease_factor
    }

    pub fn get_interval_days(&self) -> i32 {
        self.interval_days
    }

    pub fn get_repetitions(&self) -> i32 {
        self.repetitions
    }

    pub fn get_reviewed_at(&self) -> DateTime<Utc> {
        self.reviewed_at.and_utc()
    }
}

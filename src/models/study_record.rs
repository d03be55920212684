use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scheduler::ScheduleState;

/// Scheduling state for one (user, flashcard) pair
///
/// Created lazily the first time the flashcard shows up in a study session
/// and only ever changed by applying a [`ScheduleState`] computed by the
/// scheduler. Removed by cascade when its flashcard is deleted.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::study_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StudyRecord {
    /// Unique identifier for the record (UUID v4 as string)
    id: String,

    /// The user studying the flashcard
    user_id: String,

    /// The flashcard being studied
    flashcard_id: String,

    /// Multiplier controlling interval growth, never below 1.3
    ease_factor: f64,

    /// Days between the last review and the next one
    interval_days: i32,

    /// Consecutive successful reviews since the last lapse
    repetitions: i32,

    /// When the card becomes due
    next_review_date: NaiveDateTime,

    /// When the card was last reviewed, if ever
    last_review_date: Option<NaiveDateTime>,

    /// When this record was created
    created_at: NaiveDateTime,
}

impl StudyRecord {
    /// Creates a record in the initial scheduling state, due at `now`
    ///
    /// ### Arguments
    ///
    /// * `user_id` - The user studying the card
    /// * `flashcard_id` - The card being studied
    /// * `now` - Creation time, which is also the first due date
    pub fn new(user_id: String, flashcard_id: String, now: DateTime<Utc>) -> Self {
        let initial = ScheduleState::initial(now);
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            flashcard_id,
            ease_factor: initial.ease_factor,
            interval_days: initial.interval_days,
            repetitions: initial.repetitions,
            next_review_date: initial.next_review_date.naive_utc(),
            last_review_date: None,
            created_at: now.naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    pub fn get_flashcard_id(&self) -> String {
        self.flashcard_id.clone()
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

    pub fn get_next_review_date(&self) -> DateTime<Utc> {
        self.next_review_date.and_utc()
    }

    pub fn get_last_review_date(&self) -> Option<DateTime<Utc>> {
        self.last_review_date.map(|dt| dt.and_utc())
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        self.created_at.and_utc()
    }

    /// The scheduler's view of this record
    pub fn schedule_state(&self) -> ScheduleState {
        ScheduleState {
            ease_factor: self.ease_factor,
            interval_days: self.interval_days,
            repetitions: self.repetitions,
            next_review_date: self.get_next_review_date(),
            last_review_date: self.get_last_review_date(),
        }
    }

    /// Overwrites every scheduling field with `state`
    pub fn apply_state(&mut self, state: &ScheduleState) {
        self.ease_factor = state.ease_factor;
        self.interval_days = state.interval_days;
        self.repetitions = state.repetitions;
        self.next_review_date = state.next_review_date.naive_utc();
        self.last_review_date = state.last_review_date.map(|dt| dt.naive_utc());
    }

    /// Whether the card is due at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.schedule_state().is_due(now)
    }
}

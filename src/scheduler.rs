//! SM-2 style review scheduling
//!
//! A pure mapping from a card's current scheduling state and a [`Rating`] to
//! the state after the review. Nothing here touches the database; the caller
//! loads the state, calls [`compute_next_state`], and persists the result.
//!
//! Policy:
//!
//! - `again`: repetitions reset to 0, interval to 1 day, ease factor drops by
//!   [`AGAIN_PENALTY`] (never below [`MIN_EASE_FACTOR`]).
//! - `good`: repetitions + 1; the interval is 1 day on the first success,
//!   6 days on the second, then `round(previous interval * ease factor)`.
//! - `easy`: as `good`, then the ease factor grows by [`EASY_BONUS`].
//!
//! The next review date is always `now + interval_days`, and the last review
//! date is always `now`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Rating;

/// Ease factor given to a card that has never been reviewed
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Lowest ease factor a card can reach
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease factor lost on an `again` rating
pub const AGAIN_PENALTY: f64 = 0.20;

/// Ease factor gained on an `easy` rating
pub const EASY_BONUS: f64 = 0.15;

/// Upper bound on a scheduled interval (about a century)
pub const MAX_INTERVAL_DAYS: i32 = 36_500;

/// Interval after the first successful review
const FIRST_INTERVAL_DAYS: i32 = 1;

/// Interval after the second consecutive successful review
const SECOND_INTERVAL_DAYS: i32 = 6;

/// Interval after a lapse
const LAPSE_INTERVAL_DAYS: i32 = 1;

/// The scheduling fields of a study record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleState {
    pub ease_factor: f64,
    pub interval_days: i32,
    pub repetitions: i32,
    pub next_review_date: DateTime<Utc>,
    pub last_review_date: Option<DateTime<Utc>>,
}

impl ScheduleState {
    /// State of a card that has never been studied: due immediately
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            ease_factor: DEFAULT_EASE_FACTOR,
            interval_days: 0,
            repetitions: 0,
            next_review_date: now,
            last_review_date: None,
        }
    }

    /// Whether the card should be shown at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date <= now
    }
}

/// Computes the state that results from reviewing a card at `now`
///
/// Total over every rating and every state with `repetitions >= 0` and
/// `interval_days >= 0`. A fresh record (`repetitions == 0`,
/// `interval_days == 0`) takes the first-success branch on `good`/`easy`,
/// so the stored zero interval is never multiplied.
///
/// ### Arguments
///
/// * `state` - The card's current scheduling state
/// * `rating` - How well the card was recalled
/// * `now` - The moment of the review
pub fn compute_next_state(state: &ScheduleState, rating: Rating, now: DateTime<Utc>) -> ScheduleState {
    let (ease_factor, interval_days, repetitions) = if rating.is_success() {
        // The interval grows with the ease factor held before any bonus
        let repetitions = state.repetitions.saturating_add(1);
        let interval = grow_interval(repetitions, state.interval_days, state.ease_factor);
        let bonus = if rating == Rating::Easy { EASY_BONUS } else { 0.0 };
        (clamp_ease(state.ease_factor + bonus), interval, repetitions)
    } else {
        (
            clamp_ease(state.ease_factor - AGAIN_PENALTY),
            LAPSE_INTERVAL_DAYS,
            0,
        )
    };

    ScheduleState {
        ease_factor,
        interval_days,
        repetitions,
        next_review_date: now + Duration::days(interval_days as i64),
        last_review_date: Some(now),
    }
}

/// Returns the state each rating would produce, in `again`, `good`, `easy` order
pub fn preview(state: &ScheduleState, now: DateTime<Utc>) -> Vec<(Rating, ScheduleState)> {
    Rating::ALL
        .iter()
        .map(|rating| (*rating, compute_next_state(state, *rating, now)))
        .collect()
}

fn clamp_ease(ease_factor: f64) -> f64 {
    if ease_factor.is_nan() {
        return DEFAULT_EASE_FACTOR;
    }
    ease_factor.max(MIN_EASE_FACTOR)
}

fn grow_interval(repetitions: i32, previous_interval: i32, ease_factor: f64) -> i32 {
    let interval = match repetitions {
        1 => FIRST_INTERVAL_DAYS,
        2 => SECOND_INTERVAL_DAYS,
        _ => {
            // Nearest-integer rounding; truncation would shrink intervals over time
            let grown = (previous_interval.max(0) as f64 * clamp_ease(ease_factor)).round();
            grown.min(MAX_INTERVAL_DAYS as f64) as i32
        }
    };
    interval.clamp(1, MAX_INTERVAL_DAYS)
}

#[cfg(test)]
mod tests;

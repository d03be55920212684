use crate::db::{execute_with_retry, DbPool};
use crate::dto::DeckStatsDto;
use crate::errors::StudyError;
use crate::models::{Flashcard, Rating, ReviewLog, StudyRecord};
use crate::scheduler::{compute_next_state, ScheduleState};
use crate::schema::{flashcards, review_logs, study_records};
use chrono::{DateTime, Utc};
use diesel::dsl::not;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use anyhow::Result;
use tracing::{instrument, debug, info, warn};

use super::deck_repo::check_deck_access;

/// The cards selected for one study session
#[derive(Debug, Clone, PartialEq)]
pub struct StudySession {
    /// Due records with their flashcards, oldest due first
    pub due_cards: Vec<(StudyRecord, Flashcard)>,
    /// Due cards in the deck before the limit was applied
    pub total_due: i64,
}

/// A review as submitted by a client, before it is checked against the record
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSubmission {
    pub study_record_id: String,
    pub flashcard_id: String,
    pub rating: Rating,
    /// `Some(expected)` enables the optimistic check on `last_review_date`
    pub expected_last_review_date: Option<Option<DateTime<Utc>>>,
}

/// Retrieves a study record by its ID
#[instrument(skip(pool), fields(study_record_id = %study_record_id))]
pub fn get_study_record_by_id(pool: &DbPool, study_record_id: &str) -> Result<Option<StudyRecord>> {
    let conn = &mut pool.get()?;

    let result = study_records::table
        .find(study_record_id)
        .first::<StudyRecord>(conn)
        .optional()?;

    Ok(result)
}

/// Retrieves a user's study record for a flashcard, if one was created
#[instrument(skip(pool), fields(user_id = %user_id, flashcard_id = %flashcard_id))]
pub fn get_study_record(pool: &DbPool, user_id: &str, flashcard_id: &str) -> Result<Option<StudyRecord>> {
    let conn = &mut pool.get()?;

    let result = study_records::table
        .filter(study_records::user_id.eq(user_id))
        .filter(study_records::flashcard_id.eq(flashcard_id))
        .first::<StudyRecord>(conn)
        .optional()?;

    Ok(result)
}

/// Creates a user's study record for a flashcard in the given state
///
/// If a record already exists for the pair, it is left untouched and returned.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The studying user
/// * `flashcard_id` - The flashcard
/// * `initial` - Scheduling state for a newly created record
#[instrument(skip(pool, initial), fields(user_id = %user_id, flashcard_id = %flashcard_id))]
pub async fn create_study_record(
    pool: &DbPool,
    user_id: &str,
    flashcard_id: &str,
    initial: &ScheduleState,
) -> Result<StudyRecord> {
    let conn = &mut pool.get()?;

    let mut record = StudyRecord::new(user_id.to_string(), flashcard_id.to_string(), Utc::now());
    record.apply_state(initial);

    let inserted = execute_with_retry(|| {
        diesel::insert_or_ignore_into(study_records::table)
            .values(&record)
            .execute(conn)
    }).await?;

    if inserted == 0 {
        debug!("Study record already existed");
    }

    let stored = study_records::table
        .filter(study_records::user_id.eq(user_id))
        .filter(study_records::flashcard_id.eq(flashcard_id))
        .first::<StudyRecord>(conn)?;

    Ok(stored)
}

/// Overwrites the scheduling fields of one record
///
/// ### Errors
///
/// - `StudyError::NotFound` if no record has this ID
#[instrument(skip(pool, state), fields(study_record_id = %study_record_id))]
pub async fn update_study_record(
    pool: &DbPool,
    study_record_id: &str,
    state: &ScheduleState,
) -> Result<StudyRecord, StudyError> {
    let conn = &mut pool.get()?;

    let updated = execute_with_retry(|| write_schedule(conn, study_record_id, state)).await?;

    updated.ok_or(StudyError::NotFound("Study record"))
}

fn write_schedule(
    conn: &mut SqliteConnection,
    study_record_id: &str,
    state: &ScheduleState,
) -> QueryResult<Option<StudyRecord>> {
    diesel::update(study_records::table.find(study_record_id))
        .set((
            study_records::ease_factor.eq(state.ease_factor),
            study_records::interval_days.eq(state.interval_days),
            study_records::repetitions.eq(state.repetitions),
            study_records::next_review_date.eq(state.next_review_date.naive_utc()),
            study_records::last_review_date.eq(state.last_review_date.map(|dt| dt.naive_utc())),
        ))
        .returning(StudyRecord::as_returning())
        .get_result(conn)
        .optional()
}

/// Lists the user's due records in a deck, oldest due first
///
/// Ties on the due date are broken by flashcard creation order, then ID.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The studying user
/// * `deck_id` - The deck
/// * `now` - Cards due at or before this instant are included
/// * `limit` - Maximum number of records, or `None` for all
#[instrument(skip(pool), fields(user_id = %user_id, deck_id = %deck_id))]
pub fn list_due_records(
    pool: &DbPool,
    user_id: &str,
    deck_id: &str,
    now: DateTime<Utc>,
    limit: Option<i64>,
) -> Result<Vec<(StudyRecord, Flashcard)>> {
    let conn = &mut pool.get()?;
    let due = load_due(conn, user_id, deck_id, now, limit)?;
    Ok(due)
}

fn load_due(
    conn: &mut SqliteConnection,
    user_id: &str,
    deck_id: &str,
    now: DateTime<Utc>,
    limit: Option<i64>,
) -> QueryResult<Vec<(StudyRecord, Flashcard)>> {
    let mut query = study_records::table
        .inner_join(flashcards::table)
        .filter(flashcards::deck_id.eq(deck_id))
        .filter(study_records::user_id.eq(user_id))
        .filter(study_records::next_review_date.le(now.naive_utc()))
        .order((
            study_records::next_review_date.asc(),
            flashcards::created_at.asc(),
            flashcards::id.asc(),
        ))
        .select((StudyRecord::as_select(), Flashcard::as_select()))
        .into_boxed();

    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    query.load::<(StudyRecord, Flashcard)>(conn)
}

fn count_due(conn: &mut SqliteConnection, user_id: &str, deck_id: &str, now: DateTime<Utc>) -> QueryResult<i64> {
    study_records::table
        .inner_join(flashcards::table)
        .filter(flashcards::deck_id.eq(deck_id))
        .filter(study_records::user_id.eq(user_id))
        .filter(study_records::next_review_date.le(now.naive_utc()))
        .count()
        .get_result(conn)
}

/// Creates the missing study records of a deck in one transaction
///
/// Returns how many records were created. Safe to run concurrently or
/// repeatedly: the unique `(user_id, flashcard_id)` constraint turns
/// duplicate inserts into no-ops.
fn create_missing_records(
    conn: &mut SqliteConnection,
    user_id: &str,
    deck_id: &str,
    now: DateTime<Utc>,
) -> QueryResult<usize> {
    conn.immediate_transaction(|conn| {
        let studied = study_records::table
            .filter(study_records::user_id.eq(user_id))
            .select(study_records::flashcard_id);

        let missing: Vec<String> = flashcards::table
            .filter(flashcards::deck_id.eq(deck_id))
            .filter(not(flashcards::id.eq_any(studied)))
            .select(flashcards::id)
            .load(conn)?;

        let mut created = 0;
        for flashcard_id in missing {
            let record = StudyRecord::new(user_id.to_string(), flashcard_id, now);
            created += diesel::insert_or_ignore_into(study_records::table)
                .values(&record)
                .execute(conn)?;
        }
        Ok(created)
    })
}

/// Selects the cards due for a study session
///
/// 1. Checks that the deck exists and belongs to `user_id`.
/// 2. Creates a study record, due immediately, for every flashcard in the
///    deck that does not have one yet.
/// 3. Returns up to `limit` due records, oldest due first, and the total
///    number of due records.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The studying user
/// * `deck_id` - The deck to study
/// * `limit` - Maximum number of cards to return (already validated)
/// * `now` - The session start time
///
/// ### Errors
///
/// - `StudyError::NotFound` if the deck does not exist
/// - `StudyError::Forbidden` if the deck belongs to another user
/// - `StudyError::Internal` on persistence failure
#[instrument(skip(pool), fields(user_id = %user_id, deck_id = %deck_id, limit = %limit))]
pub async fn initialize_session(
    pool: &DbPool,
    user_id: &str,
    deck_id: &str,
    limit: i64,
    now: DateTime<Utc>,
) -> Result<StudySession, StudyError> {
    check_deck_access(pool, deck_id, user_id)?;

    let conn = &mut pool.get()?;

    let created = execute_with_retry(|| create_missing_records(conn, user_id, deck_id, now)).await?;
    if created > 0 {
        info!("Created {} study records for new flashcards", created);
    }

    let total_due = count_due(conn, user_id, deck_id, now)?;
    let due_cards = load_due(conn, user_id, deck_id, now, Some(limit))?;

    info!("Session has {} of {} due cards", due_cards.len(), total_due);
    Ok(StudySession { due_cards, total_due })
}

/// Loads a study record on behalf of `user_id`
///
/// ### Errors
///
/// - `StudyError::NotFound` if no record has this ID
/// - `StudyError::Forbidden` if the record belongs to another user
pub fn check_record_access(pool: &DbPool, study_record_id: &str, user_id: &str) -> Result<StudyRecord, StudyError> {
    let record = get_study_record_by_id(pool, study_record_id)?
        .ok_or(StudyError::NotFound("Study record"))?;

    if record.get_user_id() != user_id {
        debug!("Study record belongs to another user");
        return Err(StudyError::Forbidden);
    }
    Ok(record)
}

fn apply_review(
    conn: &mut SqliteConnection,
    user_id: &str,
    submission: &ReviewSubmission,
    now: DateTime<Utc>,
) -> Result<StudyRecord, StudyError> {
    conn.immediate_transaction(|conn| {
        let mut record = study_records::table
            .find(&submission.study_record_id)
            .first::<StudyRecord>(conn)
            .optional()?
            .ok_or(StudyError::NotFound("Study record"))?;

        if record.get_user_id() != user_id {
            return Err(StudyError::Forbidden);
        }

        if record.get_flashcard_id() != submission.flashcard_id {
            return Err(StudyError::Validation(format!(
                "flashcard {} does not belong to study record {}",
                submission.flashcard_id, submission.study_record_id
            )));
        }

        if let Some(expected) = submission.expected_last_review_date {
            if record.get_last_review_date() != expected {
                warn!("Stale review: expected last review {:?}, found {:?}", expected, record.get_last_review_date());
                return Err(StudyError::Conflict);
            }
        }

        let next = compute_next_state(&record.schedule_state(), submission.rating, now);
        record = write_schedule(conn, &record.get_id(), &next)?
            .ok_or(StudyError::NotFound("Study record"))?;

        let log = ReviewLog::new(&record.get_id(), submission.rating, &next, now);
        diesel::insert_into(review_logs::table)
            .values(&log)
            .execute(conn)?;

        Ok(record)
    })
}

/// Applies a review to a study record and logs it
///
/// The record is read, checked, rescheduled and written inside one
/// immediate transaction, so two submissions for the same record are
/// serialized. Without `expected_last_review_date` the last write wins.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The reviewing user
/// * `submission` - The review
/// * `now` - The review time
///
/// ### Errors
///
/// - `StudyError::NotFound` if the record does not exist
/// - `StudyError::Forbidden` if it belongs to another user
/// - `StudyError::Validation` if the flashcard does not match the record
/// - `StudyError::Conflict` if the optimistic check fails
#[instrument(skip(pool, submission), fields(
    user_id = %user_id,
    study_record_id = %submission.study_record_id,
    rating = %submission.rating,
))]
pub async fn submit_review(
    pool: &DbPool,
    user_id: &str,
    submission: &ReviewSubmission,
    now: DateTime<Utc>,
) -> Result<StudyRecord, StudyError> {
    let conn = &mut pool.get()?;

    let record = execute_with_retry(|| apply_review(conn, user_id, submission, now)).await?;

    info!(
        "Rescheduled record: interval {} days, ease {:.2}, repetitions {}",
        record.get_interval_days(),
        record.get_ease_factor(),
        record.get_repetitions()
    );
    Ok(record)
}

/// Lists the review history of a record, newest first
#[instrument(skip(pool), fields(study_record_id = %study_record_id))]
pub fn list_reviews_for_record(pool: &DbPool, study_record_id: &str) -> Result<Vec<ReviewLog>> {
    let conn = &mut pool.get()?;

    let reviews = review_logs::table
        .filter(review_logs::study_record_id.eq(study_record_id))
        .order((review_logs::reviewed_at.desc(), review_logs::id.desc()))
        .load::<ReviewLog>(conn)?;

    Ok(reviews)
}

/// Summarizes a user's progress through a deck
///
/// Flashcards without a study record count as new and due.
///
/// ### Errors
///
/// - `StudyError::NotFound` / `StudyError::Forbidden` from the deck check
#[instrument(skip(pool), fields(user_id = %user_id, deck_id = %deck_id))]
pub fn deck_stats(pool: &DbPool, user_id: &str, deck_id: &str, now: DateTime<Utc>) -> Result<DeckStatsDto, StudyError> {
    check_deck_access(pool, deck_id, user_id)?;

    let conn = &mut pool.get()?;

    let total_cards: i64 = flashcards::table
        .filter(flashcards::deck_id.eq(deck_id))
        .count()
        .get_result(conn)?;

    let records: Vec<StudyRecord> = study_records::table
        .inner_join(flashcards::table)
        .filter(flashcards::deck_id.eq(deck_id))
        .filter(study_records::user_id.eq(user_id))
        .select(StudyRecord::as_select())
        .load(conn)?;

    let without_record = total_cards - records.len() as i64;
    let reviewed_cards = records.iter().filter(|r| r.get_last_review_date().is_some()).count() as i64;
    let due_records = records.iter().filter(|r| r.is_due(now)).count() as i64;
    let average_ease_factor = if records.is_empty() {
        None
    } else {
        Some(records.iter().map(|r| r.get_ease_factor()).sum::<f64>() / records.len() as f64)
    };

    Ok(DeckStatsDto {
        deck_id: deck_id.to_string(),
        total_cards,
        new_cards: total_cards - reviewed_cards,
        due_cards: without_record + due_records,
        reviewed_cards,
        average_ease_factor,
    })
}

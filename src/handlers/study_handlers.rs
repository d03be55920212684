use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{instrument, debug, info, warn};

use crate::auth::current_user_id;
use crate::db::DbPool;
use crate::dto::{DueCardDto, ReviewOutcomeDto, ReviewPreviewDto, StartSessionDto, StudySessionDto, SubmitReviewDto};
use crate::errors::ApiError;
use crate::models::ReviewLog;
use crate::repo::{self, ReviewSubmission};
use crate::scheduler;

/// Handler for starting a study session
///
/// This function handles POST requests to `/study/sessions`. Flashcards the
/// caller has never studied get a study record, due immediately, before the
/// due cards are selected.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `headers` - Request headers carrying the user identity
/// * `payload` - The deck and an optional limit (1-50, default 20)
///
/// ### Returns
///
/// The due cards, oldest due first, and the number due before the limit
#[instrument(skip(pool, headers, payload), fields(deck_id = %payload.deck_id))]
pub async fn start_session_handler(
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
    Json(payload): Json<StartSessionDto>,
) -> Result<Json<StudySessionDto>, ApiError> {
    let user_id = current_user_id(&headers)?;
    let limit = payload.validated_limit()?;

    let session = repo::initialize_session(&pool, &user_id, &payload.deck_id, limit, Utc::now()).await?;

    let due_cards = session
        .due_cards
        .iter()
        .map(|(record, card)| DueCardDto::new(record, card))
        .collect();

    Ok(Json(StudySessionDto {
        due_cards,
        total_due: session.total_due,
    }))
}

/// Handler for submitting a review
///
/// This function handles POST requests to `/study/reviews`.
///
/// The rating is parsed before anything is read from the database, so an
/// invalid rating is always reported as such.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `headers` - Request headers carrying the user identity
/// * `payload` - Record id, flashcard id, rating and the optional expected last review date
///
/// ### Returns
///
/// The record's new scheduling state
#[instrument(skip(pool, headers, payload), fields(study_record_id = %payload.study_record_id, rating = %payload.rating))]
pub async fn submit_review_handler(
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
    Json(payload): Json<SubmitReviewDto>,
) -> Result<Json<ReviewOutcomeDto>, ApiError> {
    let user_id = current_user_id(&headers)?;

    let rating = payload.parse_rating().map_err(|e| {
        warn!("Invalid rating: {}", payload.rating);
        ApiError::InvalidRating(e.to_string())
    })?;
    payload.validate_ids()?;

    let submission = ReviewSubmission {
        study_record_id: payload.study_record_id,
        flashcard_id: payload.flashcard_id,
        rating,
        expected_last_review_date: payload.expected_last_review_date,
    };

    let record = repo::submit_review(&pool, &user_id, &submission, Utc::now()).await?;

    info!("Review recorded");
    Ok(Json(ReviewOutcomeDto::new(&record, rating)))
}

/// Handler for a study record's review history, newest first
///
/// This function handles GET requests to `/study/records/{id}/reviews`.
#[instrument(skip(pool, headers), fields(study_record_id = %id))]
pub async fn list_record_reviews_handler(
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vec<ReviewLog>>, ApiError> {
    let user_id = current_user_id(&headers)?;
    repo::check_record_access(&pool, &id, &user_id)?;

    let reviews = repo::list_reviews_for_record(&pool, &id)?;

    debug!("Retrieved {} reviews", reviews.len());
    Ok(Json(reviews))
}

/// Handler for previewing what each rating would do to a study record
///
/// This function handles GET requests to `/study/records/{id}/preview`.
/// Nothing is written.
#[instrument(skip(pool, headers), fields(study_record_id = %id))]
pub async fn preview_record_handler(
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vec<ReviewPreviewDto>>, ApiError> {
    let user_id = current_user_id(&headers)?;
    let record = repo::check_record_access(&pool, &id, &user_id)?;

    let previews = scheduler::preview(&record.schedule_state(), Utc::now())
        .iter()
        .map(|(rating, state)| ReviewPreviewDto::new(*rating, state))
        .collect();

    Ok(Json(previews))
}

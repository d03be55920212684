use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{instrument, debug, info};

use crate::auth::current_user_id;
use crate::db::DbPool;
use crate::dto::{CreateFlashcardDto, UpdateFlashcardDto};
use crate::errors::ApiError;
use crate::models::Flashcard;
use crate::repo;

/// Handler for adding a flashcard to a deck
///
/// This function handles POST requests to `/decks/{id}/flashcards`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `headers` - Request headers carrying the user identity
/// * `deck_id` - The deck, extracted from the URL path
/// * `payload` - Front, back and the AI-origin flag
///
/// ### Returns
///
/// The newly created flashcard as JSON
#[instrument(skip(pool, headers, payload), fields(deck_id = %deck_id, ai_generated = %payload.ai_generated))]
pub async fn create_flashcard_handler(
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
    Path(deck_id): Path<String>,
    Json(payload): Json<CreateFlashcardDto>,
) -> Result<Json<Flashcard>, ApiError> {
    let user_id = current_user_id(&headers)?;
    payload.validate()?;
    repo::check_deck_access(&pool, &deck_id, &user_id)?;

    let card = repo::create_flashcard(&pool, &deck_id, payload.front, payload.back, payload.ai_generated).await?;

    info!("Created flashcard {}", card.get_id());
    Ok(Json(card))
}

/// Handler for listing the flashcards of a deck in creation order
///
/// This function handles GET requests to `/decks/{id}/flashcards`.
#[instrument(skip(pool, headers), fields(deck_id = %deck_id))]
pub async fn list_flashcards_handler(
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
    Path(deck_id): Path<String>,
) -> Result<Json<Vec<Flashcard>>, ApiError> {
    let user_id = current_user_id(&headers)?;
    repo::check_deck_access(&pool, &deck_id, &user_id)?;

    let cards = repo::list_flashcards_for_deck(&pool, &deck_id)?;

    debug!("Retrieved {} flashcards", cards.len());
    Ok(Json(cards))
}

/// Handler for editing a flashcard's front or back
///
/// This function handles PATCH requests to `/flashcards/{id}`. The card's
/// study records are kept; only the content changes.
#[instrument(skip(pool, headers, payload), fields(flashcard_id = %id))]
pub async fn update_flashcard_handler(
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateFlashcardDto>,
) -> Result<Json<Flashcard>, ApiError> {
    let user_id = current_user_id(&headers)?;
    payload.validate()?;

    let mut card = repo::check_flashcard_access(&pool, &id, &user_id)?;
    card.edit(payload.front, payload.back, Utc::now());

    let updated = repo::update_flashcard_content(&pool, &card).await?;
    Ok(Json(updated))
}

/// Handler for deleting a flashcard
///
/// This function handles DELETE requests to `/flashcards/{id}`.
#[instrument(skip(pool, headers), fields(flashcard_id = %id))]
pub async fn delete_flashcard_handler(
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = current_user_id(&headers)?;
    repo::check_flashcard_access(&pool, &id, &user_id)?;

    if !repo::delete_flashcard(&pool, &id).await? {
        return Err(ApiError::NotFound("Flashcard".to_string()));
    }

    info!("Deleted flashcard");
    Ok(StatusCode::NO_CONTENT)
}

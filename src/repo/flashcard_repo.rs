use crate::db::{execute_with_retry, DbPool};
use crate::errors::StudyError;
use crate::models::Flashcard;
use crate::schema::flashcards;
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info};

use super::deck_repo::is_deck_owned_by;

/// Creates a new flashcard in a deck
///
/// No study record is created here; the first study session that includes
/// the card creates it.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `deck_id` - The deck the card belongs to
/// * `front` - Question side
/// * `back` - Answer side
/// * `ai_generated` - Whether the card came from AI generation
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database insert operation fails (including a missing deck)
#[instrument(skip(pool, front, back), fields(deck_id = %deck_id, ai_generated = %ai_generated))]
pub async fn create_flashcard(
    pool: &DbPool,
    deck_id: &str,
    front: String,
    back: String,
    ai_generated: bool,
) -> Result<Flashcard> {
    debug!("Creating new flashcard");

    let conn = &mut pool.get()?;
    let new_card = Flashcard::new(deck_id.to_string(), front, back, ai_generated);

    execute_with_retry(|| {
        diesel::insert_into(flashcards::table)
            .values(&new_card)
            .execute(conn)
    }).await?;

    info!("Successfully created flashcard with id: {}", new_card.get_id());
    Ok(new_card)
}

/// Retrieves a flashcard by its ID
#[instrument(skip(pool), fields(flashcard_id = %flashcard_id))]
pub fn get_flashcard(pool: &DbPool, flashcard_id: &str) -> Result<Option<Flashcard>> {
    let conn = &mut pool.get()?;

    let result = flashcards::table
        .find(flashcard_id)
        .first::<Flashcard>(conn)
        .optional()?;

    Ok(result)
}

/// Lists the flashcards of a deck in creation order
#[instrument(skip(pool), fields(deck_id = %deck_id))]
pub fn list_flashcards_for_deck(pool: &DbPool, deck_id: &str) -> Result<Vec<Flashcard>> {
    let conn = &mut pool.get()?;

    let result = flashcards::table
        .filter(flashcards::deck_id.eq(deck_id))
        .order((flashcards::created_at.asc(), flashcards::id.asc()))
        .load::<Flashcard>(conn)?;

    debug!("Found {} flashcards", result.len());
    Ok(result)
}

/// Loads a flashcard on behalf of `user_id`
///
/// ### Errors
///
/// - `StudyError::NotFound` if the flashcard does not exist
/// - `StudyError::Forbidden` if its deck belongs to someone else
#[instrument(skip(pool), fields(flashcard_id = %flashcard_id, user_id = %user_id))]
pub fn check_flashcard_access(pool: &DbPool, flashcard_id: &str, user_id: &str) -> Result<Flashcard, StudyError> {
    let card = get_flashcard(pool, flashcard_id)?
        .ok_or(StudyError::NotFound("Flashcard"))?;

    if !is_deck_owned_by(pool, &card.get_deck_id(), user_id)? {
        debug!("Flashcard belongs to another user's deck");
        return Err(StudyError::Forbidden);
    }
    Ok(card)
}

/// Persists the content of an edited flashcard
///
/// Only `front`, `back` and `updated_at` are written.
///
/// ### Errors
///
/// - `StudyError::NotFound` if the flashcard no longer exists
/// - `StudyError::Internal` if the pool or the update fails
#[instrument(skip(pool, card), fields(flashcard_id = %card.get_id()))]
pub async fn update_flashcard_content(pool: &DbPool, card: &Flashcard) -> Result<Flashcard, StudyError> {
    let conn = &mut pool.get()?;
    let card_id = card.get_id();

    let updated = execute_with_retry(|| {
        diesel::update(flashcards::table.find(&card_id))
            .set((
                flashcards::front.eq(card.get_front()),
                flashcards::back.eq(card.get_back()),
                flashcards::updated_at.eq(card.get_updated_at().naive_utc()),
            ))
            .returning(Flashcard::as_returning())
            .get_result(conn)
            .optional()
    }).await?;

    let updated = updated.ok_or(StudyError::NotFound("Flashcard"))?;
    info!("Updated flashcard content");
    Ok(updated)
}

/// Deletes a flashcard; its study records and review logs go with it
///
/// ### Returns
///
/// Whether a flashcard was deleted
#[instrument(skip(pool), fields(flashcard_id = %flashcard_id))]
pub async fn delete_flashcard(pool: &DbPool, flashcard_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = execute_with_retry(|| {
        diesel::delete(flashcards::table.find(flashcard_id)).execute(conn)
    }).await?;

    info!("Deleted {} flashcard(s)", deleted);
    Ok(deleted > 0)
}

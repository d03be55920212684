use crate::db::{execute_with_retry, DbPool};
use crate::errors::StudyError;
use crate::models::Deck;
use crate::schema::decks;
use diesel::dsl::exists;
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info};

/// Creates a new deck owned by `user_id`
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The owning user
/// * `name` - The deck name
/// * `description` - An optional description
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database insert operation fails
#[instrument(skip(pool, description), fields(user_id = %user_id, name = %name))]
pub async fn create_deck(pool: &DbPool, user_id: &str, name: String, description: Option<String>) -> Result<Deck> {
    debug!("Creating new deck");

    let conn = &mut pool.get()?;
    let new_deck = Deck::new(user_id.to_string(), name, description);

    execute_with_retry(|| {
        diesel::insert_into(decks::table)
            .values(&new_deck)
            .execute(conn)
    }).await?;

    info!("Successfully created deck with id: {}", new_deck.get_id());
    Ok(new_deck)
}

/// Retrieves a deck by its ID, regardless of owner
#[instrument(skip(pool), fields(deck_id = %deck_id))]
pub fn get_deck(pool: &DbPool, deck_id: &str) -> Result<Option<Deck>> {
    let conn = &mut pool.get()?;

    let result = decks::table
        .find(deck_id)
        .first::<Deck>(conn)
        .optional()?;

    if result.is_none() {
        debug!("Deck not found");
    }
    Ok(result)
}

/// Lists a user's decks, oldest first
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn list_decks_for_user(pool: &DbPool, user_id: &str) -> Result<Vec<Deck>> {
    let conn = &mut pool.get()?;

    let result = decks::table
        .filter(decks::user_id.eq(user_id))
        .order((decks::created_at.asc(), decks::id.asc()))
        .load::<Deck>(conn)?;

    debug!("Found {} decks", result.len());
    Ok(result)
}

/// Whether a deck with this ID exists at all
pub fn deck_exists(pool: &DbPool, deck_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;
    let found = diesel::select(exists(decks::table.find(deck_id))).get_result::<bool>(conn)?;
    Ok(found)
}

/// Whether the deck exists and belongs to `user_id`
pub fn is_deck_owned_by(pool: &DbPool, deck_id: &str, user_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;
    let owned = diesel::select(exists(
        decks::table
            .filter(decks::id.eq(deck_id))
            .filter(decks::user_id.eq(user_id)),
    ))
    .get_result::<bool>(conn)?;
    Ok(owned)
}

/// Ensures `user_id` may act on the deck
///
/// ### Errors
///
/// - `StudyError::NotFound` if the deck does not exist
/// - `StudyError::Forbidden` if it exists but belongs to someone else
#[instrument(skip(pool), fields(deck_id = %deck_id, user_id = %user_id))]
pub fn check_deck_access(pool: &DbPool, deck_id: &str, user_id: &str) -> Result<(), StudyError> {
    if is_deck_owned_by(pool, deck_id, user_id)? {
        return Ok(());
    }
    if deck_exists(pool, deck_id)? {
        debug!("Deck belongs to another user");
        Err(StudyError::Forbidden)
    } else {
        debug!("Deck not found");
        Err(StudyError::NotFound("Deck"))
    }
}

/// Deletes a deck; its flashcards and their study records go with it
///
/// ### Returns
///
/// Whether a deck was deleted
#[instrument(skip(pool), fields(deck_id = %deck_id))]
pub async fn delete_deck(pool: &DbPool, deck_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = execute_with_retry(|| {
        diesel::delete(decks::table.find(deck_id)).execute(conn)
    }).await?;

    info!("Deleted {} deck(s)", deleted);
    Ok(deleted > 0)
}

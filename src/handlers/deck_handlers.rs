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
use crate::dto::{CreateDeckDto, DeckStatsDto};
use crate::errors::ApiError;
use crate::models::Deck;
use crate::repo;

/// Handler for creating a new deck
///
/// This function handles POST requests to `/decks`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `headers` - Request headers carrying the user identity
/// * `payload` - The deck name and optional description
///
/// ### Returns
///
/// The newly created deck as JSON
#[instrument(skip(pool, headers, payload), fields(name = %payload.name))]
pub async fn create_deck_handler(
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
    Json(payload): Json<CreateDeckDto>,
) -> Result<Json<Deck>, ApiError> {
    let user_id = current_user_id(&headers)?;
    payload.validate()?;

    let deck = repo::create_deck(&pool, &user_id, payload.name, payload.description).await?;

    info!("Created deck {}", deck.get_id());
    Ok(Json(deck))
}

/// Handler for listing the caller's decks
///
/// This function handles GET requests to `/decks`.
#[instrument(skip(pool, headers))]
pub async fn list_decks_handler(
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Deck>>, ApiError> {
    let user_id = current_user_id(&headers)?;

    let decks = repo::list_decks_for_user(&pool, &user_id)?;

    debug!("Retrieved {} decks", decks.len());
    Ok(Json(decks))
}

/// Handler for retrieving one deck
///
/// This function handles GET requests to `/decks/{id}`.
///
/// ### Returns
///
/// The deck as JSON; 404 if it does not exist, 403 if it belongs to someone else
#[instrument(skip(pool, headers), fields(deck_id = %id))]
pub async fn get_deck_handler(
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Deck>, ApiError> {
    let user_id = current_user_id(&headers)?;
    repo::check_deck_access(&pool, &id, &user_id)?;

    let deck = repo::get_deck(&pool, &id)?
        .ok_or_else(|| ApiError::NotFound("Deck".to_string()))?;

    Ok(Json(deck))
}

/// Handler for deleting a deck with its flashcards and study records
///
/// This function handles DELETE requests to `/decks/{id}`.
#[instrument(skip(pool, headers), fields(deck_id = %id))]
pub async fn delete_deck_handler(
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = current_user_id(&headers)?;
    repo::check_deck_access(&pool, &id, &user_id)?;

    if !repo::delete_deck(&pool, &id).await? {
        return Err(ApiError::NotFound("Deck".to_string()));
    }

    info!("Deleted deck");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for a deck's study statistics
///
/// This function handles GET requests to `/decks/{id}/stats`.
///
/// ### Returns
///
/// Card counts and the mean ease factor for the caller's progress through the deck
#[instrument(skip(pool, headers), fields(deck_id = %id))]
pub async fn deck_stats_handler(
    State(pool): State<Arc<DbPool>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DeckStatsDto>, ApiError> {
    let user_id = current_user_id(&headers)?;

    let stats = repo::deck_stats(&pool, &user_id, &id, Utc::now())?;

    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::USER_ID_HEADER;
    use crate::test_utils::setup_test_db;
    use axum::http::HeaderValue;

    fn headers_for(user_id: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static(user_id));
        headers
    }

    #[tokio::test]
    async fn test_create_deck_handler() {
        let pool = setup_test_db();

        let payload = CreateDeckDto {
            name: "Biology".to_string(),
            description: None,
        };

        let result = create_deck_handler(State(pool.clone()), headers_for("user-1"), Json(payload))
            .await
            .unwrap();

        let deck = result.0;
        assert_eq!(deck.get_name(), "Biology");
        assert_eq!(deck.get_user_id(), "user-1");
    }

    #[tokio::test]
    async fn test_create_deck_handler_rejects_blank_name() {
        let pool = setup_test_db();

        let payload = CreateDeckDto {
            name: "  ".to_string(),
            description: None,
        };

        let result = create_deck_handler(State(pool.clone()), headers_for("user-1"), Json(payload)).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_deck_handler_requires_identity() {
        let pool = setup_test_db();

        let payload = CreateDeckDto {
            name: "Biology".to_string(),
            description: None,
        };

        let result = create_deck_handler(State(pool.clone()), HeaderMap::new(), Json(payload)).await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_get_deck_handler_access() {
        let pool = setup_test_db();
        let deck = repo::create_deck(&pool, "owner", "Deck".to_string(), None).await.unwrap();

        let found = get_deck_handler(State(pool.clone()), headers_for("owner"), Path(deck.get_id()))
            .await
            .unwrap();
        assert_eq!(found.0, deck);

        let forbidden = get_deck_handler(State(pool.clone()), headers_for("intruder"), Path(deck.get_id())).await;
        assert!(matches!(forbidden, Err(ApiError::Forbidden)));

        let missing = get_deck_handler(State(pool.clone()), headers_for("owner"), Path("nonexistent".to_string())).await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_and_delete_decks() {
        let pool = setup_test_db();
        let deck = repo::create_deck(&pool, "owner", "Deck".to_string(), None).await.unwrap();

        let listed = list_decks_handler(State(pool.clone()), headers_for("owner")).await.unwrap();
        assert_eq!(listed.0.len(), 1);

        let forbidden = delete_deck_handler(State(pool.clone()), headers_for("intruder"), Path(deck.get_id())).await;
        assert!(matches!(forbidden, Err(ApiError::Forbidden)));

        let status = delete_deck_handler(State(pool.clone()), headers_for("owner"), Path(deck.get_id()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let listed = list_decks_handler(State(pool.clone()), headers_for("owner")).await.unwrap();
        assert!(listed.0.is_empty());
    }

    #[tokio::test]
    async fn test_deck_stats_handler() {
        let pool = setup_test_db();
        let deck = repo::create_deck(&pool, "owner", "Deck".to_string(), None).await.unwrap();
        repo::create_flashcard(&pool, &deck.get_id(), "q".to_string(), "a".to_string(), true).await.unwrap();

        let stats = deck_stats_handler(State(pool.clone()), headers_for("owner"), Path(deck.get_id()))
            .await
            .unwrap();
        assert_eq!(stats.0.total_cards, 1);
        assert_eq!(stats.0.new_cards, 1);
    }
}

/// Flashdeck: flashcard study service
///
/// This library provides the core of a flashcard study service: decks of
/// flashcards, an SM-2 style review scheduler, and a study session selector
/// that keeps one scheduling record per user and flashcard.
///
/// ### Modules
///
/// - `scheduler`: Pure review scheduling (no I/O)
/// - `repo`: Repository layer, including session selection and review persistence
/// - `models`: Decks, flashcards, study records, review logs and ratings
/// - `handlers`: Axum handlers for the web API
/// - `db`, `schema`: Connection pool and Diesel schema
///
/// ### Web API
///
/// Every request names its user in the `x-user-id` header.
///
/// - `POST /decks`, `GET /decks`: Create or list the caller's decks
/// - `GET /decks/{id}`, `DELETE /decks/{id}`: Get or delete a deck
/// - `GET /decks/{id}/stats`: Study progress for a deck
/// - `POST /decks/{id}/flashcards`, `GET /decks/{id}/flashcards`: Add or list flashcards
/// - `PATCH /flashcards/{id}`, `DELETE /flashcards/{id}`: Edit or delete a flashcard
/// - `POST /study/sessions`: Start a study session
/// - `POST /study/reviews`: Submit a review
/// - `GET /study/records/{id}/reviews`: Review history of a study record
/// - `GET /study/records/{id}/preview`: What each rating would do to a study record

/// Request identity
pub mod auth;

/// Configuration loading
pub mod config;

/// Database connection module
pub mod db;

/// Data transfer objects
pub mod dto;

/// Error types
pub mod errors;

/// Web API handlers
pub mod handlers;

/// Data models module
pub mod models;

/// Repository module for database operations
pub mod repo;

/// Review scheduling
pub mod scheduler;

/// Database schema module
pub mod schema;

#[cfg(test)]
pub mod test_utils;

use axum::{
    routing::{get, patch, post},
    Router,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use handlers::*;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use dto::*;
pub use errors::{ApiError, StudyError};

/// Migrations compiled into the binary
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Creates the application router with all routes configured
///
/// This function sets up the Axum router with all the API endpoints.
///
/// ### Arguments
///
/// * `pool` - The database connection pool to be shared with all handlers
///
/// ### Returns
///
/// An Axum Router configured with all routes and the database pool as state
pub fn create_app(pool: Arc<db::DbPool>) -> Router {
    Router::new()
        // Decks owned by the caller
        .route("/decks", post(create_deck_handler).get(list_decks_handler))
        .route("/decks/{id}", get(get_deck_handler).delete(delete_deck_handler))
        .route("/decks/{id}/stats", get(deck_stats_handler))
        // Flashcards within a deck
        .route("/decks/{id}/flashcards", post(create_flashcard_handler).get(list_flashcards_handler))
        .route("/flashcards/{id}", patch(update_flashcard_handler).delete(delete_flashcard_handler))
        // Studying
        .route("/study/sessions", post(start_session_handler))
        .route("/study/reviews", post(submit_review_handler))
        .route("/study/records/{id}/reviews", get(list_record_reviews_handler))
        .route("/study/records/{id}/preview", get(preview_record_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // Add the database pool to the application state
        .with_state(pool)
}

/// Runs the embedded migrations
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
///
/// ### Errors
///
/// Returns an error if any pending migration fails to apply
pub fn run_migrations(conn: &mut diesel::SqliteConnection) -> anyhow::Result<()> {
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
    Ok(())
}

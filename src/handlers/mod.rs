/// Web API Handlers
///
/// This module contains the handlers for the RESTful API endpoints.
/// Each handler resolves the calling user from the request headers,
/// validates the payload, calls the repository layer, and maps the result
/// to JSON or to an [`ApiError`](crate::errors::ApiError).

mod deck_handlers;
mod flashcard_handlers;
mod study_handlers;

// Re-export all handlers
pub use deck_handlers::*;
pub use flashcard_handlers::*;
pub use study_handlers::*;

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json
};
use thiserror::Error;
use tracing::error;

use crate::db::LockError;

/// Failures of the study operations, independent of any transport
#[derive(Error, Debug)]
pub enum StudyError {
    /// The deck, flashcard or study record does not exist
    #[error("{0} not found")]
    NotFound(&'static str),
    /// The resource exists but belongs to another user
    #[error("Access denied")]
    Forbidden,
    /// The request was well-formed JSON but semantically invalid
    #[error("{0}")]
    Validation(String),
    /// The record changed since the client last read it
    #[error("Study record was reviewed since it was last read")]
    Conflict,
    /// Persistence failure
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<diesel::result::Error> for StudyError {
    fn from(err: diesel::result::Error) -> Self {
        StudyError::Internal(err.into())
    }
}

impl From<diesel::r2d2::PoolError> for StudyError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        StudyError::Internal(err.into())
    }
}

impl LockError for StudyError {
    fn is_locked(&self) -> bool {
        match self {
            StudyError::Internal(err) => err
                .downcast_ref::<diesel::result::Error>()
                .is_some_and(|err| err.is_locked()),
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Access denied")]
    Forbidden,
    #[error("Missing user identity")]
    Unauthorized,
    #[error("Invalid rating: {0}")]
    InvalidRating(String),
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<StudyError> for ApiError {
    fn from(err: StudyError) -> Self {
        match err {
            StudyError::NotFound(what) => ApiError::NotFound(what.to_string()),
            StudyError::Forbidden => ApiError::Forbidden,
            StudyError::Validation(msg) => ApiError::Validation(msg),
            StudyError::Conflict => ApiError::Conflict(StudyError::Conflict.to_string()),
            StudyError::Internal(err) => ApiError::Database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Database(err) => {
                error!("Internal error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Access denied".to_string()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Missing user identity".to_string()),
            ApiError::InvalidRating(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

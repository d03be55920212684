use axum::http::HeaderMap;
use tracing::warn;

use crate::errors::ApiError;

/// Header carrying the authenticated user id
///
/// Authentication happens in the identity provider in front of this service;
/// by the time a request arrives the gateway has replaced any client-supplied
/// value with the verified subject.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Returns the id of the user making the request
///
/// ### Errors
///
/// Returns `ApiError::Unauthorized` when the header is missing, not valid
/// UTF-8, or blank.
pub fn current_user_id(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or_default();

    if value.is_empty() {
        warn!("Request without {} header", USER_ID_HEADER);
        return Err(ApiError::Unauthorized);
    }

    Ok(value.to_string())
}

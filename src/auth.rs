//! Bearer gate for protected routes.
//!
//! Callers authenticate with `Authorization: Bearer <LOCAL_API_KEY>`. The
//! check is a plain comparison against one shared secret: there is no expiry,
//! no per-user scoping and no protection against replay.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use log::warn;

use crate::app::AppState;
use crate::error::ApiError;

pub const INVALID_HEADER: &str = "Invalid authorization header";
pub const INVALID_API_KEY: &str = "Invalid API key";

/// Extracts the token of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Checks a request's credential against the configured key.
pub fn check_api_key(headers: &HeaderMap, expected_key: &str) -> Result<(), ApiError> {
    let token = bearer_token(headers).ok_or(ApiError::Unauthorized(INVALID_HEADER))?;
    if token != expected_key {
        return Err(ApiError::Unauthorized(INVALID_API_KEY));
    }
    Ok(())
}

/// Middleware rejecting any request without the exact shared secret.
///
/// Rejected requests get a 401 with `{"error": ...}` and never reach the
/// wrapped handler.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if let Err(e) = check_api_key(request.headers(), &state.api_key) {
        warn!(
            "Unauthorized request to {} {}: {}",
            request.method(),
            request.uri().path(),
            e
        );
        return e.into_response();
    }

    next.run(request).await
}

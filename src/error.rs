//! Error types shared by the HTTP layer.
//!
//! Every failure leaves the service as a JSON body of the form
//! `{"error": "<message>"}`. Local validation is a 400, the bearer gate is a
//! 401, and anything raised while talking to Twitter/X or the OAuth provider
//! is flattened into a 500 carrying the upstream error text.

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::oauth::OAuthError;
use crate::twitter::TwitterError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Twitter(#[from] TwitterError),

    #[error(transparent)]
    OAuth(#[from] OAuthError),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Twitter(_) | ApiError::OAuth(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed with {}: {}", status, self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

//! # Tweetrelay Library
//!
//! A Rust web service library that relays tweet operations and OAuth 2.0 token
//! exchanges to the Twitter/X API. Tweet operations use an OAuth 2.0 User
//! Context access token against the API v2 endpoints.
//!
//! ## Features
//!
//! - Post tweets, replies and threads; look up and search tweets
//! - Exchange authorization codes and refresh tokens at the provider's token endpoint
//! - Browser authorization-code flow with per-request `state` and PKCE
//! - Shared-secret bearer gate in front of the tweet operations
//!
//! ## Configuration
//!
//! - `LOCAL_API_KEY` (or `API_KEY`): shared secret for the bearer gate (required)
//! - `xapi_access_token`: OAuth 2.0 User Context token for tweet operations
//! - `CLIENT_ID`, `CLIENT_SECRET`, `REDIRECT_URI`: OAuth 2.0 client
//! - `PORT`: Server port (defaults to 5000)
//!
//! ## API Endpoints
//!
//! - `GET /health`: Returns service health status
//! - `POST /tweet`, `POST /tweet/:id/reply`, `POST /thread`
//! - `GET /tweet/:id`, `GET /tweets/search?query=`
//! - `POST /oauth/token`, `POST /oauth/refresh`
//! - `GET /authorize`, `GET /callback`

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod oauth;
pub mod twitter;

// Re-export commonly used types and functions
pub use app::{build_router, AppState};
pub use config::{get_server_port, AppConfig, OAuthSettings};
pub use error::ApiError;
pub use oauth::build_oauth2_user_context_header;
pub use twitter::{TweetClient, XApiClient};

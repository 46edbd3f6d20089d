//! OAuth 2.0 module for Twitter/X API integration.
//!
//! This module forwards authorization codes and refresh tokens to the provider's
//! token endpoint, builds the authorization-code redirect URL (with PKCE), and
//! builds the OAuth 2.0 User Context header used for tweet operations.
//!
//! The exchanger is stateless: token bundles are returned to the caller
//! verbatim and never stored.

use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use base64::Engine;
use log::{debug, info, warn};
use rand::{distributions::Alphanumeric, Rng};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;
use url::Url;

use crate::config::OAuthSettings;
use crate::twitter::sanitize_for_logging;

const PKCE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";
const PKCE_VERIFIER_LENGTH: usize = 128;
const STATE_LENGTH: usize = 32;

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("OAuth is not configured: set CLIENT_ID, CLIENT_SECRET and REDIRECT_URI")]
    NotConfigured,

    #[error("Token request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token endpoint returned a non-JSON response ({status})")]
    InvalidResponse { status: u16 },

    #[error("Invalid authorization URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// The provider's answer to a token request, kept exactly as received.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenResponse {
    /// Upstream HTTP status code
    pub status: u16,
    /// Upstream JSON body, including any fields this service does not know about
    pub body: Value,
}

impl IntoResponse for TokenResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_GATEWAY);
        (status, Json(self.body)).into_response()
    }
}

/// A provider token endpoint accepting form-encoded grant requests.
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    async fn request_token(&self, form: &[(&str, String)]) -> Result<TokenResponse, OAuthError>;
}

/// Token endpoint reached over HTTPS with a shared `reqwest::Client`.
pub struct HttpTokenEndpoint {
    client: reqwest::Client,
    token_url: String,
}

impl HttpTokenEndpoint {
    pub fn new(client: reqwest::Client, token_url: impl Into<String>) -> Self {
        HttpTokenEndpoint {
            client,
            token_url: token_url.into(),
        }
    }
}

#[async_trait]
impl TokenEndpoint for HttpTokenEndpoint {
    async fn request_token(&self, form: &[(&str, String)]) -> Result<TokenResponse, OAuthError> {
        info!("Sending token request to {}", self.token_url);

        let response = self.client.post(&self.token_url).form(form).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        info!("Token endpoint responded with status: {}", status);

        match serde_json::from_str(&text) {
            Ok(body) => Ok(TokenResponse { status, body }),
            Err(e) => {
                warn!("Token endpoint response is not JSON: {}", e);
                debug!("Token endpoint body: {}", sanitize_for_logging(&text, 200));
                Err(OAuthError::InvalidResponse { status })
            }
        }
    }
}

/// A token endpoint for deployments without an OAuth client.
pub struct DisabledTokenEndpoint;

#[async_trait]
impl TokenEndpoint for DisabledTokenEndpoint {
    async fn request_token(&self, _form: &[(&str, String)]) -> Result<TokenResponse, OAuthError> {
        Err(OAuthError::NotConfigured)
    }
}

/// Exchanges an authorization code for a token bundle.
///
/// # Parameters
///
/// - `endpoint`: The provider token endpoint
/// - `settings`: OAuth client registration
/// - `code`: Authorization code returned to the redirect URI
/// - `code_verifier`: PKCE verifier, when the code was requested with a challenge
///
/// # Returns
///
/// The provider response, success or error, exactly as received.
pub async fn exchange_authorization_code(
    endpoint: &dyn TokenEndpoint,
    settings: &OAuthSettings,
    code: &str,
    code_verifier: Option<&str>,
) -> Result<TokenResponse, OAuthError> {
    info!("Exchanging authorization code for access token");

    let mut form = vec![
        ("code", code.to_string()),
        ("grant_type", "authorization_code".to_string()),
        ("client_id", settings.client_id.clone()),
        ("client_secret", settings.client_secret.clone()),
        ("redirect_uri", settings.redirect_uri.clone()),
    ];
    if let Some(verifier) = code_verifier {
        form.push(("code_verifier", verifier.to_string()));
    }

    endpoint.request_token(&form).await
}

/// Exchanges a refresh token for a new token bundle.
///
/// The provider may rotate the refresh token; the caller receives whatever it
/// returns and is responsible for keeping the new one.
pub async fn refresh_access_token(
    endpoint: &dyn TokenEndpoint,
    settings: &OAuthSettings,
    refresh_token: &str,
) -> Result<TokenResponse, OAuthError> {
    info!("Refreshing access token");

    let form = [
        ("refresh_token", refresh_token.to_string()),
        ("grant_type", "refresh_token".to_string()),
        ("client_id", settings.client_id.clone()),
        ("client_secret", settings.client_secret.clone()),
    ];

    endpoint.request_token(&form).await
}

/// Builds the authorization URL for the OAuth 2.0 authorization-code flow.
///
/// # Parameters
///
/// - `settings`: OAuth client registration (endpoint, client id, redirect URI, scopes)
/// - `state`: Per-request anti-CSRF value echoed back to the callback
/// - `code_challenge`: PKCE S256 challenge
pub fn build_authorization_url(
    settings: &OAuthSettings,
    state: &str,
    code_challenge: &str,
) -> Result<Url, OAuthError> {
    let mut url = Url::parse(&settings.authorize_url)?;
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &settings.client_id)
        .append_pair("redirect_uri", &settings.redirect_uri)
        .append_pair("scope", &settings.scopes)
        .append_pair("state", state)
        .append_pair("code_challenge", code_challenge)
        .append_pair("code_challenge_method", "S256");
    Ok(url)
}

/// Generates a random alphanumeric `state` value.
pub fn generate_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LENGTH)
        .map(char::from)
        .collect()
}

/// Generates a cryptographically secure random string for PKCE
pub fn generate_code_verifier() -> String {
    let mut rng = rand::thread_rng();
    (0..PKCE_VERIFIER_LENGTH)
        .map(|_| PKCE_CHARSET[rng.gen_range(0..PKCE_CHARSET.len())] as char)
        .collect()
}

/// Generates code challenge from code verifier using SHA256
pub fn generate_code_challenge(code_verifier: &str) -> String {
    let hash = Sha256::digest(code_verifier.as_bytes());
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hash)
}

/// Builds the Authorization header for OAuth 2.0 User Context authentication.
///
/// # Example
///
/// ```rust
/// use tweetrelay::build_oauth2_user_context_header;
///
/// let header = build_oauth2_user_context_header("your_access_token");
/// assert_eq!(header, "Bearer your_access_token");
/// ```
pub fn build_oauth2_user_context_header(access_token: &str) -> String {
    format!("Bearer {}", access_token)
}

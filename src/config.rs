//! Configuration module for the tweetrelay service.
//!
//! This module contains configuration structures and environment variable handling
//! for the bearer gate, the Twitter/X API client and the OAuth 2.0 client.

use log::{debug, info, warn};
use std::env;
use thiserror::Error;

/// Default base URL of the Twitter/X API v2.
pub const DEFAULT_API_BASE_URL: &str = "https://api.x.com";
/// Default OAuth 2.0 authorization endpoint.
pub const DEFAULT_AUTHORIZE_URL: &str = "https://twitter.com/i/oauth2/authorize";
/// Default OAuth 2.0 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://api.x.com/2/oauth2/token";
/// Scopes requested by the `/authorize` redirect.
pub const DEFAULT_SCOPES: &str = "tweet.read tweet.write users.read offline.access";
/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing LOCAL_API_KEY (or API_KEY) environment variable")]
    MissingApiKey,

    #[error("PORT must be a valid number, got '{0}'")]
    InvalidPort(String),
}

/// OAuth 2.0 client registration used by the token exchange and redirect flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub authorize_url: String,
    pub token_url: String,
    /// Space-separated scope list sent on the authorization URL
    pub scopes: String,
}

impl OAuthSettings {
    /// Loads the OAuth 2.0 client from the process environment.
    ///
    /// Returns `None` unless `CLIENT_ID`, `CLIENT_SECRET` and `REDIRECT_URI` are all set.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| env::var(key).ok().filter(|value| !value.trim().is_empty()))
    }

    fn from_lookup<F>(get: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match (get("CLIENT_ID"), get("CLIENT_SECRET"), get("REDIRECT_URI")) {
            (Some(client_id), Some(client_secret), Some(redirect_uri)) => {
                debug!("Client ID (masked): {}", mask_secret(&client_id));
                info!("OAuth 2.0 client configured with redirect URI {}", redirect_uri);
                Some(OAuthSettings {
                    client_id,
                    client_secret,
                    redirect_uri,
                    authorize_url: get("OAUTH_AUTHORIZE_URL")
                        .unwrap_or_else(|| DEFAULT_AUTHORIZE_URL.to_string()),
                    token_url: get("OAUTH_TOKEN_URL")
                        .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
                    scopes: get("OAUTH_SCOPES").unwrap_or_else(|| DEFAULT_SCOPES.to_string()),
                })
            }
            (None, None, None) => {
                info!("No OAuth 2.0 client configured - OAuth endpoints are disabled");
                None
            }
            _ => {
                warn!(
                    "CLIENT_ID, CLIENT_SECRET and REDIRECT_URI must all be set - OAuth endpoints are disabled"
                );
                None
            }
        }
    }
}

/// Configuration for the whole service.
///
/// Only the bearer gate secret is mandatory. Tweet operations additionally need
/// an OAuth 2.0 User Context access token, and the OAuth endpoints need the
/// client id, client secret and redirect URI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Shared secret expected in `Authorization: Bearer <api_key>`
    pub api_key: String,
    /// The Access Token for OAuth 2.0 User Context authentication
    pub access_token: Option<String>,
    pub api_base_url: String,
    pub oauth: Option<OAuthSettings>,
}

impl AppConfig {
    /// Loads the configuration from the process environment.
    ///
    /// # Required Environment Variables
    ///
    /// - `LOCAL_API_KEY` (or `API_KEY`): shared secret for the bearer gate
    ///
    /// # Optional Environment Variables
    ///
    /// - `xapi_access_token`: OAuth 2.0 User Context token for tweet operations
    /// - `X_API_BASE_URL`: override for `https://api.x.com`
    /// - `CLIENT_ID`, `CLIENT_SECRET`, `REDIRECT_URI`: OAuth 2.0 client
    /// - `OAUTH_AUTHORIZE_URL`, `OAUTH_TOKEN_URL`, `OAUTH_SCOPES`: provider overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = get("LOCAL_API_KEY")
            .or_else(|| get("API_KEY"))
            .ok_or(ConfigError::MissingApiKey)?;
        debug!("Local API key (masked): {}", mask_secret(&api_key));

        let access_token = get("xapi_access_token");
        match &access_token {
            Some(token) => {
                info!(
                    "Found xapi_access_token environment variable with length: {}",
                    token.len()
                );
                debug!("Access token (masked): {}", mask_secret(token));
            }
            None => {
                warn!("No xapi_access_token set - tweet operations will fail until one is provided")
            }
        }

        let api_base_url = get("X_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let oauth = OAuthSettings::from_lookup(&get);

        info!("Configuration loaded successfully");
        Ok(AppConfig {
            api_key,
            access_token,
            api_base_url,
            oauth,
        })
    }
}

/// Masks a secret for logging, keeping at most the first and last 8 characters.
///
/// ```rust
/// use tweetrelay::config::mask_secret;
///
/// assert_eq!(mask_secret("abcdefghijklmnopqrstuvwxyz"), "abcdefgh...stuvwxyz");
/// assert_eq!(mask_secret("short"), "short...");
/// ```
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let prefix: String = chars.iter().take(8).collect();
    if chars.len() > 16 {
        let suffix: String = chars[chars.len() - 8..].iter().collect();
        format!("{}...{}", prefix, suffix)
    } else {
        format!("{}...", prefix)
    }
}

/// Parses a port value, falling back to [`DEFAULT_PORT`] when unset.
pub fn parse_port(value: Option<&str>) -> Result<u16, ConfigError> {
    match value {
        None => Ok(DEFAULT_PORT),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(raw.to_string())),
    }
}

/// Gets the server port from the `PORT` environment variable or returns the default.
///
/// # Example
///
/// ```rust,no_run
/// use tweetrelay::get_server_port;
///
/// // With no PORT set
/// let port = get_server_port().unwrap(); // Returns 5000
/// ```
pub fn get_server_port() -> Result<u16, ConfigError> {
    parse_port(env::var("PORT").ok().as_deref())
}

//! Core Twitter API utilities.
//!
//! This module contains the [`TweetClient`] seam used by the HTTP handlers, the
//! error type for upstream failures, and [`XApiClient`], the implementation
//! that talks to the Twitter/X API v2 with an OAuth 2.0 User Context token.

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{Client, RequestBuilder};
use thiserror::Error;

use crate::oauth::build_oauth2_user_context_header;

use super::models::{SearchProduct, Tweet};

#[derive(Debug, Error)]
pub enum TwitterError {
    #[error("No xapi_access_token configured")]
    MissingAccessToken,

    #[error("Twitter API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Twitter API error for operation '{operation}' ({status}): {detail}")]
    Api {
        operation: &'static str,
        status: u16,
        detail: String,
    },

    #[error("Failed to parse Twitter API response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected Twitter API response: {0}")]
    Malformed(String),
}

/// The tweet operations the service forwards.
#[async_trait]
pub trait TweetClient: Send + Sync {
    /// Posts a tweet, as a reply when `reply_to` is given.
    async fn create_tweet(&self, text: &str, reply_to: Option<&str>)
        -> Result<Tweet, TwitterError>;

    /// Looks up a tweet with its author. `Ok(None)` when it does not exist.
    async fn get_tweet(&self, tweet_id: &str) -> Result<Option<Tweet>, TwitterError>;

    async fn search_tweets(
        &self,
        query: &str,
        product: SearchProduct,
        count: u32,
    ) -> Result<Vec<Tweet>, TwitterError>;
}

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// # Parameters
///
/// - `text`: The text to sanitize
/// - `max_len`: Maximum length in characters before truncation
///
/// # Returns
///
/// A sanitized string safe for logging
pub fn sanitize_for_logging(text: &str, max_len: usize) -> String {
    // Replace control characters and newlines to prevent log injection
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.chars().count() > max_len {
        let truncated: String = sanitized.chars().take(max_len).collect();
        format!(
            "{}... [truncated, {} total bytes]",
            truncated,
            text.len()
        )
    } else {
        sanitized
    }
}

/// Twitter/X API v2 client holding one long-lived HTTP connection pool.
pub struct XApiClient {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl XApiClient {
    pub fn new(client: Client, base_url: impl Into<String>, access_token: Option<String>) -> Self {
        XApiClient {
            client,
            base_url: base_url.into(),
            access_token,
        }
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Sends a request with the OAuth 2.0 User Context header attached.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The API response body on a 2xx status
    /// - `Err(TwitterError::Api)`: Any other status, with a short excerpt of the body
    pub(crate) async fn send_authenticated(
        &self,
        request_builder: RequestBuilder,
        operation: &'static str,
    ) -> Result<String, TwitterError> {
        let access_token = self
            .access_token
            .as_deref()
            .ok_or(TwitterError::MissingAccessToken)?;

        info!("Making authenticated request for operation: {}", operation);
        debug!("Request headers: Authorization: Bearer [REDACTED]");

        let response = request_builder
            .header("Authorization", build_oauth2_user_context_header(access_token))
            .send()
            .await?;

        let status = response.status();
        info!(
            "Received response with status: {} for operation: {}",
            status, operation
        );

        let response_text = response.text().await?;
        if status.is_success() {
            debug!(
                "Response summary for '{}': {} bytes received",
                operation,
                response_text.len()
            );
            return Ok(response_text);
        }

        error!("Operation '{}' failed - Status: {}", operation, status);
        let detail = sanitize_for_logging(&response_text, 200);
        debug!("Error response for '{}': {}", operation, detail);
        Err(TwitterError::Api {
            operation,
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl TweetClient for XApiClient {
    async fn create_tweet(
        &self,
        text: &str,
        reply_to: Option<&str>,
    ) -> Result<Tweet, TwitterError> {
        self.post_tweet(text, reply_to).await
    }

    async fn get_tweet(&self, tweet_id: &str) -> Result<Option<Tweet>, TwitterError> {
        self.lookup_tweet(tweet_id).await
    }

    async fn search_tweets(
        &self,
        query: &str,
        product: SearchProduct,
        count: u32,
    ) -> Result<Vec<Tweet>, TwitterError> {
        self.search_recent(query, product, count).await
    }
}

//! Tweet operations for Twitter API.
//!
//! This module contains functions for posting, replying to and looking up
//! tweets using the Twitter API v2.

use log::{debug, info};
use serde_json::json;

use super::api::{sanitize_for_logging, TwitterError, XApiClient};
use super::models::Tweet;
use super::parsing::{parse_created_tweet, parse_tweet_lookup};

impl XApiClient {
    /// Posts a tweet to Twitter/X using the API v2 endpoint.
    ///
    /// When `reply_to` is given the tweet is posted as a reply by including the
    /// `reply.in_reply_to_tweet_id` parameter in the payload.
    ///
    /// # Errors
    ///
    /// - No access token configured
    /// - Network connectivity issues
    /// - Twitter API rate limiting or other API errors
    /// - Invalid tweet content (too long, duplicate, etc.)
    pub async fn post_tweet(
        &self,
        text: &str,
        reply_to: Option<&str>,
    ) -> Result<Tweet, TwitterError> {
        match reply_to {
            Some(tweet_id) => info!(
                "Starting reply operation to tweet {} with text: '{}'",
                tweet_id,
                sanitize_for_logging(text, 80)
            ),
            None => info!(
                "Starting tweet post operation for text: '{}'",
                sanitize_for_logging(text, 80)
            ),
        }

        let payload = match reply_to {
            Some(tweet_id) => json!({
                "text": text,
                "reply": {
                    "in_reply_to_tweet_id": tweet_id
                }
            }),
            None => json!({ "text": text }),
        };
        debug!("Tweet payload: {}", payload);

        let request_builder = self.http().post(self.endpoint("/2/tweets")).json(&payload);
        let operation = if reply_to.is_some() {
            "reply_to_tweet"
        } else {
            "post_tweet"
        };

        let response_text = self.send_authenticated(request_builder, operation).await?;
        let tweet = parse_created_tweet(&response_text)?;
        info!("Tweet {} posted successfully", tweet.id);
        Ok(tweet)
    }

    /// Looks up a single tweet together with its author.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Tweet))`: The tweet with `author` and `created_at` filled in
    /// - `Ok(None)`: If the API answers 404 or returns no `data`
    /// - `Err(TwitterError)`: For any other failure
    pub async fn lookup_tweet(&self, tweet_id: &str) -> Result<Option<Tweet>, TwitterError> {
        info!("Looking up tweet {}", tweet_id);

        let url = self.endpoint(&format!("/2/tweets/{}", urlencoding::encode(tweet_id)));
        let request_builder = self.http().get(url).query(&[
            ("expansions", "author_id"),
            ("tweet.fields", "created_at,author_id"),
            ("user.fields", "name,username"),
        ]);

        match self.send_authenticated(request_builder, "get_tweet").await {
            Ok(response_text) => parse_tweet_lookup(&response_text),
            Err(TwitterError::Api { status: 404, .. }) => {
                info!("Tweet {} not found", tweet_id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

//! Response parsing for the Twitter API v2.
//!
//! The v2 endpoints return tweets under `data` and the expanded authors under
//! `includes.users`; these helpers join the two into [`Tweet`] values.

use log::warn;
use serde_json::Value;
use std::collections::HashMap;

use super::api::TwitterError;
use super::models::{Author, Tweet};

/// Builds a map of user ID to author from `includes.users`.
fn authors_by_id(json_response: &Value) -> HashMap<String, Author> {
    json_response
        .get("includes")
        .and_then(|includes| includes.get("users"))
        .and_then(|users| users.as_array())
        .map(|users| {
            users
                .iter()
                .filter_map(|user| {
                    let id = user.get("id")?.as_str()?;
                    Some((
                        id.to_string(),
                        Author {
                            id: id.to_string(),
                            name: user.get("name")?.as_str()?.to_string(),
                            username: user.get("username")?.as_str()?.to_string(),
                        },
                    ))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn tweet_from_json(
    tweet: &Value,
    authors: &HashMap<String, Author>,
) -> Result<Tweet, TwitterError> {
    let id = tweet
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| TwitterError::Malformed("tweet without id".to_string()))?;
    let text = tweet
        .get("text")
        .and_then(|v| v.as_str())
        .ok_or_else(|| TwitterError::Malformed(format!("tweet {} without text", id)))?;

    let author = tweet
        .get("author_id")
        .and_then(|v| v.as_str())
        .and_then(|author_id| authors.get(author_id))
        .cloned();

    let created_at = tweet
        .get("created_at")
        .and_then(|v| v.as_str())
        .and_then(|raw| match chrono::DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => Some(dt.with_timezone(&chrono::Utc)),
            Err(e) => {
                warn!("Failed to parse created_at '{}' of tweet {}: {}", raw, id, e);
                None
            }
        });

    Ok(Tweet {
        id: id.to_string(),
        text: text.to_string(),
        author,
        created_at,
    })
}

/// Parses the response of `POST /2/tweets`.
pub(crate) fn parse_created_tweet(body: &str) -> Result<Tweet, TwitterError> {
    let json_response: Value = serde_json::from_str(body)?;
    let data = json_response
        .get("data")
        .ok_or_else(|| TwitterError::Malformed("missing data in create response".to_string()))?;
    tweet_from_json(data, &HashMap::new())
}

/// Parses the response of `GET /2/tweets/{id}`. A body without `data` means
/// the tweet does not exist or is not visible.
pub(crate) fn parse_tweet_lookup(body: &str) -> Result<Option<Tweet>, TwitterError> {
    let json_response: Value = serde_json::from_str(body)?;
    match json_response.get("data") {
        Some(data) => tweet_from_json(data, &authors_by_id(&json_response)).map(Some),
        None => Ok(None),
    }
}

/// Parses the response of `GET /2/tweets/search/recent`. `data` is absent
/// when nothing matched.
pub(crate) fn parse_search_results(body: &str) -> Result<Vec<Tweet>, TwitterError> {
    let json_response: Value = serde_json::from_str(body)?;
    let authors = authors_by_id(&json_response);

    match json_response.get("data").and_then(|data| data.as_array()) {
        Some(tweets) => tweets
            .iter()
            .map(|tweet| tweet_from_json(tweet, &authors))
            .collect(),
        None => Ok(Vec::new()),
    }
}

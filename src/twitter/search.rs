//! Tweet search functionality for Twitter API.

use log::info;

use super::api::{TwitterError, XApiClient};
use super::models::{SearchProduct, Tweet};
use super::parsing::parse_search_results;

/// Bounds of `max_results` accepted by the recent search endpoint.
const MIN_RESULTS: u32 = 10;
const MAX_RESULTS: u32 = 100;

impl XApiClient {
    /// Searches tweets from the last seven days using the API v2 recent search.
    ///
    /// `count` is clamped to the 10..=100 range the endpoint accepts.
    pub async fn search_recent(
        &self,
        query: &str,
        product: SearchProduct,
        count: u32,
    ) -> Result<Vec<Tweet>, TwitterError> {
        let max_results = count.clamp(MIN_RESULTS, MAX_RESULTS).to_string();
        info!(
            "Searching tweets for query '{}' ({:?}, max_results {})",
            query, product, max_results
        );

        let request_builder = self
            .http()
            .get(self.endpoint("/2/tweets/search/recent"))
            .query(&[
                ("query", query),
                ("max_results", max_results.as_str()),
                ("sort_order", product.sort_order()),
                ("expansions", "author_id"),
                ("tweet.fields", "created_at,author_id"),
                ("user.fields", "name,username"),
            ]);

        let response_text = self
            .send_authenticated(request_builder, "search_tweets")
            .await?;
        let tweets = parse_search_results(&response_text)?;
        info!("Found {} tweets for query '{}'", tweets.len(), query);
        Ok(tweets)
    }
}

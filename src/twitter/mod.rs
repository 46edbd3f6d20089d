//! Twitter/X API integration module.
//!
//! This module contains the client used to post, reply to, look up and search
//! tweets through the Twitter API v2 with OAuth 2.0 User Context authentication.

mod api;
mod models;
mod parsing;
mod search;
mod thread;
mod tweets;

// Re-export public API
pub use api::{sanitize_for_logging, TweetClient, TwitterError, XApiClient};
pub use models::{Author, SearchProduct, Tweet};
pub use thread::post_thread;

//! Read-only projections of Twitter/X data returned to callers.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub username: String,
}

/// A tweet as seen by this service. Lives for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub author: Option<Author>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Tweet {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Tweet {
            id: id.into(),
            text: text.into(),
            author: None,
            created_at: None,
        }
    }
}

/// Ordering of search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchProduct {
    /// Most recent first
    #[default]
    Latest,
    /// Most relevant first
    Top,
}

impl SearchProduct {
    /// Parses `Latest` / `Top`, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "latest" => Some(SearchProduct::Latest),
            "top" => Some(SearchProduct::Top),
            _ => None,
        }
    }

    /// The `sort_order` value of the recent search endpoint.
    pub fn sort_order(self) -> &'static str {
        match self {
            SearchProduct::Latest => "recency",
            SearchProduct::Top => "relevancy",
        }
    }
}

//! Request and response types for the NewsAPI search endpoint

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ordering applied by the provider to search results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    PublishedAt,
    Relevancy,
    Popularity,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PublishedAt => "publishedAt",
            Self::Relevancy => "relevancy",
            Self::Popularity => "popularity",
        }
    }
}

/// Parameters for a keyword search
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub language: String,
    pub sort_by: SortBy,
    pub page_size: u32,
    /// Overrides the client's default timeout for this call
    pub timeout: Option<Duration>,
}

impl SearchRequest {
    pub const DEFAULT_LANGUAGE: &'static str = "en";
    pub const DEFAULT_PAGE_SIZE: u32 = 5;

    /// English results, newest first, five per page
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: Self::DEFAULT_LANGUAGE.to_string(),
            sort_by: SortBy::default(),
            page_size: Self::DEFAULT_PAGE_SIZE,
            timeout: None,
        }
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Search response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub articles: Vec<ApiArticle>,
    #[serde(default)]
    pub total_results: u64,
}

/// An article as returned by the provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub url: String,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
    pub source: Option<ApiSource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Error body the provider sends alongside non-success statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) code: Option<String>,
    pub(crate) message: Option<String>,
}

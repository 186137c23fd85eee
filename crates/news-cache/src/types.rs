//! Cache entry and payload types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Stable article identity derived from its URL
///
/// The provider issues no stable article IDs, so read-state tracking keys
/// articles by the first 128 bits of the URL's SHA-256, hex encoded.
pub fn article_id(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    hex::encode(&digest[..16])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
    pub source: String,
}

/// Articles fetched for one topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicNews {
    pub category: String,
    pub articles: Vec<Article>,
    pub total_results: u64,
}

/// Result of fetching one or more topics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsBundle {
    pub topics: Vec<String>,
    pub news: Vec<TopicNews>,
    pub total_categories: usize,
    pub failed_categories: usize,
}

/// Result of an ad hoc keyword search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBundle {
    pub keyword: String,
    pub articles: Vec<Article>,
    pub total_results: u64,
}

/// What a cache entry holds; each namespace stores exactly one variant
#[derive(Debug, Clone, PartialEq)]
pub enum CachePayload {
    News(NewsBundle),
    Search(SearchBundle),
}

/// TTL class chosen at insertion time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlClass {
    News,
    Search,
}

/// Immutable snapshot of a stored entry
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: String,
    pub payload: CachePayload,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A typed value read back from the cache
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cached<T> {
    #[serde(flatten)]
    pub value: T,
    pub cached_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Cached<NewsBundle> {
    pub(crate) fn news(entry: &Arc<CacheEntry>) -> Option<Self> {
        match &entry.payload {
            CachePayload::News(bundle) => Some(Self {
                value: bundle.clone(),
                cached_at: entry.created_at,
                expires_at: entry.expires_at,
            }),
            CachePayload::Search(_) => None,
        }
    }
}

impl Cached<SearchBundle> {
    pub(crate) fn search(entry: &Arc<CacheEntry>) -> Option<Self> {
        match &entry.payload {
            CachePayload::Search(bundle) => Some(Self {
                value: bundle.clone(),
                cached_at: entry.created_at,
                expires_at: entry.expires_at,
            }),
            CachePayload::News(_) => None,
        }
    }
}

/// Statistics about the cache
///
/// `hits` and `misses` are cumulative since the store was created; sweeps
/// and clears do not reset them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub count: usize,
    pub hits: u64,
    pub misses: u64,
    pub keys: Vec<String>,
}

//! In-memory news cache with TTL expiration
//!
//! One [`CacheStore`] holds two key namespaces: `news:` entries for topic
//! bundles (30 minute TTL) and `search:` entries for ad hoc keyword searches
//! (15 minute TTL). Expired entries are never served; they are evicted lazily
//! on read and periodically by a [`Sweeper`].

mod error;
mod key;
mod news;
mod store;
mod sweeper;
mod types;

pub use error::{CacheError, Result};
pub use key::{
    derive_search_key, derive_topic_key, TopicSet, NEWS_PREFIX, SEARCH_PREFIX, TOPIC_DELIMITER,
};
pub use store::{CacheStore, CacheTtls};
pub use sweeper::Sweeper;
pub use types::{
    article_id, Article, CacheEntry, CachePayload, CacheStats, Cached, NewsBundle, SearchBundle,
    TopicNews, TtlClass,
};

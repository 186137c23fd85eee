//! TTL key/value store shared by the request path and the refresh scheduler

use crate::error::{CacheError, Result};
use crate::types::{CacheEntry, CachePayload, CacheStats, TtlClass};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// TTL per entry class
#[derive(Debug, Clone, Copy)]
pub struct CacheTtls {
    pub news: Duration,
    pub search: Duration,
}

impl CacheTtls {
    pub const NEWS: Duration = Duration::from_secs(30 * 60);
    pub const SEARCH: Duration = Duration::from_secs(15 * 60);
    /// Longest TTL an entry can be given; longer settings are cut to this
    pub const MAX: Duration = Duration::from_secs(365 * 24 * 60 * 60);

    pub fn for_class(&self, class: TtlClass) -> Duration {
        match class {
            TtlClass::News => self.news,
            TtlClass::Search => self.search,
        }
    }
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            news: Self::NEWS,
            search: Self::SEARCH,
        }
    }
}

struct Slot {
    entry: Arc<CacheEntry>,
    /// Monotonic expiry; `entry.expires_at` is the wall-clock mirror for callers
    deadline: Instant,
}

impl Slot {
    fn is_expired(&self, now: Instant) -> bool {
        self.deadline <= now
    }
}

/// In-memory TTL cache
///
/// Entries are replaced whole under the write lock, so a reader sees either
/// the old entry or the new one, never a mix.
pub struct CacheStore {
    entries: RwLock<HashMap<String, Slot>>,
    ttls: CacheTtls,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::with_ttls(CacheTtls::default())
    }

    pub fn with_ttls(ttls: CacheTtls) -> Self {
        let ttls = CacheTtls {
            news: ttls.news.min(CacheTtls::MAX),
            search: ttls.search.min(CacheTtls::MAX),
        };
        Self {
            entries: RwLock::new(HashMap::new()),
            ttls,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn ttls(&self) -> CacheTtls {
        self.ttls
    }

    /// Get a live entry; an expired entry is evicted and counted as a miss
    pub async fn get(&self, key: &str) -> Option<Arc<CacheEntry>> {
        let now = Instant::now();

        let found = {
            let entries = self.entries.read().await;
            entries
                .get(key)
                .map(|slot| (slot.entry.clone(), slot.is_expired(now)))
        };

        match found {
            Some((entry, false)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache hit");
                Some(entry)
            }
            Some((_, true)) => {
                self.evict_if_expired(key, now).await;
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache entry expired");
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache miss");
                None
            }
        }
    }

    /// Insert or wholesale replace the entry for `key`
    pub async fn set(
        &self,
        key: &str,
        payload: CachePayload,
        class: TtlClass,
    ) -> Result<Arc<CacheEntry>> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey("key is empty".into()));
        }

        let ttl = self.ttls.for_class(class);
        let created_at = Utc::now();
        let entry = Arc::new(CacheEntry {
            key: key.to_string(),
            payload,
            created_at,
            expires_at: created_at + chrono::Duration::seconds(ttl.as_secs() as i64),
        });
        let slot = Slot {
            entry: entry.clone(),
            deadline: Instant::now() + ttl,
        };

        {
            let mut entries = self.entries.write().await;
            entries.insert(key.to_string(), slot);
        }

        debug!(key = %key, ttl_secs = ttl.as_secs(), "Cached entry");
        Ok(entry)
    }

    /// Remove the entry for `key`; missing keys are ignored
    pub async fn invalidate(&self, key: &str) {
        let removed = {
            let mut entries = self.entries.write().await;
            entries.remove(key)
        };
        if removed.is_some() {
            debug!(key = %key, "Cache entry invalidated");
        }
    }

    /// Remove every entry; hit/miss counters are kept
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }

    /// Evict every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, slot| !slot.is_expired(now));
        before - entries.len()
    }

    /// Number of stored entries, including expired ones not yet evicted
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Current statistics; `count` and `keys` cover live entries only
    pub async fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.read().await;
        let keys: Vec<String> = entries
            .iter()
            .filter(|(_, slot)| !slot.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        CacheStats {
            count: keys.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            keys,
        }
    }

    async fn evict_if_expired(&self, key: &str, now: Instant) {
        let mut entries = self.entries.write().await;
        // A concurrent set may have replaced the entry since it was read
        if entries.get(key).is_some_and(|slot| slot.is_expired(now)) {
            entries.remove(key);
        }
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

use chrono::{DateTime, Utc};
use news_cache::{CacheStore, CacheTtls};
use news_feed::{
    AggregatorConfig, NewsAggregator, NewsUpstream, PreferenceStore, RefreshConfig,
    RefreshScheduler,
};
use std::sync::Arc;

use crate::config::Config;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheStore>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub aggregator: Arc<NewsAggregator>,
    pub scheduler: Arc<RefreshScheduler>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wire the cache, aggregator and scheduler around one upstream and
    /// one preference store
    pub fn new(
        config: &Config,
        upstream: Arc<dyn NewsUpstream>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        let cache = Arc::new(CacheStore::with_ttls(CacheTtls {
            news: config.news_ttl,
            search: config.search_ttl,
        }));

        let aggregator = NewsAggregator::new(
            cache.clone(),
            upstream.clone(),
            preferences.clone(),
            AggregatorConfig {
                fetch_timeout: config.request_timeout,
            },
        );

        let scheduler = RefreshScheduler::new(
            cache.clone(),
            upstream,
            preferences.clone(),
            RefreshConfig {
                update_interval: config.refresh_interval,
                fetch_timeout: config.refresh_timeout,
                max_concurrent_fetches: config.refresh_concurrency,
            },
        );

        Self {
            cache,
            preferences,
            aggregator: Arc::new(aggregator),
            scheduler: Arc::new(scheduler),
            started_at: Utc::now(),
        }
    }
}

//! Request-path news: cache first, then a per-topic upstream fan-out

use crate::error::{FeedError, FetchError};
use crate::preferences::PreferenceStore;
use crate::upstream::{fetch_topic, NewsUpstream};
use futures::future::join_all;
use news_cache::{CacheStore, Cached, NewsBundle, SearchBundle, TopicSet};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Upstream timeout for interactive requests
    pub fetch_timeout: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

/// A cached value plus whether this request was served from the cache
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse<T> {
    #[serde(flatten)]
    pub cached: Cached<T>,
    pub from_cache: bool,
}

pub struct NewsAggregator {
    cache: Arc<CacheStore>,
    upstream: Arc<dyn NewsUpstream>,
    preferences: Arc<dyn PreferenceStore>,
    config: AggregatorConfig,
}

impl NewsAggregator {
    pub fn new(
        cache: Arc<CacheStore>,
        upstream: Arc<dyn NewsUpstream>,
        preferences: Arc<dyn PreferenceStore>,
        config: AggregatorConfig,
    ) -> Self {
        Self {
            cache,
            upstream,
            preferences,
            config,
        }
    }

    /// News for an explicit topic set
    ///
    /// A cache miss fetches every topic concurrently and primes the cache
    /// with whatever succeeded. An auth failure on any topic fails the whole
    /// request; otherwise the request only fails when no topic succeeded.
    pub async fn news_for_topics(
        &self,
        topics: &TopicSet,
    ) -> Result<FeedResponse<NewsBundle>, FeedError> {
        if let Some(cached) = self.cache.get_cached_news(topics).await {
            return Ok(FeedResponse {
                cached,
                from_cache: true,
            });
        }

        self.ensure_credentials()?;

        let upstream = self.upstream.as_ref();
        let timeout = self.config.fetch_timeout;
        let results = join_all(
            topics
                .iter()
                .map(|topic| async move { (topic, fetch_topic(upstream, topic, timeout).await) }),
        )
        .await;

        let mut news = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (topic, result) in results {
            match result {
                Ok(topic_news) => news.push(topic_news),
                Err(err) => {
                    warn!(topic, error = %err, "Failed to fetch topic");
                    failures.push(err);
                }
            }
        }

        if failures.contains(&FetchError::AuthFailure) {
            return Err(FeedError::Upstream(FetchError::AuthFailure));
        }
        if news.is_empty() {
            return Err(most_severe(failures).into());
        }

        info!(
            topics = %topics,
            succeeded = news.len(),
            failed = failures.len(),
            "Fetched topic news"
        );

        let bundle = NewsBundle {
            topics: topics.to_vec(),
            total_categories: news.len(),
            failed_categories: failures.len(),
            news,
        };
        let cached = self.cache.set_cached_news(topics, bundle).await?;
        Ok(FeedResponse {
            cached,
            from_cache: false,
        })
    }

    /// News for a user's saved preferences
    pub async fn news_for_user(&self, user_id: &str) -> Result<FeedResponse<NewsBundle>, FeedError> {
        let preferences = self
            .preferences
            .user_preferences(user_id)
            .await?
            .ok_or_else(|| FeedError::UnknownUser(user_id.to_string()))?;
        if preferences.is_empty() {
            return Err(FeedError::NoPreferences);
        }

        let topics = TopicSet::new(preferences)?;
        debug!(user_id, topics = %topics, "Loading news for user");
        self.news_for_topics(&topics).await
    }

    /// Ad hoc keyword search, cached case-insensitively
    pub async fn search(&self, keyword: &str) -> Result<FeedResponse<SearchBundle>, FeedError> {
        if let Some(cached) = self.cache.get_cached_search(keyword).await? {
            return Ok(FeedResponse {
                cached,
                from_cache: true,
            });
        }

        self.ensure_credentials()?;

        let results = fetch_topic(self.upstream.as_ref(), keyword, self.config.fetch_timeout)
            .await
            .inspect_err(|err| warn!(keyword, error = %err, "Search failed"))?;

        let bundle = SearchBundle {
            keyword: keyword.to_string(),
            total_results: results.total_results,
            articles: results.articles,
        };
        let cached = self.cache.set_cached_search(keyword, bundle).await?;
        Ok(FeedResponse {
            cached,
            from_cache: false,
        })
    }

    fn ensure_credentials(&self) -> Result<(), FeedError> {
        if self.upstream.has_credentials() {
            Ok(())
        } else {
            Err(FeedError::Config("News API key not configured".into()))
        }
    }
}

fn severity(err: &FetchError) -> u8 {
    match err {
        FetchError::Config(_) => 4,
        FetchError::AuthFailure => 3,
        FetchError::RateLimited => 2,
        FetchError::Timeout => 1,
        FetchError::Unknown(_) => 0,
    }
}

fn most_severe(failures: Vec<FetchError>) -> FetchError {
    failures
        .into_iter()
        .max_by_key(severity)
        .unwrap_or_else(|| FetchError::Unknown("no topics fetched".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::InMemoryPreferenceStore;
    use crate::test_support::MockUpstream;

    fn aggregator(upstream: &Arc<MockUpstream>) -> (NewsAggregator, Arc<CacheStore>) {
        let cache = Arc::new(CacheStore::new());
        let aggregator = NewsAggregator::new(
            cache.clone(),
            upstream.clone(),
            Arc::new(InMemoryPreferenceStore::new()),
            AggregatorConfig::default(),
        );
        (aggregator, cache)
    }

    fn topics(items: &[&str]) -> TopicSet {
        TopicSet::new(items.iter().copied()).unwrap()
    }

    #[tokio::test]
    async fn test_miss_fetches_then_hit_serves_cache() {
        let upstream = Arc::new(MockUpstream::new());
        let (aggregator, _cache) = aggregator(&upstream);

        let first = aggregator
            .news_for_topics(&topics(&["movies", "comics"]))
            .await
            .unwrap();
        assert!(!first.from_cache);
        assert_eq!(first.cached.value.total_categories, 2);
        assert_eq!(upstream.calls(), 2);

        let second = aggregator
            .news_for_topics(&topics(&["comics", "movies"]))
            .await
            .unwrap();
        assert!(second.from_cache);
        assert_eq!(second.cached.value, first.cached.value);
        assert_eq!(upstream.calls(), 2);
    }

    #[tokio::test]
    async fn test_partial_failure_returns_and_caches_rest() {
        let upstream = Arc::new(
            MockUpstream::new().fail("games", FetchError::Unknown("upstream 500".into())),
        );
        let (aggregator, cache) = aggregator(&upstream);
        let set = topics(&["movies", "games"]);

        let response = aggregator.news_for_topics(&set).await.unwrap();

        assert_eq!(response.cached.value.total_categories, 1);
        assert_eq!(response.cached.value.failed_categories, 1);
        assert_eq!(response.cached.value.news[0].category, "movies");
        assert!(cache.get_cached_news(&set).await.is_some());
    }

    #[tokio::test]
    async fn test_auth_failure_aborts_request() {
        let upstream = Arc::new(MockUpstream::new().fail("games", FetchError::AuthFailure));
        let (aggregator, cache) = aggregator(&upstream);
        let set = topics(&["movies", "games"]);

        let err = aggregator.news_for_topics(&set).await.unwrap_err();

        assert!(matches!(err, FeedError::Upstream(FetchError::AuthFailure)));
        assert!(cache.get_cached_news(&set).await.is_none());
    }

    #[tokio::test]
    async fn test_total_failure_reports_most_severe() {
        let upstream = Arc::new(
            MockUpstream::new()
                .fail("movies", FetchError::Timeout)
                .fail("games", FetchError::RateLimited),
        );
        let (aggregator, cache) = aggregator(&upstream);

        let err = aggregator
            .news_for_topics(&topics(&["movies", "games"]))
            .await
            .unwrap_err();

        assert!(matches!(err, FeedError::Upstream(FetchError::RateLimited)));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_missing_credentials_is_config_error() {
        let upstream = Arc::new(MockUpstream::new().without_credentials());
        let (aggregator, _cache) = aggregator(&upstream);

        let err = aggregator
            .news_for_topics(&topics(&["movies"]))
            .await
            .unwrap_err();

        assert!(matches!(err, FeedError::Config(_)));
        assert_eq!(upstream.calls(), 0);
    }

    #[tokio::test]
    async fn test_cached_topics_served_without_credentials() {
        let upstream = Arc::new(MockUpstream::new());
        let (warm, cache) = aggregator(&upstream);
        let set = topics(&["movies"]);
        warm.news_for_topics(&set).await.unwrap();

        let keyless = NewsAggregator::new(
            cache,
            Arc::new(MockUpstream::new().without_credentials()),
            Arc::new(InMemoryPreferenceStore::new()),
            AggregatorConfig::default(),
        );
        assert!(keyless.news_for_topics(&set).await.unwrap().from_cache);
    }

    #[tokio::test]
    async fn test_news_for_user() {
        let upstream = Arc::new(MockUpstream::new());
        let preferences = Arc::new(InMemoryPreferenceStore::new());
        preferences
            .set_user_preferences("clark", vec!["movies".into(), "comics".into()])
            .await
            .unwrap();
        let aggregator = NewsAggregator::new(
            Arc::new(CacheStore::new()),
            upstream.clone(),
            preferences,
            AggregatorConfig::default(),
        );

        let response = aggregator.news_for_user("clark").await.unwrap();
        assert_eq!(response.cached.value.topics, vec!["comics", "movies"]);

        let err = aggregator.news_for_user("bruce").await.unwrap_err();
        assert!(matches!(err, FeedError::UnknownUser(id) if id == "bruce"));
    }

    #[tokio::test]
    async fn test_search_cache_ignores_case() {
        let upstream = Arc::new(MockUpstream::new());
        let (aggregator, _cache) = aggregator(&upstream);

        let first = aggregator.search("Rust").await.unwrap();
        assert!(!first.from_cache);
        assert_eq!(first.cached.value.keyword, "Rust");
        assert_eq!(first.cached.value.articles.len(), 2);

        let second = aggregator.search("rust").await.unwrap();
        assert!(second.from_cache);
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn test_search_rejects_blank_keyword() {
        let upstream = Arc::new(MockUpstream::new());
        let (aggregator, _cache) = aggregator(&upstream);

        let err = aggregator.search("   ").await.unwrap_err();

        assert!(matches!(err, FeedError::InvalidKey(_)));
        assert_eq!(upstream.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_timeout_is_classified() {
        let upstream = Arc::new(MockUpstream::new().delay("slow", Duration::from_secs(60)));
        let (aggregator, _cache) = aggregator(&upstream);

        let err = aggregator.search("slow").await.unwrap_err();

        assert!(matches!(err, FeedError::Upstream(FetchError::Timeout)));
    }

    #[test]
    fn test_feed_response_serialization() {
        let cached = Cached {
            value: SearchBundle {
                keyword: "rust".into(),
                articles: vec![],
                total_results: 0,
            },
            cached_at: chrono::Utc::now(),
            expires_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(FeedResponse {
            cached,
            from_cache: true,
        })
        .unwrap();
        assert_eq!(json["keyword"], "rust");
        assert_eq!(json["fromCache"], true);
        assert!(json.get("cachedAt").is_some());
    }
}

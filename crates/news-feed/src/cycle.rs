//! One background refresh pass over every topic in use

use crate::error::{FetchError, RefreshError};
use crate::preferences::{distinct_topics, PreferenceStore};
use crate::upstream::{fetch_topic, NewsUpstream};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use news_cache::{CacheStore, NewsBundle, TopicSet};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, Semaphore};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Result of refreshing a single topic
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicOutcome {
    pub topic: String,
    /// Articles written to the cache; zero on failure
    pub articles: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FetchError>,
}

impl TopicOutcome {
    fn refreshed(topic: String, articles: usize) -> Self {
        Self {
            topic,
            articles,
            error: None,
        }
    }

    fn failed(topic: String, error: FetchError) -> Self {
        Self {
            topic,
            articles: 0,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of one completed refresh cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub topics: Vec<TopicOutcome>,
    pub succeeded: usize,
    pub failed: usize,
}

/// Runs refresh cycles against shared collaborators
///
/// Cheap to clone; clones share the fetch limiter and the last report, so
/// a manual trigger and a timer firing draw from the same permit pool.
#[derive(Clone)]
pub(crate) struct Refresher {
    cache: Arc<CacheStore>,
    upstream: Arc<dyn NewsUpstream>,
    preferences: Arc<dyn PreferenceStore>,
    fetch_timeout: Duration,
    permits: Arc<Semaphore>,
    last_report: Arc<RwLock<Option<CycleReport>>>,
}

impl Refresher {
    pub(crate) fn new(
        cache: Arc<CacheStore>,
        upstream: Arc<dyn NewsUpstream>,
        preferences: Arc<dyn PreferenceStore>,
        fetch_timeout: Duration,
        max_concurrent_fetches: usize,
    ) -> Self {
        Self {
            cache,
            upstream,
            preferences,
            fetch_timeout,
            permits: Arc::new(Semaphore::new(max_concurrent_fetches.max(1))),
            last_report: Arc::new(RwLock::new(None)),
        }
    }

    /// Report of the most recently finished cycle
    pub(crate) async fn last_report(&self) -> Option<CycleReport> {
        self.last_report.read().await.clone()
    }

    /// Refresh every topic referenced by any user's preferences
    ///
    /// Per-topic failures are recorded in the report. Only missing
    /// credentials or a failed topic discovery fail the cycle as a whole.
    pub(crate) async fn run(&self) -> Result<CycleReport, RefreshError> {
        if !self.upstream.has_credentials() {
            error!("News API key not configured, skipping refresh cycle");
            return Err(RefreshError::Config("News API key not configured".into()));
        }

        let started_at = Utc::now();
        let clock = Instant::now();

        let lists = self.preferences.all_preferences().await.map_err(|e| {
            error!(error = %e, "Failed to load user preferences");
            RefreshError::Discovery(e.to_string())
        })?;
        let topics = distinct_topics(&lists);
        info!(topics = topics.len(), "Starting news refresh cycle");

        let (names, tasks): (Vec<_>, Vec<_>) = topics
            .into_iter()
            .map(|topic| {
                let refresher = self.clone();
                let task = tokio::spawn({
                    let topic = topic.clone();
                    async move { refresher.refresh_topic(topic).await }
                });
                (topic, task)
            })
            .unzip();

        let outcomes: Vec<TopicOutcome> = join_all(tasks)
            .await
            .into_iter()
            .zip(names)
            .map(|(joined, topic)| {
                joined.unwrap_or_else(|e| {
                    error!(topic = %topic, error = %e, "Topic refresh task failed");
                    TopicOutcome::failed(topic, FetchError::Unknown(e.to_string()))
                })
            })
            .collect();

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        let report = CycleReport {
            started_at,
            finished_at: Utc::now(),
            elapsed_ms: clock.elapsed().as_millis() as u64,
            failed: outcomes.len() - succeeded,
            succeeded,
            topics: outcomes,
        };

        info!(
            topics = report.topics.len(),
            succeeded = report.succeeded,
            failed = report.failed,
            elapsed_ms = report.elapsed_ms,
            "News refresh cycle complete"
        );

        *self.last_report.write().await = Some(report.clone());
        Ok(report)
    }

    async fn refresh_topic(&self, topic: String) -> TopicOutcome {
        let key = match TopicSet::single(topic.as_str()) {
            Ok(key) => key,
            Err(e) => {
                warn!(topic = %topic, error = %e, "Skipping unusable topic");
                return TopicOutcome::failed(topic, FetchError::Unknown(e.to_string()));
            }
        };

        let fetched = {
            let _permit = match self.permits.acquire().await {
                Ok(permit) => permit,
                Err(e) => return TopicOutcome::failed(topic, FetchError::Unknown(e.to_string())),
            };
            fetch_topic(self.upstream.as_ref(), &topic, self.fetch_timeout).await
        };

        let news = match fetched {
            Ok(news) => news,
            Err(err) => {
                warn!(topic = %topic, error = %err, "Failed to refresh topic");
                return TopicOutcome::failed(topic, err);
            }
        };

        let articles = news.articles.len();
        let bundle = NewsBundle {
            topics: vec![topic.clone()],
            news: vec![news],
            total_categories: 1,
            failed_categories: 0,
        };
        match self.cache.set_cached_news(&key, bundle).await {
            Ok(_) => {
                debug!(topic = %topic, articles, "Topic refreshed");
                TopicOutcome::refreshed(topic, articles)
            }
            Err(e) => TopicOutcome::failed(topic, FetchError::Unknown(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::InMemoryPreferenceStore;
    use crate::test_support::{BrokenPreferenceStore, MockUpstream};

    /// Users as `(id, "topic,topic")` pairs
    async fn preferences(users: &[(&str, &str)]) -> Arc<InMemoryPreferenceStore> {
        let store = InMemoryPreferenceStore::new();
        for (user, topics) in users {
            store
                .set_user_preferences(user, topics.split(',').map(str::to_string).collect())
                .await
                .unwrap();
        }
        Arc::new(store)
    }

    fn refresher(
        cache: &Arc<CacheStore>,
        upstream: &Arc<MockUpstream>,
        preferences: Arc<dyn PreferenceStore>,
        limit: usize,
    ) -> Refresher {
        Refresher::new(
            cache.clone(),
            upstream.clone(),
            preferences,
            Duration::from_secs(15),
            limit,
        )
    }

    async fn cached(cache: &CacheStore, topic: &str) -> bool {
        let key = TopicSet::single(topic).unwrap();
        cache.get_cached_news(&key).await.is_some()
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_successful_topics() {
        let cache = Arc::new(CacheStore::new());
        let upstream = Arc::new(MockUpstream::new().fail("games", FetchError::RateLimited));
        let prefs = preferences(&[("clark", "movies,comics"), ("lois", "games")]).await;

        let report = refresher(&cache, &upstream, prefs, 8).run().await.unwrap();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert!(cached(&cache, "movies").await);
        assert!(cached(&cache, "comics").await);
        assert!(!cached(&cache, "games").await);

        let games = report.topics.iter().find(|o| o.topic == "games").unwrap();
        assert_eq!(games.error, Some(FetchError::RateLimited));
        assert_eq!(games.articles, 0);
    }

    #[tokio::test]
    async fn test_auth_failure_recorded_per_topic() {
        let cache = Arc::new(CacheStore::new());
        let upstream = Arc::new(MockUpstream::new().fail("games", FetchError::AuthFailure));
        let prefs = preferences(&[("clark", "movies,comics"), ("lois", "games")]).await;

        let report = refresher(&cache, &upstream, prefs, 8).run().await.unwrap();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert!(cached(&cache, "movies").await);
        assert!(cached(&cache, "comics").await);
        assert!(!cached(&cache, "games").await);

        let games = report.topics.iter().find(|o| o.topic == "games").unwrap();
        assert_eq!(games.error, Some(FetchError::AuthFailure));
    }

    #[tokio::test]
    async fn test_each_distinct_topic_fetched_once() {
        let cache = Arc::new(CacheStore::new());
        let upstream = Arc::new(MockUpstream::new());
        let prefs = preferences(&[
            ("clark", "movies,comics"),
            ("lois", "comics,politics"),
        ])
        .await;

        let report = refresher(&cache, &upstream, prefs, 8).run().await.unwrap();

        assert_eq!(report.topics.len(), 3);
        assert_eq!(upstream.calls(), 3);
        let mut queries = upstream.queries();
        queries.sort();
        assert_eq!(queries, vec!["comics", "movies", "politics"]);
    }

    #[tokio::test]
    async fn test_cached_entry_is_single_topic_bundle() {
        let cache = Arc::new(CacheStore::new());
        let upstream = Arc::new(MockUpstream::new());
        let prefs = preferences(&[("clark", "movies")]).await;

        refresher(&cache, &upstream, prefs, 8).run().await.unwrap();

        let entry = cache
            .get_cached_news(&TopicSet::single("movies").unwrap())
            .await
            .unwrap();
        assert_eq!(entry.value.topics, vec!["movies"]);
        assert_eq!(entry.value.news.len(), 1);
        assert_eq!(entry.value.news[0].category, "movies");
        assert_eq!(entry.value.news[0].articles.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_credentials_aborts_before_fetch() {
        let cache = Arc::new(CacheStore::new());
        let upstream = Arc::new(MockUpstream::new().without_credentials());
        let prefs = preferences(&[("clark", "movies")]).await;
        let refresher = refresher(&cache, &upstream, prefs, 8);

        let err = refresher.run().await.unwrap_err();

        assert!(matches!(err, RefreshError::Config(_)));
        assert_eq!(upstream.calls(), 0);
        assert!(refresher.last_report().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_discovery_fails_cycle() {
        let cache = Arc::new(CacheStore::new());
        let upstream = Arc::new(MockUpstream::new());
        let refresher = refresher(&cache, &upstream, Arc::new(BrokenPreferenceStore), 8);

        let err = refresher.run().await.unwrap_err();

        assert!(matches!(err, RefreshError::Discovery(_)));
        assert_eq!(upstream.calls(), 0);
    }

    #[tokio::test]
    async fn test_no_preferences_is_empty_cycle() {
        let cache = Arc::new(CacheStore::new());
        let upstream = Arc::new(MockUpstream::new());
        let refresher = refresher(&cache, &upstream, preferences(&[]).await, 8);

        let report = refresher.run().await.unwrap();

        assert!(report.topics.is_empty());
        assert_eq!(report.succeeded, 0);
        assert_eq!(report.failed, 0);
        assert_eq!(refresher.last_report().await, Some(report));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_topic_times_out_alone() {
        let cache = Arc::new(CacheStore::new());
        let upstream = Arc::new(MockUpstream::new().delay("movies", Duration::from_secs(60)));
        let prefs = preferences(&[("clark", "movies,comics")]).await;

        let report = refresher(&cache, &upstream, prefs, 8).run().await.unwrap();

        let movies = report.topics.iter().find(|o| o.topic == "movies").unwrap();
        assert_eq!(movies.error, Some(FetchError::Timeout));
        assert_eq!(report.succeeded, 1);
        assert!(cached(&cache, "comics").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_concurrency_is_bounded() {
        let cache = Arc::new(CacheStore::new());
        let upstream = Arc::new(MockUpstream::new().default_delay(Duration::from_secs(1)));
        let prefs = preferences(&[("clark", "a,b,c,d,e,f")]).await;

        let report = refresher(&cache, &upstream, prefs, 2).run().await.unwrap();

        assert_eq!(report.succeeded, 6);
        assert_eq!(upstream.max_in_flight(), 2);
    }

    #[test]
    fn test_outcome_serialization_omits_missing_error() {
        let ok = serde_json::to_value(TopicOutcome::refreshed("movies".into(), 2)).unwrap();
        assert!(ok.get("error").is_none());

        let failed =
            serde_json::to_value(TopicOutcome::failed("games".into(), FetchError::Timeout))
                .unwrap();
        assert_eq!(failed["error"]["kind"], "timeout");
    }
}

//! Test doubles for the upstream and preference store seams

use crate::error::{FetchError, PreferenceStoreError};
use crate::preferences::PreferenceStore;
use crate::upstream::{NewsUpstream, TopicResults};
use async_trait::async_trait;
use news_cache::{article_id, Article};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Upstream returning two articles per query unless told otherwise
pub(crate) struct MockUpstream {
    credentials: bool,
    failures: HashMap<String, FetchError>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl MockUpstream {
    pub(crate) fn new() -> Self {
        Self {
            credentials: true,
            failures: HashMap::new(),
            delays: HashMap::new(),
            default_delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn without_credentials(mut self) -> Self {
        self.credentials = false;
        self
    }

    pub(crate) fn fail(mut self, query: &str, err: FetchError) -> Self {
        self.failures.insert(query.to_string(), err);
        self
    }

    pub(crate) fn delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub(crate) fn default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

pub(crate) fn articles_for(query: &str) -> Vec<Article> {
    (0..2)
        .map(|i| {
            let url = format!("https://example.com/{query}/{i}");
            Article {
                id: article_id(&url),
                title: Some(format!("{query} story {i}")),
                description: None,
                url,
                url_to_image: None,
                published_at: Some("2024-01-01T00:00:00Z".into()),
                source: "Example".into(),
            }
        })
        .collect()
}

#[async_trait]
impl NewsUpstream for MockUpstream {
    fn has_credentials(&self) -> bool {
        self.credentials
    }

    async fn search(&self, query: &str, _timeout: Duration) -> Result<TopicResults, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .delays
            .get(query)
            .copied()
            .unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(err) = self.failures.get(query) {
            return Err(err.clone());
        }
        Ok(TopicResults {
            articles: articles_for(query),
            total_results: 2,
        })
    }
}

/// Preference store whose every call fails
pub(crate) struct BrokenPreferenceStore;

#[async_trait]
impl PreferenceStore for BrokenPreferenceStore {
    async fn all_preferences(&self) -> Result<Vec<Vec<String>>, PreferenceStoreError> {
        Err(PreferenceStoreError::Backend("connection refused".into()))
    }

    async fn user_preferences(
        &self,
        _user_id: &str,
    ) -> Result<Option<Vec<String>>, PreferenceStoreError> {
        Err(PreferenceStoreError::Backend("connection refused".into()))
    }

    async fn set_user_preferences(
        &self,
        _user_id: &str,
        _preferences: Vec<String>,
    ) -> Result<Vec<String>, PreferenceStoreError> {
        Err(PreferenceStoreError::Backend("connection refused".into()))
    }
}

//! Typed news/search accessors over the shared store

use crate::error::Result;
use crate::key::{derive_search_key, TopicSet};
use crate::store::CacheStore;
use crate::types::{CachePayload, Cached, NewsBundle, SearchBundle, TtlClass};
use tracing::{debug, info};

impl CacheStore {
    pub async fn get_cached_news(&self, topics: &TopicSet) -> Option<Cached<NewsBundle>> {
        let entry = self.get(&topics.cache_key()).await?;
        let cached = Cached::news(&entry);
        if cached.is_some() {
            debug!(topics = %topics, "News served from cache");
        }
        cached
    }

    pub async fn set_cached_news(
        &self,
        topics: &TopicSet,
        bundle: NewsBundle,
    ) -> Result<Cached<NewsBundle>> {
        let entry = self
            .set(
                &topics.cache_key(),
                CachePayload::News(bundle.clone()),
                TtlClass::News,
            )
            .await?;
        debug!(topics = %topics, "News cached");
        Ok(Cached {
            value: bundle,
            cached_at: entry.created_at,
            expires_at: entry.expires_at,
        })
    }

    pub async fn get_cached_search(&self, keyword: &str) -> Result<Option<Cached<SearchBundle>>> {
        let key = derive_search_key(keyword)?;
        Ok(self.get(&key).await.and_then(|entry| Cached::search(&entry)))
    }

    pub async fn set_cached_search(
        &self,
        keyword: &str,
        bundle: SearchBundle,
    ) -> Result<Cached<SearchBundle>> {
        let key = derive_search_key(keyword)?;
        let entry = self
            .set(&key, CachePayload::Search(bundle.clone()), TtlClass::Search)
            .await?;
        Ok(Cached {
            value: bundle,
            cached_at: entry.created_at,
            expires_at: entry.expires_at,
        })
    }

    pub async fn invalidate_news(&self, topics: &TopicSet) {
        self.invalidate(&topics.cache_key()).await;
        info!(topics = %topics, "News cache invalidated");
    }

    pub async fn clear_all(&self) {
        self.clear().await;
        info!("All cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Article, TopicNews};

    fn bundle(topics: &TopicSet) -> NewsBundle {
        NewsBundle {
            topics: topics.to_vec(),
            news: topics
                .iter()
                .map(|t| TopicNews {
                    category: t.to_string(),
                    articles: vec![Article {
                        id: crate::types::article_id("https://example.com/a"),
                        title: Some("A".into()),
                        description: None,
                        url: "https://example.com/a".into(),
                        url_to_image: None,
                        published_at: None,
                        source: "Unknown".into(),
                    }],
                    total_results: 1,
                })
                .collect(),
            total_categories: topics.len(),
            failed_categories: 0,
        }
    }

    #[tokio::test]
    async fn test_news_round_trip_any_order() {
        let store = CacheStore::new();
        let written = TopicSet::new(["movies", "comics"]).unwrap();
        let read = TopicSet::new(["comics", "movies"]).unwrap();

        store
            .set_cached_news(&written, bundle(&written))
            .await
            .unwrap();

        let cached = store.get_cached_news(&read).await.unwrap();
        assert_eq!(cached.value, bundle(&written));
    }

    #[tokio::test]
    async fn test_search_round_trip_ignores_case() {
        let store = CacheStore::new();
        let results = SearchBundle {
            keyword: "Rust".into(),
            articles: vec![],
            total_results: 7,
        };

        store.set_cached_search("Rust", results.clone()).await.unwrap();

        let cached = store.get_cached_search("RUST").await.unwrap().unwrap();
        assert_eq!(cached.value, results);
    }

    #[tokio::test]
    async fn test_news_and_search_namespaces_are_separate() {
        let store = CacheStore::new();
        let topics = TopicSet::single("rust").unwrap();
        store
            .set_cached_news(&topics, bundle(&topics))
            .await
            .unwrap();

        assert!(store.get_cached_search("rust").await.unwrap().is_none());
        assert!(store.get_cached_news(&topics).await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_news() {
        let store = CacheStore::new();
        let topics = TopicSet::new(["movies", "comics"]).unwrap();
        store
            .set_cached_news(&topics, bundle(&topics))
            .await
            .unwrap();

        store.invalidate_news(&topics).await;
        assert!(store.get_cached_news(&topics).await.is_none());
    }

    #[tokio::test]
    async fn test_blank_search_keyword_is_invalid() {
        let store = CacheStore::new();
        assert!(store.get_cached_search("  ").await.is_err());
    }
}

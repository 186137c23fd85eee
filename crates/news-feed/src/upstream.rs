//! Upstream news provider seam

use crate::error::FetchError;
use async_trait::async_trait;
use news_cache::{article_id, Article, TopicNews};
use newsapi_client::{ApiArticle, NewsApiClient, SearchRequest};
use std::time::Duration;

const UNKNOWN_SOURCE: &str = "Unknown";

/// Articles returned for one query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicResults {
    pub articles: Vec<Article>,
    pub total_results: u64,
}

/// A keyword-searchable news provider
#[async_trait]
pub trait NewsUpstream: Send + Sync {
    /// Whether an API key is configured
    fn has_credentials(&self) -> bool;

    async fn search(&self, query: &str, timeout: Duration) -> Result<TopicResults, FetchError>;
}

#[async_trait]
impl NewsUpstream for NewsApiClient {
    fn has_credentials(&self) -> bool {
        self.has_api_key()
    }

    async fn search(&self, query: &str, timeout: Duration) -> Result<TopicResults, FetchError> {
        let request = SearchRequest::new(query).timeout(timeout);
        let response = NewsApiClient::search(self, &request).await?;

        Ok(TopicResults {
            articles: response.articles.into_iter().map(to_article).collect(),
            total_results: response.total_results,
        })
    }
}

fn to_article(article: ApiArticle) -> Article {
    Article {
        id: article_id(&article.url),
        title: article.title,
        description: article.description,
        url: article.url,
        url_to_image: article.url_to_image,
        published_at: article.published_at,
        source: article
            .source
            .and_then(|s| s.name)
            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
    }
}

/// Fetch one topic, bounded by `timeout` even if the upstream ignores it
pub(crate) async fn fetch_topic(
    upstream: &dyn NewsUpstream,
    topic: &str,
    timeout: Duration,
) -> Result<TopicNews, FetchError> {
    let results = tokio::time::timeout(timeout, upstream.search(topic, timeout))
        .await
        .map_err(|_| FetchError::Timeout)??;

    Ok(TopicNews {
        category: topic.to_string(),
        articles: results.articles,
        total_results: results.total_results,
    })
}

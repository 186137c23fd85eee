//! NewsAPI HTTP client

use crate::error::{NewsApiError, Result};
use crate::types::{ErrorBody, SearchRequest, SearchResponse};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";
const DEFAULT_USER_AGENT: &str = "newsapi-client-rs/0.1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the NewsAPI keyword search endpoint
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsApiClient {
    /// Create a client against the public NewsAPI endpoint (10 second timeout)
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create a client against a custom base URL, e.g. a proxy or a test server
    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Result<Self> {
        Self::with_timeout(base_url, api_key, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom default timeout
    pub fn with_timeout(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            // An empty key is as good as none
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search all indexed articles for a keyword
    ///
    /// Fails with [`NewsApiError::MissingApiKey`] before sending anything when
    /// no key is configured.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let api_key = self.api_key.as_deref().ok_or(NewsApiError::MissingApiKey)?;
        let url = self.search_url(request);

        let mut builder = self
            .http
            .get(&url)
            .header("X-Api-Key", api_key)
            .header("Accept", "application/json");
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();

        match status {
            StatusCode::UNAUTHORIZED => return Err(NewsApiError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => return Err(NewsApiError::RateLimited),
            s if !s.is_success() => {
                let body = response.json::<ErrorBody>().await.ok();
                let message = body
                    .and_then(|b| b.message.or(b.code))
                    .unwrap_or_else(|| s.canonical_reason().unwrap_or("unknown").to_string());
                return Err(NewsApiError::Status(s.as_u16(), message));
            }
            _ => {}
        }

        let bytes = response.bytes().await?;
        let data: SearchResponse = serde_json::from_slice(&bytes)?;

        debug!(
            query = %request.query,
            articles = data.articles.len(),
            total_results = data.total_results,
            "NewsAPI search completed"
        );

        Ok(data)
    }

    fn search_url(&self, request: &SearchRequest) -> String {
        format!(
            "{}/everything?q={}&language={}&sortBy={}&pageSize={}",
            self.base_url,
            urlencoding::encode(&request.query),
            urlencoding::encode(&request.language),
            request.sort_by.as_str(),
            request.page_size
        )
    }
}

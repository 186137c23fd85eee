//! Error types for news aggregation and refresh

use news_cache::CacheError;
use newsapi_client::NewsApiError;
use serde::Serialize;
use std::fmt;

/// Why fetching a single topic failed
///
/// Recorded per topic; never propagated past the fan-out that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "camelCase")]
pub enum FetchError {
    /// Credentials missing; no request was made
    Config(String),
    Timeout,
    AuthFailure,
    RateLimited,
    Unknown(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Config(msg) => write!(f, "Configuration error: {}", msg),
            FetchError::Timeout => write!(f, "Upstream request timed out"),
            FetchError::AuthFailure => write!(f, "Upstream authentication failed"),
            FetchError::RateLimited => write!(f, "Upstream rate limit exceeded"),
            FetchError::Unknown(msg) => write!(f, "Upstream error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<NewsApiError> for FetchError {
    fn from(err: NewsApiError) -> Self {
        match err {
            NewsApiError::MissingApiKey => FetchError::Config(err.to_string()),
            NewsApiError::Unauthorized => FetchError::AuthFailure,
            NewsApiError::RateLimited => FetchError::RateLimited,
            NewsApiError::Timeout => FetchError::Timeout,
            other => FetchError::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceStoreError {
    /// Preference list failed validation
    Invalid(String),
    /// The backing store could not be read or written
    Backend(String),
}

impl fmt::Display for PreferenceStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceStoreError::Invalid(msg) => write!(f, "Invalid preferences: {}", msg),
            PreferenceStoreError::Backend(msg) => write!(f, "Preference store error: {}", msg),
        }
    }
}

impl std::error::Error for PreferenceStoreError {}

/// Request path errors
#[derive(Debug)]
pub enum FeedError {
    /// News API key not configured
    Config(String),
    /// The whole request failed upstream
    Upstream(FetchError),
    InvalidKey(CacheError),
    UnknownUser(String),
    NoPreferences,
    Preferences(PreferenceStoreError),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Config(msg) => write!(f, "Configuration error: {}", msg),
            FeedError::Upstream(err) => write!(f, "{}", err),
            FeedError::InvalidKey(err) => write!(f, "{}", err),
            FeedError::UnknownUser(id) => write!(f, "User not found: {}", id),
            FeedError::NoPreferences => write!(f, "No preferences set"),
            FeedError::Preferences(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Upstream(err) => Some(err),
            FeedError::InvalidKey(err) => Some(err),
            FeedError::Preferences(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CacheError> for FeedError {
    fn from(err: CacheError) -> Self {
        FeedError::InvalidKey(err)
    }
}

impl From<PreferenceStoreError> for FeedError {
    fn from(err: PreferenceStoreError) -> Self {
        FeedError::Preferences(err)
    }
}

impl From<FetchError> for FeedError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Config(msg) => FeedError::Config(msg),
            other => FeedError::Upstream(other),
        }
    }
}

/// Background refresh errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// Credentials missing; the cycle was aborted before any fetch
    Config(String),
    /// Manual trigger while the scheduler is stopped
    NotRunning,
    /// Topic discovery failed, so the whole cycle failed
    Discovery(String),
}

impl fmt::Display for RefreshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshError::Config(msg) => write!(f, "Configuration error: {}", msg),
            RefreshError::NotRunning => write!(f, "Background service is not running"),
            RefreshError::Discovery(msg) => write!(f, "Topic discovery failed: {}", msg),
        }
    }
}

impl std::error::Error for RefreshError {}

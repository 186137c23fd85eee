//! Error types for the NewsAPI client

use std::fmt;

/// Errors that can occur when interacting with NewsAPI
#[derive(Debug)]
pub enum NewsApiError {
    /// No API key was configured, so no request was sent
    MissingApiKey,
    /// The provider rejected the API key (HTTP 401)
    Unauthorized,
    /// The provider is rate limiting this key (HTTP 429)
    RateLimited,
    /// The request did not complete within its timeout
    Timeout,
    /// Any other non-success status, with the provider's message when present
    Status(u16, String),
    /// HTTP transport failure
    Http(reqwest::Error),
    /// Failed to parse JSON response
    Json(serde_json::Error),
}

impl fmt::Display for NewsApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "NewsAPI key not configured"),
            Self::Unauthorized => write!(f, "NewsAPI authentication failed"),
            Self::RateLimited => write!(f, "NewsAPI rate limit exceeded"),
            Self::Timeout => write!(f, "NewsAPI request timed out"),
            Self::Status(code, msg) => write!(f, "NewsAPI returned status {}: {}", code, msg),
            Self::Http(e) => write!(f, "NewsAPI HTTP error: {}", e),
            Self::Json(e) => write!(f, "NewsAPI JSON parse error: {}", e),
        }
    }
}

impl std::error::Error for NewsApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NewsApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(e)
        }
    }
}

impl From<serde_json::Error> for NewsApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Result type for NewsAPI operations
pub type Result<T> = std::result::Result<T, NewsApiError>;

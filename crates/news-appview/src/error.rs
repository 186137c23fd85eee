use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use news_cache::CacheError;
use news_feed::{FeedError, FetchError, PreferenceStoreError, RefreshError};
use newsapi_client::NewsApiError;
use serde_json::json;
use std::fmt;

/// Application error type that converts to HTTP responses
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    /// Upstream or configuration failure whose message is safe to show
    Upstream(StatusCode, String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Upstream(status, msg) => {
                tracing::warn!(status = status.as_u16(), error = %msg, "Upstream request failed");
                (status, msg)
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        let status = match err {
            FetchError::Config(_) | FetchError::AuthFailure => StatusCode::INTERNAL_SERVER_ERROR,
            FetchError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            FetchError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            FetchError::Unknown(_) => StatusCode::BAD_GATEWAY,
        };
        AppError::Upstream(status, err.to_string())
    }
}

impl From<FeedError> for AppError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::Config(_) => {
                AppError::Upstream(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            FeedError::Upstream(fetch) => fetch.into(),
            FeedError::InvalidKey(e) => e.into(),
            FeedError::UnknownUser(_) => AppError::NotFound(err.to_string()),
            FeedError::NoPreferences => AppError::BadRequest(err.to_string()),
            FeedError::Preferences(e) => e.into(),
        }
    }
}

impl From<RefreshError> for AppError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::NotRunning => AppError::Conflict(err.to_string()),
            RefreshError::Config(_) => {
                AppError::Upstream(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            RefreshError::Discovery(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl From<CacheError> for AppError {
    fn from(err: CacheError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<PreferenceStoreError> for AppError {
    fn from(err: PreferenceStoreError) -> Self {
        match err {
            PreferenceStoreError::Invalid(msg) => AppError::BadRequest(msg),
            PreferenceStoreError::Backend(_) => AppError::Internal(err.to_string()),
        }
    }
}

/// Errors that abort startup
#[derive(Debug)]
pub enum StartupError {
    Client(NewsApiError),
    Io(std::io::Error),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::Client(err) => write!(f, "Failed to build news client: {}", err),
            StartupError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartupError::Client(err) => Some(err),
            StartupError::Io(err) => Some(err),
        }
    }
}

impl From<NewsApiError> for StartupError {
    fn from(err: NewsApiError) -> Self {
        StartupError::Client(err)
    }
}

impl From<std::io::Error> for StartupError {
    fn from(err: std::io::Error) -> Self {
        StartupError::Io(err)
    }
}

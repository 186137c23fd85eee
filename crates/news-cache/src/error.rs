//! Cache error types

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Empty topic set, blank topic or keyword, or a topic containing the key delimiter
    InvalidKey(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::InvalidKey(msg) => write!(f, "Invalid cache key: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {}

pub type Result<T> = std::result::Result<T, CacheError>;

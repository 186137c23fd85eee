//! Rust client for the [NewsAPI](https://newsapi.org/) article search API
//!
//! Only the keyword search endpoint is covered. Responses are decoded into
//! typed structs and provider failures are classified so callers can tell a
//! bad key from rate limiting or a slow upstream.
//!
//! # Example
//!
//! ```no_run
//! use newsapi_client::{NewsApiClient, SearchRequest};
//!
//! # async fn example() -> Result<(), newsapi_client::NewsApiError> {
//! let client = NewsApiClient::new(Some("my-api-key".to_string()))?;
//!
//! let response = client.search(&SearchRequest::new("rust")).await?;
//! for article in response.articles {
//!     println!("{:?}", article.title);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - `GET /v2/everything` - Keyword search across all indexed articles

mod client;
mod error;
mod types;

pub use client::{NewsApiClient, DEFAULT_BASE_URL};
pub use error::{NewsApiError, Result};
pub use types::{ApiArticle, ApiSource, SearchRequest, SearchResponse, SortBy};

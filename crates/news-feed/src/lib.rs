//! Topic news aggregation and background cache refresh
//!
//! - [`NewsAggregator`] serves the request path: cache first, then a
//!   per-topic fan-out to the upstream provider, priming the cache with the
//!   (possibly partial) result.
//! - [`RefreshScheduler`] keeps single-topic cache entries warm for every
//!   topic in any user's preferences, on a fixed interval.

mod aggregator;
mod cycle;
mod error;
mod preferences;
mod scheduler;
mod upstream;

#[cfg(test)]
mod test_support;

pub use aggregator::{AggregatorConfig, FeedResponse, NewsAggregator};
pub use cycle::{CycleReport, TopicOutcome};
pub use error::{FeedError, FetchError, PreferenceStoreError, RefreshError};
pub use preferences::{
    distinct_topics, validate_preferences, InMemoryPreferenceStore, PreferenceStore,
};
pub use scheduler::{RefreshConfig, RefreshScheduler, SchedulerStatus};
pub use upstream::{NewsUpstream, TopicResults};

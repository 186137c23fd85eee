//! Cache key derivation

use crate::error::{CacheError, Result};
use std::collections::BTreeSet;
use std::fmt;

pub const NEWS_PREFIX: &str = "news:";
pub const SEARCH_PREFIX: &str = "search:";
/// Separates topics in a news key; topics may not contain it
pub const TOPIC_DELIMITER: char = ',';

/// Non-empty, deduplicated set of topics
///
/// Topics are kept sorted, so two sets with the same members always derive
/// the same key regardless of the order they were given in. Case and
/// whitespace are kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicSet(BTreeSet<String>);

impl TopicSet {
    pub fn new<I, S>(topics: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = topics.into_iter().map(Into::into).collect();

        if set.is_empty() {
            return Err(CacheError::InvalidKey("topic set is empty".into()));
        }
        for topic in &set {
            if topic.is_empty() {
                return Err(CacheError::InvalidKey("topic must not be empty".into()));
            }
            if topic.contains(TOPIC_DELIMITER) {
                return Err(CacheError::InvalidKey(format!(
                    "topic {:?} contains '{}'",
                    topic, TOPIC_DELIMITER
                )));
            }
        }

        Ok(Self(set))
    }

    pub fn single(topic: impl Into<String>) -> Result<Self> {
        Self::new([topic.into()])
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Topics in canonical (sorted) order
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }

    pub fn cache_key(&self) -> String {
        format!("{}{}", NEWS_PREFIX, self)
    }
}

impl fmt::Display for TopicSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for topic in &self.0 {
            if !first {
                write!(f, "{}", TOPIC_DELIMITER)?;
            }
            write!(f, "{}", topic)?;
            first = false;
        }
        Ok(())
    }
}

/// Derive the `news:` key for a set of topics
pub fn derive_topic_key<I, S>(topics: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Ok(TopicSet::new(topics)?.cache_key())
}

/// Derive the `search:` key for a keyword; case-insensitive
pub fn derive_search_key(keyword: &str) -> Result<String> {
    if keyword.trim().is_empty() {
        return Err(CacheError::InvalidKey("search keyword is empty".into()));
    }
    Ok(format!("{}{}", SEARCH_PREFIX, keyword.to_lowercase()))
}

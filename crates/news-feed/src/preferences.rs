//! User topic preferences

use crate::error::PreferenceStoreError;
use async_trait::async_trait;
use news_cache::TOPIC_DELIMITER;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// Source of user topic preferences
///
/// The refresh scheduler only reads [`PreferenceStore::all_preferences`]; an
/// eventually consistent snapshot is fine there.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Every user's preference list
    async fn all_preferences(&self) -> Result<Vec<Vec<String>>, PreferenceStoreError>;

    /// One user's preferences, `None` for an unknown user
    async fn user_preferences(
        &self,
        user_id: &str,
    ) -> Result<Option<Vec<String>>, PreferenceStoreError>;

    /// Replace one user's preferences, returning what was stored
    async fn set_user_preferences(
        &self,
        user_id: &str,
        preferences: Vec<String>,
    ) -> Result<Vec<String>, PreferenceStoreError>;
}

/// Reject empty lists, blank entries and entries that cannot form a topic key
pub fn validate_preferences(preferences: &[String]) -> Result<(), PreferenceStoreError> {
    if preferences.is_empty() {
        return Err(PreferenceStoreError::Invalid(
            "Preferences array cannot be empty".into(),
        ));
    }
    if preferences.iter().any(|p| p.trim().is_empty()) {
        return Err(PreferenceStoreError::Invalid(
            "All preferences must be non-empty strings".into(),
        ));
    }
    if let Some(p) = preferences.iter().find(|p| p.contains(TOPIC_DELIMITER)) {
        return Err(PreferenceStoreError::Invalid(format!(
            "Preference {:?} must not contain '{}'",
            p, TOPIC_DELIMITER
        )));
    }
    Ok(())
}

/// Distinct topics across all lists, in first-seen order
pub fn distinct_topics(lists: &[Vec<String>]) -> Vec<String> {
    let mut seen = HashSet::new();
    lists
        .iter()
        .flatten()
        .filter(|topic| seen.insert(*topic))
        .cloned()
        .collect()
}

/// Process-local preference store
#[derive(Default)]
pub struct InMemoryPreferenceStore {
    users: RwLock<HashMap<String, Vec<String>>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn all_preferences(&self) -> Result<Vec<Vec<String>>, PreferenceStoreError> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }

    async fn user_preferences(
        &self,
        user_id: &str,
    ) -> Result<Option<Vec<String>>, PreferenceStoreError> {
        let users = self.users.read().await;
        Ok(users.get(user_id).cloned())
    }

    async fn set_user_preferences(
        &self,
        user_id: &str,
        preferences: Vec<String>,
    ) -> Result<Vec<String>, PreferenceStoreError> {
        validate_preferences(&preferences)?;

        let mut users = self.users.write().await;
        users.insert(user_id.to_string(), preferences.clone());
        Ok(preferences)
    }
}

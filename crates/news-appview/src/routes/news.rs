use axum::extract::{Path, Query, State};
use axum::Json;
use news_cache::{NewsBundle, SearchBundle, TopicSet};
use news_feed::FeedResponse;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TopicsQuery {
    pub topics: Option<String>,
}

impl TopicsQuery {
    /// Parse the comma-separated `topics` parameter
    pub fn topic_set(&self) -> Result<TopicSet, AppError> {
        let raw = self
            .topics
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("topics query parameter is required".into()))?;
        let topics = raw.split(',').map(str::trim).filter(|t| !t.is_empty());
        Ok(TopicSet::new(topics)?)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn get_user_news(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<FeedResponse<NewsBundle>>, AppError> {
    Ok(Json(state.aggregator.news_for_user(&user_id).await?))
}

pub async fn get_news(
    State(state): State<AppState>,
    Query(query): Query<TopicsQuery>,
) -> Result<Json<FeedResponse<NewsBundle>>, AppError> {
    let topics = query.topic_set()?;
    Ok(Json(state.aggregator.news_for_topics(&topics).await?))
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<FeedResponse<SearchBundle>>, AppError> {
    let keyword = query
        .q
        .ok_or_else(|| AppError::BadRequest("q query parameter is required".into()))?;
    Ok(Json(state.aggregator.search(keyword.trim()).await?))
}

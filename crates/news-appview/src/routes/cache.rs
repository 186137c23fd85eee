use axum::extract::{Query, State};
use axum::Json;
use news_cache::CacheStats;
use serde_json::{json, Value};

use super::news::TopicsQuery;
use crate::error::AppError;
use crate::state::AppState;

pub async fn stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats().await)
}

pub async fn clear(State(state): State<AppState>) -> Json<Value> {
    state.cache.clear_all().await;
    Json(json!({ "message": "All cache cleared" }))
}

pub async fn invalidate_news(
    State(state): State<AppState>,
    Query(query): Query<TopicsQuery>,
) -> Result<Json<Value>, AppError> {
    let topics = query.topic_set()?;
    state.cache.invalidate_news(&topics).await;
    Ok(Json(json!({
        "message": "News cache invalidated",
        "topics": topics.to_vec(),
    })))
}

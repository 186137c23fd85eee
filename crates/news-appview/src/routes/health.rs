use axum::extract::State;
use axum::Json;
use chrono::Utc;
use news_cache::CacheStats;
use news_feed::SchedulerStatus;
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub cache: CacheStats,
    pub background: SchedulerStatus,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        cache: state.cache.stats().await,
        background: state.scheduler.status().await,
    })
}

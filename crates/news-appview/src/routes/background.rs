use axum::extract::State;
use axum::Json;
use news_feed::{CycleReport, SchedulerStatus};

use crate::error::AppError;
use crate::state::AppState;

pub async fn status(State(state): State<AppState>) -> Json<SchedulerStatus> {
    Json(state.scheduler.status().await)
}

pub async fn start(State(state): State<AppState>) -> Json<SchedulerStatus> {
    state.scheduler.start().await;
    Json(state.scheduler.status().await)
}

pub async fn stop(State(state): State<AppState>) -> Json<SchedulerStatus> {
    state.scheduler.stop().await;
    Json(state.scheduler.status().await)
}

/// Run one refresh cycle now; 409 while the scheduler is stopped
pub async fn trigger(State(state): State<AppState>) -> Result<Json<CycleReport>, AppError> {
    Ok(Json(state.scheduler.trigger_update().await?))
}

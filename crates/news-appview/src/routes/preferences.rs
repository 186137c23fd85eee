use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PreferencesBody {
    pub preferences: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesResponse {
    pub user_id: String,
    pub preferences: Vec<String>,
}

pub async fn get_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<PreferencesResponse>, AppError> {
    let preferences = state
        .preferences
        .user_preferences(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found: {}", user_id)))?;

    Ok(Json(PreferencesResponse {
        user_id,
        preferences,
    }))
}

pub async fn put_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<PreferencesBody>,
) -> Result<Json<PreferencesResponse>, AppError> {
    let preferences = state
        .preferences
        .set_user_preferences(&user_id, body.preferences)
        .await?;
    info!(user_id = %user_id, count = preferences.len(), "Preferences updated");

    Ok(Json(PreferencesResponse {
        user_id,
        preferences,
    }))
}

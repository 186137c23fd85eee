pub mod background;
pub mod cache;
pub mod health;
pub mod news;
pub mod preferences;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::state::AppState;

/// Create the HTTP router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health))
        // Preferences
        .route(
            "/api/users/{user_id}/preferences",
            get(preferences::get_preferences).put(preferences::put_preferences),
        )
        // News
        .route("/api/users/{user_id}/news", get(news::get_user_news))
        .route("/api/news", get(news::get_news))
        .route("/api/news/search", get(news::search))
        // Cache
        .route("/api/cache", delete(cache::clear))
        .route("/api/cache/stats", get(cache::stats))
        .route("/api/cache/news", delete(cache::invalidate_news))
        // Background refresh
        .route("/api/background/status", get(background::status))
        .route("/api/background/start", post(background::start))
        .route("/api/background/stop", post(background::stop))
        .route("/api/background/trigger", post(background::trigger))
        .with_state(state)
}

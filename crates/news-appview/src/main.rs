//! News AppView - personalized topic news over HTTP
//!
//! Serves cached topic news and ad hoc searches, and keeps the cache warm
//! with a background refresh over every topic in any user's preferences.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use axum::http::{header, Method};
use news_cache::Sweeper;
use news_feed::InMemoryPreferenceStore;
use newsapi_client::NewsApiClient;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

use config::Config;
use error::StartupError;
use state::AppState;

const DEFAULT_LOG_FILTER: &str = "news_appview=info,news_feed=info,news_cache=info";

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    let config = Config::from_env();
    info!(port = config.port, "Starting news-appview");
    info!(
        interval_secs = config.refresh_interval.as_secs(),
        concurrency = config.refresh_concurrency,
        "Background refresh configured"
    );
    if config.news_api_key.is_none() {
        warn!("NEWS_API_KEY not set; only cached news can be served");
    }

    let upstream = NewsApiClient::with_timeout(
        &config.news_api_url,
        config.news_api_key.clone(),
        config.request_timeout,
    )?;
    let state = AppState::new(
        &config,
        Arc::new(upstream),
        Arc::new(InMemoryPreferenceStore::new()),
    );

    let sweeper = Sweeper::spawn(state.cache.clone(), config.sweep_interval);
    if config.background_refresh {
        state.scheduler.start().await;
    }

    // CORS
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
    };

    let app = routes::create_router(state.clone()).layer(cors);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!(port = config.port, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down");
    state.scheduler.stop().await;
    sweeper.shutdown();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

//! Periodic background refresh of topic news

use crate::cycle::{CycleReport, Refresher};
use crate::error::RefreshError;
use crate::preferences::PreferenceStore;
use crate::upstream::NewsUpstream;
use chrono::{DateTime, Utc};
use news_cache::CacheStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Time between timer firings
    pub update_interval: Duration,
    /// Per-topic upstream timeout
    pub fetch_timeout: Duration,
    /// Upstream fetches allowed in flight at once
    pub max_concurrent_fetches: usize,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_secs(30 * 60),
            fetch_timeout: Duration::from_secs(15),
            max_concurrent_fetches: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStatus {
    pub is_running: bool,
    pub update_interval_secs: u64,
    /// When the last cycle finished, if any has
    pub last_update: Option<DateTime<Utc>>,
    pub last_cycle: Option<CycleReport>,
}

struct Worker {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Keeps single-topic cache entries warm for every topic in use
///
/// Stopped until [`RefreshScheduler::start`]; while running a cycle fires
/// immediately and then every `update_interval`. [`RefreshScheduler::stop`]
/// prevents further firings, but a cycle already underway is left to finish
/// and still writes its results.
pub struct RefreshScheduler {
    refresher: Refresher,
    update_interval: Duration,
    worker: Mutex<Option<Worker>>,
}

impl RefreshScheduler {
    pub fn new(
        cache: Arc<CacheStore>,
        upstream: Arc<dyn NewsUpstream>,
        preferences: Arc<dyn PreferenceStore>,
        config: RefreshConfig,
    ) -> Self {
        Self {
            refresher: Refresher::new(
                cache,
                upstream,
                preferences,
                config.fetch_timeout,
                config.max_concurrent_fetches,
            ),
            update_interval: config.update_interval.max(Duration::from_secs(1)),
            worker: Mutex::new(None),
        }
    }

    pub async fn start(&self) {
        let mut worker = self.worker.lock().await;
        if worker.is_some() {
            info!("Background news refresh already running");
            return;
        }

        let (shutdown, rx) = watch::channel(false);
        let handle = tokio::spawn(run_timer(self.refresher.clone(), self.update_interval, rx));
        *worker = Some(Worker { shutdown, handle });

        info!(
            interval_secs = self.update_interval.as_secs(),
            "Background news refresh started"
        );
    }

    pub async fn stop(&self) {
        let Some(worker) = self.worker.lock().await.take() else {
            info!("Background news refresh already stopped");
            return;
        };

        let _ = worker.shutdown.send(true);
        if let Err(e) = worker.handle.await {
            error!(error = %e, "Refresh timer task failed");
        }
        info!("Background news refresh stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.worker.lock().await.is_some()
    }

    /// Run one cycle now, outside the timer
    pub async fn trigger_update(&self) -> Result<CycleReport, RefreshError> {
        if !self.is_running().await {
            warn!("Manual refresh requested while background service is stopped");
            return Err(RefreshError::NotRunning);
        }

        info!("Manual news refresh triggered");
        self.refresher.run().await
    }

    pub async fn status(&self) -> SchedulerStatus {
        let last_cycle = self.refresher.last_report().await;
        SchedulerStatus {
            is_running: self.is_running().await,
            update_interval_secs: self.update_interval.as_secs(),
            last_update: last_cycle.as_ref().map(|c| c.finished_at),
            last_cycle,
        }
    }
}

async fn run_timer(refresher: Refresher, period: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        // Stopping mid-cycle detaches the cycle; its cache writes still land.
        let cycle = tokio::spawn({
            let refresher = refresher.clone();
            async move { refresher.run().await }
        });

        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            joined = cycle => match joined {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => warn!(error = %e, "Scheduled refresh cycle aborted"),
                Err(e) => error!(error = %e, "Refresh cycle task failed"),
            }
        }
    }

    debug!("Refresh timer exited");
}

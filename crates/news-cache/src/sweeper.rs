//! Periodic eviction of expired entries

use crate::store::CacheStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Background task that purges expired entries on a fixed period
///
/// Bounds memory held by keys that are written once and never read again.
/// The task stops when [`Sweeper::shutdown`] is called or the handle is dropped.
pub struct Sweeper {
    handle: JoinHandle<()>,
}

impl Sweeper {
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(10 * 60);

    pub fn spawn(store: Arc<CacheStore>, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let evicted = store.purge_expired().await;
                if evicted > 0 {
                    debug!(evicted, "Evicted expired cache entries");
                }
                let active_keys = store.len().await;
                info!(active_keys, "Cache sweep complete");
            }
        });

        Self { handle }
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

//! Periodic catalog refresh.

use std::sync::Arc;
use std::time::Duration;

use tienda_core::catalog::CatalogStore;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

/// Background task that refetches the catalog every interval.
///
/// Readers keep being served from the held snapshot while a fetch runs; a
/// failed fetch only marks it stale. The task stops when its token is
/// cancelled.
pub struct CatalogRefresher {
    store: Arc<CatalogStore>,
    every: Duration,
    token: CancellationToken,
}

impl CatalogRefresher {
    /// Refreshes `store` at its own refresh interval.
    pub fn new(store: Arc<CatalogStore>) -> Self {
        let every = store.refresh_interval();
        Self::with_interval(store, every)
    }

    pub fn with_interval(store: Arc<CatalogStore>, every: Duration) -> Self {
        Self {
            store,
            every,
            token: CancellationToken::new(),
        }
    }

    /// Token that stops the task once cancelled.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        // The first tick is one interval out: startup loads the catalog itself.
        let mut ticker = interval_at(Instant::now() + self.every, self.every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(
            interval_secs = self.every.as_secs(),
            "[CatalogRefresher] Started"
        );

        loop {
            tokio::select! {
                _ = self.token.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.store.force_refresh().await {
                        tracing::warn!("[CatalogRefresher] Refresh failed, serving last snapshot: {}", e);
                    }
                }
            }
        }

        tracing::info!("[CatalogRefresher] Stopped");
    }
}

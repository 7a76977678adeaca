use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::catalog::{CatalogFeed, CatalogSnapshot, ColumnMapping};
use crate::error::{Result, TiendaError};

struct CachedSnapshot {
    snapshot: Arc<CatalogSnapshot>,
    fetched: Instant,
}

struct FailedAttempt {
    error: TiendaError,
    at: Instant,
}

/// What readers currently get from the store.
#[derive(Debug, Clone)]
pub enum CatalogStatus {
    /// The last refresh attempt succeeded.
    Fresh(Arc<CatalogSnapshot>),
    /// The last refresh attempt failed; this is the last good snapshot.
    Stale(Arc<CatalogSnapshot>),
    /// No refresh has ever succeeded.
    Unavailable,
}

impl CatalogStatus {
    pub fn snapshot(&self) -> Option<&Arc<CatalogSnapshot>> {
        match self {
            Self::Fresh(snapshot) | Self::Stale(snapshot) => Some(snapshot),
            Self::Unavailable => None,
        }
    }
}

/// Holds the latest catalog snapshot and refreshes it from a feed.
///
/// - `refresh` is cached: within the refresh interval of the last successful
///   fetch it returns the held snapshot without touching the feed, and within
///   the interval of the last failed fetch it returns that failure.
/// - Fetches are serialized; concurrent callers wait and reuse the result.
/// - A failed fetch never replaces the held snapshot, it only marks it stale.
/// - Every successful fetch gets a new generation number, so row indexes can
///   be checked against the snapshot they were taken from.
pub struct CatalogStore {
    feed: Arc<dyn CatalogFeed>,
    mapping: ColumnMapping,
    ttl: Duration,
    cached: RwLock<Option<CachedSnapshot>>,
    last_failure: RwLock<Option<FailedAttempt>>,
    refresh_lock: Mutex<()>,
    stale: AtomicBool,
    generation: AtomicU64,
}

impl CatalogStore {
    pub fn new(feed: Arc<dyn CatalogFeed>, mapping: ColumnMapping, ttl: Duration) -> Self {
        Self {
            feed,
            mapping,
            ttl,
            cached: RwLock::new(None),
            last_failure: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            stale: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        self.ttl
    }

    /// Returns a snapshot no older than the refresh interval, fetching only
    /// when the held one has expired or none exists.
    ///
    /// A fetch that failed less than one interval ago is not retried: its
    /// error is returned and `current` still serves the last good snapshot.
    pub async fn refresh(&self) -> Result<Arc<CatalogSnapshot>> {
        if let Some(answer) = self.answer_within_ttl().await {
            return answer;
        }

        let _guard = self.refresh_lock.lock().await;
        // Another caller may have fetched while we waited for the lock.
        if let Some(answer) = self.answer_within_ttl().await {
            return answer;
        }
        self.fetch_and_swap().await
    }

    /// Fetches unconditionally (on-demand refresh, periodic timer).
    pub async fn force_refresh(&self) -> Result<Arc<CatalogSnapshot>> {
        let _guard = self.refresh_lock.lock().await;
        self.fetch_and_swap().await
    }

    /// The held snapshot, if any refresh ever succeeded.
    pub async fn current(&self) -> Option<Arc<CatalogSnapshot>> {
        self.cached
            .read()
            .await
            .as_ref()
            .map(|cached| Arc::clone(&cached.snapshot))
    }

    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::Acquire)
    }

    pub async fn status(&self) -> CatalogStatus {
        match self.current().await {
            Some(snapshot) if self.is_stale() => CatalogStatus::Stale(snapshot),
            Some(snapshot) => CatalogStatus::Fresh(snapshot),
            None => CatalogStatus::Unavailable,
        }
    }

    async fn answer_within_ttl(&self) -> Option<Result<Arc<CatalogSnapshot>>> {
        let cached = self.cached.read().await;
        let fresh = cached
            .as_ref()
            .filter(|cached| cached.fetched.elapsed() < self.ttl)
            .map(|cached| Arc::clone(&cached.snapshot));
        if let Some(snapshot) = fresh {
            return Some(Ok(snapshot));
        }
        drop(cached);

        let failure = self.last_failure.read().await;
        failure
            .as_ref()
            .filter(|failure| failure.at.elapsed() < self.ttl)
            .map(|failure| Err(failure.error.clone()))
    }

    async fn fetch_and_swap(&self) -> Result<Arc<CatalogSnapshot>> {
        let source = self.feed.describe();
        match self.feed.fetch().await {
            Ok(table) => {
                let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
                let snapshot = Arc::new(
                    CatalogSnapshot::from_table(table, &self.mapping, Utc::now())
                        .with_generation(generation),
                );
                *self.cached.write().await = Some(CachedSnapshot {
                    snapshot: Arc::clone(&snapshot),
                    fetched: Instant::now(),
                });
                *self.last_failure.write().await = None;
                self.stale.store(false, Ordering::Release);
                tracing::info!(
                    source = %source,
                    generation,
                    products = snapshot.len(),
                    "[CatalogStore] Catalog refreshed"
                );
                Ok(snapshot)
            }
            Err(err) => {
                self.stale.store(true, Ordering::Release);
                tracing::warn!(
                    source = %source,
                    error = %err,
                    "[CatalogStore] Refresh failed, keeping previous snapshot"
                );
                let err = match err {
                    TiendaError::FeedUnavailable(_) => err,
                    other => TiendaError::feed_unavailable(other.to_string()),
                };
                *self.last_failure.write().await = Some(FailedAttempt {
                    error: err.clone(),
                    at: Instant::now(),
                });
                Err(err)
            }
        }
    }
}

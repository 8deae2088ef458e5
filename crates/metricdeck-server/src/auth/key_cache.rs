//! TTL cache in front of a [`KeySource`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use metricdeck_core::error::Result;

use super::{KeySet, KeySource};

struct Cached {
    fetched_at: Instant,
    set: Arc<KeySet>,
}

/// Shortest interval between two forced refreshes.
pub const DEFAULT_MIN_REFRESH: Duration = Duration::from_secs(30);

pub struct KeyCache {
    source: Arc<dyn KeySource>,
    ttl: Duration,
    min_refresh: Duration,
    slot: RwLock<Option<Cached>>,
}

impl KeyCache {
    pub fn new(source: Arc<dyn KeySource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            min_refresh: DEFAULT_MIN_REFRESH.min(ttl),
            slot: RwLock::new(None),
        }
    }

    /// Bounds how often [`refresh`](Self::refresh) may hit the source.
    pub fn with_min_refresh(mut self, min_refresh: Duration) -> Self {
        self.min_refresh = min_refresh;
        self
    }

    /// Current key set, fetching from the source when empty or expired.
    pub async fn get(&self) -> Result<Arc<KeySet>> {
        if let Some(cached) = self.slot.read().await.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                return Ok(Arc::clone(&cached.set));
            }
        }

        let mut slot = self.slot.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(cached) = slot.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                return Ok(Arc::clone(&cached.set));
            }
        }

        self.fetch_into(&mut *slot).await
    }

    /// Refetches ahead of the TTL, unless the cached set is younger than the
    /// minimum refresh interval; then the cached set is returned as is.
    pub async fn refresh(&self) -> Result<Arc<KeySet>> {
        let mut slot = self.slot.write().await;
        if let Some(cached) = slot.as_ref() {
            if cached.fetched_at.elapsed() < self.min_refresh {
                tracing::debug!("key set refresh skipped; fetched too recently");
                return Ok(Arc::clone(&cached.set));
            }
        }
        self.fetch_into(&mut *slot).await
    }

    async fn fetch_into(&self, slot: &mut Option<Cached>) -> Result<Arc<KeySet>> {
        let set = Arc::new(self.source.fetch().await?);
        tracing::info!(keys = set.len(), ttl_secs = self.ttl.as_secs(), "key set refreshed");
        *slot = Some(Cached {
            fetched_at: Instant::now(),
            set: Arc::clone(&set),
        });
        Ok(set)
    }

    /// Drops the cached set; the next `get` fetches again.
    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }
}

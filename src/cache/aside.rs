//! Cache-aside read path and write invalidation.
//!
//! Reads try the cache first and fall back to a loader on miss, writing the
//! loaded value back with a fixed TTL. Writes invalidate keys only after the
//! caller's persistence step has succeeded.
//!
//! Every cache call is bounded by a timeout and fails open: an error or a
//! timeout is logged and treated as a miss (reads) or ignored (writes).
//!
//! Known race: a reader that misses, loads pre-write state, and populates
//! after a writer's invalidation re-introduces a stale entry. The entry
//! lives at most one TTL.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{payload, CacheBackend, CacheKey, CacheStats};
use crate::config::Config;
use crate::error::{CacheError, CacheResult};

/// Reference TTL for populated entries, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Reference bound on a single cache call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Clone)]
pub struct CacheAside {
    backend: Arc<dyn CacheBackend>,
    ttl_secs: u64,
    timeout: Duration,
}

impl CacheAside {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl_secs: u64, timeout: Duration) -> Self {
        Self {
            backend,
            ttl_secs,
            timeout,
        }
    }

    pub fn from_config(backend: Arc<dyn CacheBackend>, config: &Config) -> Self {
        Self::new(
            backend,
            config.cache_ttl,
            Duration::from_millis(config.cache_timeout_ms),
        )
    }

    pub fn backend(&self) -> &Arc<dyn CacheBackend> {
        &self.backend
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    // == Read Path ==
    /// Returns the cached value for `key`, or `None` on miss or any cache failure.
    pub async fn lookup<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let name = key.to_string();
        let payload = match self.bounded(self.backend.get(&name)).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!(key = %name, "Cache miss");
                return None;
            }
            Err(err) => {
                warn!(key = %name, error = %err, "Cache read failed, falling through to store");
                return None;
            }
        };

        match payload::decode(&payload) {
            Ok(value) => {
                debug!(key = %name, "Cache hit");
                Some(value)
            }
            Err(err) => {
                warn!(key = %name, error = %err, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Writes `value` under `key` with the configured TTL. Failures are logged.
    pub async fn populate<T: Serialize>(&self, key: &CacheKey, value: &T) {
        let name = key.to_string();
        let result = match payload::encode(value) {
            Ok(encoded) => {
                self.bounded(self.backend.set(&name, encoded, self.ttl_secs))
                    .await
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => debug!(key = %name, ttl_secs = self.ttl_secs, "Cache populated"),
            Err(err) => warn!(key = %name, error = %err, "Cache populate failed"),
        }
    }

    /// Loads through the cache.
    ///
    /// On hit the loader is not called. On miss the loader runs; `Some` is
    /// cached and returned, `None` is returned uncached, and an error is
    /// propagated without touching the cache.
    pub async fn read_through<T, E, F, Fut>(&self, key: &CacheKey, load: F) -> Result<Option<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        if let Some(hit) = self.lookup(key).await {
            return Ok(Some(hit));
        }

        let loaded = load().await?;
        if let Some(value) = &loaded {
            self.populate(key, value).await;
        }
        Ok(loaded)
    }

    // == Write Path ==
    /// Drops `key` after a successful write. Failures are logged, never returned.
    pub async fn invalidate(&self, key: &CacheKey) {
        let name = key.to_string();
        match self.bounded(self.backend.delete(&name)).await {
            Ok(()) => info!(key = %name, "Cache invalidated"),
            Err(err) => warn!(
                key = %name,
                error = %err,
                ttl_secs = self.ttl_secs,
                "Cache invalidation failed, entry may be stale until it expires"
            ),
        }
    }

    /// Backend statistics, or zeros if the backend cannot answer.
    pub async fn stats(&self) -> CacheStats {
        self.bounded(self.backend.stats())
            .await
            .unwrap_or_else(|err| {
                warn!(error = %err, "Cache stats unavailable");
                CacheStats::default()
            })
    }

    async fn bounded<T>(&self, call: impl Future<Output = CacheResult<T>>) -> CacheResult<T> {
        tokio::time::timeout(self.timeout, call)
            .await
            .unwrap_or_else(|_| Err(CacheError::Timeout(self.timeout.as_millis() as u64)))
    }
}

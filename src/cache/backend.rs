//! Cache backend trait and the in-process implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore};
use crate::error::CacheResult;

/// Key/value store with expiring entries.
///
/// Implementations must be safe to share across concurrent requests. Every
/// call may fail; callers on the request path treat failures as a miss.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the live payload under `key`, if any.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `payload` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, payload: String, ttl_secs: u64) -> CacheResult<()>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    async fn stats(&self) -> CacheResult<CacheStats>;
}

// == Memory Cache ==
/// `CacheBackend` over a shared [`CacheStore`].
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<CacheStore>>,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(max_entries))),
        }
    }

    /// Drops expired entries. Returns the number removed.
    pub async fn sweep_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        // Write lock: reads update LRU order and statistics
        Ok(self.store.write().await.get(key))
    }

    async fn set(&self, key: &str, payload: String, ttl_secs: u64) -> CacheResult<()> {
        self.store
            .write()
            .await
            .set(key.to_string(), payload, ttl_secs)
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.store.write().await.delete(key);
        Ok(())
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        Ok(self.store.read().await.stats())
    }
}

//! TTL Cleanup Task
//!
//! Expired entries already read as absent; the sweep only reclaims their memory.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::MemoryCache;

/// Spawns a task that sweeps expired entries from `cache` every `every`.
///
/// The returned handle is aborted on shutdown.
pub fn spawn_cleanup_task(cache: MemoryCache, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = every.as_millis() as u64, "Starting TTL cleanup task");

        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match cache.sweep_expired().await {
                0 => debug!("TTL cleanup: no expired entries found"),
                removed => info!(removed, "TTL cleanup: removed expired entries"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheBackend;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let cache = MemoryCache::new(100);
        cache.set("review:1", "{}".to_string(), 0).await.unwrap();
        cache.set("books", "[]".to_string(), 3600).await.unwrap();

        let handle = spawn_cleanup_task(cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.abort();

        assert_eq!(cache.len().await, 1);
        assert!(cache.get("books").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let handle = spawn_cleanup_task(MemoryCache::new(10), Duration::from_secs(1));

        handle.abort();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}

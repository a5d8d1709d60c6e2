//! Cache Store Module
//!
//! In-process key/value engine: HashMap storage with LRU eviction and TTL expiration.

use std::collections::HashMap;
use std::time::Instant;

use crate::cache::{CacheEntry, CacheStats, LruTracker, MAX_KEY_LENGTH, MAX_PAYLOAD_SIZE};
use crate::error::{CacheError, CacheResult};

// == Cache Store ==
/// Payload storage with per-entry TTL and LRU eviction at capacity.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    max_entries: usize,
}

impl CacheStore {
    /// Creates an empty store holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::default(),
            max_entries: max_entries.max(1),
        }
    }

    // == Set ==
    /// Stores a payload under `key` for `ttl_secs` seconds.
    ///
    /// Overwrites any existing entry and resets its TTL. At capacity the
    /// least recently used entry is evicted first.
    pub fn set(&mut self, key: String, payload: String, ttl_secs: u64) -> CacheResult<()> {
        if key.is_empty() || key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::Internal(format!(
                "Key must be 1 to {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(CacheError::Internal(format!(
                "Payload exceeds maximum size of {} bytes",
                MAX_PAYLOAD_SIZE
            )));
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            let evicted = self
                .lru
                .evict_oldest()
                .ok_or_else(|| CacheError::Internal("Cache is full and eviction failed".into()))?;
            self.entries.remove(&evicted);
            self.stats.evictions += 1;
        }

        self.lru.touch(&key);
        self.entries.insert(key, CacheEntry::new(payload, ttl_secs));
        Ok(())
    }

    // == Get ==
    /// Returns the payload for `key` if present and not expired.
    ///
    /// An expired entry is removed on read and counted as a miss.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            None => {
                self.stats.misses += 1;
                return None;
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            self.remove_entry(key);
            self.stats.expirations += 1;
            self.stats.misses += 1;
            return None;
        }

        self.stats.hits += 1;
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.payload.clone())
    }

    // == Delete ==
    /// Removes `key`. Returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    /// Whether a live entry exists, without touching statistics or LRU order.
    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            ..self.stats
        }
    }

    // == Cleanup Expired ==
    /// Removes every expired entry. Returns the number removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove_entry(key);
        }
        self.stats.expirations += expired.len() as u64;
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.entries.remove(key).is_some()
    }
}

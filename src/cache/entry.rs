//! Cache Entry Module
//!
//! A serialized payload plus the instant after which it must be treated as absent.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single stored payload with its expiry deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized payload
    pub payload: String,
    /// First instant at which the entry is expired
    pub expires_at: Instant,
}

impl CacheEntry {
    /// Creates an entry that expires `ttl_secs` seconds from now.
    ///
    /// A TTL of zero produces an entry that is already expired.
    pub fn new(payload: String, ttl_secs: u64) -> Self {
        Self {
            payload,
            expires_at: Instant::now() + Duration::from_secs(ttl_secs),
        }
    }

    /// Expired once the current instant reaches the deadline.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

//! Cache Module
//!
//! The cache store (in-process TTL map with LRU eviction), the backend trait
//! the request path talks to, key naming, payload versioning, and the
//! cache-aside policy tying them together.

mod aside;
mod backend;
mod entry;
mod keys;
mod lru;
pub mod payload;
mod stats;
mod store;


// Re-export public types
pub use aside::{CacheAside, DEFAULT_TIMEOUT, DEFAULT_TTL_SECS};
pub use backend::{CacheBackend, MemoryCache};
pub use entry::CacheEntry;
pub use keys::CacheKey;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 1024 * 1024; // 1 MB

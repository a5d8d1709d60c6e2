//! Book Reviews - books and their reviews over HTTP
//!
//! Reads go through a cache-aside layer with a fixed TTL; writes persist
//! first and then invalidate the cache keys they made stale.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;

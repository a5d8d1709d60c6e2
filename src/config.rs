//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::{DEFAULT_TIMEOUT, DEFAULT_TTL_SECS};

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds applied to every populated cache entry
    pub cache_ttl: u64,
    /// Maximum number of entries the cache can hold
    pub cache_max_entries: usize,
    /// Upper bound in milliseconds on a single cache call
    pub cache_timeout_ms: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Postgres connection URL; `None` selects the in-memory store
    pub database_url: Option<String>,
    /// Postgres pool size
    pub database_max_connections: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3001)
    /// - `CACHE_TTL` - Cache entry TTL in seconds (default: 3600)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_TIMEOUT_MS` - Bound on each cache call (default: 250)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `DATABASE_URL` - Postgres URL (default: unset, in-memory store)
    /// - `DATABASE_MAX_CONNECTIONS` - Postgres pool size (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            cache_max_entries: parse_var("CACHE_MAX_ENTRIES")
                .unwrap_or(defaults.cache_max_entries),
            cache_timeout_ms: parse_var("CACHE_TIMEOUT_MS").unwrap_or(defaults.cache_timeout_ms),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            database_url: env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or(defaults.database_max_connections),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3001,
            cache_ttl: DEFAULT_TTL_SECS,
            cache_max_entries: 1000,
            cache_timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            cleanup_interval: 1,
            database_url: None,
            database_max_connections: 5,
        }
    }
}

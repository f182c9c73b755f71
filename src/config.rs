//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::fetch::DEFAULT_CACHE_EXPIRATION;

/// Caching core configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of keys the in-memory store can hold
    pub max_entries: usize,
    /// TTL in seconds of cached pages
    pub cache_expiration: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Page fetch timeout in seconds
    pub fetch_timeout: u64,
    /// Collapse concurrent misses for the same URL into one fetch
    pub single_flight: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum store entries (default: 10000)
    /// - `CACHE_EXPIRATION` - Page TTL in seconds (default: 10)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `FETCH_TIMEOUT` - Fetch timeout in seconds (default: 30)
    /// - `SINGLE_FLIGHT` - `true` to de-duplicate concurrent fetches (default: false)
    ///
    /// Values that fail to parse fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            cache_expiration: env_or("CACHE_EXPIRATION", defaults.cache_expiration),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            fetch_timeout: env_or("FETCH_TIMEOUT", defaults.fetch_timeout),
            single_flight: env_or("SINGLE_FLIGHT", defaults.single_flight),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            cache_expiration: DEFAULT_CACHE_EXPIRATION,
            cleanup_interval: 1,
            fetch_timeout: 30,
            single_flight: false,
        }
    }
}

//! Store Module
//!
//! The key-value store contract the caches are built on, plus an in-memory
//! implementation with TTL expiration and LRU eviction.

mod entry;
mod lru;
mod memory;
mod stats;

#[cfg(test)]
mod property_tests;

use async_trait::async_trait;

use crate::error::StoreError;

// Re-export public types
pub use entry::Entry;
pub use lru::LruTracker;
pub use memory::MemoryStore;
pub use stats::StoreStats;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 8 * 1024;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 16 * 1024 * 1024; // 16 MB

// == Key Value Store ==
/// Contract for the external key-value store the caches delegate to.
///
/// Every operation is atomic for a single key. No multi-key transactions are
/// offered; callers racing on related keys see each write independently.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored bytes, or `None` if the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stores a value without expiration, replacing any previous TTL.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Stores a value that expires after `ttl_secs` seconds.
    async fn setex(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<(), StoreError>;

    /// Increments the decimal integer at `key`, starting from 0 when absent.
    ///
    /// Returns the value after the increment.
    async fn incr(&self, key: &str) -> Result<i64, StoreError>;

    /// Removes every key.
    async fn flush_all(&self) -> Result<(), StoreError>;
}

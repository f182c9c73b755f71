//! Memory Store Module
//!
//! In-memory key-value store combining HashMap storage with LRU tracking and
//! TTL expiration. Implements the `KeyValueStore` contract.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::store::{Entry, KeyValueStore, LruTracker, StoreStats, MAX_KEY_LENGTH, MAX_VALUE_SIZE};

// == Keyspace ==
/// Lock-protected state of a `MemoryStore`.
#[derive(Debug, Default)]
struct Keyspace {
    entries: HashMap<String, Entry>,
    lru: LruTracker,
    stats: StoreStats,
}

impl Keyspace {
    /// Drops `key` if its TTL has elapsed. Returns true if it was dropped.
    fn purge_if_expired(&mut self, key: &str, now: Instant) -> bool {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now));

        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
        }
        expired
    }

    /// Inserts or overwrites `key`, evicting the LRU key if a new key would
    /// exceed `max_entries`.
    fn insert(&mut self, key: &str, entry: Entry, max_entries: usize) -> Result<(), StoreError> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(StoreError::KeyTooLong(MAX_KEY_LENGTH));
        }
        if entry.value.len() > MAX_VALUE_SIZE {
            return Err(StoreError::ValueTooLarge(MAX_VALUE_SIZE));
        }

        let is_overwrite = self.entries.contains_key(key);
        if !is_overwrite && self.entries.len() >= max_entries {
            match self.lru.evict_oldest() {
                Some(evicted) => {
                    self.entries.remove(&evicted);
                    self.stats.record_eviction();
                    debug!(key = %evicted, "evicted least recently used entry");
                }
                None => return Err(StoreError::Full),
            }
        }

        self.entries.insert(key.to_string(), entry);
        self.lru.touch(key);
        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }
}

// == Memory Store ==
/// Single-node, in-memory store with TTL expiration and LRU eviction.
///
/// Every operation takes the keyspace lock once, so each is atomic for the
/// key it touches. Shared between tasks behind an `Arc`.
#[derive(Debug)]
pub struct MemoryStore {
    keyspace: RwLock<Keyspace>,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store holding at most `max_entries` keys.
    pub fn new(max_entries: usize) -> Self {
        Self {
            keyspace: RwLock::new(Keyspace::default()),
            max_entries,
        }
    }

    // == TTL ==
    /// Returns the remaining TTL of `key` in whole seconds.
    ///
    /// None if the key is absent, expired, or has no expiration.
    pub async fn ttl(&self, key: &str) -> Option<u64> {
        let keyspace = self.keyspace.read().await;
        let entry = keyspace.entries.get(key)?;
        if entry.is_expired() {
            return None;
        }
        entry.ttl_remaining().map(|remaining| remaining.as_secs())
    }

    // == Stats ==
    /// Returns current store statistics.
    pub async fn stats(&self) -> StoreStats {
        let keyspace = self.keyspace.read().await;
        let mut stats = keyspace.stats.clone();
        stats.set_total_entries(keyspace.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut keyspace = self.keyspace.write().await;
        let now = Instant::now();

        let expired_keys: Vec<String> = keyspace
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            keyspace.entries.remove(key);
            keyspace.lru.remove(key);
        }

        let count = expired_keys.len();
        keyspace.stats.record_expirations(count);
        let total = keyspace.entries.len();
        keyspace.stats.set_total_entries(total);
        count
    }

    /// Returns the current number of entries, expired ones included until
    /// they are accessed or swept.
    pub async fn len(&self) -> usize {
        self.keyspace.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.keyspace.read().await.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut keyspace = self.keyspace.write().await;
        keyspace.purge_if_expired(key, Instant::now());

        let value = keyspace.entries.get(key).map(|entry| entry.value.clone());
        match value {
            Some(value) => {
                keyspace.stats.record_hit();
                keyspace.lru.touch(key);
                Ok(Some(value))
            }
            None => {
                keyspace.stats.record_miss();
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let mut keyspace = self.keyspace.write().await;
        keyspace.insert(key, Entry::persistent(value), self.max_entries)
    }

    async fn setex(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<(), StoreError> {
        let entry = match ttl_secs {
            0 => None,
            _ => Entry::expiring(value, ttl_secs),
        }
        .ok_or(StoreError::InvalidExpire(ttl_secs))?;

        let mut keyspace = self.keyspace.write().await;
        keyspace.insert(key, entry, self.max_entries)
    }

    async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        let mut keyspace = self.keyspace.write().await;
        keyspace.purge_if_expired(key, Instant::now());

        let (current, expires_at) = match keyspace.entries.get(key) {
            Some(entry) => {
                let current = std::str::from_utf8(&entry.value)
                    .ok()
                    .and_then(|text| text.parse::<i64>().ok())
                    .ok_or_else(|| StoreError::NotAnInteger(key.to_string()))?;
                (current, entry.expires_at)
            }
            None => (0, None),
        };

        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::Overflow(key.to_string()))?;

        let entry = Entry::with_deadline(next.to_string().into_bytes(), expires_at);
        keyspace.insert(key, entry, self.max_entries)?;
        Ok(next)
    }

    async fn flush_all(&self) -> Result<(), StoreError> {
        let mut keyspace = self.keyspace.write().await;
        let removed = keyspace.entries.len();
        keyspace.entries.clear();
        keyspace.lru.clear();
        keyspace.stats.set_total_entries(0);
        info!(removed, "flushed all keys");
        Ok(())
    }
}

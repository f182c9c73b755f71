//! Typed Cache Module
//!
//! Stores scalar values under freshly minted keys and reads them back with a
//! caller-chosen decoder.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::cache::value::{self, Value};
use crate::cache::CallCounter;
use crate::error::{DecodeError, Result};
use crate::store::KeyValueStore;

/// Counter key used when `store()` calls are counted.
pub const STORE_CALLS_KEY: &str = "TypedCache::store";

// == Typed Cache ==
/// Write-once value cache over a `KeyValueStore`.
///
/// Every `store()` mints a new random v4 UUID key; there is no update in
/// place. Reads return `None` for unknown keys and hand the raw bytes to a
/// decoder otherwise.
pub struct TypedCache<S: ?Sized> {
    store: Arc<S>,
    store_calls: Option<CallCounter<S>>,
}

impl<S: KeyValueStore + ?Sized> TypedCache<S> {
    // == Constructors ==
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            store_calls: None,
        }
    }

    /// Creates a cache over a flushed store, dropping every existing key.
    pub async fn fresh(store: Arc<S>) -> Result<Self> {
        store.flush_all().await?;
        Ok(Self::new(store))
    }

    /// Counts every `store()` call under [`STORE_CALLS_KEY`].
    pub fn with_call_counting(mut self) -> Self {
        self.store_calls = Some(CallCounter::new(Arc::clone(&self.store), STORE_CALLS_KEY));
        self
    }

    // == Store ==
    /// Writes `value` under a new unique key and returns the key.
    pub async fn store(&self, value: impl Into<Value>) -> Result<String> {
        let value = value.into();
        match &self.store_calls {
            Some(counter) => counter.call(|| self.insert(value)).await,
            None => self.insert(value).await,
        }
    }

    async fn insert(&self, value: Value) -> Result<String> {
        let key = Uuid::new_v4().to_string();
        self.store.set(&key, value.into_bytes()).await?;
        debug!(%key, "stored value");
        Ok(key)
    }

    // == Get ==
    /// Returns the raw bytes stored under `key`.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.store.get(key).await?)
    }

    /// Returns the value under `key` passed through `decode`.
    ///
    /// Decoder failures propagate as `CacheError::Decode`.
    pub async fn get_with<T, F>(&self, key: &str, decode: F) -> Result<Option<T>>
    where
        F: FnOnce(&[u8]) -> std::result::Result<T, DecodeError>,
    {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(decode(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, value::utf8).await
    }

    /// Returns the integer under `key`; a non-numeric payload is an error.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, value::int).await
    }

    pub async fn get_float(&self, key: &str) -> Result<Option<f64>> {
        self.get_with(key, value::float).await
    }

    // == Call Count ==
    /// Number of `store()` calls counted so far. 0 when counting is off.
    pub async fn store_calls(&self) -> Result<i64> {
        match &self.store_calls {
            Some(counter) => counter.count().await,
            None => Ok(0),
        }
    }
}

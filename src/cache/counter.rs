//! Call Counter Module
//!
//! Counts invocations of an operation in the key-value store. The counter is
//! a value wrapped around the operation rather than a change to it: the
//! operation runs unmodified and its result is passed through untouched.

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::cache::value;
use crate::error::{Result, StoreError};
use crate::store::KeyValueStore;

// == Call Counter ==
/// Increments `key` in the store once per call attempt.
///
/// The increment happens before the operation runs, so the count reflects
/// attempts, failed ones included. Concurrent calls rely on the store's
/// atomic `incr`; no other locking is involved.
pub struct CallCounter<S: ?Sized> {
    store: Arc<S>,
    key: String,
}

impl<S: ?Sized> Clone for CallCounter<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
        }
    }
}

impl<S: KeyValueStore + ?Sized> CallCounter<S> {
    /// Creates a counter stored under `key`, typically a qualified
    /// operation name such as `"TypedCache::store"`.
    pub fn new(store: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    // == Call ==
    /// Counts one call, then runs `op` and returns its result unchanged.
    ///
    /// A store failure while counting is returned without running `op`.
    pub async fn call<F, Fut, T, E>(&self, op: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: From<StoreError>,
    {
        let calls = self.store.incr(&self.key).await?;
        debug!(key = %self.key, calls, "counted call");
        op().await
    }

    // == Wrap ==
    /// Binds the counter to `op`, producing a counted operation value.
    pub fn wrap<F>(self, op: F) -> Counted<S, F> {
        Counted { counter: self, op }
    }

    // == Count ==
    /// Returns the number of calls counted so far; 0 if none.
    pub async fn count(&self) -> Result<i64> {
        match self.store.get(&self.key).await? {
            Some(raw) => Ok(value::int(&raw)?),
            None => Ok(0),
        }
    }
}

// == Counted ==
/// An operation bundled with the counter that meters it.
pub struct Counted<S: ?Sized, F> {
    counter: CallCounter<S>,
    op: F,
}

impl<S: KeyValueStore + ?Sized, F> Counted<S, F> {
    /// Counts one call, then invokes the wrapped operation with `args`.
    pub async fn invoke<A, Fut, T, E>(&self, args: A) -> std::result::Result<T, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: From<StoreError>,
    {
        self.counter.call(|| (self.op)(args)).await
    }

    pub fn counter(&self) -> &CallCounter<S> {
        &self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use crate::store::{MemoryStore, MockKeyValueStore};

    #[tokio::test]
    async fn test_call_counts_and_passes_result_through() {
        let store = Arc::new(MemoryStore::new(100));
        let counter = CallCounter::new(store, "Service::work");

        let result: Result<&str> = counter.call(|| async { Ok("done") }).await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(counter.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_calls_are_counted() {
        let store = Arc::new(MemoryStore::new(100));
        let counter = CallCounter::new(store, "Service::work");

        for attempt in 0..5 {
            let result: Result<u32> = counter
                .call(|| async move {
                    if attempt == 2 {
                        Err(CacheError::InvalidRequest("boom".to_string()))
                    } else {
                        Ok(attempt)
                    }
                })
                .await;
            assert_eq!(result.is_err(), attempt == 2);
        }

        assert_eq!(counter.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_count_is_keyed_by_operation_not_arguments() {
        let store = Arc::new(MemoryStore::new(100));
        let double = CallCounter::new(Arc::clone(&store), "math::double")
            .wrap(|n: i64| async move { Ok::<_, CacheError>(n * 2) });
        let negate = CallCounter::new(store, "math::negate")
            .wrap(|n: i64| async move { Ok::<_, CacheError>(-n) });

        assert_eq!(double.invoke(2).await.unwrap(), 4);
        assert_eq!(double.invoke(10).await.unwrap(), 20);
        assert_eq!(negate.invoke(3).await.unwrap(), -3);

        assert_eq!(double.counter().count().await.unwrap(), 2);
        assert_eq!(negate.counter().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_count_without_calls_is_zero() {
        let counter = CallCounter::new(Arc::new(MemoryStore::new(100)), "never::called");
        assert_eq!(counter.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_skips_the_operation() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_incr()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("connection refused".to_string())));
        let counter = CallCounter::new(Arc::new(store), "Service::work");

        let mut ran = false;
        let result: Result<()> = counter
            .call(|| {
                ran = true;
                async { Ok(()) }
            })
            .await;

        assert!(matches!(result, Err(CacheError::Store(StoreError::Unavailable(_)))));
        assert!(!ran);
    }
}

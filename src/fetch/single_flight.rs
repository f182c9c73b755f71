//! Single-Flight Module
//!
//! Per-URL registry that lets only one task at a time fill the cache for a
//! given URL. Tasks arriving while a fill is in flight wait for it and then
//! find the page already cached.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

// == In Flight ==
#[derive(Debug, Default)]
pub struct InFlight {
    slots: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    // == Acquire ==
    /// Waits until no other task holds the slot for `url`, then holds it
    /// until the returned guard is dropped.
    pub async fn acquire(&self, url: &str) -> InFlightGuard<'_> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(url.to_string()).or_default())
        };

        let held = slot.lock_owned().await;
        InFlightGuard {
            registry: self,
            url: url.to_string(),
            held: Some(held),
        }
    }

    /// Number of URLs with a fill in flight or waiters queued.
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == In Flight Guard ==
/// Holds the slot for one URL; releasing it wakes the next waiter.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    registry: &'a InFlight,
    url: String,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut slots = self
            .registry
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(held) = self.held.take() {
            // The registry and this guard account for two references; any
            // more belong to waiters that still need the slot.
            let idle = slots
                .get(&self.url)
                .is_some_and(|slot| Arc::strong_count(slot) == 2);
            drop(held);
            if idle {
                slots.remove(&self.url);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_slot_removed_after_release() {
        let registry = InFlight::new();

        {
            let _guard = registry.acquire("http://a").await;
            assert_eq!(registry.len(), 1);
        }

        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_distinct_urls_do_not_block() {
        let registry = InFlight::new();

        let _a = registry.acquire("http://a").await;
        let b = tokio::time::timeout(Duration::from_millis(100), registry.acquire("http://b")).await;

        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_same_url_waits_for_holder() {
        let registry = Arc::new(InFlight::new());

        let first = registry.acquire("http://a").await;
        let blocked =
            tokio::time::timeout(Duration::from_millis(50), registry.acquire("http://a")).await;
        assert!(blocked.is_err());

        let waiter = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                let _guard = registry.acquire("http://a").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(first);

        waiter.await.unwrap();
        assert!(registry.is_empty());
    }
}

//! Fetch Cache Module
//!
//! Cache-through layer in front of a `Fetcher`. Pages live under
//! `cache:<url>` with a TTL, and every request bumps `count:<url>`, hit or
//! miss.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::value;
use crate::error::Result;
use crate::fetch::{Fetcher, InFlight};
use crate::store::KeyValueStore;

/// Prefix of the key holding a cached page.
pub const CACHE_PREFIX: &str = "cache:";
/// Prefix of the key counting requests for a page.
pub const COUNT_PREFIX: &str = "count:";
/// Page TTL in seconds unless configured otherwise.
pub const DEFAULT_CACHE_EXPIRATION: u64 = 10;

pub fn cache_key(url: &str) -> String {
    format!("{CACHE_PREFIX}{url}")
}

pub fn count_key(url: &str) -> String {
    format!("{COUNT_PREFIX}{url}")
}

// == Fetch Cache ==
/// Serves pages from the store while fresh, fetching and caching on miss.
///
/// Without single-flight, concurrent misses for one URL each fetch and the
/// last write wins. With it, they queue behind one fetch.
pub struct FetchCache<S: ?Sized, F: ?Sized> {
    store: Arc<S>,
    fetcher: Arc<F>,
    /// Page TTL in seconds
    expiration: u64,
    in_flight: Option<InFlight>,
}

impl<S, F> FetchCache<S, F>
where
    S: KeyValueStore + ?Sized,
    F: Fetcher + ?Sized,
{
    // == Constructor ==
    pub fn new(store: Arc<S>, fetcher: Arc<F>) -> Self {
        Self {
            store,
            fetcher,
            expiration: DEFAULT_CACHE_EXPIRATION,
            in_flight: None,
        }
    }

    /// Sets the page TTL in seconds. The store rejects 0, or a TTL too far out
    /// for the clock, on the first miss.
    pub fn with_expiration(mut self, expiration_secs: u64) -> Self {
        self.expiration = expiration_secs;
        self
    }

    /// Collapses concurrent misses for the same URL into a single fetch.
    pub fn with_single_flight(mut self) -> Self {
        self.in_flight = Some(InFlight::new());
        self
    }

    pub fn expiration(&self) -> u64 {
        self.expiration
    }

    // == Get Page ==
    /// Returns the page for `url`, from cache when fresh.
    ///
    /// Counts the request exactly once. On a miss the page is written before
    /// the count. A failed fetch caches nothing, counts nothing, and is
    /// returned as `CacheError::Fetch`.
    pub async fn get_page(&self, url: &str) -> Result<String> {
        if let Some(page) = self.cached(url).await? {
            self.record_access(url, "hit").await?;
            return Ok(page);
        }

        let page = match &self.in_flight {
            Some(in_flight) => {
                let _slot = in_flight.acquire(url).await;
                // Another task may have filled the cache while we waited
                if let Some(page) = self.cached(url).await? {
                    self.record_access(url, "hit").await?;
                    return Ok(page);
                }
                self.fill(url).await?
            }
            None => self.fill(url).await?,
        };

        self.record_access(url, "miss").await?;
        Ok(page)
    }

    // == Access Count ==
    /// Number of `get_page` calls counted for `url`; 0 if none.
    pub async fn access_count(&self, url: &str) -> Result<i64> {
        match self.store.get(&count_key(url)).await? {
            Some(raw) => Ok(value::int(&raw)?),
            None => Ok(0),
        }
    }

    async fn cached(&self, url: &str) -> Result<Option<String>> {
        match self.store.get(&cache_key(url)).await? {
            Some(raw) => Ok(Some(value::utf8(&raw)?)),
            None => Ok(None),
        }
    }

    async fn fill(&self, url: &str) -> Result<String> {
        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(err) => {
                warn!(url, error = %err, "fetch failed, nothing cached");
                return Err(err.into());
            }
        };

        self.store
            .setex(&cache_key(url), page.clone().into_bytes(), self.expiration)
            .await?;
        Ok(page)
    }

    async fn record_access(&self, url: &str, outcome: &'static str) -> Result<()> {
        let count = self.store.incr(&count_key(url)).await?;
        debug!(url, outcome, count, "page access");
        Ok(())
    }
}

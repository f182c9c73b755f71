//! Fetch Module
//!
//! Page fetching and the TTL cache in front of it.

mod fetcher;
mod page_cache;
mod single_flight;

#[cfg(test)]
pub use fetcher::MockFetcher;
pub use fetcher::{Fetcher, HttpFetcher};
pub use page_cache::{
    cache_key, count_key, FetchCache, CACHE_PREFIX, COUNT_PREFIX, DEFAULT_CACHE_EXPIRATION,
};
pub use single_flight::{InFlight, InFlightGuard};

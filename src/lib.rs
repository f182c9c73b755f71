//! Mini Cache - An in-process caching core
//!
//! Typed key-value storage with generated keys, call counting, and a
//! cache-through page fetcher with TTL expiration and access counting, all on
//! top of an injected key-value store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::{CallCounter, TypedCache, Value};
pub use config::Config;
pub use error::{CacheError, DecodeError, FetchError, Result, StoreError};
pub use fetch::{FetchCache, Fetcher, HttpFetcher};
pub use store::{KeyValueStore, MemoryStore};
pub use tasks::spawn_cleanup_task;

//! API Handlers
//!
//! HTTP request handlers exposing the typed cache and the page cache.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::TypedCache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::fetch::{FetchCache, Fetcher, HttpFetcher};
use crate::models::{
    CountResponse, FlushResponse, GetQuery, GetResponse, HealthResponse, PageQuery, PageResponse,
    StatsResponse, StoreRequest, StoreResponse, ValueKind,
};
use crate::store::{KeyValueStore, MemoryStore};

/// Page cache over the in-memory store and any fetcher.
pub type PageCache = FetchCache<MemoryStore, dyn Fetcher>;

/// Application state shared across all handlers.
///
/// Both caches share one store, so page entries, counters and typed values
/// live in the same keyspace.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub cache: Arc<TypedCache<MemoryStore>>,
    pub pages: Arc<PageCache>,
}

impl AppState {
    /// Wires the caches around `store` and `fetcher`.
    ///
    /// `store()` calls are counted; page TTL and single-flight follow
    /// `config`.
    pub fn new(store: Arc<MemoryStore>, fetcher: Arc<dyn Fetcher>, config: &Config) -> Self {
        let cache = TypedCache::new(Arc::clone(&store)).with_call_counting();

        let mut pages =
            FetchCache::new(Arc::clone(&store), fetcher).with_expiration(config.cache_expiration);
        if config.single_flight {
            pages = pages.with_single_flight();
        }

        Self {
            store,
            cache: Arc::new(cache),
            pages: Arc::new(pages),
        }
    }

    /// Creates a new AppState from configuration, fetching over HTTP.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = Arc::new(MemoryStore::new(config.max_entries));
        let fetcher = Arc::new(HttpFetcher::new(config.fetch_timeout)?);
        Ok(Self::new(store, fetcher, config))
    }
}

/// Handler for POST /store
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    let key = state.cache.store(req.value).await?;
    Ok(Json(StoreResponse::new(key)))
}

/// Handler for GET /get/:key
///
/// `?as=int` and `?as=float` decode numerically; the default is a string.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<GetQuery>,
) -> Result<Json<GetResponse>> {
    let value: Option<serde_json::Value> = match query.kind {
        ValueKind::Str => state.cache.get_str(&key).await?.map(Into::into),
        ValueKind::Int => state.cache.get_int(&key).await?.map(Into::into),
        ValueKind::Float => state.cache.get_float(&key).await?.map(Into::into),
    };

    match value {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /page?url=...
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let content = state.pages.get_page(&query.url).await?;
    let count = state.pages.access_count(&query.url).await?;

    Ok(Json(PageResponse {
        url: query.url,
        content,
        count,
    }))
}

/// Handler for GET /count?url=...
pub async fn count_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CountResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let count = state.pages.access_count(&query.url).await?;
    Ok(Json(CountResponse {
        url: query.url,
        count,
    }))
}

/// Handler for POST /flush
pub async fn flush_handler(State(state): State<AppState>) -> Result<Json<FlushResponse>> {
    state.store.flush_all().await?;
    Ok(Json(FlushResponse::flushed()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = state.store.stats().await;
    let store_calls = state.cache.store_calls().await?;
    Ok(Json(StatsResponse::new(&stats, store_calls)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

//! Error types for the caching core
//!
//! Provides unified error handling using thiserror. Each layer has its own
//! error enum; `CacheError` is the crate-level union returned to callers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Failure reported by a key-value store adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Key is longer than the store accepts
    #[error("Key exceeds maximum length of {0} bytes")]
    KeyTooLong(usize),

    /// Value is larger than the store accepts
    #[error("Value exceeds maximum size of {0} bytes")]
    ValueTooLarge(usize),

    /// TTL of zero, or too large for the clock, passed to setex
    #[error("Invalid expire time: {0}")]
    InvalidExpire(u64),

    /// incr on a value that does not hold a decimal integer
    #[error("Value at key '{0}' is not an integer")]
    NotAnInteger(String),

    /// incr would overflow a signed 64-bit counter
    #[error("Increment of key '{0}' would overflow")]
    Overflow(String),

    /// Store is at capacity and nothing could be evicted
    #[error("Store is full and eviction failed")]
    Full,

    /// Backing store could not be reached or rejected the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// == Decode Error Enum ==
/// Failure interpreting stored bytes as a typed value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Value is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    #[error("Value is not an integer: {0:?}")]
    NotAnInteger(String),

    #[error("Value is not a float: {0:?}")]
    NotAFloat(String),

    /// Raised by caller-supplied decode functions
    #[error("{0}")]
    Custom(String),
}

// == Fetch Error Enum ==
/// Failure obtaining page content from the fetch collaborator.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, timeout, body read)
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-2xx status
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Any other fetcher-specific failure
    #[error("{0}")]
    Other(String),
}

// == Cache Error Enum ==
/// Unified error type for the caching core.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl CacheError {
    /// HTTP status used when the error crosses the API boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Store(err) => match err {
                StoreError::KeyTooLong(_)
                | StoreError::ValueTooLarge(_)
                | StoreError::InvalidExpire(_) => StatusCode::BAD_REQUEST,
                StoreError::NotAnInteger(_) | StoreError::Overflow(_) => StatusCode::CONFLICT,
                StoreError::Full | StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            CacheError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::Fetch(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching core.
pub type Result<T> = std::result::Result<T, CacheError>;

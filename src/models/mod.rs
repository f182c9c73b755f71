//! Request and Response models for the cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{GetQuery, PageQuery, ScalarValue, StoreRequest, ValueKind};
pub use responses::{
    CountResponse, ErrorResponse, FlushResponse, GetResponse, HealthResponse, PageResponse,
    StatsResponse, StoreResponse,
};

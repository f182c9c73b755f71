//! API Module
//!
//! HTTP handlers and routing exposing the caching core.
//!
//! # Endpoints
//! - `POST /store` - Store a scalar under a fresh key
//! - `GET /get/:key` - Retrieve a value by key
//! - `GET /page?url=` - Fetch a page through the cache
//! - `GET /count?url=` - Access count for a page
//! - `POST /flush` - Remove every key
//! - `GET /stats` - Store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

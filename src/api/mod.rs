//! API Module
//!
//! HTTP handlers and routing exposing the cache registry.
//!
//! # Endpoints
//! - `PUT /api-cache`, `DELETE /api-cache` - Cache / clear API responses
//! - `POST /api-cache/get` - Look up a cached response
//! - `POST /api-cache/invalidate` - Drop a cached response
//! - `PUT /images/:key`, `GET /images/:key` - Image payloads
//! - `POST /images/cleanup` - Flush the image cache
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

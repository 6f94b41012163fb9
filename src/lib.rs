//! Layered Cache - two-tier client cache
//!
//! Memory and persistent caches with TTL expiry, an image cache with a memory
//! budget, an API response cache keyed by endpoint and parameters, and a
//! cache-aside helper.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod store;

pub use api::AppState;
pub use cache::{with_cache, ApiCache, CacheOptions, ImageCache, ImageOptions};
pub use config::Config;
pub use registry::CacheRegistry;
pub use store::{FileStore, KeyValueStore, MemoryStore};

//! Cache Module
//!
//! Memory, persistent, image and API response caches plus the cache-aside
//! helper. Reads check the memory tier first, then the persistent tier.

mod aside;
mod entry;
mod memory;
mod order;
mod stats;

pub mod api_response;
pub mod image;
pub mod persistent;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use api_response::{ApiCache, ApiCacheConfig};
pub use aside::{with_cache, CacheOptions};
pub use entry::{current_timestamp_ms, CacheEntry, PersistedEntry};
pub use image::{estimate_size, ImageCache, ImageCacheConfig, ImageOptions};
pub use memory::MemoryCache;
pub use order::InsertionOrder;
pub use persistent::PersistentCache;
pub use stats::CacheStats;

pub use memory::{DEFAULT_MAX_SIZE, DEFAULT_TTL};

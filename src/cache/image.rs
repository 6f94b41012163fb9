//! Image Cache Module
//!
//! Two-tier cache for artwork and avatar payloads with an aggregate memory
//! budget. Exceeding the budget flushes both tiers entirely.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::cache::{MemoryCache, PersistentCache};
use crate::store::KeyValueStore;

/// Namespace of the image persistent tier.
pub const IMAGE_NAMESPACE: &str = "image_cache";

// == Configuration ==
#[derive(Debug, Clone)]
pub struct ImageCacheConfig {
    /// Entry limit of the memory tier
    pub memory_max_size: usize,
    /// TTL of memory-tier entries
    pub memory_ttl: Duration,
    /// Budget for the estimated in-memory size, in bytes
    pub max_memory_size: usize,
    /// TTL of persisted images
    pub persist_ttl: Duration,
}

impl Default for ImageCacheConfig {
    fn default() -> Self {
        Self {
            memory_max_size: 50,
            memory_ttl: Duration::from_secs(30 * 60),
            max_memory_size: 50 * 1024 * 1024,
            persist_ttl: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

/// Per-call options for [`ImageCache::set_image`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageOptions {
    /// Also write to the persistent tier
    pub persist: bool,
    /// Requested encode quality; accepted for callers, not applied to data
    pub quality: f32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            persist: false,
            quality: 0.8,
        }
    }
}

struct MemoryTier {
    cache: MemoryCache<Value>,
    current_size: usize,
}

// == Image Cache ==
pub struct ImageCache {
    memory: Mutex<MemoryTier>,
    persistent: PersistentCache,
    config: ImageCacheConfig,
}

impl ImageCache {
    pub fn new(store: Arc<dyn KeyValueStore>, config: ImageCacheConfig) -> Self {
        Self {
            memory: Mutex::new(MemoryTier {
                cache: MemoryCache::new(config.memory_max_size, config.memory_ttl),
                current_size: 0,
            }),
            persistent: PersistentCache::new(store, IMAGE_NAMESPACE),
            config,
        }
    }

    // == Set Image ==
    /// Caches `data` in memory, and on disk when `options.persist` is set.
    ///
    /// The size estimate grows by [`estimate_size`] on every call, including
    /// overwrites, and never shrinks on eviction. Once it exceeds the budget
    /// the whole cache is flushed.
    pub async fn set_image<T: Serialize + ?Sized>(&self, key: &str, data: &T, options: ImageOptions) {
        let value = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(e) => {
                error!(key, error = %e, "Image cache set: serialization failed");
                return;
            }
        };
        let size = estimate_size(&value);

        self.memory.lock().await.cache.set(key, value.clone(), None);

        if options.persist {
            self.persistent
                .set(key, &value, Some(self.config.persist_ttl))
                .await;
        }

        let over_budget = {
            let mut memory = self.memory.lock().await;
            memory.current_size = memory.current_size.saturating_add(size);
            memory.current_size > self.config.max_memory_size
        };

        debug!(key, size, persist = options.persist, quality = options.quality, "Image cached");

        if over_budget {
            info!(
                max_memory_size = self.config.max_memory_size,
                "Image cache over memory budget, flushing"
            );
            self.cleanup().await;
        }
    }

    // == Get Image ==
    /// Looks up the memory tier, then the persistent tier. Persistent hits
    /// are copied into memory before returning, expiring no later than the
    /// persisted entry.
    pub async fn get_image<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let cached = self.memory.lock().await.cache.get(key);
        if let Some(value) = cached {
            match serde_json::from_value(value) {
                Ok(image) => return Some(image),
                Err(e) => warn!(key, error = %e, "Image cache memory entry has unexpected shape"),
            }
        }

        let (value, remaining): (Value, Duration) = self.persistent.get_with_ttl(key).await?;
        {
            let mut memory = self.memory.lock().await;
            let ttl = remaining.min(memory.cache.default_ttl());
            memory.cache.set(key, value.clone(), Some(ttl));
        }
        debug!(key, "Image promoted from persistent tier");

        match serde_json::from_value(value) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(key, error = %e, "Image cache persisted entry has unexpected shape");
                None
            }
        }
    }

    // == Cleanup ==
    /// Flushes both tiers and resets the size estimate.
    pub async fn cleanup(&self) {
        {
            let mut memory = self.memory.lock().await;
            memory.cache.clear();
            memory.current_size = 0;
        }
        self.persistent.clear().await;
    }

    /// Current estimated memory footprint in bytes.
    pub async fn memory_usage(&self) -> usize {
        self.memory.lock().await.current_size
    }

    pub async fn memory_stats(&self) -> crate::cache::CacheStats {
        self.memory.lock().await.cache.stats()
    }

    pub async fn persistent_size(&self) -> usize {
        self.persistent.size().await
    }

    pub fn config(&self) -> &ImageCacheConfig {
        &self.config
    }
}

// == Size Estimate ==
/// Estimated footprint of a cached value: serialized length times two.
///
/// A deliberate over-approximation (two bytes per character), not an exact
/// byte count.
pub fn estimate_size(value: &Value) -> usize {
    serde_json::to_string(value).map_or(0, |s| s.len().saturating_mul(2))
}

//! Cache Registry
//!
//! Owns the shared key-value store and one instance of each cache. Built once
//! by the application's wiring and passed down explicitly.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::cache::{ApiCache, CacheStats, ImageCache, MemoryCache, PersistentCache};
use crate::config::Config;
use crate::error::StorageResult;
use crate::store::{FileStore, KeyValueStore, MemoryStore};

/// Shared handles to every cache built from one [`Config`].
#[derive(Clone)]
pub struct CacheRegistry {
    store: Arc<dyn KeyValueStore>,
    pub api: Arc<ApiCache>,
    pub images: Arc<ImageCache>,
    config: Config,
}

/// Point-in-time view of the registry's caches.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStats {
    pub api_memory: CacheStats,
    pub api_persistent_entries: usize,
    pub image_memory: CacheStats,
    pub image_memory_bytes: usize,
    pub image_max_memory_bytes: usize,
    pub image_persistent_entries: usize,
}

impl CacheRegistry {
    /// Builds every cache over `store`.
    pub fn new(store: Arc<dyn KeyValueStore>, config: Config) -> Self {
        Self {
            api: Arc::new(ApiCache::new(store.clone(), config.api.clone())),
            images: Arc::new(ImageCache::new(store.clone(), config.image.clone())),
            store,
            config,
        }
    }

    /// Opens the store named by `config.store_path` (in-memory when unset)
    /// and builds the registry over it.
    pub async fn from_config(config: Config) -> StorageResult<Self> {
        let store: Arc<dyn KeyValueStore> = match &config.store_path {
            Some(path) => Arc::new(FileStore::open(path).await?),
            None => {
                info!("No STORE_PATH set, persistent tier kept in memory");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self::new(store, config))
    }

    /// A new standalone memory cache using the configured limits.
    pub fn memory_cache<T: Clone>(&self) -> MemoryCache<T> {
        MemoryCache::new(self.config.memory_max_size, self.config.memory_ttl)
    }

    /// A new persistent cache over the shared store.
    ///
    /// `namespace` must differ from every other cache on the store, including
    /// `api_cache` and `image_cache`.
    pub fn persistent_cache(&self, namespace: &str) -> PersistentCache {
        PersistentCache::with_ttl(self.store.clone(), namespace, self.config.persistent_ttl)
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // == Clear All ==
    /// Flushes the API and image caches.
    pub async fn clear_all(&self) {
        self.api.clear().await;
        self.images.cleanup().await;
        info!("All caches cleared");
    }

    // == Stats ==
    pub async fn stats(&self) -> RegistryStats {
        RegistryStats {
            api_memory: self.api.memory_stats().await,
            api_persistent_entries: self.api.persistent_size().await,
            image_memory: self.images.memory_stats().await,
            image_memory_bytes: self.images.memory_usage().await,
            image_max_memory_bytes: self.images.config().max_memory_size,
            image_persistent_entries: self.images.persistent_size().await,
        }
    }
}

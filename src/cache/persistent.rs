//! Persistent Cache Module
//!
//! Namespaced TTL cache layered on a [`KeyValueStore`]. Every failure is
//! logged and swallowed: reads degrade to a miss, writes to a no-op.
//!
//! Expiry is only checked when an entry is read. Expired entries nobody reads
//! stay in the store until `clear`.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};

use crate::cache::PersistedEntry;
use crate::store::KeyValueStore;

/// Default time-to-live for persisted entries.
pub const DEFAULT_PERSISTENT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

// == Persistent Cache ==
/// Durable cache whose keys are stored as `"{namespace}_{key}"`.
///
/// Namespaces must be unique per logical cache sharing a store; nothing checks
/// this at runtime.
#[derive(Clone)]
pub struct PersistentCache {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
    default_ttl: Duration,
}

impl PersistentCache {
    /// Creates a cache over `store` using the 24-hour default TTL.
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self::with_ttl(store, namespace, DEFAULT_PERSISTENT_TTL)
    }

    pub fn with_ttl(
        store: Arc<dyn KeyValueStore>,
        namespace: impl Into<String>,
        default_ttl: Duration,
    ) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            default_ttl,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}_{}", self.namespace, key)
    }

    fn prefix(&self) -> String {
        format!("{}_", self.namespace)
    }

    // == Set ==
    /// Serializes `value` and writes it with `ttl` (or the default TTL).
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        let raw = match encode(value, ttl.unwrap_or(self.default_ttl)) {
            Ok(raw) => raw,
            Err(e) => {
                error!(namespace = %self.namespace, key, error = %e, "Persistent cache set: serialization failed");
                return;
            }
        };

        if let Err(e) = self.store.set_item(&self.storage_key(key), raw).await {
            error!(namespace = %self.namespace, key, error = %e, "Persistent cache set failed");
        }
    }

    // == Get ==
    /// Reads and decodes `key`.
    ///
    /// Returns `None` when absent, unreadable or expired. Expired entries are
    /// deleted; corrupt entries are left in place.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_with_ttl(key).await.map(|(value, _)| value)
    }

    /// Like [`get`](Self::get), also returning the time left before the
    /// stored entry expires.
    pub async fn get_with_ttl<T: DeserializeOwned>(&self, key: &str) -> Option<(T, Duration)> {
        let storage_key = self.storage_key(key);

        let raw = match self.store.get_item(&storage_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!(namespace = %self.namespace, key, error = %e, "Persistent cache get failed");
                return None;
            }
        };

        let entry: PersistedEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(namespace = %self.namespace, key, error = %e, "Persistent cache entry is corrupt");
                return None;
            }
        };

        if entry.is_expired() {
            debug!(namespace = %self.namespace, key, "Persistent cache entry expired");
            self.delete(key).await;
            return None;
        }

        match serde_json::from_str(&entry.value) {
            Ok(value) => Some((value, entry.remaining_ttl())),
            Err(e) => {
                warn!(namespace = %self.namespace, key, error = %e, "Persistent cache value could not be decoded");
                None
            }
        }
    }

    // == Delete ==
    pub async fn delete(&self, key: &str) {
        if let Err(e) = self.store.remove_item(&self.storage_key(key)).await {
            error!(namespace = %self.namespace, key, error = %e, "Persistent cache delete failed");
        }
    }

    // == Clear ==
    /// Removes every key in this namespace with one batched removal.
    pub async fn clear(&self) {
        let keys = match self.namespaced_keys().await {
            Some(keys) => keys,
            None => return,
        };

        if keys.is_empty() {
            return;
        }

        let count = keys.len();
        match self.store.multi_remove(&keys).await {
            Ok(()) => debug!(namespace = %self.namespace, count, "Persistent cache cleared"),
            Err(e) => error!(namespace = %self.namespace, error = %e, "Persistent cache clear failed"),
        }
    }

    // == Size ==
    /// Number of stored keys in this namespace, expired or not.
    pub async fn size(&self) -> usize {
        self.namespaced_keys().await.map_or(0, |keys| keys.len())
    }

    async fn namespaced_keys(&self) -> Option<Vec<String>> {
        let prefix = self.prefix();
        match self.store.get_all_keys().await {
            Ok(keys) => Some(keys.into_iter().filter(|k| k.starts_with(&prefix)).collect()),
            Err(e) => {
                error!(namespace = %self.namespace, error = %e, "Persistent cache key listing failed");
                None
            }
        }
    }
}

impl std::fmt::Debug for PersistentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentCache")
            .field("namespace", &self.namespace)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

fn encode<T: Serialize + ?Sized>(value: &T, ttl: Duration) -> serde_json::Result<String> {
    let entry = PersistedEntry::new(serde_json::to_string(value)?, ttl);
    serde_json::to_string(&entry)
}

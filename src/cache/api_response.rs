//! API Response Cache Module
//!
//! Memoizes endpoint responses in a memory tier backed by a persistent tier,
//! keyed by a canonical `(endpoint, params)` signature.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache::{CacheStats, MemoryCache, PersistentCache};
use crate::store::KeyValueStore;

/// Namespace of the API response persistent tier.
pub const API_NAMESPACE: &str = "api_cache";

/// Default TTL for cached responses.
pub const DEFAULT_API_TTL: Duration = Duration::from_secs(5 * 60);

// == Configuration ==
#[derive(Debug, Clone)]
pub struct ApiCacheConfig {
    /// Entry limit of the memory tier
    pub memory_max_size: usize,
    /// TTL used for memory entries promoted from the persistent tier
    pub memory_ttl: Duration,
    /// TTL used by `set` when none is given
    pub default_ttl: Duration,
}

impl Default for ApiCacheConfig {
    fn default() -> Self {
        Self {
            memory_max_size: 100,
            memory_ttl: DEFAULT_API_TTL,
            default_ttl: DEFAULT_API_TTL,
        }
    }
}

// == Api Cache ==
pub struct ApiCache {
    memory: Mutex<MemoryCache<Value>>,
    persistent: PersistentCache,
    default_ttl: Duration,
}

impl ApiCache {
    pub fn new(store: Arc<dyn KeyValueStore>, config: ApiCacheConfig) -> Self {
        Self {
            memory: Mutex::new(MemoryCache::new(config.memory_max_size, config.memory_ttl)),
            persistent: PersistentCache::new(store, API_NAMESPACE),
            default_ttl: config.default_ttl,
        }
    }

    // == Generate Key ==
    /// Builds `"{endpoint}_{params}"` where `params` is the JSON of the
    /// parameters with top-level keys sorted.
    ///
    /// Parameters that are not a JSON object (including `()`/`null`) are
    /// treated as an empty parameter set.
    pub fn generate_key<P: Serialize + ?Sized>(endpoint: &str, params: &P) -> String {
        let sorted: BTreeMap<String, Value> = match serde_json::to_value(params) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            Ok(_) => BTreeMap::new(),
            Err(e) => {
                warn!(endpoint, error = %e, "API cache params could not be serialized");
                BTreeMap::new()
            }
        };
        let params = serde_json::to_string(&sorted).unwrap_or_else(|_| "{}".to_string());
        format!("{}_{}", endpoint, params)
    }

    // == Get ==
    pub async fn get<P, T>(&self, endpoint: &str, params: &P) -> Option<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.get_by_key(&Self::generate_key(endpoint, params)).await
    }

    // == Set ==
    /// Caches `data` in both tiers. `ttl` defaults to five minutes.
    pub async fn set<P, T>(&self, endpoint: &str, params: &P, data: &T, ttl: Option<Duration>)
    where
        P: Serialize + ?Sized,
        T: Serialize + ?Sized,
    {
        self.set_by_key(&Self::generate_key(endpoint, params), data, ttl)
            .await
    }

    // == Invalidate ==
    /// Drops the cached response for `(endpoint, params)` from both tiers.
    pub async fn invalidate<P: Serialize + ?Sized>(&self, endpoint: &str, params: &P) {
        self.invalidate_key(&Self::generate_key(endpoint, params))
            .await
    }

    // == Clear ==
    pub async fn clear(&self) {
        self.memory.lock().await.clear();
        self.persistent.clear().await;
    }

    // == Keyed Access ==
    /// Looks up a precomputed key: memory tier first, then the persistent
    /// tier, copying persistent hits into memory.
    ///
    /// A promoted entry never outlives the persisted expiry.
    pub async fn get_by_key<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let cached = self.memory.lock().await.get(key);
        if let Some(value) = cached {
            debug!(key, "API cache memory hit");
            return decode(key, value);
        }

        let (value, remaining): (Value, Duration) = self.persistent.get_with_ttl(key).await?;
        debug!(key, remaining_ms = remaining.as_millis() as u64, "API cache persistent hit");
        let mut memory = self.memory.lock().await;
        let ttl = remaining.min(memory.default_ttl());
        memory.set(key, value.clone(), Some(ttl));
        drop(memory);
        decode(key, value)
    }

    pub async fn set_by_key<T: Serialize + ?Sized>(&self, key: &str, data: &T, ttl: Option<Duration>) {
        let value = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "API cache set: serialization failed");
                return;
            }
        };
        let ttl = ttl.unwrap_or(self.default_ttl);

        self.memory.lock().await.set(key, value.clone(), Some(ttl));
        self.persistent.set(key, &value, Some(ttl)).await;
    }

    pub async fn invalidate_key(&self, key: &str) {
        self.memory.lock().await.delete(key);
        self.persistent.delete(key).await;
    }

    pub async fn memory_stats(&self) -> CacheStats {
        self.memory.lock().await.stats()
    }

    pub async fn persistent_size(&self) -> usize {
        self.persistent.size().await
    }
}

fn decode<T: DeserializeOwned>(key: &str, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(data) => Some(data),
        Err(e) => {
            warn!(key, error = %e, "API cache entry has unexpected shape");
            None
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{CountingStore, FailingStore};
    use crate::store::MemoryStore;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct SearchParams<'a> {
        q: &'a str,
        limit: u32,
    }

    fn cache() -> ApiCache {
        ApiCache::new(Arc::new(MemoryStore::new()), ApiCacheConfig::default())
    }

    #[test]
    fn test_generate_key_format() {
        assert_eq!(
            ApiCache::generate_key("search", &json!({"q": "a", "limit": 5})),
            r#"search_{"limit":5,"q":"a"}"#
        );
        assert_eq!(ApiCache::generate_key("tracks", &()), "tracks_{}");
    }

    #[test]
    fn test_generate_key_ignores_param_order() {
        let a = ApiCache::generate_key("search", &json!({"q": "a", "limit": 5}));
        let b = ApiCache::generate_key("search", &json!({"limit": 5, "q": "a"}));
        let c = ApiCache::generate_key("search", &SearchParams { q: "a", limit: 5 });
        let d = ApiCache::generate_key("search", &json!({"q": "a", "limit": 6}));

        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_generate_key_depends_on_endpoint() {
        let params = json!({"q": "rock"});
        assert_ne!(
            ApiCache::generate_key("music/search", &params),
            ApiCache::generate_key("music/albums", &params)
        );
    }

    #[tokio::test]
    async fn test_set_get_scenario() {
        let cache = cache();
        let tracks = json!({"tracks": [{"id": "1", "name": "Song"}, {"id": "2", "name": "Other"}]});

        cache
            .set("music/search", &json!({"q": "rock"}), &tracks, Some(Duration::from_millis(100)))
            .await;

        let hit: Option<Value> = cache.get("music/search", &json!({"q": "rock"})).await;
        assert_eq!(hit, Some(tracks));

        tokio::time::sleep(Duration::from_millis(150)).await;

        let miss: Option<Value> = cache.get("music/search", &json!({"q": "rock"})).await;
        assert_eq!(miss, None);
        assert_eq!(cache.persistent_size().await, 0);
    }

    #[tokio::test]
    async fn test_persistent_hit_promotes_to_memory() {
        let store = Arc::new(CountingStore::new());
        let writer = ApiCache::new(store.clone(), ApiCacheConfig::default());
        writer.set("albums", &json!({"id": 3}), &json!(["a", "b"]), None).await;

        let reader = ApiCache::new(store.clone(), ApiCacheConfig::default());

        let first: Option<Vec<String>> = reader.get("albums", &json!({"id": 3})).await;
        assert_eq!(first, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(store.gets(), 1);
        assert_eq!(reader.memory_stats().await.total_entries, 1);

        let second: Option<Vec<String>> = reader.get("albums", &json!({"id": 3})).await;
        assert_eq!(second, first);
        assert_eq!(store.gets(), 1);
    }

    #[tokio::test]
    async fn test_promoted_entry_keeps_persisted_expiry() {
        let config = ApiCacheConfig {
            memory_max_size: 1,
            ..ApiCacheConfig::default()
        };
        let cache = ApiCache::new(Arc::new(MemoryStore::new()), config);
        let params = json!({"q": "rock"});

        cache
            .set("music/search", &params, &json!(["t"]), Some(Duration::from_millis(200)))
            .await;
        // Pushes the search result out of the single memory slot
        cache.set("other", &(), &json!(1), None).await;

        let promoted: Option<Value> = cache.get("music/search", &params).await;
        assert_eq!(promoted, Some(json!(["t"])));

        tokio::time::sleep(Duration::from_millis(400)).await;

        let after_ttl: Option<Value> = cache.get("music/search", &params).await;
        assert_eq!(after_ttl, None);
    }

    #[tokio::test]
    async fn test_invalidate_removes_both_tiers() {
        let store = Arc::new(MemoryStore::new());
        let cache = ApiCache::new(store.clone(), ApiCacheConfig::default());
        cache.set("playlist", &json!({"id": 1}), &json!("v1"), None).await;
        cache.set("playlist", &json!({"id": 2}), &json!("v2"), None).await;

        cache.invalidate("playlist", &json!({"id": 1})).await;

        assert_eq!(cache.get::<_, String>("playlist", &json!({"id": 1})).await, None);
        assert_eq!(
            cache.get::<_, String>("playlist", &json!({"id": 2})).await.as_deref(),
            Some("v2")
        );
        assert_eq!(cache.persistent_size().await, 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = Arc::new(MemoryStore::new());
        store.set_item("image_cache_x", "{}".to_string()).await.unwrap();
        let cache = ApiCache::new(store.clone(), ApiCacheConfig::default());
        cache.set("a", &(), &1, None).await;
        cache.set("b", &(), &2, None).await;

        cache.clear().await;

        assert_eq!(cache.memory_stats().await.total_entries, 0);
        assert_eq!(cache.persistent_size().await, 0);
        assert!(store.get_item("image_cache_x").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failing_store_degrades_to_memory_only() {
        let cache = ApiCache::new(Arc::new(FailingStore), ApiCacheConfig::default());

        cache.set("a", &(), &json!({"ok": true}), None).await;

        assert_eq!(cache.get::<_, Value>("a", &()).await, Some(json!({"ok": true})));
        assert_eq!(cache.get::<_, Value>("b", &()).await, None);
    }
}

//! Cache-aside helper.

use std::future::Future;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::cache::api_response::{ApiCache, DEFAULT_API_TTL};

/// Options for [`with_cache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    pub ttl: Duration,
    /// Skip the lookup and always call the fetcher
    pub force_refresh: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_API_TTL,
            force_refresh: false,
        }
    }
}

impl CacheOptions {
    pub fn refresh() -> Self {
        Self {
            force_refresh: true,
            ..Self::default()
        }
    }
}

// == With Cache ==
/// Returns the value cached under `key`, or awaits `fetcher`, caches its
/// output and returns it.
///
/// `key` is used verbatim; callers build it to be unique. A fetcher error is
/// returned unchanged and nothing is cached. Concurrent misses on the same key
/// each run their own fetcher.
pub async fn with_cache<T, E, F, Fut>(
    cache: &ApiCache,
    key: &str,
    fetcher: F,
    options: CacheOptions,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if !options.force_refresh {
        if let Some(cached) = cache.get_by_key(key).await {
            return Ok(cached);
        }
    }

    debug!(key, force_refresh = options.force_refresh, "Fetching for cache");
    let fresh = fetcher().await?;
    cache.set_by_key(key, &fresh, Some(options.ttl)).await;
    Ok(fresh)
}

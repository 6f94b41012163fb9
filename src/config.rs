//! Configuration Module
//!
//! Handles loading cache and server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{ApiCacheConfig, ImageCacheConfig};

/// Cache and server configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Entry limit of standalone memory caches
    pub memory_max_size: usize,
    /// Default TTL of standalone memory caches
    pub memory_ttl: Duration,
    /// Default TTL of standalone persistent caches
    pub persistent_ttl: Duration,
    /// API response cache settings
    pub api: ApiCacheConfig,
    /// Image cache settings
    pub image: ImageCacheConfig,
    /// Snapshot file of the durable store; `None` keeps everything in memory
    pub store_path: Option<PathBuf>,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMORY_MAX_SIZE` - Memory cache entry limit (default: 100)
    /// - `MEMORY_TTL_MS` - Memory cache TTL (default: 300000)
    /// - `PERSISTENT_TTL_MS` - Persistent cache TTL (default: 86400000)
    /// - `API_CACHE_MAX_SIZE` - API memory tier entry limit (default: 100)
    /// - `API_CACHE_TTL_MS` - API response TTL (default: 300000)
    /// - `IMAGE_MEMORY_MAX_SIZE` - Image memory tier entry limit (default: 50)
    /// - `IMAGE_MAX_MEMORY_BYTES` - Image memory budget (default: 52428800)
    /// - `IMAGE_PERSIST_TTL_MS` - Persisted image TTL (default: 604800000)
    /// - `STORE_PATH` - Durable store file (default: unset, in-memory store)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            memory_max_size: env_parse("MEMORY_MAX_SIZE").unwrap_or(defaults.memory_max_size),
            memory_ttl: env_millis("MEMORY_TTL_MS").unwrap_or(defaults.memory_ttl),
            persistent_ttl: env_millis("PERSISTENT_TTL_MS").unwrap_or(defaults.persistent_ttl),
            api: ApiCacheConfig {
                memory_max_size: env_parse("API_CACHE_MAX_SIZE")
                    .unwrap_or(defaults.api.memory_max_size),
                memory_ttl: env_millis("API_CACHE_TTL_MS").unwrap_or(defaults.api.memory_ttl),
                default_ttl: env_millis("API_CACHE_TTL_MS").unwrap_or(defaults.api.default_ttl),
            },
            image: ImageCacheConfig {
                memory_max_size: env_parse("IMAGE_MEMORY_MAX_SIZE")
                    .unwrap_or(defaults.image.memory_max_size),
                memory_ttl: defaults.image.memory_ttl,
                max_memory_size: env_parse("IMAGE_MAX_MEMORY_BYTES")
                    .unwrap_or(defaults.image.max_memory_size),
                persist_ttl: env_millis("IMAGE_PERSIST_TTL_MS")
                    .unwrap_or(defaults.image.persist_ttl),
            },
            store_path: env::var("STORE_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            server_port: env_parse("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory_max_size: crate::cache::DEFAULT_MAX_SIZE,
            memory_ttl: crate::cache::DEFAULT_TTL,
            persistent_ttl: crate::cache::persistent::DEFAULT_PERSISTENT_TTL,
            api: ApiCacheConfig::default(),
            image: ImageCacheConfig::default(),
            store_path: None,
            server_port: 3000,
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_millis(name: &str) -> Option<Duration> {
    env_parse::<u64>(name).map(Duration::from_millis)
}

//! Response DTOs for the cache service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::registry::RegistryStats;

/// Response body for cache reads.
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse {
    /// The cache key that was hit
    pub key: String,
    pub data: Value,
}

impl DataResponse {
    pub fn new(key: impl Into<String>, data: Value) -> Self {
        Self {
            key: key.into(),
            data,
        }
    }
}

/// Response body for cache writes, invalidations and flushes.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
    /// The affected key, if the operation targeted one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl MessageResponse {
    pub fn for_key(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            key: None,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: RegistryStats,
    /// Hit rate of the API memory tier
    pub api_hit_rate: f64,
    /// Hit rate of the image memory tier
    pub image_hit_rate: f64,
}

impl From<RegistryStats> for StatsResponse {
    fn from(stats: RegistryStats) -> Self {
        Self {
            api_hit_rate: stats.api_memory.hit_rate(),
            image_hit_rate: stats.image_memory.hit_rate(),
            stats,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

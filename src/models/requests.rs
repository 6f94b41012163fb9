//! Request DTOs for the cache service API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

/// Maximum accepted endpoint length in bytes.
pub const MAX_ENDPOINT_LENGTH: usize = 512;

fn validate_endpoint(endpoint: &str) -> Option<String> {
    if endpoint.is_empty() {
        return Some("Endpoint cannot be empty".to_string());
    }
    if endpoint.len() > MAX_ENDPOINT_LENGTH {
        return Some(format!(
            "Endpoint exceeds maximum length of {} characters",
            MAX_ENDPOINT_LENGTH
        ));
    }
    None
}

/// Body of `POST /api-cache/get` and `POST /api-cache/invalidate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeyRequest {
    pub endpoint: String,
    /// Request parameters; anything but an object counts as no parameters
    #[serde(default)]
    pub params: Value,
}

impl ApiKeyRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_endpoint(&self.endpoint)
    }
}

/// Body of `PUT /api-cache`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSetRequest {
    pub endpoint: String,
    #[serde(default)]
    pub params: Value,
    /// Response payload to cache
    pub data: Value,
    /// Optional TTL in milliseconds (five minutes if not specified)
    #[serde(default)]
    pub ttl_ms: Option<u64>,
}

impl ApiSetRequest {
    pub fn validate(&self) -> Option<String> {
        if let Some(msg) = validate_endpoint(&self.endpoint) {
            return Some(msg);
        }
        if self.ttl_ms == Some(0) {
            return Some("TTL must be greater than zero".to_string());
        }
        None
    }
}

/// Body of `PUT /images/:key`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageSetRequest {
    pub data: Value,
    #[serde(default)]
    pub persist: bool,
    #[serde(default)]
    pub quality: Option<f32>,
}

impl ImageSetRequest {
    pub fn validate(&self) -> Option<String> {
        match self.quality {
            Some(q) if !(0.0..=1.0).contains(&q) => {
                Some("Quality must be between 0 and 1".to_string())
            }
            _ => None,
        }
    }
}

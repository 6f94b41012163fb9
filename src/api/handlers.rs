//! API Handlers
//!
//! HTTP request handlers for each cache service endpoint.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::{ApiCache, ImageOptions};
use crate::error::{Result, ServiceError};
use crate::models::{
    ApiKeyRequest, ApiSetRequest, DataResponse, HealthResponse, ImageSetRequest, MessageResponse,
    StatsResponse,
};
use crate::registry::CacheRegistry;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub caches: CacheRegistry,
}

impl AppState {
    pub fn new(caches: CacheRegistry) -> Self {
        Self { caches }
    }
}

/// Handler for POST /api-cache/get
///
/// Looks up a cached response by `(endpoint, params)`.
pub async fn api_get_handler(
    State(state): State<AppState>,
    Json(req): Json<ApiKeyRequest>,
) -> Result<Json<DataResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ServiceError::InvalidRequest(error_msg));
    }

    let key = ApiCache::generate_key(&req.endpoint, &req.params);
    let data: Value = state
        .caches
        .api
        .get_by_key(&key)
        .await
        .ok_or_else(|| ServiceError::NotFound(key.clone()))?;

    Ok(Json(DataResponse::new(key, data)))
}

/// Handler for PUT /api-cache
///
/// Caches a response in both tiers.
pub async fn api_set_handler(
    State(state): State<AppState>,
    Json(req): Json<ApiSetRequest>,
) -> Result<Json<MessageResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ServiceError::InvalidRequest(error_msg));
    }

    let key = ApiCache::generate_key(&req.endpoint, &req.params);
    let ttl = req.ttl_ms.map(Duration::from_millis);
    state.caches.api.set_by_key(&key, &req.data, ttl).await;

    Ok(Json(MessageResponse::for_key("Response cached", key)))
}

/// Handler for POST /api-cache/invalidate
pub async fn api_invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<ApiKeyRequest>,
) -> Result<Json<MessageResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ServiceError::InvalidRequest(error_msg));
    }

    let key = ApiCache::generate_key(&req.endpoint, &req.params);
    state.caches.api.invalidate_key(&key).await;

    Ok(Json(MessageResponse::for_key("Response invalidated", key)))
}

/// Handler for DELETE /api-cache
pub async fn api_clear_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.caches.api.clear().await;
    Json(MessageResponse::new("API cache cleared"))
}

/// Handler for PUT /images/:key
pub async fn image_set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ImageSetRequest>,
) -> Result<Json<MessageResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ServiceError::InvalidRequest(error_msg));
    }

    let defaults = ImageOptions::default();
    let options = ImageOptions {
        persist: req.persist,
        quality: req.quality.unwrap_or(defaults.quality),
    };
    state.caches.images.set_image(&key, &req.data, options).await;

    Ok(Json(MessageResponse::for_key("Image cached", key)))
}

/// Handler for GET /images/:key
pub async fn image_get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DataResponse>> {
    let data: Value = state
        .caches
        .images
        .get_image(&key)
        .await
        .ok_or_else(|| ServiceError::NotFound(key.clone()))?;

    Ok(Json(DataResponse::new(key, data)))
}

/// Handler for POST /images/cleanup
pub async fn image_cleanup_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.caches.images.cleanup().await;
    Json(MessageResponse::new("Image cache cleared"))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.caches.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

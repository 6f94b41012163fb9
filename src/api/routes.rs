//! API Routes
//!
//! Configures the Axum router with all cache service endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    api_clear_handler, api_get_handler, api_invalidate_handler, api_set_handler,
    health_handler, image_cleanup_handler, image_get_handler, image_set_handler, stats_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /api-cache` - Cache a response
/// - `DELETE /api-cache` - Clear the API response cache
/// - `POST /api-cache/get` - Look up a response by endpoint and params
/// - `POST /api-cache/invalidate` - Drop a cached response
/// - `PUT /images/:key` - Cache an image payload
/// - `GET /images/:key` - Read an image payload
/// - `POST /images/cleanup` - Flush the image cache
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api-cache", put(api_set_handler).delete(api_clear_handler))
        .route("/api-cache/get", post(api_get_handler))
        .route("/api-cache/invalidate", post(api_invalidate_handler))
        .route("/images/cleanup", post(image_cleanup_handler))
        .route("/images/:key", put(image_set_handler).get(image_get_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Error types for the cache layers and the HTTP service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Storage Error Enum ==
/// Failure reported by a key-value store backend.
///
/// Cache layers never surface these to their callers; they log them and treat
/// the operation as a miss or a no-op.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying file or device I/O failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend-specific failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

// == Service Error Enum ==
/// Error type for the HTTP surface.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Key not present in the requested cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Aliases ==
/// Result returned by key-value store backends.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Result returned by HTTP handlers.
pub type Result<T> = std::result::Result<T, ServiceError>;

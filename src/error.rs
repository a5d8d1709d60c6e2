//! Error types for the book reviews service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Failures of the cache store.
///
/// These never reach a client: the cache-aside layer logs them and falls
/// through to the persistence store.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Store could not be reached
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// Call did not complete within the configured bound
    #[error("Cache call timed out after {0}ms")]
    Timeout(u64),

    /// Payload could not be encoded or decoded
    #[error("Cache payload codec error: {0}")]
    Codec(String),

    /// Store rejected the operation
    #[error("Cache internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Codec(err.to_string())
    }
}

// == Store Error Enum ==
/// Failures of the persistence store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness guard rejected the row
    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    /// The referenced parent row does not exist
    #[error("Missing parent entity: {0}")]
    MissingParent(String),

    /// Backend failure (connection, query, decoding)
    #[error("Store backend error: {0}")]
    Backend(String),
}

// == API Error Enum ==
/// Request outcome returned by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Client input missing or malformed
    #[error("{0}")]
    Validation(String),

    /// Referenced book or reviews absent
    #[error("{0}")]
    NotFound(String),

    /// Entity already exists
    #[error("{0}")]
    Conflict(String),

    /// Persistence failure
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => ApiError::Conflict("Book already exists".to_string()),
            StoreError::MissingParent(_) => ApiError::NotFound("Book not found".to_string()),
            other => ApiError::Store(other),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Store(err) => {
                tracing::error!(error = %err, "Request aborted by store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Aliases ==
/// Result type for handler-level operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Result type for persistence operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

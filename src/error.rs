//! Error types for the order pipeline
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Order Error Enum ==
/// Unified error type for ingestion, read-through and the HTTP layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Payload could not be decoded into an order
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Decoded order failed the structural checks
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Store write failed during ingestion
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    /// Order absent from both cache and store
    #[error("Order not found: {0}")]
    NotFound(String),

    /// Store read failed during read-through
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let status = match &self {
            OrderError::MalformedInput(_)
            | OrderError::ValidationFailed(_)
            | OrderError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            OrderError::NotFound(_) => StatusCode::NOT_FOUND,
            OrderError::PersistenceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            OrderError::Storage(_) | OrderError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the order pipeline.
pub type Result<T> = std::result::Result<T, OrderError>;

//! Error types for the key-value server
//!
//! Provides unified error handling using thiserror. `StoreError` never leaves
//! the store layer; `ApiError` is what HTTP handlers return.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Failures raised by a store transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A connection could not be opened
    #[error("Connection failed: {0}")]
    Connect(String),

    /// A statement failed on an open connection
    #[error("Query failed: {0}")]
    Query(String),

    /// No usable connection for this call
    #[error("Store unavailable")]
    Unavailable,
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

// == API Error Enum ==
/// Error type returned by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Key not found in cache or store
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The durable store rejected the write or could not be reached
    #[error("Store error: {0}")]
    Store(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

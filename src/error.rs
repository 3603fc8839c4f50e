//! Error types for the object store
//!
//! Provides unified error handling using thiserror. Failures render as the
//! same `{data, success, error}` envelope used for successful responses.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ApiResponse;

// == Store Error Enum ==
/// Unified error type for the object store and its HTTP surface.
///
/// The first four variants are produced by the storage core; the remaining
/// ones only by the request layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Missing object or collection
    #[error("Not found: {0}")]
    NotFound(String),

    /// Collection name collision on creation
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Collection registry is at capacity
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// Attempt to delete the default collection
    #[error("Protected resource: {0}")]
    ProtectedResource(String),

    /// Malformed or unsupported request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing or wrong credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl StoreError {
    /// HTTP status the request layer reports for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::AlreadyExists(_) => StatusCode::CONFLICT,
            StoreError::CapacityExceeded(_) => StatusCode::SERVICE_UNAVAILABLE,
            StoreError::ProtectedResource(_) => StatusCode::FORBIDDEN,
            StoreError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            StoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ApiResponse::from_error(&self));

        if let StoreError::Unauthorized(_) = self {
            let challenge = [(header::WWW_AUTHENTICATE, r#"Basic realm="Restricted""#)];
            return (status, challenge, body).into_response();
        }
        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the object store.
pub type Result<T> = std::result::Result<T, StoreError>;

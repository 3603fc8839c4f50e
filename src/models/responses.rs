//! Response DTOs for the store API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Result, StoreError};
use crate::models::base64_data;
use crate::storage::Collection;

/// Error detail carried by a failed [`ApiResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error message describing what went wrong
    pub message: String,
    /// HTTP status code for the failure
    pub code: u16,
}

/// Envelope returned for every store operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Payload, base64 encoded
    #[serde(default, with = "base64_data::option")]
    pub data: Option<Vec<u8>>,
    pub success: bool,
    pub error: Option<ErrorBody>,
}

impl ApiResponse {
    /// Successful response without payload
    pub fn ok() -> Self {
        Self {
            data: None,
            success: true,
            error: None,
        }
    }

    /// Successful response carrying `data`
    pub fn with_data(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::ok()
        }
    }

    pub fn from_error(err: &StoreError) -> Self {
        Self {
            data: None,
            success: false,
            error: Some(ErrorBody {
                message: err.to_string(),
                code: err.status_code().as_u16(),
            }),
        }
    }

    /// Converts the outcome of one store operation.
    pub fn from_result(result: Result<Option<Vec<u8>>>) -> Self {
        match result {
            Ok(Some(data)) => Self::with_data(data),
            Ok(None) => Self::ok(),
            Err(err) => Self::from_error(&err),
        }
    }
}

/// Description of a collection returned by `GET` with type `collection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    /// Stored entries, including expired ones not yet swept
    pub size: usize,
    /// Live keys, sorted
    pub keys: Vec<String>,
}

impl CollectionInfo {
    /// Describes `collection` from a single consistent snapshot.
    pub async fn describe(collection: &Collection) -> Self {
        let (size, keys) = collection.len_and_keys().await;
        Self {
            name: collection.name().to_string(),
            size,
            keys,
        }
    }

    /// JSON encoding carried in the response `data` field.
    pub fn to_bytes(&self) -> Vec<u8> {
        json!({
            "name": self.name,
            "size": self.size,
            "keys": self.keys,
        })
        .to_string()
        .into_bytes()
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
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

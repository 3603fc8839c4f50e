//! Request and Response models for the store API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod base64_data;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{RequestType, StoreRequest};
pub use responses::{ApiResponse, CollectionInfo, ErrorBody, HealthResponse};

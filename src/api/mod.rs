//! API Module
//!
//! HTTP handlers, routing and authentication for the store's JSON API.
//!
//! # Endpoints
//! - `POST|PUT /` - Create a collection or store objects
//! - `GET /` - Describe a collection or read objects
//! - `DELETE /` - Delete a collection or objects
//! - `GET /health` - Health check endpoint

pub mod auth;
pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

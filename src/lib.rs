//! Collection Store - An in-memory TTL object store
//!
//! Provides named collections of individually expiring objects behind a JSON
//! HTTP API, with a background sweeper that evicts expired entries.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{Result, StoreError};
pub use storage::{Collection, Object, RequestSettings, Store};
pub use tasks::spawn_sweeper;

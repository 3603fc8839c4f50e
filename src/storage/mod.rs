//! Storage Module
//!
//! Provides in-memory objects with absolute expiry, grouped into named
//! collections held by a capacity-limited store.

mod collection;
mod object;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use collection::Collection;
pub use object::{never_expires, Object, RequestSettings};
pub use store::Store;

// == Public Constants ==
/// Name of the collection that always exists and resolves from the empty name
pub const DEFAULT_COLLECTION: &str = "default";

//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiration sweeper: Removes expired objects from every collection at
//!   configured intervals, with bounded concurrency and per-collection timeouts

mod sweeper;

pub use sweeper::spawn_sweeper;

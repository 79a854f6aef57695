//! Background Tasks Module
//!
//! # Tasks
//! - TTL Cleanup: sweeps expired entries from the local cache backend

mod cleanup;

pub use cleanup::spawn_cleanup_task;

//! AA Inspect - Reverse inspection of equipment parameter sets
//!
//! Compares reported equipment parameters against the cached standard
//! template of their module and produces a pass/fail verdict.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod inspection;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{InspectionError, Result};
pub use inspection::{ActualParameterSet, InspectionResult, Inspector};
pub use tasks::spawn_cleanup_task;

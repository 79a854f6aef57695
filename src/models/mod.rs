//! Response models for the inspection service API
//!
//! Inspection requests and results use the domain types directly; this module
//! holds the service-level response bodies.

pub mod responses;

pub use responses::{CacheSummary, CachesResponse, HealthResponse, IgnoreResponse};

//! API Module
//!
//! HTTP handlers and routing for the inspection service.
//!
//! # Endpoints
//! - `POST /inspect` - Inspect a reported parameter set
//! - `PUT /ignored/:sim_id` - Mark a SIM as ignored
//! - `GET /caches` - Provisioned caches and their stats
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

//! API Routes
//!
//! Configures the Axum router with all inspection service endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    caches_handler, health_handler, ignore_handler, inspect_handler, AppState,
};

/// Creates the main router with CORS and request tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/inspect", post(inspect_handler))
        .route("/ignored/:sim_id", put(ignore_handler))
        .route("/caches", get(caches_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

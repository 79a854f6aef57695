//! Response DTOs for the inspection service API

use serde::Serialize;

use crate::cache::{CacheName, CacheStats};

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in RFC 3339 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// One provisioned cache. `stats` is only available for the local backend.
#[derive(Debug, Clone, Serialize)]
pub struct CacheSummary {
    pub name: CacheName,
    pub registered_as: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CacheStats>,
}

/// Response body for `GET /caches`
#[derive(Debug, Clone, Serialize)]
pub struct CachesResponse {
    pub caches: Vec<CacheSummary>,
}

/// Response body for `PUT /ignored/:sim_id`
#[derive(Debug, Clone, Serialize)]
pub struct IgnoreResponse {
    pub message: String,
    pub sim_id: String,
}

impl IgnoreResponse {
    pub fn new(sim_id: impl Into<String>) -> Self {
        let sim_id = sim_id.into();
        Self {
            message: format!("SIM '{}' marked as ignored", sim_id),
            sim_id,
        }
    }
}

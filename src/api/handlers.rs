//! API Handlers
//!
//! HTTP request handlers for each inspection service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::cache::{CacheProvisioner, LocalCacheManager, ProvisionerSettings};
use crate::config::Config;
use crate::error::Result;
use crate::inspection::{
    ActualParameterSet, InspectionResult, InspectionSettings, Inspector, KeyedComparator,
    MemoryTemplateStore, TemplateResolver, TemplateStore,
};
use crate::models::{CacheSummary, CachesResponse, HealthResponse, IgnoreResponse};

/// Marker value stored for an ignored SIM.
const IGNORED_MARKER: &str = "1";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub inspector: Arc<Inspector>,
    pub provisioner: Arc<CacheProvisioner>,
    /// Set when caches live in-process; enables per-cache stats
    pub local_caches: Option<Arc<LocalCacheManager>>,
}

impl AppState {
    pub fn new(
        inspector: Arc<Inspector>,
        provisioner: Arc<CacheProvisioner>,
        local_caches: Option<Arc<LocalCacheManager>>,
    ) -> Self {
        Self {
            inspector,
            provisioner,
            local_caches,
        }
    }

    /// Wires the service onto the local cache backend and `store`.
    pub fn with_store(config: &Config, store: Arc<dyn TemplateStore>) -> Self {
        let local_caches = Arc::new(LocalCacheManager::new());
        let provisioner = Arc::new(CacheProvisioner::with_manager(
            ProvisionerSettings::from(config),
            local_caches.clone(),
        ));
        let resolver = TemplateResolver::new(provisioner.clone(), store);
        let inspector = Inspector::new(
            provisioner.clone(),
            resolver,
            Arc::new(KeyedComparator),
            InspectionSettings::from(config),
        );
        Self::new(Arc::new(inspector), provisioner, Some(local_caches))
    }

    /// Wires the service with an empty template store.
    pub fn from_config(config: &Config) -> Self {
        Self::with_store(config, Arc::new(MemoryTemplateStore::new()))
    }
}

/// Handler for POST /inspect
///
/// A `null` body is rejected as an invalid argument.
pub async fn inspect_handler(
    State(state): State<AppState>,
    Json(actual): Json<Option<ActualParameterSet>>,
) -> Result<Json<InspectionResult>> {
    let result = state.inspector.perform_check(actual.as_ref()).await?;
    Ok(Json(result))
}

/// Handler for PUT /ignored/:sim_id
pub async fn ignore_handler(
    State(state): State<AppState>,
    Path(sim_id): Path<String>,
) -> Result<Json<IgnoreResponse>> {
    let cache = state.provisioner.ignore_cache().await?;
    cache.put(&sim_id, IGNORED_MARKER.to_string()).await?;
    info!(sim = %sim_id, "SIM marked as ignored");

    Ok(Json(IgnoreResponse::new(sim_id)))
}

/// Handler for GET /caches
pub async fn caches_handler(State(state): State<AppState>) -> Json<CachesResponse> {
    let mut caches = Vec::new();
    for name in state.provisioner.provisioned() {
        let stats = match &state.local_caches {
            Some(local) => match local.cache(name.as_str()).await {
                Some(cache) => Some(cache.stats().await),
                None => None,
            },
            None => None,
        };
        caches.push(CacheSummary {
            name,
            registered_as: name.as_str(),
            stats,
        });
    }

    Json(CachesResponse { caches })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

//! AA Inspect - Reverse inspection service
//!
//! Serves parameter inspections over HTTP on top of the local cache backend.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aa_inspect::api::{create_router, AppState};
use aa_inspect::cache::CacheName;
use aa_inspect::config::Config;
use aa_inspect::inspection::MemoryTemplateStore;
use aa_inspect::tasks::spawn_cleanup_task;

/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Load template records and wire the inspector
/// 4. Provision both caches so configuration errors surface at startup
/// 5. Start background TTL cleanup task
/// 6. Serve HTTP until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aa_inspect=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AA inspection service");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: nodes={}, client={}, ignore_cache_size={}, ignore_cache_ttl={}ms, port={}",
        config.cluster_nodes,
        config.client_name,
        config.default_max_entries,
        config.default_ttl.as_millis(),
        config.server_port
    );

    let store = match &config.template_file {
        Some(path) => MemoryTemplateStore::load_json_file(path)
            .await
            .with_context(|| format!("Failed to load templates from {}", path.display()))?,
        None => {
            warn!("No template file configured, every module will report a missing template");
            MemoryTemplateStore::new()
        }
    };

    let state = AppState::with_store(&config, Arc::new(store));
    for name in CacheName::ALL {
        state
            .provisioner
            .get_cache(name)
            .await
            .with_context(|| format!("Failed to provision cache {}", name))?;
    }

    let cleanup_handle = state
        .local_caches
        .clone()
        .map(|caches| spawn_cleanup_task(caches, config.cleanup_interval));
    info!("Background cleanup task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then stops the cleanup task.
async fn shutdown_signal(cleanup_handle: Option<tokio::task::JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}

//! Cache Provisioner
//!
//! Lazily builds the two well-known caches on first use and hands the same
//! handle to every later caller.
//!
//! Each cache name owns its own `OnceCell`: an initialised cell is read
//! without locking, concurrent first callers wait on that cell only, and a
//! failed construction leaves the cell empty so the next call retries.

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::cache::{build_cluster_uris, connection_string, CacheHandle, CacheManager, CacheSpec};
use crate::config::Config;
use crate::error::{InspectionError, Result};

/// Capacity of the template-info cache.
pub const TEMPLATE_CACHE_MAX_ENTRIES: usize = 500;

/// TTL of the template-info cache.
pub const TEMPLATE_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

// == Cache Name ==
/// The caches this service provisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheName {
    /// SIM ids whose reverse inspection is ignored
    IgnoredSims,
    /// Template info records keyed by module id
    TemplateInfo,
}

impl CacheName {
    pub const ALL: [CacheName; 2] = [CacheName::IgnoredSims, CacheName::TemplateInfo];

    /// Name the cache is registered under with the manager.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheName::IgnoredSims => "defaultCache",
            CacheName::TemplateInfo => "eqLstTplInfoDOCache",
        }
    }

    /// Key prefix used as the backend cache name.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            CacheName::IgnoredSims => "qtech:im:eqp:reverse:ignore:sim",
            CacheName::TemplateInfo => "qtech:im:eqp:lst:tpl:info",
        }
    }
}

impl fmt::Display for CacheName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Provisioner Settings ==
/// Cluster identity and ignore-cache limits.
#[derive(Debug, Clone)]
pub struct ProvisionerSettings {
    pub cluster_nodes: String,
    pub cluster_password: Option<String>,
    pub client_name: String,
    pub default_max_entries: usize,
    pub default_ttl: Duration,
}

impl From<&Config> for ProvisionerSettings {
    fn from(config: &Config) -> Self {
        Self {
            cluster_nodes: config.cluster_nodes.clone(),
            cluster_password: config.cluster_password.clone(),
            client_name: config.client_name.clone(),
            default_max_entries: config.default_max_entries,
            default_ttl: config.default_ttl,
        }
    }
}

// == Cache Provisioner ==
pub struct CacheProvisioner {
    settings: ProvisionerSettings,
    manager: OnceLock<Arc<dyn CacheManager>>,
    ignored_sims: OnceCell<Arc<dyn CacheHandle>>,
    template_info: OnceCell<Arc<dyn CacheHandle>>,
}

impl CacheProvisioner {
    /// Creates a provisioner with no cache manager yet; see [`install_manager`].
    ///
    /// [`install_manager`]: CacheProvisioner::install_manager
    pub fn new(settings: ProvisionerSettings) -> Self {
        Self {
            settings,
            manager: OnceLock::new(),
            ignored_sims: OnceCell::new(),
            template_info: OnceCell::new(),
        }
    }

    pub fn with_manager(settings: ProvisionerSettings, manager: Arc<dyn CacheManager>) -> Self {
        let provisioner = Self::new(settings);
        // a fresh OnceLock always accepts the first value
        let _ = provisioner.manager.set(manager);
        provisioner
    }

    /// Installs the cache manager. It can be installed once.
    pub fn install_manager(&self, manager: Arc<dyn CacheManager>) -> Result<()> {
        self.manager.set(manager).map_err(|_| {
            InspectionError::IllegalState("CacheManager is already initialized".to_string())
        })?;
        info!("CacheManager initialized");
        Ok(())
    }

    // == Get Cache ==
    /// Returns the handle for `name`, constructing it on first use.
    ///
    /// # Errors
    /// `IllegalState` when no manager is installed; `Configuration` when the
    /// cache spec or cluster URI is invalid. Nothing is memoized on error.
    pub async fn get_cache(&self, name: CacheName) -> Result<Arc<dyn CacheHandle>> {
        let slot = self.slot(name);
        if let Some(handle) = slot.get() {
            return Ok(handle.clone());
        }

        let handle = slot.get_or_try_init(|| self.construct(name)).await?;
        Ok(handle.clone())
    }

    pub async fn ignore_cache(&self) -> Result<Arc<dyn CacheHandle>> {
        self.get_cache(CacheName::IgnoredSims).await
    }

    pub async fn template_cache(&self) -> Result<Arc<dyn CacheHandle>> {
        self.get_cache(CacheName::TemplateInfo).await
    }

    /// Names of the caches constructed so far.
    pub fn provisioned(&self) -> Vec<CacheName> {
        CacheName::ALL
            .into_iter()
            .filter(|name| self.slot(*name).initialized())
            .collect()
    }

    fn slot(&self, name: CacheName) -> &OnceCell<Arc<dyn CacheHandle>> {
        match name {
            CacheName::IgnoredSims => &self.ignored_sims,
            CacheName::TemplateInfo => &self.template_info,
        }
    }

    fn limits(&self, name: CacheName) -> (usize, Duration) {
        match name {
            CacheName::IgnoredSims => (self.settings.default_max_entries, self.settings.default_ttl),
            CacheName::TemplateInfo => (TEMPLATE_CACHE_MAX_ENTRIES, TEMPLATE_CACHE_TTL),
        }
    }

    async fn construct(&self, name: CacheName) -> Result<Arc<dyn CacheHandle>> {
        info!(cache = %name, "Creating cache");

        let manager = self.manager.get().cloned().ok_or_else(|| {
            error!(cache = %name, "CacheManager is not initialized");
            InspectionError::IllegalState("CacheManager is not initialized".to_string())
        })?;

        let (max_entries, ttl) = self.limits(name);
        info!(
            cache = %name,
            max_entries,
            ttl_ms = ttl.as_millis() as u64,
            "Using cache limits"
        );

        let uris = build_cluster_uris(
            &self.settings.cluster_nodes,
            self.settings.cluster_password.as_deref(),
            &self.settings.client_name,
        )
        .inspect_err(|e| error!(cache = %name, error = %e, "Failed to build cluster URI"))?;

        let spec = CacheSpec::new(name.key_prefix(), max_entries, ttl, connection_string(&uris))
            .inspect_err(|e| error!(cache = %name, error = %e, "Invalid cache spec"))?;

        let handle = manager.get_or_create(name.as_str(), &spec).await?;
        info!(cache = %name, "Cache created successfully");
        Ok(handle)
    }
}

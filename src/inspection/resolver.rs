//! Template Resolver
//!
//! Cache-aside lookup of template records: cache first, then the durable
//! store, with a best-effort write back into the cache.

use std::sync::Arc;

use tracing::{error, warn};

use crate::cache::{CacheHandle, CacheProvisioner};
use crate::error::Result;
use crate::inspection::{TemplateInfo, TemplateStore};

// == Template Resolver ==
pub struct TemplateResolver {
    provisioner: Arc<CacheProvisioner>,
    store: Arc<dyn TemplateStore>,
}

impl TemplateResolver {
    pub fn new(provisioner: Arc<CacheProvisioner>, store: Arc<dyn TemplateStore>) -> Self {
        Self { provisioner, store }
    }

    /// Resolves the template record for `module_id`.
    ///
    /// Returns `Ok(None)` for an empty id, a store miss, or a store failure;
    /// the last two are indistinguishable to the caller. A failed cache
    /// write-back is logged and does not affect the returned record.
    ///
    /// # Errors
    /// Cache provisioning failures and cache read failures.
    pub async fn resolve(&self, module_id: &str) -> Result<Option<TemplateInfo>> {
        if module_id.is_empty() {
            error!("Module id must not be empty");
            return Ok(None);
        }

        let cache = self.provisioner.template_cache().await?;
        if let Some(cached) = Self::read_cached(cache.as_ref(), module_id).await? {
            return Ok(Some(cached));
        }
        warn!(module = module_id, "Template info not in cache");

        let fetched = match self.store.get_template(module_id).await {
            Ok(Some(info)) => info,
            Ok(None) => {
                warn!(module = module_id, "Template info not in store");
                return Ok(None);
            }
            Err(e) => {
                error!(module = module_id, error = %e, "Failed to fetch template info");
                return Ok(None);
            }
        };

        if let Err(e) = Self::write_back(cache.as_ref(), module_id, &fetched).await {
            error!(module = module_id, error = %e, "Failed to cache template info");
        }
        Ok(Some(fetched))
    }

    async fn read_cached(
        cache: &dyn CacheHandle,
        module_id: &str,
    ) -> Result<Option<TemplateInfo>> {
        let Some(raw) = cache.get(module_id).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(info) => Ok(Some(info)),
            Err(e) => {
                warn!(module = module_id, error = %e, "Discarding undecodable cached template");
                Ok(None)
            }
        }
    }

    async fn write_back(
        cache: &dyn CacheHandle,
        module_id: &str,
        info: &TemplateInfo,
    ) -> Result<()> {
        let encoded = serde_json::to_string(info)?;
        cache.put(module_id, encoded).await
    }
}

//! Inspection Orchestrator
//!
//! Labels the unit, resolves its module template, and turns the comparator's
//! diff into a status code and description.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::cache::CacheProvisioner;
use crate::config::Config;
use crate::error::{InspectionError, Result};
use crate::inspection::{
    ActualParameterSet, CheckCode, InspectionDiff, InspectionResult, Label, ParameterComparator,
    TemplateInfo, TemplateResolver,
};

pub const MISSING_TEMPLATE_DESCRIPTION: &str = "Missing Template Information.";
pub const TEMPLATE_OFFLINE_DESCRIPTION: &str = "Template Offline.";
pub const MISSING_TEMPLATE_DETAIL_DESCRIPTION: &str = "Missing Template Detail.";
pub const CLEAN_DESCRIPTION: &str = "Ok.";

// == Inspection Settings ==
/// Property lists passed to the comparator.
#[derive(Debug, Clone, Default)]
pub struct InspectionSettings {
    pub compare_properties: Vec<String>,
    pub compute_properties: Vec<String>,
}

impl From<&Config> for InspectionSettings {
    fn from(config: &Config) -> Self {
        Self {
            compare_properties: config.compare_properties.clone(),
            compute_properties: config.compute_properties.clone(),
        }
    }
}

// == Inspector ==
pub struct Inspector {
    provisioner: Arc<CacheProvisioner>,
    resolver: TemplateResolver,
    comparator: Arc<dyn ParameterComparator>,
    settings: InspectionSettings,
}

impl Inspector {
    pub fn new(
        provisioner: Arc<CacheProvisioner>,
        resolver: TemplateResolver,
        comparator: Arc<dyn ParameterComparator>,
        settings: InspectionSettings,
    ) -> Self {
        Self {
            provisioner,
            resolver,
            comparator,
            settings,
        }
    }

    // == Perform Check ==
    /// Inspects `actual` against its module's template.
    ///
    /// # Errors
    /// `InvalidArgument` when `actual` is `None`. Cache provisioning, cache
    /// read and comparator failures propagate; template store failures are
    /// reported as code 1.
    pub async fn perform_check(
        &self,
        actual: Option<&ActualParameterSet>,
    ) -> Result<InspectionResult> {
        let actual = actual.ok_or_else(|| {
            InspectionError::InvalidArgument("Actual parameter set must not be null".to_string())
        })?;
        let checked_at = Utc::now();

        let label = self.label_for(&actual.sim_id).await?;

        let template = self.resolver.resolve(&actual.module_id).await?;
        info!(
            module = %actual.module_id,
            found = template.is_some(),
            "Resolved template summary"
        );

        let (code, description) = match template {
            None => (CheckCode::MissingTemplate, MISSING_TEMPLATE_DESCRIPTION.to_string()),
            Some(info) if !info.status.is_online() => (
                CheckCode::TemplateOffline,
                TEMPLATE_OFFLINE_DESCRIPTION.to_string(),
            ),
            Some(TemplateInfo { template: None, .. }) => (
                CheckCode::MissingTemplateDetail,
                MISSING_TEMPLATE_DETAIL_DESCRIPTION.to_string(),
            ),
            Some(TemplateInfo {
                template: Some(standard),
                ..
            }) => {
                let diff = self.comparator.compare(
                    &standard,
                    actual,
                    &self.settings.compare_properties,
                    &self.settings.compute_properties,
                )?;
                (CheckCode::from_diff(&diff), build_description(&diff))
            }
        };

        debug!(sim = %actual.sim_id, code = code.code(), "Inspection finished");
        Ok(InspectionResult::new(
            actual,
            checked_at,
            label,
            code,
            description,
        ))
    }

    async fn label_for(&self, sim_id: &str) -> Result<Label> {
        let ignored = self.provisioner.ignore_cache().await?.get(sim_id).await?;
        Ok(if ignored.is_some() {
            Label::Ignore
        } else {
            Label::Normal
        })
    }
}

// == Build Description ==
/// Renders the diff as `;`-joined segments: extra properties (`p+`), then
/// missing (`p-`), then differing (`p:stored!=actual`), each group sorted by
/// property name. An empty diff renders as `Ok.`.
pub fn build_description(diff: &InspectionDiff) -> String {
    let extra = diff.extra_in_actual.keys().map(|p| format!("{}+", p));
    let missing = diff.missing_in_actual.keys().map(|p| format!("{}-", p));
    let differing = diff
        .differing
        .iter()
        .map(|(p, m)| format!("{}:{}!={}", p, m.stored, m.actual));

    let segments: Vec<String> = extra.chain(missing).chain(differing).collect();
    if segments.is_empty() {
        CLEAN_DESCRIPTION.to_string()
    } else {
        segments.join(";")
    }
}

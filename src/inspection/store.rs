//! Durable template store
//!
//! [`TemplateStore`] is the database boundary. [`MemoryTemplateStore`] serves
//! records loaded from a JSON file or registered in code.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{InspectionError, Result};
use crate::inspection::TemplateInfo;

// == Template Store ==
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Fetches the template record for `module_id`, `None` if there is none.
    async fn get_template(&self, module_id: &str) -> Result<Option<TemplateInfo>>;
}

// == Memory Template Store ==
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    templates: RwLock<HashMap<String, TemplateInfo>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = TemplateInfo>) -> Self {
        let templates = records
            .into_iter()
            .map(|record| (record.module_id.clone(), record))
            .collect();
        Self {
            templates: RwLock::new(templates),
        }
    }

    /// Loads a JSON array of template records.
    pub async fn load_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            InspectionError::Store(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let records: Vec<TemplateInfo> = serde_json::from_str(&raw)?;
        info!(path = %path.display(), templates = records.len(), "Loaded template records");
        Ok(Self::from_records(records))
    }

    /// Adds or replaces the record for its module.
    pub async fn upsert(&self, record: TemplateInfo) {
        self.templates
            .write()
            .await
            .insert(record.module_id.clone(), record);
    }

    pub async fn len(&self) -> usize {
        self.templates.read().await.len()
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn get_template(&self, module_id: &str) -> Result<Option<TemplateInfo>> {
        Ok(self.templates.read().await.get(module_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspection::{StandardParameterSet, TemplateStatus};

    #[tokio::test]
    async fn test_get_registered_template() {
        let store = MemoryTemplateStore::from_records([TemplateInfo::online(
            "M1",
            StandardParameterSet::new().with_value("aa1", "1"),
        )]);

        let found = store.get_template("M1").await.unwrap().unwrap();
        assert_eq!(found.module_id, "M1");
        assert!(store.get_template("M2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_record() {
        let store = MemoryTemplateStore::new();
        store
            .upsert(TemplateInfo::online("M1", StandardParameterSet::new()))
            .await;
        store
            .upsert(TemplateInfo {
                module_id: "M1".to_string(),
                status: TemplateStatus::Offline,
                template: None,
            })
            .await;

        assert_eq!(store.len().await, 1);
        let found = store.get_template("M1").await.unwrap().unwrap();
        assert_eq!(found.status, TemplateStatus::Offline);
    }

    #[tokio::test]
    async fn test_load_json_file() {
        let path = std::env::temp_dir().join(format!("templates-{}.json", std::process::id()));
        tokio::fs::write(
            &path,
            r#"[{"moduleId":"M1","status":1,"template":{"aa1":"10"}},{"moduleId":"M2","status":0}]"#,
        )
        .await
        .unwrap();

        let store = MemoryTemplateStore::load_json_file(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(store.len().await, 2);
        assert!(store.get_template("M2").await.unwrap().unwrap().template.is_none());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_store_error() {
        let result = MemoryTemplateStore::load_json_file("/nonexistent/templates.json").await;
        assert!(matches!(result, Err(InspectionError::Store(_))));
    }
}

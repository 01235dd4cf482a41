//! In-memory [`ModuleBackend`] for tests.
//!
//! Keeps documents as JSON objects so merges behave like the PostgreSQL
//! `jsonb ||` operator, and iterates in insertion order.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::module::{Module, Sensor, FIELD_SENSORS};
use crate::storage::{ModuleBackend, ReplaceOutcome, VersionedModule};
use crate::types::{JsonMap, Version};

#[derive(Debug)]
struct Entry {
    module_id: String,
    document: JsonMap,
    version: Version,
}

#[derive(Debug, Default)]
pub struct InMemoryModuleBackend {
    entries: RwLock<Vec<Entry>>,
}

impl InMemoryModuleBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn to_document<T: serde::Serialize>(value: &T) -> Result<Value, CoreError> {
    serde_json::to_value(value).map_err(|e| CoreError::Storage(e.to_string()))
}

fn from_document(document: &JsonMap) -> Result<Module, CoreError> {
    serde_json::from_value(Value::Object(document.clone()))
        .map_err(|e| CoreError::Storage(e.to_string()))
}

#[async_trait]
impl ModuleBackend for InMemoryModuleBackend {
    async fn insert(&self, module: &Module) -> Result<(), CoreError> {
        let Value::Object(document) = to_document(module)? else {
            return Err(CoreError::Storage("module did not serialize to an object".into()));
        };
        let mut entries = self.entries.write().await;
        if entries.iter().any(|e| e.module_id == module.module_id) {
            return Err(CoreError::DuplicateModule(module.module_id.clone()));
        }
        entries.push(Entry {
            module_id: module.module_id.clone(),
            document,
            version: 0,
        });
        Ok(())
    }

    async fn find(&self, module_id: &str) -> Result<Option<VersionedModule>, CoreError> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .find(|e| e.module_id == module_id)
            .map(|e| {
                Ok(VersionedModule {
                    module: from_document(&e.document)?,
                    version: e.version,
                })
            })
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Module>, CoreError> {
        let entries = self.entries.read().await;
        entries.iter().map(|e| from_document(&e.document)).collect()
    }

    async fn merge(&self, module_id: &str, patch: &JsonMap) -> Result<bool, CoreError> {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.iter_mut().find(|e| e.module_id == module_id) else {
            return Ok(false);
        };
        for (key, value) in patch {
            entry.document.insert(key.clone(), value.clone());
        }
        entry.version += 1;
        Ok(true)
    }

    async fn delete(&self, module_id: &str) -> Result<bool, CoreError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.module_id != module_id);
        Ok(entries.len() != before)
    }

    async fn replace_sensors(
        &self,
        module_id: &str,
        sensors: &[Sensor],
        expected_version: Version,
    ) -> Result<ReplaceOutcome, CoreError> {
        let list = to_document(&sensors)?;
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.iter_mut().find(|e| e.module_id == module_id) else {
            return Ok(ReplaceOutcome::Missing);
        };
        if entry.version != expected_version {
            return Ok(ReplaceOutcome::VersionMismatch);
        }
        entry.document.insert(FIELD_SENSORS.to_string(), list);
        entry.version += 1;
        Ok(ReplaceOutcome::Replaced)
    }
}

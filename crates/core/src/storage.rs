//! Persistence seam for module aggregates.
//!
//! A backend stores whole module documents keyed by `moduleId` and must
//! enforce that key's uniqueness. Sensors are never stored on their own:
//! they change only through [`ModuleBackend::replace_sensors`], which
//! rewrites the full embedded list.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::module::{Module, Sensor};
use crate::types::{JsonMap, Version};

/// A module together with the version it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedModule {
    pub module: Module,
    pub version: Version,
}

/// Result of a conditional sensor-list replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    Replaced,
    /// No module with that id exists any more.
    Missing,
    /// The module changed since it was read; nothing was written.
    VersionMismatch,
}

#[async_trait]
pub trait ModuleBackend: Send + Sync {
    /// Insert a new module at version 0.
    ///
    /// Fails with [`CoreError::DuplicateModule`] if the id is taken.
    async fn insert(&self, module: &Module) -> Result<(), CoreError>;

    async fn find(&self, module_id: &str) -> Result<Option<VersionedModule>, CoreError>;

    /// Every stored module. Ordering is backend-defined.
    async fn list(&self) -> Result<Vec<Module>, CoreError>;

    /// Shallow-merge `patch` into the stored document in one conditional
    /// write. Returns `false` when no module matched.
    async fn merge(&self, module_id: &str, patch: &JsonMap) -> Result<bool, CoreError>;

    /// Returns `false` when no module matched.
    async fn delete(&self, module_id: &str) -> Result<bool, CoreError>;

    /// Replace the sensor list, but only if the module is still at
    /// `expected_version`.
    async fn replace_sensors(
        &self,
        module_id: &str,
        sensors: &[Sensor],
        expected_version: Version,
    ) -> Result<ReplaceOutcome, CoreError>;

    /// Reachability probe for health checks.
    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

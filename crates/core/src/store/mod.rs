//! Module store: validated CRUD over module aggregates and their sensors.
//!
//! Every write is validated in full before it reaches the backend, so an
//! invalid sensor is never persisted. Sensor mutations load the module,
//! rebuild the whole list in memory and write it back with a version
//! check; a concurrent change in between surfaces as
//! [`CoreError::Conflict`] instead of a silently lost update.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::error::CoreError;
use crate::module::{Confirmation, Module, Sensor};
use crate::storage::{ModuleBackend, ReplaceOutcome, VersionedModule};
use crate::types::Version;
use crate::validation::{
    merge_sensor_patch, validate_module, validate_module_patch, validate_sensor,
};


/// Cheaply cloneable handle over a shared backend.
#[derive(Clone)]
pub struct ModuleStore {
    backend: Arc<dyn ModuleBackend>,
}

impl ModuleStore {
    pub fn new(backend: Arc<dyn ModuleBackend>) -> Self {
        Self { backend }
    }

    /// Validate and insert a new module, returning it as read back from
    /// storage.
    pub async fn create(&self, raw: &Value) -> Result<Module, CoreError> {
        let module = validate_module(raw)?;
        self.backend.insert(&module).await?;
        tracing::info!(
            module_id = %module.module_id,
            sensors = module.sensors.len(),
            "Module created"
        );
        self.get(&module.module_id).await
    }

    /// Whether the backend is reachable.
    pub async fn is_healthy(&self) -> bool {
        self.backend.ping().await.is_ok()
    }

    pub async fn list_all(&self) -> Result<Vec<Module>, CoreError> {
        let modules = self.backend.list().await?;
        tracing::debug!(count = modules.len(), "Listed modules");
        Ok(modules)
    }

    pub async fn get(&self, module_id: &str) -> Result<Module, CoreError> {
        Ok(self.load(module_id).await?.module)
    }

    /// Merge `raw` into the stored module. Fields absent from the patch are
    /// left untouched.
    pub async fn update_module(&self, module_id: &str, raw: &Value) -> Result<Module, CoreError> {
        let patch = validate_module_patch(module_id, raw)?;
        if !self.backend.merge(module_id, &patch).await? {
            return Err(CoreError::ModuleNotFound(module_id.to_string()));
        }
        tracing::info!(module_id, fields = patch.len(), "Module updated");
        self.get(module_id).await
    }

    /// Remove a module together with all of its sensors.
    pub async fn delete_module(&self, module_id: &str) -> Result<Confirmation, CoreError> {
        if !self.backend.delete(module_id).await? {
            return Err(CoreError::ModuleNotFound(module_id.to_string()));
        }
        tracing::info!(module_id, "Module deleted");
        Ok(Confirmation::module_deleted(module_id))
    }

    /// Append a sensor to the end of a module's list.
    pub async fn add_sensor(&self, module_id: &str, raw: &Value) -> Result<Sensor, CoreError> {
        let VersionedModule { module, version } = self.load(module_id).await?;
        let taken: HashSet<String> = module.sensors.iter().map(|s| s.sensor_id.clone()).collect();
        let sensor = validate_sensor(raw, &taken)?;

        let mut sensors = module.sensors;
        sensors.push(sensor.clone());
        self.write_sensors(module_id, &sensors, version).await?;

        tracing::info!(module_id, sensor_id = %sensor.sensor_id, "Sensor added");
        Ok(sensor)
    }

    pub async fn get_sensor(&self, module_id: &str, sensor_id: &str) -> Result<Sensor, CoreError> {
        let module = self.get(module_id).await?;
        module
            .sensor(sensor_id)
            .cloned()
            .ok_or_else(|| sensor_not_found(module_id, sensor_id))
    }

    /// Field-level merge of `raw` over an existing sensor. The sensor keeps
    /// its position in the list.
    pub async fn update_sensor(
        &self,
        module_id: &str,
        sensor_id: &str,
        raw: &Value,
    ) -> Result<Sensor, CoreError> {
        let VersionedModule { module, version } = self.load(module_id).await?;
        let index = module
            .sensor_position(sensor_id)
            .ok_or_else(|| sensor_not_found(module_id, sensor_id))?;

        let candidate = merge_sensor_patch(&module.sensors[index], raw)?;
        let others: HashSet<String> = module
            .sensors
            .iter()
            .filter(|s| s.sensor_id != sensor_id)
            .map(|s| s.sensor_id.clone())
            .collect();
        let updated = validate_sensor(&candidate, &others)?;

        let mut sensors = module.sensors;
        sensors[index] = updated.clone();
        self.write_sensors(module_id, &sensors, version).await?;

        tracing::info!(module_id, sensor_id, "Sensor updated");
        Ok(updated)
    }

    pub async fn delete_sensor(
        &self,
        module_id: &str,
        sensor_id: &str,
    ) -> Result<Confirmation, CoreError> {
        let VersionedModule { module, version } = self.load(module_id).await?;
        let before = module.sensors.len();
        let sensors: Vec<Sensor> = module
            .sensors
            .into_iter()
            .filter(|s| s.sensor_id != sensor_id)
            .collect();
        if sensors.len() == before {
            return Err(sensor_not_found(module_id, sensor_id));
        }
        self.write_sensors(module_id, &sensors, version).await?;

        tracing::info!(module_id, sensor_id, "Sensor deleted");
        Ok(Confirmation::sensor_deleted(module_id, sensor_id))
    }

    async fn load(&self, module_id: &str) -> Result<VersionedModule, CoreError> {
        self.backend
            .find(module_id)
            .await?
            .ok_or_else(|| CoreError::ModuleNotFound(module_id.to_string()))
    }

    async fn write_sensors(
        &self,
        module_id: &str,
        sensors: &[Sensor],
        read_version: Version,
    ) -> Result<(), CoreError> {
        match self
            .backend
            .replace_sensors(module_id, sensors, read_version)
            .await?
        {
            ReplaceOutcome::Replaced => Ok(()),
            ReplaceOutcome::Missing => Err(CoreError::ModuleNotFound(module_id.to_string())),
            ReplaceOutcome::VersionMismatch => {
                tracing::warn!(
                    module_id,
                    read_version,
                    "Sensor list changed concurrently, write rejected"
                );
                Err(CoreError::Conflict(format!(
                    "Module {module_id} was modified concurrently; reload and retry."
                )))
            }
        }
    }
}

fn sensor_not_found(module_id: &str, sensor_id: &str) -> CoreError {
    CoreError::SensorNotFound {
        module_id: module_id.to_string(),
        sensor_id: sensor_id.to_string(),
    }
}

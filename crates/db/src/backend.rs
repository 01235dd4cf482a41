//! [`ModuleBackend`] implementation over PostgreSQL.

use async_trait::async_trait;
use sensorhub_core::error::CoreError;
use sensorhub_core::module::{Module, Sensor};
use sensorhub_core::storage::{ModuleBackend, ReplaceOutcome, VersionedModule};
use sensorhub_core::types::{JsonMap, Version};

use crate::repositories::module_repo::MODULE_ID_CONSTRAINT;
use crate::repositories::ModuleRepo;
use crate::DbPool;

/// PostgreSQL unique_violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgModuleBackend {
    pool: DbPool,
}

impl PgModuleBackend {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn storage(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Database error");
    CoreError::Storage(err.to_string())
}

fn is_module_id_collision(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                && db_err.constraint() == Some(MODULE_ID_CONSTRAINT)
        }
        _ => false,
    }
}

#[async_trait]
impl ModuleBackend for PgModuleBackend {
    async fn insert(&self, module: &Module) -> Result<(), CoreError> {
        match ModuleRepo::create(&self.pool, module).await {
            Ok(_) => Ok(()),
            Err(err) if is_module_id_collision(&err) => {
                Err(CoreError::DuplicateModule(module.module_id.clone()))
            }
            Err(err) => Err(storage(err)),
        }
    }

    async fn find(&self, module_id: &str) -> Result<Option<VersionedModule>, CoreError> {
        let row = ModuleRepo::find_by_module_id(&self.pool, module_id)
            .await
            .map_err(storage)?;
        Ok(row.map(VersionedModule::from))
    }

    async fn list(&self) -> Result<Vec<Module>, CoreError> {
        let rows = ModuleRepo::list(&self.pool).await.map_err(storage)?;
        Ok(rows.into_iter().map(|row| row.document.0).collect())
    }

    async fn merge(&self, module_id: &str, patch: &JsonMap) -> Result<bool, CoreError> {
        ModuleRepo::merge_fields(&self.pool, module_id, patch)
            .await
            .map_err(storage)
    }

    async fn delete(&self, module_id: &str) -> Result<bool, CoreError> {
        ModuleRepo::delete(&self.pool, module_id)
            .await
            .map_err(storage)
    }

    async fn replace_sensors(
        &self,
        module_id: &str,
        sensors: &[Sensor],
        expected_version: Version,
    ) -> Result<ReplaceOutcome, CoreError> {
        let written = ModuleRepo::replace_sensors(&self.pool, module_id, sensors, expected_version)
            .await
            .map_err(storage)?;
        if written {
            return Ok(ReplaceOutcome::Replaced);
        }
        // Zero rows: either the module is gone or its version moved on.
        let exists = ModuleRepo::exists(&self.pool, module_id)
            .await
            .map_err(storage)?;
        Ok(if exists {
            ReplaceOutcome::VersionMismatch
        } else {
            ReplaceOutcome::Missing
        })
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(storage)
    }
}

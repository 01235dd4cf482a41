//! Repository for the `monitoring_modules` table.

use sensorhub_core::module::{Module, Sensor};
use sensorhub_core::types::{JsonMap, Version};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::module::ModuleRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, module_id, document, version, created_at, updated_at";

/// Name of the constraint backing `moduleId` uniqueness.
pub const MODULE_ID_CONSTRAINT: &str = "uq_monitoring_modules_module_id";

/// Provides CRUD operations for monitoring modules.
pub struct ModuleRepo;

impl ModuleRepo {
    /// Insert a new module document, returning the created row.
    ///
    /// A duplicate `module_id` fails with a unique violation on
    /// [`MODULE_ID_CONSTRAINT`].
    pub async fn create(pool: &PgPool, module: &Module) -> Result<ModuleRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO monitoring_modules (module_id, document)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ModuleRow>(&query)
            .bind(&module.module_id)
            .bind(Json(module))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_module_id(
        pool: &PgPool,
        module_id: &str,
    ) -> Result<Option<ModuleRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM monitoring_modules WHERE module_id = $1");
        sqlx::query_as::<_, ModuleRow>(&query)
            .bind(module_id)
            .fetch_optional(pool)
            .await
    }

    /// List all modules in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<ModuleRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM monitoring_modules ORDER BY id");
        sqlx::query_as::<_, ModuleRow>(&query).fetch_all(pool).await
    }

    /// Shallow-merge `patch` into the stored document and bump the version.
    ///
    /// Returns `false` if no row with the given `module_id` exists.
    pub async fn merge_fields(
        pool: &PgPool,
        module_id: &str,
        patch: &JsonMap,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE monitoring_modules SET
                document = document || $2,
                version = version + 1,
                updated_at = NOW()
             WHERE module_id = $1",
        )
        .bind(module_id)
        .bind(Json(patch))
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the embedded sensor list if the row is still at
    /// `expected_version`. Returns `true` if a row was written.
    pub async fn replace_sensors(
        pool: &PgPool,
        module_id: &str,
        sensors: &[Sensor],
        expected_version: Version,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE monitoring_modules SET
                document = jsonb_set(document, '{sensors}', $2),
                version = version + 1,
                updated_at = NOW()
             WHERE module_id = $1 AND version = $3",
        )
        .bind(module_id)
        .bind(Json(sensors))
        .bind(expected_version)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, module_id: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM monitoring_modules WHERE module_id = $1)")
                .bind(module_id)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Permanently delete a module. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, module_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM monitoring_modules WHERE module_id = $1")
            .bind(module_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Monitoring module row model.

use sensorhub_core::module::Module;
use sensorhub_core::storage::VersionedModule;
use sensorhub_core::types::{DbId, Timestamp, Version};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `monitoring_modules` table.
///
/// `id`, `version` and the timestamps are internal and never leave the
/// storage layer; callers only see the embedded document.
#[derive(Debug, Clone, FromRow)]
pub struct ModuleRow {
    pub id: DbId,
    pub module_id: String,
    pub document: Json<Module>,
    pub version: Version,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ModuleRow> for VersionedModule {
    fn from(row: ModuleRow) -> Self {
        VersionedModule {
            module: row.document.0,
            version: row.version,
        }
    }
}

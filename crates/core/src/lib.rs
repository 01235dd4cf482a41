//! Sensorhub core: monitoring-module domain types, the validation engine,
//! the storage seam and the module store service.
//!
//! Nothing in this crate talks to a database or HTTP directly. Persistence
//! is reached through [`storage::ModuleBackend`], implemented by
//! `sensorhub-db` for PostgreSQL and by [`memory`] for tests.

pub mod error;
pub mod module;
pub mod storage;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

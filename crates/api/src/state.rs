use sensorhub_core::store::ModuleStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; the store shares its backend behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Validated access to module aggregates.
    pub store: ModuleStore,
}

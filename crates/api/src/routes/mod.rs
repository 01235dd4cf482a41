pub mod health;
pub mod module;

use axum::Router;

use crate::state::AppState;

/// Build the module API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /modules/                                        list, create
/// /modules/{id}                                    get, update, delete
/// /modules/{id}/sensors                            add sensor (POST)
/// /modules/{id}/sensors/{sid}                      get, update, delete sensor
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(module::router())
}

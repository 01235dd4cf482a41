use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Routes mounted at the root.
///
/// ```text
/// GET, POST         /modules/               (also without the trailing slash)
/// GET, PUT, DELETE  /modules/{id}
/// POST              /modules/{id}/sensors
/// GET, PUT, DELETE  /modules/{id}/sensors/{sid}
/// ```
pub fn router() -> Router<AppState> {
    let collection = get(handlers::module::list).post(handlers::module::create);

    Router::new()
        .route("/modules/", collection.clone())
        .route("/modules", collection)
        .route(
            "/modules/{id}",
            get(handlers::module::get_by_id)
                .put(handlers::module::update)
                .delete(handlers::module::delete),
        )
        .route("/modules/{id}/sensors", post(handlers::sensor::add))
        .route(
            "/modules/{id}/sensors/{sid}",
            get(handlers::sensor::get_by_id)
                .put(handlers::sensor::update)
                .delete(handlers::sensor::delete),
        )
}

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sensorhub_core::memory::InMemoryModuleBackend;
use sensorhub_core::store::ModuleStore;
use tower::ServiceExt;

use sensorhub_api::config::ServerConfig;
use sensorhub_api::router::build_app_router;
use sensorhub_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout. The database URL is never dialled.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
    }
}

/// Build the full application router over a fresh in-memory backend.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack. Clone the returned router per request;
/// clones share the same store.
pub fn build_test_app() -> Router {
    let config = test_config();
    let state = AppState {
        store: ModuleStore::new(Arc::new(InMemoryModuleBackend::new())),
    };
    build_app_router(state, &config).unwrap()
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<String>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(text) => {
            builder = builder.header("content-type", "application/json");
            Body::from(text)
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(json.to_string())).await
}

pub async fn put_json(app: &Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(json.to_string())).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A valid module payload with no sensors.
pub fn empty_module(id: &str) -> serde_json::Value {
    serde_json::json!({"moduleId": id, "location": "Plant A", "sensors": []})
}

pub fn humidity_sensor(id: &str, value: i64) -> serde_json::Value {
    serde_json::json!({
        "sensorId": id,
        "type": "humidity",
        "value": value,
        "timestamp": "2024-01-01T00:00:00Z"
    })
}

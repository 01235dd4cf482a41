//! HTTP-level integration tests for the `/modules` endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, empty_module, get, humidity_sensor, post_json, put_json};
use serde_json::json;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_module_returns_201_with_canonical_module() {
    let app = common::build_test_app();
    let payload = json!({
        "moduleId": "M1",
        "location": "Plant A",
        "sensors": [humidity_sensor("S1", 45)],
        "line": 4
    });
    let response = post_json(&app, "/modules/", payload.clone()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await, payload);
}

#[tokio::test]
async fn collection_route_works_without_trailing_slash() {
    let app = common::build_test_app();
    let response = post_json(&app, "/modules", empty_module("M1")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(&app, "/modules").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_module_id_returns_400() {
    let app = common::build_test_app();
    post_json(&app, "/modules/", empty_module("M1")).await;
    let response = post_json(&app, "/modules/", empty_module("M1")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "A module with moduleId M1 already exists.");
    assert_eq!(json["code"], "DUPLICATE_MODULE");
}

#[tokio::test]
async fn missing_location_returns_400() {
    let app = common::build_test_app();
    let response = post_json(&app, "/modules/", json!({"moduleId": "M1", "sensors": []})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "The location field is required.");
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn non_list_sensors_returns_400() {
    let app = common::build_test_app();
    let response = post_json(
        &app,
        "/modules/",
        json!({"moduleId": "M1", "location": "A", "sensors": {"a": 1}}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "The sensors field must be a list."
    );
}

#[tokio::test]
async fn malformed_json_body_returns_400_envelope() {
    let app = common::build_test_app();
    let response = common::send(
        &app,
        axum::http::Method::POST,
        "/modules/",
        Some("{not json".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_returns_all_modules() {
    let app = common::build_test_app();
    post_json(&app, "/modules/", empty_module("M1")).await;
    post_json(&app, "/modules/", empty_module("M2")).await;

    let response = get(&app, "/modules/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let mut ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["moduleId"].as_str().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, ["M1", "M2"]);
}

#[tokio::test]
async fn list_on_empty_store_is_empty_array() {
    let app = common::build_test_app();
    let response = get(&app, "/modules/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn get_module_by_id() {
    let app = common::build_test_app();
    post_json(&app, "/modules/", empty_module("M1")).await;

    let response = get(&app, "/modules/M1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, empty_module("M1"));
}

#[tokio::test]
async fn get_nonexistent_module_returns_404() {
    let app = common::build_test_app();
    let response = get(&app, "/modules/nope").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "Module with moduleId nope not found."
    );
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_module_merges_fields() {
    let app = common::build_test_app();
    post_json(
        &app,
        "/modules/",
        json!({"moduleId": "M1", "location": "Plant A", "sensors": [humidity_sensor("S1", 45)]}),
    )
    .await;

    let response = put_json(&app, "/modules/M1", json!({"location": "Plant B"})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["location"], "Plant B");
    assert_eq!(json["sensors"][0]["sensorId"], "S1");
}

#[tokio::test]
async fn update_with_invalid_sensor_returns_400_and_keeps_module() {
    let app = common::build_test_app();
    post_json(&app, "/modules/", empty_module("M1")).await;

    let response = put_json(
        &app,
        "/modules/M1",
        json!({"location": "Plant B", "sensors": [humidity_sensor("S1", 100)]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(get(&app, "/modules/M1").await).await;
    assert_eq!(json, empty_module("M1"));
}

#[tokio::test]
async fn update_nonexistent_module_returns_400() {
    let app = common::build_test_app();
    let response = put_json(&app, "/modules/nope", json!({"location": "X"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Module with moduleId nope not found.");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_module_returns_message_then_404() {
    let app = common::build_test_app();
    post_json(
        &app,
        "/modules/",
        json!({"moduleId": "M1", "location": "Plant A", "sensors": [humidity_sensor("S1", 45)]}),
    )
    .await;

    let response = delete(&app, "/modules/M1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Module with moduleId M1 deleted."})
    );

    assert_eq!(get(&app, "/modules/M1").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        get(&app, "/modules/M1/sensors/S1").await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(delete(&app, "/modules/M1").await.status(), StatusCode::NOT_FOUND);
}

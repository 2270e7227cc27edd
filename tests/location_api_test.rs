mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{response_bytes, response_json, TestApp};

fn sao_paulo() -> serde_json::Value {
    json!({
        "city": "São Paulo",
        "unity": "001",
        "state": "SP",
        "street": "Av. Paulista, 1000",
        "country": "Brasil"
    })
}

#[tokio::test]
async fn create_returns_full_record_and_rejects_active_duplicate() {
    let app = TestApp::new().await;

    let response = app.request(Method::POST, "/locations", Some(sao_paulo())).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert!(body["id"].as_i64().is_some());
    assert_eq!(body["city"], "São Paulo");
    assert_eq!(body["unity"], "001");
    assert_eq!(body["isActive"], true);

    let response = app.request(Method::POST, "/locations", Some(sao_paulo())).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response_json(response).await;
    assert_eq!(body["error"], "A location with this city and unit already exists.");
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn create_with_missing_field_is_bad_request() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::POST,
            "/locations",
            Some(json!({ "city": "Recife", "unity": "", "state": "PE", "street": "Rua A" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("country"));
    assert!(message.contains("unity"));
}

#[tokio::test]
async fn malformed_json_is_bad_request_not_unprocessable() {
    let app = TestApp::new().await;
    let response = app
        .request_raw(Method::POST, "/locations", "{\"city\": ")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request_raw(Method::POST, "/locations", "{\"city\": 12}")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/locations/abc", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_and_get_only_show_active_locations() {
    let app = TestApp::new().await;
    let kept = app.create_location("Santos", "01").await;
    let removed = app.create_location("Santos", "02").await;

    let response = app
        .request(Method::DELETE, &format!("/locations/{removed}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.request(Method::GET, "/locations", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![kept]);

    let response = app
        .request(Method::GET, &format!("/locations/{removed}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Deactivation is terminal
    let response = app
        .request(Method::DELETE, &format!("/locations/{removed}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_includes_inventory_rows() {
    let app = TestApp::new().await;
    let location = app.create_location("Campinas", "10").await;
    let material = app.create_material("Cement").await;
    app.create_inventory(location, material, 12).await;

    let response = app
        .request(Method::GET, &format!("/locations/{location}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["inventory"][0]["materialId"], material);
    assert_eq!(body["inventory"][0]["quantity"], 12);
}

#[tokio::test]
async fn update_replaces_fields_and_reports_duplicates_as_bad_request() {
    let app = TestApp::new().await;
    let first = app.create_location("Salvador", "A").await;
    let second = app.create_location("Salvador", "B").await;

    let response = app
        .request(
            Method::PUT,
            &format!("/locations/{second}"),
            Some(json!({ "city": "Salvador", "unity": "A", "state": "BA", "street": "Rua Chile" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(
            Method::PUT,
            &format!("/locations/{first}"),
            Some(json!({ "city": "Ilhéus", "unity": "A", "state": "BA", "street": "Rua Nova" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response_bytes(response).await.is_empty());

    let body = response_json(
        app.request(Method::GET, &format!("/locations/{first}"), None)
            .await,
    )
    .await;
    assert_eq!(body["city"], "Ilhéus");
    assert_eq!(body["street"], "Rua Nova");
    assert_eq!(body["country"], "Brasil");

    let response = app
        .request(
            Method::PUT,
            "/locations/999",
            Some(json!({ "city": "X", "unity": "Y", "state": "Z", "street": "W" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_blocked_by_positive_inventory() {
    let app = TestApp::new().await;
    let location = app.create_location("Manaus", "7").await;
    let material = app.create_material("Timber").await;
    let row = app.create_inventory(location, material, 3).await;

    let response = app
        .request(Method::DELETE, &format!("/locations/{location}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Cannot delete a location with positive inventory.");

    let response = app
        .request(
            Method::PATCH,
            &format!("/inventory/{row}"),
            Some(json!({ "quantity": 0 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .request(Method::DELETE, &format!("/locations/{location}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn city_unit_is_reusable_after_deactivation() {
    let app = TestApp::new().await;
    let first = app.create_location("Fortaleza", "1").await;
    app.request(Method::DELETE, &format!("/locations/{first}"), None)
        .await;

    let second = app.create_location("Fortaleza", "1").await;
    assert_ne!(first, second);
}

#[tokio::test]
async fn responses_carry_request_id_header() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/locations", None).await;
    assert!(response.headers().contains_key("x-request-id"));
}

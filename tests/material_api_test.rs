mod common;

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use common::{response_json, TestApp};

#[tokio::test]
async fn create_returns_id_with_location_header() {
    let app = TestApp::new().await;
    let response = app
        .request(Method::POST, "/materials", Some(json!({ "name": "Cement" })))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("location header");
    let body = response_json(response).await;
    let id = body["id"].as_i64().unwrap();
    assert_eq!(location, format!("/materials/{id}"));
    assert_eq!(body, json!({ "id": id }));
}

#[tokio::test]
async fn duplicate_active_name_is_bad_request() {
    let app = TestApp::new().await;
    app.create_material("Sand").await;

    let response = app
        .request(Method::POST, "/materials", Some(json!({ "name": "Sand" })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_json(response).await["error"], "Material already exists.");
}

#[tokio::test]
async fn missing_name_is_bad_request() {
    let app = TestApp::new().await;
    let response = app
        .request(Method::POST, "/materials", Some(json!({})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_update_and_delete_lifecycle() {
    let app = TestApp::new().await;
    let id = app.create_material("Gravel").await;

    let body = response_json(app.request(Method::GET, &format!("/materials/{id}"), None).await).await;
    assert_eq!(body, json!({ "id": id, "name": "Gravel", "isActive": true }));

    let response = app
        .request(
            Method::PUT,
            &format!("/materials/{id}"),
            Some(json!({ "name": "Crushed gravel" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .request(Method::DELETE, &format!("/materials/{id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    for method in [Method::GET, Method::DELETE] {
        let response = app
            .request(method, &format!("/materials/{id}"), None)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    let response = app
        .request(
            Method::PUT,
            &format!("/materials/{id}"),
            Some(json!({ "name": "Anything" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rename_onto_active_name_is_bad_request() {
    let app = TestApp::new().await;
    app.create_material("Lime").await;
    let clay = app.create_material("Clay").await;

    let response = app
        .request(
            Method::PUT,
            &format!("/materials/{clay}"),
            Some(json!({ "name": "Lime" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_ignores_existing_stock() {
    let app = TestApp::new().await;
    let location = app.create_location("Goiânia", "3").await;
    let material = app.create_material("Rebar").await;
    app.create_inventory(location, material, 40).await;

    let response = app
        .request(Method::DELETE, &format!("/materials/{material}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_filters_by_name_and_hides_inactive() {
    let app = TestApp::new().await;
    app.create_material("Steel").await;
    let wool = app.create_material("Steel wool").await;
    let gone = app.create_material("Copper").await;
    app.request(Method::DELETE, &format!("/materials/{gone}"), None)
        .await;

    let body = response_json(app.request(Method::GET, "/materials", None).await).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let body = response_json(
        app.request(Method::GET, "/materials?name=Steel%20wool", None)
            .await,
    )
    .await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], wool);
}

#[tokio::test]
async fn blank_name_filter_lists_everything() {
    let app = TestApp::new().await;
    app.create_material("Steel").await;
    app.create_material("Copper").await;

    let response = app.request(Method::GET, "/materials?name=", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

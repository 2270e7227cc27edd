#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use inventory_api::{app_router, config::AppConfig, db, AppState};

/// Helper harness for spinning up the full router backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // A single pooled connection keeps the in-memory database alive and shared
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool));
        Self {
            router: app_router(state.clone()),
            state,
        }
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Send a request whose body is passed through verbatim.
    pub async fn request_raw(&self, method: Method, uri: &str, raw: &'static str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(raw))
            .expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Creates an active location and returns its id.
    pub async fn create_location(&self, city: &str, unity: &str) -> i64 {
        let response = self
            .request(
                Method::POST,
                "/locations",
                Some(json!({
                    "city": city,
                    "unity": unity,
                    "state": "SP",
                    "street": "Av. Paulista, 1000",
                    "country": "Brasil"
                })),
            )
            .await;
        assert_eq!(response.status(), 201, "location fixture");
        response_json(response).await["id"].as_i64().expect("location id")
    }

    /// Creates an active material and returns its id.
    pub async fn create_material(&self, name: &str) -> i64 {
        let response = self
            .request(Method::POST, "/materials", Some(json!({ "name": name })))
            .await;
        assert_eq!(response.status(), 201, "material fixture");
        response_json(response).await["id"].as_i64().expect("material id")
    }

    /// Creates an inventory row and returns its id.
    pub async fn create_inventory(&self, location_id: i64, material_id: i64, quantity: i64) -> i64 {
        let response = self
            .request(
                Method::POST,
                "/inventory",
                Some(json!({
                    "location_id": location_id,
                    "material_id": material_id,
                    "quantity": quantity
                })),
            )
            .await;
        assert_eq!(response.status(), 201, "inventory fixture");
        response_json(response).await["id"].as_i64().expect("inventory id")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

pub async fn response_bytes(response: Response) -> Vec<u8> {
    body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes")
        .to_vec()
}

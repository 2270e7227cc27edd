//! Inventory API Library
//!
//! Locations, materials and the stock linking them, served over HTTP with
//! soft-delete lifecycle rules.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod repositories;
pub mod request_context;
pub mod services;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;

use crate::errors::ServiceError;
use crate::repositories::{SeaOrmStore, Store};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub services: handlers::AppServices,
}

impl AppState {
    /// State whose services persist through the given connection pool
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let store: Arc<dyn Store> = Arc::new(SeaOrmStore::new(db.clone()));
        Self::with_store(db, store)
    }

    /// State with an explicit store; `db` still backs the health probe
    pub fn with_store(db: Arc<DatabaseConnection>, store: Arc<dyn Store>) -> Self {
        Self {
            db,
            services: handlers::AppServices::new(store),
        }
    }
}

async fn route_not_found() -> ServiceError {
    ServiceError::NotFound("Route not found.".to_string())
}

/// Resource routes without any middleware
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/locations", handlers::locations::locations_routes())
        .nest("/materials", handlers::materials::materials_routes())
        .nest("/inventory", handlers::inventory::inventory_routes())
        .nest("/health", handlers::health::health_routes())
}

/// Deadline applied by [`app_router`]
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Complete application router: API, docs, request ids and HTTP tracing
pub fn app_router(state: AppState) -> Router {
    app_router_with_timeout(state, DEFAULT_REQUEST_TIMEOUT)
}

/// [`app_router`] with an explicit per-request deadline
pub fn app_router_with_timeout(state: AppState, request_timeout: Duration) -> Router {
    let router = Router::new()
        .merge(api_routes())
        .fallback(route_not_found)
        .with_state(state)
        .merge(openapi::swagger_ui());
    with_http_layers(router, request_timeout)
}

fn with_http_layers(router: Router, request_timeout: Duration) -> Router {
    router
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::map_response(timeout_as_error))
        // HTTP tracing layer for consistent request/response telemetry
        .layer(request_context::configure_http_tracing())
        // Ensure every request carries a request id for traceability
        .layer(middleware::from_fn(request_context::request_id_middleware))
}

/// Gives the timeout layer's bare 408 the shared error body
async fn timeout_as_error(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return ServiceError::Timeout("Request timed out.".to_string()).into_response();
    }
    response
}

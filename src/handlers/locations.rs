use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use super::extract::{AppJson, AppPath};
use crate::errors::ServiceError;
use crate::services::locations::{CreateLocationRequest, LocationResponse, UpdateLocationRequest};
use crate::AppState;

/// Routes mounted under `/locations`
pub fn locations_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_locations).post(create_location))
        .route(
            "/:id",
            get(get_location)
                .put(update_location)
                .delete(delete_location),
        )
}

/// List active locations
#[utoipa::path(
    get,
    path = "/locations",
    responses(
        (status = 200, description = "Active locations", body = [LocationResponse]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "locations"
)]
pub async fn list_locations(
    State(state): State<AppState>,
) -> Result<Json<Vec<LocationResponse>>, ServiceError> {
    Ok(Json(state.services.locations.list().await?))
}

/// Get an active location with its inventory rows
#[utoipa::path(
    get,
    path = "/locations/{id}",
    params(("id" = i32, Path, description = "Location id")),
    responses(
        (status = 200, description = "Location found", body = LocationResponse),
        (status = 400, description = "Malformed id", body = crate::errors::ErrorResponse),
        (status = 404, description = "Location missing or inactive", body = crate::errors::ErrorResponse)
    ),
    tag = "locations"
)]
pub async fn get_location(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<LocationResponse>, ServiceError> {
    Ok(Json(state.services.locations.get(id).await?))
}

/// Create a location
#[utoipa::path(
    post,
    path = "/locations",
    request_body = CreateLocationRequest,
    responses(
        (status = 201, description = "Location created", body = LocationResponse),
        (status = 400, description = "Missing or empty fields", body = crate::errors::ErrorResponse),
        (status = 409, description = "Active location with the same city and unit exists", body = crate::errors::ErrorResponse)
    ),
    tag = "locations"
)]
pub async fn create_location(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateLocationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.locations.create(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a location's fields
#[utoipa::path(
    put,
    path = "/locations/{id}",
    params(("id" = i32, Path, description = "Location id")),
    request_body = UpdateLocationRequest,
    responses(
        (status = 204, description = "Location updated"),
        (status = 400, description = "Invalid fields or duplicate city and unit", body = crate::errors::ErrorResponse),
        (status = 404, description = "Location missing or inactive", body = crate::errors::ErrorResponse)
    ),
    tag = "locations"
)]
pub async fn update_location(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateLocationRequest>,
) -> Result<StatusCode, ServiceError> {
    state.services.locations.update(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deactivate a location without stock
#[utoipa::path(
    delete,
    path = "/locations/{id}",
    params(("id" = i32, Path, description = "Location id")),
    responses(
        (status = 200, description = "Location deactivated"),
        (status = 400, description = "Location still holds inventory", body = crate::errors::ErrorResponse),
        (status = 404, description = "Location missing or inactive", body = crate::errors::ErrorResponse)
    ),
    tag = "locations"
)]
pub async fn delete_location(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, ServiceError> {
    state.services.locations.deactivate(id).await?;
    Ok(StatusCode::OK)
}

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use super::extract::{AppJson, AppPath, AppQuery};
use crate::errors::ServiceError;
use crate::services::inventory::{
    InventoryQuery, InventoryRecord, InventoryRequest, InventoryView, QuantityRequest,
};
use crate::services::CreatedId;
use crate::AppState;

/// Routes mounted under `/inventory`
pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inventory).post(create_inventory))
        .route(
            "/:id",
            get(get_inventory)
                .put(update_inventory)
                .patch(patch_inventory)
                .delete(delete_inventory),
        )
}

/// List inventory rows, ordered by material then location
#[utoipa::path(
    get,
    path = "/inventory",
    params(InventoryQuery),
    responses(
        (status = 200, description = "Inventory rows", body = [InventoryRecord]),
        (status = 400, description = "Malformed filter", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_inventory(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<InventoryQuery>,
) -> Result<Json<Vec<InventoryRecord>>, ServiceError> {
    Ok(Json(state.services.inventory.list(query).await?))
}

#[utoipa::path(
    get,
    path = "/inventory/{id}",
    params(("id" = i32, Path, description = "Inventory id")),
    responses(
        (status = 200, description = "Inventory row", body = InventoryView),
        (status = 404, description = "Row missing or its location is inactive", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn get_inventory(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<InventoryView>, ServiceError> {
    Ok(Json(state.services.inventory.get(id).await?))
}

/// Create an inventory row for a location/material pair
#[utoipa::path(
    post,
    path = "/inventory",
    request_body = InventoryRequest,
    responses(
        (status = 201, description = "Inventory created", body = CreatedId,
            headers(("Location" = String, description = "Path of the new inventory row"))
        ),
        (status = 400, description = "Invalid fields, unknown references or duplicate pair", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn create_inventory(
    State(state): State<AppState>,
    AppJson(payload): AppJson<InventoryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.inventory.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/inventory/{}", created.id))],
        Json(created),
    ))
}

/// Replace an inventory row
#[utoipa::path(
    put,
    path = "/inventory/{id}",
    params(("id" = i32, Path, description = "Inventory id")),
    request_body = InventoryRequest,
    responses(
        (status = 204, description = "Inventory replaced"),
        (status = 400, description = "Invalid fields, unknown references or duplicate pair", body = crate::errors::ErrorResponse),
        (status = 403, description = "Location is inactive", body = crate::errors::ErrorResponse),
        (status = 404, description = "Inventory not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn update_inventory(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<InventoryRequest>,
) -> Result<StatusCode, ServiceError> {
    state.services.inventory.update(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Set the quantity of an inventory row
#[utoipa::path(
    patch,
    path = "/inventory/{id}",
    params(("id" = i32, Path, description = "Inventory id")),
    request_body = QuantityRequest,
    responses(
        (status = 204, description = "Quantity updated"),
        (status = 400, description = "Missing or negative quantity", body = crate::errors::ErrorResponse),
        (status = 403, description = "Location is inactive", body = crate::errors::ErrorResponse),
        (status = 404, description = "Inventory not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn patch_inventory(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<QuantityRequest>,
) -> Result<StatusCode, ServiceError> {
    state.services.inventory.set_quantity(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deactivate an empty inventory row
#[utoipa::path(
    delete,
    path = "/inventory/{id}",
    params(("id" = i32, Path, description = "Inventory id")),
    responses(
        (status = 200, description = "Inventory deactivated"),
        (status = 400, description = "Row still holds quantity", body = crate::errors::ErrorResponse),
        (status = 404, description = "Row missing or its location is inactive", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn delete_inventory(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, ServiceError> {
    state.services.inventory.deactivate(id).await?;
    Ok(StatusCode::OK)
}

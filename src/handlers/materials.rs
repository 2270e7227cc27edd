use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use super::extract::{AppJson, AppPath, AppQuery};
use crate::errors::ServiceError;
use crate::services::materials::{MaterialQuery, MaterialRequest, MaterialResponse};
use crate::services::CreatedId;
use crate::AppState;

/// Routes mounted under `/materials`
pub fn materials_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_materials).post(create_material))
        .route(
            "/:id",
            get(get_material)
                .put(update_material)
                .delete(delete_material),
        )
}

/// List active materials
#[utoipa::path(
    get,
    path = "/materials",
    params(MaterialQuery),
    responses(
        (status = 200, description = "Active materials", body = [MaterialResponse]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "materials"
)]
pub async fn list_materials(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<MaterialQuery>,
) -> Result<Json<Vec<MaterialResponse>>, ServiceError> {
    Ok(Json(state.services.materials.list(query).await?))
}

#[utoipa::path(
    get,
    path = "/materials/{id}",
    params(("id" = i32, Path, description = "Material id")),
    responses(
        (status = 200, description = "Material found", body = MaterialResponse),
        (status = 404, description = "Material missing or inactive", body = crate::errors::ErrorResponse)
    ),
    tag = "materials"
)]
pub async fn get_material(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MaterialResponse>, ServiceError> {
    Ok(Json(state.services.materials.get(id).await?))
}

/// Create a material
#[utoipa::path(
    post,
    path = "/materials",
    request_body = MaterialRequest,
    responses(
        (status = 201, description = "Material created", body = CreatedId,
            headers(("Location" = String, description = "Path of the new material"))
        ),
        (status = 400, description = "Missing name or duplicate active material", body = crate::errors::ErrorResponse)
    ),
    tag = "materials"
)]
pub async fn create_material(
    State(state): State<AppState>,
    AppJson(payload): AppJson<MaterialRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.materials.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/materials/{}", created.id))],
        Json(created),
    ))
}

/// Rename a material
#[utoipa::path(
    put,
    path = "/materials/{id}",
    params(("id" = i32, Path, description = "Material id")),
    request_body = MaterialRequest,
    responses(
        (status = 204, description = "Material renamed"),
        (status = 400, description = "Missing name or duplicate active material", body = crate::errors::ErrorResponse),
        (status = 404, description = "Material missing or inactive", body = crate::errors::ErrorResponse)
    ),
    tag = "materials"
)]
pub async fn update_material(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<MaterialRequest>,
) -> Result<StatusCode, ServiceError> {
    state.services.materials.update(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deactivate a material
#[utoipa::path(
    delete,
    path = "/materials/{id}",
    params(("id" = i32, Path, description = "Material id")),
    responses(
        (status = 200, description = "Material deactivated"),
        (status = 404, description = "Material missing or inactive", body = crate::errors::ErrorResponse)
    ),
    tag = "materials"
)]
pub async fn delete_material(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, ServiceError> {
    state.services.materials.deactivate(id).await?;
    Ok(StatusCode::OK)
}

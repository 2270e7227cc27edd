use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{empty_as_none, on_unique_violation, CreatedId};
use crate::entities::material;
use crate::errors::ServiceError;
use crate::repositories::Store;

const ALREADY_EXISTS: &str = "Material already exists.";
const NOT_FOUND: &str = "Material not found.";

/// Payload for creating or renaming a material
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct MaterialRequest {
    #[validate(required, length(min = 1))]
    #[schema(example = "Cement")]
    pub name: Option<String>,
}

/// Query parameters for `GET /materials`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MaterialQuery {
    /// Exact material name; blank means no filter
    #[serde(default, deserialize_with = "empty_as_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialResponse {
    pub id: i32,
    pub name: String,
    pub is_active: bool,
}

impl From<material::Model> for MaterialResponse {
    fn from(model: material::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            is_active: model.is_active,
        }
    }
}

#[derive(Clone)]
pub struct MaterialService {
    store: Arc<dyn Store>,
}

impl MaterialService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn active_material(&self, id: i32) -> Result<material::Model, ServiceError> {
        self.store
            .find_material(id)
            .await?
            .filter(|m| m.is_active)
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: MaterialQuery) -> Result<Vec<MaterialResponse>, ServiceError> {
        let materials = self
            .store
            .list_active_materials(query.name.as_deref())
            .await?;
        Ok(materials.into_iter().map(MaterialResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<MaterialResponse, ServiceError> {
        Ok(self.active_material(id).await?.into())
    }

    #[instrument(skip(self, request))]
    pub async fn create(&self, request: MaterialRequest) -> Result<CreatedId, ServiceError> {
        request.validate()?;
        let name = request.name.unwrap_or_default();

        if self.store.find_active_material_by_name(&name).await?.is_some() {
            return Err(ServiceError::Duplicate(ALREADY_EXISTS.to_string()));
        }

        let created = self.store.insert_material(&name).await.map_err(|e| {
            on_unique_violation(e, ServiceError::Duplicate(ALREADY_EXISTS.to_string()))
        })?;

        info!(material_id = created.id, "Material created");
        Ok(CreatedId { id: created.id })
    }

    #[instrument(skip(self, request))]
    pub async fn update(&self, id: i32, request: MaterialRequest) -> Result<(), ServiceError> {
        request.validate()?;
        let name = request.name.unwrap_or_default();
        self.active_material(id).await?;

        let clash = self.store.find_active_material_by_name(&name).await?;
        if clash.is_some_and(|other| other.id != id) {
            return Err(ServiceError::Duplicate(ALREADY_EXISTS.to_string()));
        }

        self.store.rename_material(id, &name).await.map_err(|e| {
            on_unique_violation(e, ServiceError::Duplicate(ALREADY_EXISTS.to_string()))
        })?;

        info!(material_id = id, "Material updated");
        Ok(())
    }

    /// Soft-deletes a material; existing inventory rows are left untouched
    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: i32) -> Result<(), ServiceError> {
        self.active_material(id).await?;
        self.store.deactivate_material(id).await?;
        info!(material_id = id, "Material deactivated");
        Ok(())
    }
}

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{empty_as_none, on_unique_violation, CreatedId};
use crate::entities::inventory;
use crate::errors::ServiceError;
use crate::repositories::{InventoryFields, InventoryFilter, Store};

const NOT_FOUND: &str = "Inventory not found.";
const LOCATION_HIDDEN: &str = "Location not found.";
const LOCATION_INACTIVE: &str = "Location is inactive.";
const PAIR_TAKEN: &str = "Inventory with this location_id and material_id already exists.";
const NEGATIVE_QUANTITY: &str = "Quantity must be greater than or equal to 0.";
const HAS_QUANTITY: &str = "Cannot delete inventory with existing quantity.";

/// Payload for `POST /inventory` and `PUT /inventory/{id}`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct InventoryRequest {
    #[validate(required)]
    #[schema(example = 1)]
    pub location_id: Option<i32>,
    #[validate(required)]
    #[schema(example = 1)]
    pub material_id: Option<i32>,
    #[validate(required)]
    #[schema(example = 100, minimum = 0)]
    pub quantity: Option<i32>,
}

/// Payload for `PATCH /inventory/{id}`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct QuantityRequest {
    #[validate(required)]
    #[schema(example = 0, minimum = 0)]
    pub quantity: Option<i32>,
}

/// Query parameters for `GET /inventory`
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InventoryQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub location_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub material_id: Option<i32>,
    /// Inclusive lower bound on quantity
    #[serde(default, deserialize_with = "empty_as_none")]
    pub quantity_min: Option<i32>,
}

impl From<InventoryQuery> for InventoryFilter {
    fn from(query: InventoryQuery) -> Self {
        Self {
            location_id: query.location_id,
            material_id: query.material_id,
            quantity_min: query.quantity_min,
        }
    }
}

/// Single inventory row as returned by `GET /inventory/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryView {
    pub location_id: i32,
    pub material_id: i32,
    pub quantity: i32,
}

/// Inventory row as returned by listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub id: i32,
    pub location_id: i32,
    pub material_id: i32,
    pub quantity: i32,
    pub is_active: bool,
}

impl From<inventory::Model> for InventoryRecord {
    fn from(model: inventory::Model) -> Self {
        Self {
            id: model.id,
            location_id: model.location_id,
            material_id: model.material_id,
            quantity: model.quantity,
            is_active: model.is_active,
        }
    }
}

fn checked_quantity(quantity: Option<i32>) -> Result<i32, ServiceError> {
    match quantity {
        Some(q) if q >= 0 => Ok(q),
        Some(_) => Err(ServiceError::ValidationError(NEGATIVE_QUANTITY.to_string())),
        None => Err(ServiceError::ValidationError(
            "Missing or empty required fields: quantity".to_string(),
        )),
    }
}

impl InventoryRequest {
    fn into_fields(self) -> Result<InventoryFields, ServiceError> {
        self.validate()?;
        let quantity = checked_quantity(self.quantity)?;
        match (self.location_id, self.material_id) {
            (Some(location_id), Some(material_id)) => Ok(InventoryFields {
                location_id,
                material_id,
                quantity,
            }),
            _ => Err(ServiceError::ValidationError(
                "Missing or empty required fields: location_id, material_id".to_string(),
            )),
        }
    }
}

/// Stock rows pairing a location with a material
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn Store>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Loads a row for reading or deletion; rows at inactive locations are hidden
    async fn visible_row(&self, id: i32) -> Result<inventory::Model, ServiceError> {
        let (row, location) = self
            .store
            .find_inventory_with_location(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))?;

        if location.is_some_and(|l| !l.is_active) {
            return Err(ServiceError::NotFound(LOCATION_HIDDEN.to_string()));
        }
        Ok(row)
    }

    /// Loads a row for mutation; rows at inactive locations are forbidden
    async fn writable_row(&self, id: i32) -> Result<inventory::Model, ServiceError> {
        let (row, location) = self
            .store
            .find_inventory_with_location(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))?;

        if location.is_some_and(|l| !l.is_active) {
            warn!(inventory_id = id, "Rejecting write to inventory at inactive location");
            return Err(ServiceError::Forbidden(LOCATION_INACTIVE.to_string()));
        }
        Ok(row)
    }

    async fn check_references(&self, fields: &InventoryFields) -> Result<(), ServiceError> {
        if self.store.find_location(fields.location_id).await?.is_none() {
            return Err(ServiceError::ValidationError("Invalid location_id.".to_string()));
        }
        if self.store.find_material(fields.material_id).await?.is_none() {
            return Err(ServiceError::ValidationError("Invalid material_id.".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: InventoryQuery) -> Result<Vec<InventoryRecord>, ServiceError> {
        let rows = self.store.list_inventory(query.into()).await?;
        Ok(rows.into_iter().map(InventoryRecord::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<InventoryView, ServiceError> {
        let row = self.visible_row(id).await?;
        Ok(InventoryView {
            location_id: row.location_id,
            material_id: row.material_id,
            quantity: row.quantity,
        })
    }

    #[instrument(skip(self, request))]
    pub async fn create(&self, request: InventoryRequest) -> Result<CreatedId, ServiceError> {
        let fields = request.into_fields()?;
        self.check_references(&fields).await?;

        if self
            .store
            .find_inventory_by_pair(fields.location_id, fields.material_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::Duplicate(PAIR_TAKEN.to_string()));
        }

        let created = self
            .store
            .insert_inventory(fields)
            .await
            .map_err(|e| on_unique_violation(e, ServiceError::Duplicate(PAIR_TAKEN.to_string())))?;

        info!(
            inventory_id = created.id,
            location_id = created.location_id,
            material_id = created.material_id,
            quantity = created.quantity,
            "Inventory created"
        );
        Ok(CreatedId { id: created.id })
    }

    /// Replaces location, material and quantity of an existing row
    #[instrument(skip(self, request))]
    pub async fn update(&self, id: i32, request: InventoryRequest) -> Result<(), ServiceError> {
        let fields = request.into_fields()?;
        self.writable_row(id).await?;
        self.check_references(&fields).await?;

        let clash = self
            .store
            .find_inventory_by_pair(fields.location_id, fields.material_id)
            .await?;
        if clash.is_some_and(|other| other.id != id) {
            return Err(ServiceError::Duplicate(PAIR_TAKEN.to_string()));
        }

        self.store
            .update_inventory(id, fields)
            .await
            .map_err(|e| on_unique_violation(e, ServiceError::Duplicate(PAIR_TAKEN.to_string())))?;

        info!(inventory_id = id, quantity = fields.quantity, "Inventory replaced");
        Ok(())
    }

    #[instrument(skip(self, request))]
    pub async fn set_quantity(&self, id: i32, request: QuantityRequest) -> Result<(), ServiceError> {
        request.validate()?;
        let quantity = checked_quantity(request.quantity)?;
        self.writable_row(id).await?;

        self.store.set_inventory_quantity(id, quantity).await?;
        info!(inventory_id = id, quantity, "Inventory quantity updated");
        Ok(())
    }

    /// Soft-deletes an empty row
    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: i32) -> Result<(), ServiceError> {
        let row = self.visible_row(id).await?;
        if row.quantity > 0 {
            return Err(ServiceError::InvalidState(HAS_QUANTITY.to_string()));
        }

        self.store.deactivate_inventory(id).await?;
        info!(inventory_id = id, "Inventory deactivated");
        Ok(())
    }
}

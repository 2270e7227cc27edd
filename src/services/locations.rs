use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use super::{inventory::InventoryRecord, on_unique_violation};
use crate::entities::location;
use crate::errors::ServiceError;
use crate::repositories::{LocationFields, Store};

const CITY_UNIT_TAKEN: &str = "A location with this city and unit already exists.";
const NOT_FOUND: &str = "Location not found.";
const HAS_STOCK: &str = "Cannot delete a location with positive inventory.";

/// Payload for `POST /locations`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateLocationRequest {
    #[validate(required, length(min = 1))]
    #[schema(example = "São Paulo")]
    pub city: Option<String>,
    /// Unit code within the city
    #[validate(required, length(min = 1))]
    #[schema(example = "001")]
    pub unity: Option<String>,
    #[validate(required, length(min = 1))]
    #[schema(example = "SP")]
    pub state: Option<String>,
    #[validate(required, length(min = 1))]
    #[schema(example = "Av. Paulista, 1000")]
    pub street: Option<String>,
    #[validate(required, length(min = 1))]
    #[schema(example = "Brasil")]
    pub country: Option<String>,
}

/// Payload for `PUT /locations/{id}`. Omitting `country` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateLocationRequest {
    #[validate(required, length(min = 1))]
    pub city: Option<String>,
    #[validate(required, length(min = 1))]
    pub unity: Option<String>,
    #[validate(required, length(min = 1))]
    pub state: Option<String>,
    #[validate(required, length(min = 1))]
    pub street: Option<String>,
    #[validate(length(min = 1))]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub id: i32,
    pub city: String,
    pub unity: String,
    pub state: String,
    pub street: String,
    pub country: String,
    pub is_active: bool,
    /// Present on single-location reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Vec<InventoryRecord>>,
}

impl From<location::Model> for LocationResponse {
    fn from(model: location::Model) -> Self {
        Self {
            id: model.id,
            city: model.city,
            unity: model.unit,
            state: model.state,
            street: model.street,
            country: model.country,
            is_active: model.is_active,
            inventory: None,
        }
    }
}

/// Location lifecycle: create, replace, soft-delete and read
#[derive(Clone)]
pub struct LocationService {
    store: Arc<dyn Store>,
}

impl LocationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn active_location(&self, id: i32) -> Result<location::Model, ServiceError> {
        self.store
            .find_location(id)
            .await?
            .filter(|l| l.is_active)
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<LocationResponse>, ServiceError> {
        let locations = self.store.list_active_locations().await?;
        Ok(locations.into_iter().map(LocationResponse::from).collect())
    }

    /// Returns an active location with its inventory rows
    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<LocationResponse, ServiceError> {
        let location = self.active_location(id).await?;
        let rows = self.store.inventory_for_location(id).await?;

        let mut response = LocationResponse::from(location);
        response.inventory = Some(rows.into_iter().map(InventoryRecord::from).collect());
        Ok(response)
    }

    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        request: CreateLocationRequest,
    ) -> Result<LocationResponse, ServiceError> {
        request.validate()?;
        let fields = LocationFields {
            city: request.city.unwrap_or_default(),
            unit: request.unity.unwrap_or_default(),
            state: request.state.unwrap_or_default(),
            street: request.street.unwrap_or_default(),
            country: request.country.unwrap_or_default(),
        };

        if self
            .store
            .find_active_location_by_city_unit(&fields.city, &fields.unit)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(CITY_UNIT_TAKEN.to_string()));
        }

        let created = self.store.insert_location(fields).await.map_err(|e| {
            on_unique_violation(e, ServiceError::Conflict(CITY_UNIT_TAKEN.to_string()))
        })?;

        info!(location_id = created.id, "Location created");
        Ok(created.into())
    }

    #[instrument(skip(self, request))]
    pub async fn update(&self, id: i32, request: UpdateLocationRequest) -> Result<(), ServiceError> {
        request.validate()?;
        let existing = self.active_location(id).await?;

        let fields = LocationFields {
            city: request.city.unwrap_or_default(),
            unit: request.unity.unwrap_or_default(),
            state: request.state.unwrap_or_default(),
            street: request.street.unwrap_or_default(),
            country: request.country.unwrap_or(existing.country),
        };

        let clash = self
            .store
            .find_active_location_by_city_unit(&fields.city, &fields.unit)
            .await?;
        if clash.is_some_and(|other| other.id != id) {
            return Err(ServiceError::Duplicate(CITY_UNIT_TAKEN.to_string()));
        }

        self.store.update_location(id, fields).await.map_err(|e| {
            on_unique_violation(e, ServiceError::Duplicate(CITY_UNIT_TAKEN.to_string()))
        })?;

        info!(location_id = id, "Location updated");
        Ok(())
    }

    /// Soft-deletes a location that holds no stock
    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: i32) -> Result<(), ServiceError> {
        self.active_location(id).await?;

        if self.store.location_has_stock(id).await? {
            warn!(location_id = id, "Refusing to deactivate location with stock");
            return Err(ServiceError::InvalidState(HAS_STOCK.to_string()));
        }

        self.store.deactivate_location(id).await?;
        info!(location_id = id, "Location deactivated");
        Ok(())
    }
}

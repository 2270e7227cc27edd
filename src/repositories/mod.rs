//! Storage port used by the services, plus its two implementations.
//!
//! [`SeaOrmStore`] talks to the real database; [`InMemoryStore`] keeps the
//! same constraints in process memory and backs the service tests.

use async_trait::async_trait;
use sea_orm::DbErr;

use crate::entities::{inventory, location, material};

pub mod memory;
pub mod sea_orm_store;

pub use memory::InMemoryStore;
pub use sea_orm_store::SeaOrmStore;

/// Errors raised by a store implementation
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write collided with a unique index; carries the constraint detail
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Field values written when creating or replacing a location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFields {
    pub city: String,
    pub unit: String,
    pub state: String,
    pub street: String,
    pub country: String,
}

/// Field values written when creating or replacing an inventory row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryFields {
    pub location_id: i32,
    pub material_id: i32,
    pub quantity: i32,
}

/// Optional, AND-combined filters for listing inventory rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    pub location_id: Option<i32>,
    pub material_id: Option<i32>,
    /// Inclusive lower bound on quantity
    pub quantity_min: Option<i32>,
}

impl InventoryFilter {
    pub fn matches(&self, row: &inventory::Model) -> bool {
        self.location_id.map_or(true, |id| row.location_id == id)
            && self.material_id.map_or(true, |id| row.material_id == id)
            && self.quantity_min.map_or(true, |min| row.quantity >= min)
    }
}

#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Looks a location up regardless of its active flag
    async fn find_location(&self, id: i32) -> StoreResult<Option<location::Model>>;

    async fn list_active_locations(&self) -> StoreResult<Vec<location::Model>>;

    async fn find_active_location_by_city_unit(
        &self,
        city: &str,
        unit: &str,
    ) -> StoreResult<Option<location::Model>>;

    async fn insert_location(&self, fields: LocationFields) -> StoreResult<location::Model>;

    async fn update_location(&self, id: i32, fields: LocationFields) -> StoreResult<()>;

    async fn deactivate_location(&self, id: i32) -> StoreResult<()>;
}

#[async_trait]
pub trait MaterialStore: Send + Sync {
    /// Looks a material up regardless of its active flag
    async fn find_material(&self, id: i32) -> StoreResult<Option<material::Model>>;

    /// Active materials, optionally restricted to an exact name
    async fn list_active_materials(&self, name: Option<&str>)
        -> StoreResult<Vec<material::Model>>;

    async fn find_active_material_by_name(&self, name: &str)
        -> StoreResult<Option<material::Model>>;

    async fn insert_material(&self, name: &str) -> StoreResult<material::Model>;

    async fn rename_material(&self, id: i32, name: &str) -> StoreResult<()>;

    async fn deactivate_material(&self, id: i32) -> StoreResult<()>;
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn find_inventory(&self, id: i32) -> StoreResult<Option<inventory::Model>>;

    /// Loads a row together with the location it points at, if that location exists
    async fn find_inventory_with_location(
        &self,
        id: i32,
    ) -> StoreResult<Option<(inventory::Model, Option<location::Model>)>>;

    /// The row holding a (location, material) pair, active or not
    async fn find_inventory_by_pair(
        &self,
        location_id: i32,
        material_id: i32,
    ) -> StoreResult<Option<inventory::Model>>;

    async fn inventory_for_location(&self, location_id: i32)
        -> StoreResult<Vec<inventory::Model>>;

    /// True when any row at the location, active or not, has a positive quantity
    async fn location_has_stock(&self, location_id: i32) -> StoreResult<bool>;

    /// Rows matching `filter`, ordered by material id then location id
    async fn list_inventory(&self, filter: InventoryFilter) -> StoreResult<Vec<inventory::Model>>;

    async fn insert_inventory(&self, fields: InventoryFields) -> StoreResult<inventory::Model>;

    async fn update_inventory(&self, id: i32, fields: InventoryFields) -> StoreResult<()>;

    async fn set_inventory_quantity(&self, id: i32, quantity: i32) -> StoreResult<()>;

    async fn deactivate_inventory(&self, id: i32) -> StoreResult<()>;
}

/// Everything the services need from persistence
pub trait Store: LocationStore + MaterialStore + InventoryStore {}

impl<T> Store for T where T: LocationStore + MaterialStore + InventoryStore {}

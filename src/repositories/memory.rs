use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::{
    InventoryFields, InventoryFilter, InventoryStore, LocationFields, LocationStore,
    MaterialStore, StoreError, StoreResult,
};
use crate::entities::{inventory, location, material};

#[derive(Debug, Default)]
struct Tables {
    locations: BTreeMap<i32, location::Model>,
    materials: BTreeMap<i32, material::Model>,
    inventory: BTreeMap<i32, inventory::Model>,
    next_location_id: i32,
    next_material_id: i32,
    next_inventory_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

/// Process-local store enforcing the same unique indexes as the database schema.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Tables {
    fn location_conflict(&self, city: &str, unit: &str, excluding: Option<i32>) -> bool {
        self.locations.values().any(|l| {
            l.is_active && l.city == city && l.unit == unit && Some(l.id) != excluding
        })
    }

    fn material_conflict(&self, name: &str, excluding: Option<i32>) -> bool {
        self.materials
            .values()
            .any(|m| m.is_active && m.name == name && Some(m.id) != excluding)
    }

    fn inventory_conflict(&self, location_id: i32, material_id: i32, excluding: Option<i32>) -> bool {
        self.inventory.values().any(|row| {
            row.location_id == location_id
                && row.material_id == material_id
                && Some(row.id) != excluding
        })
    }

    fn check_references(&self, fields: &InventoryFields) -> StoreResult<()> {
        if !self.locations.contains_key(&fields.location_id)
            || !self.materials.contains_key(&fields.material_id)
        {
            return Err(StoreError::Database(sea_orm::DbErr::Custom(
                "FOREIGN KEY constraint failed".to_string(),
            )));
        }
        Ok(())
    }
}

fn unique_violation(index: &str) -> StoreError {
    StoreError::UniqueViolation(index.to_string())
}

#[async_trait]
impl LocationStore for InMemoryStore {
    async fn find_location(&self, id: i32) -> StoreResult<Option<location::Model>> {
        Ok(self.tables().locations.get(&id).cloned())
    }

    async fn list_active_locations(&self) -> StoreResult<Vec<location::Model>> {
        Ok(self
            .tables()
            .locations
            .values()
            .filter(|l| l.is_active)
            .cloned()
            .collect())
    }

    async fn find_active_location_by_city_unit(
        &self,
        city: &str,
        unit: &str,
    ) -> StoreResult<Option<location::Model>> {
        Ok(self
            .tables()
            .locations
            .values()
            .find(|l| l.is_active && l.city == city && l.unit == unit)
            .cloned())
    }

    async fn insert_location(&self, fields: LocationFields) -> StoreResult<location::Model> {
        let mut tables = self.tables();
        if tables.location_conflict(&fields.city, &fields.unit, None) {
            return Err(unique_violation("idx_locations_active_city_unit"));
        }
        let model = location::Model {
            id: next_id(&mut tables.next_location_id),
            city: fields.city,
            unit: fields.unit,
            state: fields.state,
            street: fields.street,
            country: fields.country,
            is_active: true,
        };
        tables.locations.insert(model.id, model.clone());
        Ok(model)
    }

    async fn update_location(&self, id: i32, fields: LocationFields) -> StoreResult<()> {
        let mut tables = self.tables();
        let is_active = tables.locations.get(&id).map(|l| l.is_active);
        if is_active == Some(true) && tables.location_conflict(&fields.city, &fields.unit, Some(id)) {
            return Err(unique_violation("idx_locations_active_city_unit"));
        }
        if let Some(existing) = tables.locations.get_mut(&id) {
            existing.city = fields.city;
            existing.unit = fields.unit;
            existing.state = fields.state;
            existing.street = fields.street;
            existing.country = fields.country;
        }
        Ok(())
    }

    async fn deactivate_location(&self, id: i32) -> StoreResult<()> {
        if let Some(existing) = self.tables().locations.get_mut(&id) {
            existing.is_active = false;
        }
        Ok(())
    }
}

#[async_trait]
impl MaterialStore for InMemoryStore {
    async fn find_material(&self, id: i32) -> StoreResult<Option<material::Model>> {
        Ok(self.tables().materials.get(&id).cloned())
    }

    async fn list_active_materials(
        &self,
        name: Option<&str>,
    ) -> StoreResult<Vec<material::Model>> {
        Ok(self
            .tables()
            .materials
            .values()
            .filter(|m| m.is_active && name.map_or(true, |n| m.name == n))
            .cloned()
            .collect())
    }

    async fn find_active_material_by_name(
        &self,
        name: &str,
    ) -> StoreResult<Option<material::Model>> {
        Ok(self
            .tables()
            .materials
            .values()
            .find(|m| m.is_active && m.name == name)
            .cloned())
    }

    async fn insert_material(&self, name: &str) -> StoreResult<material::Model> {
        let mut tables = self.tables();
        if tables.material_conflict(name, None) {
            return Err(unique_violation("idx_materials_active_name"));
        }
        let model = material::Model {
            id: next_id(&mut tables.next_material_id),
            name: name.to_string(),
            is_active: true,
        };
        tables.materials.insert(model.id, model.clone());
        Ok(model)
    }

    async fn rename_material(&self, id: i32, name: &str) -> StoreResult<()> {
        let mut tables = self.tables();
        let is_active = tables.materials.get(&id).map(|m| m.is_active);
        if is_active == Some(true) && tables.material_conflict(name, Some(id)) {
            return Err(unique_violation("idx_materials_active_name"));
        }
        if let Some(existing) = tables.materials.get_mut(&id) {
            existing.name = name.to_string();
        }
        Ok(())
    }

    async fn deactivate_material(&self, id: i32) -> StoreResult<()> {
        if let Some(existing) = self.tables().materials.get_mut(&id) {
            existing.is_active = false;
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for InMemoryStore {
    async fn find_inventory(&self, id: i32) -> StoreResult<Option<inventory::Model>> {
        Ok(self.tables().inventory.get(&id).cloned())
    }

    async fn find_inventory_with_location(
        &self,
        id: i32,
    ) -> StoreResult<Option<(inventory::Model, Option<location::Model>)>> {
        let tables = self.tables();
        Ok(tables.inventory.get(&id).map(|row| {
            let parent = tables.locations.get(&row.location_id).cloned();
            (row.clone(), parent)
        }))
    }

    async fn find_inventory_by_pair(
        &self,
        location_id: i32,
        material_id: i32,
    ) -> StoreResult<Option<inventory::Model>> {
        Ok(self
            .tables()
            .inventory
            .values()
            .find(|row| row.location_id == location_id && row.material_id == material_id)
            .cloned())
    }

    async fn inventory_for_location(
        &self,
        location_id: i32,
    ) -> StoreResult<Vec<inventory::Model>> {
        let mut rows: Vec<_> = self
            .tables()
            .inventory
            .values()
            .filter(|row| row.location_id == location_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| (row.material_id, row.id));
        Ok(rows)
    }

    async fn location_has_stock(&self, location_id: i32) -> StoreResult<bool> {
        Ok(self
            .tables()
            .inventory
            .values()
            .any(|row| row.location_id == location_id && row.quantity > 0))
    }

    async fn list_inventory(&self, filter: InventoryFilter) -> StoreResult<Vec<inventory::Model>> {
        let mut rows: Vec<_> = self
            .tables()
            .inventory
            .values()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect();
        rows.sort_by_key(|row| (row.material_id, row.location_id, row.id));
        Ok(rows)
    }

    async fn insert_inventory(&self, fields: InventoryFields) -> StoreResult<inventory::Model> {
        let mut tables = self.tables();
        tables.check_references(&fields)?;
        if tables.inventory_conflict(fields.location_id, fields.material_id, None) {
            return Err(unique_violation("idx_inventory_location_material"));
        }
        let model = inventory::Model {
            id: next_id(&mut tables.next_inventory_id),
            location_id: fields.location_id,
            material_id: fields.material_id,
            quantity: fields.quantity,
            is_active: true,
        };
        tables.inventory.insert(model.id, model.clone());
        Ok(model)
    }

    async fn update_inventory(&self, id: i32, fields: InventoryFields) -> StoreResult<()> {
        let mut tables = self.tables();
        tables.check_references(&fields)?;
        if tables.inventory_conflict(fields.location_id, fields.material_id, Some(id)) {
            return Err(unique_violation("idx_inventory_location_material"));
        }
        if let Some(row) = tables.inventory.get_mut(&id) {
            row.location_id = fields.location_id;
            row.material_id = fields.material_id;
            row.quantity = fields.quantity;
        }
        Ok(())
    }

    async fn set_inventory_quantity(&self, id: i32, quantity: i32) -> StoreResult<()> {
        if let Some(row) = self.tables().inventory.get_mut(&id) {
            row.quantity = quantity;
        }
        Ok(())
    }

    async fn deactivate_inventory(&self, id: i32) -> StoreResult<()> {
        if let Some(row) = self.tables().inventory.get_mut(&id) {
            row.is_active = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn fields(city: &str, unit: &str) -> LocationFields {
        LocationFields {
            city: city.to_string(),
            unit: unit.to_string(),
            state: "PE".to_string(),
            street: "Rua da Aurora".to_string(),
            country: "Brasil".to_string(),
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let store = InMemoryStore::new();
        let a = store.insert_material("iron").await.unwrap();
        let b = store.insert_material("copper").await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
    }

    #[tokio::test]
    async fn renaming_onto_an_active_name_is_rejected() {
        let store = InMemoryStore::new();
        store.insert_material("iron").await.unwrap();
        let copper = store.insert_material("copper").await.unwrap();

        let result = store.rename_material(copper.id, "iron").await;
        assert_matches!(result, Err(StoreError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn inactive_locations_release_their_city_unit() {
        let store = InMemoryStore::new();
        let first = store.insert_location(fields("Olinda", "7")).await.unwrap();
        assert_matches!(
            store.insert_location(fields("Olinda", "7")).await,
            Err(StoreError::UniqueViolation(_))
        );

        store.deactivate_location(first.id).await.unwrap();
        assert!(store.insert_location(fields("Olinda", "7")).await.is_ok());
    }

    #[tokio::test]
    async fn inventory_requires_existing_references() {
        let store = InMemoryStore::new();
        let result = store
            .insert_inventory(InventoryFields {
                location_id: 1,
                material_id: 1,
                quantity: 3,
            })
            .await;
        assert_matches!(result, Err(StoreError::Database(_)));
    }
}

use async_trait::async_trait;
use metrics::{counter, histogram};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use super::{
    InventoryFields, InventoryFilter, InventoryStore, LocationFields, LocationStore,
    MaterialStore, StoreError, StoreResult,
};
use crate::entities::{inventory, location, material};

/// Store backed by a sea-orm connection pool
#[derive(Debug, Clone)]
pub struct SeaOrmStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn classify(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::UniqueViolation(detail),
        _ => StoreError::Database(err),
    }
}

/// Runs one store operation, recording its latency and outcome
async fn observe<T, F>(operation: &'static str, fut: F) -> StoreResult<T>
where
    F: Future<Output = Result<T, DbErr>>,
{
    let started = Instant::now();
    let result = fut.await.map_err(classify);
    let elapsed = started.elapsed();

    let outcome = match &result {
        Ok(_) => "ok",
        Err(StoreError::UniqueViolation(detail)) => {
            debug!(operation, detail = %detail, "unique constraint rejected write");
            "conflict"
        }
        Err(StoreError::Database(e)) => {
            warn!(operation, error = %e, "store operation failed");
            "error"
        }
    };
    counter!("inventory_store.operations", 1, "operation" => operation, "outcome" => outcome);
    histogram!("inventory_store.duration", elapsed, "operation" => operation);

    result
}

#[async_trait]
impl LocationStore for SeaOrmStore {
    async fn find_location(&self, id: i32) -> StoreResult<Option<location::Model>> {
        observe("find_location", location::Entity::find_by_id(id).one(self.db())).await
    }

    async fn list_active_locations(&self) -> StoreResult<Vec<location::Model>> {
        observe(
            "list_active_locations",
            location::Entity::find()
                .filter(location::Column::IsActive.eq(true))
                .order_by_asc(location::Column::Id)
                .all(self.db()),
        )
        .await
    }

    async fn find_active_location_by_city_unit(
        &self,
        city: &str,
        unit: &str,
    ) -> StoreResult<Option<location::Model>> {
        observe(
            "find_active_location_by_city_unit",
            location::Entity::find()
                .filter(location::Column::IsActive.eq(true))
                .filter(location::Column::City.eq(city))
                .filter(location::Column::Unit.eq(unit))
                .one(self.db()),
        )
        .await
    }

    async fn insert_location(&self, fields: LocationFields) -> StoreResult<location::Model> {
        let model = location::ActiveModel {
            id: NotSet,
            city: Set(fields.city),
            unit: Set(fields.unit),
            state: Set(fields.state),
            street: Set(fields.street),
            country: Set(fields.country),
            is_active: Set(true),
        };
        observe("insert_location", model.insert(self.db())).await
    }

    async fn update_location(&self, id: i32, fields: LocationFields) -> StoreResult<()> {
        let model = location::ActiveModel {
            id: Set(id),
            city: Set(fields.city),
            unit: Set(fields.unit),
            state: Set(fields.state),
            street: Set(fields.street),
            country: Set(fields.country),
            is_active: NotSet,
        };
        observe("update_location", async {
            model.update(self.db()).await.map(|_| ())
        })
        .await
    }

    async fn deactivate_location(&self, id: i32) -> StoreResult<()> {
        observe("deactivate_location", async {
            location::Entity::update_many()
                .col_expr(location::Column::IsActive, Expr::value(false))
                .filter(location::Column::Id.eq(id))
                .exec(self.db())
                .await
                .map(|_| ())
        })
        .await
    }
}

#[async_trait]
impl MaterialStore for SeaOrmStore {
    async fn find_material(&self, id: i32) -> StoreResult<Option<material::Model>> {
        observe("find_material", material::Entity::find_by_id(id).one(self.db())).await
    }

    async fn list_active_materials(
        &self,
        name: Option<&str>,
    ) -> StoreResult<Vec<material::Model>> {
        let mut query = material::Entity::find().filter(material::Column::IsActive.eq(true));
        if let Some(name) = name {
            query = query.filter(material::Column::Name.eq(name));
        }
        observe(
            "list_active_materials",
            query.order_by_asc(material::Column::Id).all(self.db()),
        )
        .await
    }

    async fn find_active_material_by_name(
        &self,
        name: &str,
    ) -> StoreResult<Option<material::Model>> {
        observe(
            "find_active_material_by_name",
            material::Entity::find()
                .filter(material::Column::IsActive.eq(true))
                .filter(material::Column::Name.eq(name))
                .one(self.db()),
        )
        .await
    }

    async fn insert_material(&self, name: &str) -> StoreResult<material::Model> {
        let model = material::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            is_active: Set(true),
        };
        observe("insert_material", model.insert(self.db())).await
    }

    async fn rename_material(&self, id: i32, name: &str) -> StoreResult<()> {
        let model = material::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            is_active: NotSet,
        };
        observe("rename_material", async {
            model.update(self.db()).await.map(|_| ())
        })
        .await
    }

    async fn deactivate_material(&self, id: i32) -> StoreResult<()> {
        observe("deactivate_material", async {
            material::Entity::update_many()
                .col_expr(material::Column::IsActive, Expr::value(false))
                .filter(material::Column::Id.eq(id))
                .exec(self.db())
                .await
                .map(|_| ())
        })
        .await
    }
}

#[async_trait]
impl InventoryStore for SeaOrmStore {
    async fn find_inventory(&self, id: i32) -> StoreResult<Option<inventory::Model>> {
        observe("find_inventory", inventory::Entity::find_by_id(id).one(self.db())).await
    }

    async fn find_inventory_with_location(
        &self,
        id: i32,
    ) -> StoreResult<Option<(inventory::Model, Option<location::Model>)>> {
        observe(
            "find_inventory_with_location",
            inventory::Entity::find_by_id(id)
                .find_also_related(location::Entity)
                .one(self.db()),
        )
        .await
    }

    async fn find_inventory_by_pair(
        &self,
        location_id: i32,
        material_id: i32,
    ) -> StoreResult<Option<inventory::Model>> {
        observe(
            "find_inventory_by_pair",
            inventory::Entity::find()
                .filter(inventory::Column::LocationId.eq(location_id))
                .filter(inventory::Column::MaterialId.eq(material_id))
                .one(self.db()),
        )
        .await
    }

    async fn inventory_for_location(
        &self,
        location_id: i32,
    ) -> StoreResult<Vec<inventory::Model>> {
        observe(
            "inventory_for_location",
            inventory::Entity::find()
                .filter(inventory::Column::LocationId.eq(location_id))
                .order_by_asc(inventory::Column::MaterialId)
                .all(self.db()),
        )
        .await
    }

    async fn location_has_stock(&self, location_id: i32) -> StoreResult<bool> {
        observe("location_has_stock", async {
            inventory::Entity::find()
                .filter(inventory::Column::LocationId.eq(location_id))
                .filter(inventory::Column::Quantity.gt(0))
                .count(self.db())
                .await
                .map(|n| n > 0)
        })
        .await
    }

    async fn list_inventory(&self, filter: InventoryFilter) -> StoreResult<Vec<inventory::Model>> {
        let mut query = inventory::Entity::find();
        if let Some(location_id) = filter.location_id {
            query = query.filter(inventory::Column::LocationId.eq(location_id));
        }
        if let Some(material_id) = filter.material_id {
            query = query.filter(inventory::Column::MaterialId.eq(material_id));
        }
        if let Some(min) = filter.quantity_min {
            query = query.filter(inventory::Column::Quantity.gte(min));
        }
        observe(
            "list_inventory",
            query
                .order_by_asc(inventory::Column::MaterialId)
                .order_by_asc(inventory::Column::LocationId)
                .order_by_asc(inventory::Column::Id)
                .all(self.db()),
        )
        .await
    }

    async fn insert_inventory(&self, fields: InventoryFields) -> StoreResult<inventory::Model> {
        let model = inventory::ActiveModel {
            id: NotSet,
            location_id: Set(fields.location_id),
            material_id: Set(fields.material_id),
            quantity: Set(fields.quantity),
            is_active: Set(true),
        };
        observe("insert_inventory", model.insert(self.db())).await
    }

    async fn update_inventory(&self, id: i32, fields: InventoryFields) -> StoreResult<()> {
        let model = inventory::ActiveModel {
            id: Set(id),
            location_id: Set(fields.location_id),
            material_id: Set(fields.material_id),
            quantity: Set(fields.quantity),
            is_active: NotSet,
        };
        observe("update_inventory", async {
            model.update(self.db()).await.map(|_| ())
        })
        .await
    }

    async fn set_inventory_quantity(&self, id: i32, quantity: i32) -> StoreResult<()> {
        observe("set_inventory_quantity", async {
            inventory::Entity::update_many()
                .col_expr(inventory::Column::Quantity, Expr::value(quantity))
                .filter(inventory::Column::Id.eq(id))
                .exec(self.db())
                .await
                .map(|_| ())
        })
        .await
    }

    async fn deactivate_inventory(&self, id: i32) -> StoreResult<()> {
        observe("deactivate_inventory", async {
            inventory::Entity::update_many()
                .col_expr(inventory::Column::IsActive, Expr::value(false))
                .filter(inventory::Column::Id.eq(id))
                .exec(self.db())
                .await
                .map(|_| ())
        })
        .await
    }
}

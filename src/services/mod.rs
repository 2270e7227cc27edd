//! Business rules for locations, materials and inventory.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::repositories::StoreError;

pub mod inventory;
pub mod locations;
pub mod materials;

pub use inventory::InventoryService;
pub use locations::LocationService;
pub use materials::MaterialService;

/// Identifier of a freshly created record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedId {
    #[schema(example = 1)]
    pub id: i32,
}

/// Maps a storage unique-index violation onto the route's own error, passing
/// every other failure through unchanged.
pub(crate) fn on_unique_violation(err: StoreError, conflict: ServiceError) -> ServiceError {
    match err {
        StoreError::UniqueViolation(detail) => {
            tracing::debug!(detail = %detail, "write rejected by unique index");
            conflict
        }
        other => other.into(),
    }
}

/// Query-string field where an empty value means "no filter"
pub(crate) fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw.parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

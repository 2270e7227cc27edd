pub mod extract;
pub mod health;
pub mod inventory;
pub mod locations;
pub mod materials;

use std::sync::Arc;

use crate::repositories::Store;
use crate::services::{InventoryService, LocationService, MaterialService};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub locations: LocationService,
    pub materials: MaterialService,
    pub inventory: InventoryService,
}

impl AppServices {
    /// Builds every service on top of one shared store
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            locations: LocationService::new(store.clone()),
            materials: MaterialService::new(store.clone()),
            inventory: InventoryService::new(store),
        }
    }
}

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory API",
        version = "1.0.0",
        description = r#"
# Inventory API

Tracks stock of materials held at physical locations.

## Lifecycle

Records are never hard-deleted. `DELETE` marks a record inactive and the
transition is final:

- a location cannot be deactivated while any of its inventory rows holds stock
- an inventory row cannot be deactivated while its quantity is above zero
- rows at an inactive location read as `404` and reject writes with `403`

## Errors

Failures share one body shape:

```json
{ "error": "Inventory not found.", "request_id": "5f0c8a5e-64f4-4c1a-9d6e-0c6c0f7f3b11" }
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development")
    ),
    tags(
        (name = "locations", description = "Physical sites"),
        (name = "materials", description = "Material catalogue"),
        (name = "inventory", description = "Stock per location and material"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::locations::list_locations,
        crate::handlers::locations::get_location,
        crate::handlers::locations::create_location,
        crate::handlers::locations::update_location,
        crate::handlers::locations::delete_location,

        crate::handlers::materials::list_materials,
        crate::handlers::materials::get_material,
        crate::handlers::materials::create_material,
        crate::handlers::materials::update_material,
        crate::handlers::materials::delete_material,

        crate::handlers::inventory::list_inventory,
        crate::handlers::inventory::get_inventory,
        crate::handlers::inventory::create_inventory,
        crate::handlers::inventory::update_inventory,
        crate::handlers::inventory::patch_inventory,
        crate::handlers::inventory::delete_inventory,

        crate::handlers::health::health_check,
    ),
    components(
        schemas(
            crate::services::CreatedId,

            crate::services::locations::CreateLocationRequest,
            crate::services::locations::UpdateLocationRequest,
            crate::services::locations::LocationResponse,

            crate::services::materials::MaterialRequest,
            crate::services::materials::MaterialResponse,

            crate::services::inventory::InventoryRequest,
            crate::services::inventory::QuantityRequest,
            crate::services::inventory::InventoryView,
            crate::services::inventory::InventoryRecord,

            crate::handlers::health::HealthResponse,
            crate::handlers::health::ComponentHealth,
            crate::handlers::health::ComponentStatus,

            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Material API",
        version = "1.0.0",
        description = r#"
# Material Inventory API

Tracks material records by design, condition state and quantity.

- **Materials**: create, fetch, partially update and delete records
- **Counts**: record counts overall and per state (GOOD, DAMAGING, BAD)
- **Stats**: quantity totals per state

## Error Handling

Failures share one body format:

```json
{
  "error": "Not Found",
  "message": "Not found: Material 42 not found",
  "request_id": "req-abc123xyz",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "materials", description = "Material inventory endpoints")
    ),
    paths(
        crate::handlers::materials::list_materials,
        crate::handlers::materials::get_material,
        crate::handlers::materials::create_material,
        crate::handlers::materials::update_material,
        crate::handlers::materials::delete_material,
        crate::handlers::materials::get_material_stats,
        crate::handlers::materials::count_all_materials,
        crate::handlers::materials::count_good_materials,
        crate::handlers::materials::count_damaging_materials,
        crate::handlers::materials::count_bad_materials,
    ),
    components(
        schemas(
            crate::entities::material::Model,
            crate::entities::material::MaterialState,
            crate::handlers::materials::CreateMaterialRequest,
            crate::handlers::materials::UpdateMaterialRequest,
            crate::handlers::materials::MaterialCount,
            crate::services::materials::MaterialQuantityStats,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

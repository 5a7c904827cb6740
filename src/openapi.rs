use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Armory API",
        version = "1.0.0",
        description = r#"
# Armory Reorder Analysis API

Demand analysis and reorder recommendations for a firearms dealer's retail
counter, driven by the inventory event ledger.

## How it works

Post a batch of item identifiers (catalog ids, shelf-label SKUs, UPCs, or
raw barcode scans) and the API reconstructs each item's stock history from
the ledger, estimates monthly demand with out-of-stock gaps excluded,
applies seasonal and trend adjustments, and returns purchase
recommendations sorted most-urgent-first.

## Error Handling

The API uses consistent error response formats with appropriate HTTP status
codes:

```json
{
  "error": "Bad Request",
  "message": "Validation failed",
  "details": "Field 'identifiers' must not be empty"
}
```

Unmatched identifiers are not errors: they come back in the report's
`unmatched_identifiers` list while the rest of the batch is analyzed.
        "#,
        contact(
            name = "Armory Support",
            email = "support@armory.example"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Reorder", description = "Reorder analysis endpoints"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        // Reorder
        crate::handlers::reorder::run_analysis,

        // Status & health intentionally omitted from OpenAPI paths for now
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,

            // Reorder types
            crate::services::reorder::ReorderAnalysisRequest,
            crate::services::reorder::ReorderReport,
            crate::services::reorder::ReorderSummary,
            crate::analysis::recommend::OrderRecommendation,

            // Error types
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

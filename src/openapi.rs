use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Comercio API",
        version = "0.3.0",
        description = r#"
# Comercio ERP API

Backend for a small-business ERP: business-partner records, product catalog,
purchase orders, and multi-warehouse inventory tracking with a kardex
movement ledger.

## Authentication

All endpoints except `/health` and `/api/auth/*` require a bearer token:

```
Authorization: Bearer <access-token>
```

## Responses

Every response uses the `{success, message, data | error}` envelope. List
endpoints return `{items, total, page, limit, total_pages}` inside `data`.

## Rate Limiting

Responses carry `X-RateLimit-Limit`, `X-RateLimit-Remaining` and
`X-RateLimit-Reset`; a rejected request answers 429 with `Retry-After`.
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
        (name = "auth", description = "Login, token refresh and logout"),
        (name = "inventory", description = "Stock levels, adjustments and the kardex ledger"),
        (name = "products", description = "Product catalog"),
        (name = "warehouses", description = "Warehouse management"),
        (name = "entidades", description = "Business partners (clients and suppliers)"),
        (name = "purchases", description = "Purchase order lifecycle"),
        (name = "users", description = "User accounts and permissions")
    ),
    paths(
        // Auth
        crate::auth::login_handler,
        crate::auth::refresh_token_handler,
        crate::auth::logout_handler,

        // Inventory
        crate::handlers::inventory::list_stock,
        crate::handlers::inventory::kardex,
        crate::handlers::inventory::create_ajuste,
        crate::handlers::inventory::stock_alerts,
        crate::handlers::inventory::list_reasons,
        crate::handlers::inventory::create_reason,

        // Products
        crate::handlers::products::create_product,
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,

        // Warehouses
        crate::handlers::warehouses::create_warehouse,
        crate::handlers::warehouses::list_warehouses,
        crate::handlers::warehouses::get_warehouse,
        crate::handlers::warehouses::update_warehouse,
        crate::handlers::warehouses::delete_warehouse,

        // Business entities
        crate::handlers::business_entities::create_entity,
        crate::handlers::business_entities::list_entities,
        crate::handlers::business_entities::get_entity,
        crate::handlers::business_entities::update_entity,
        crate::handlers::business_entities::delete_entity,

        // Purchases
        crate::handlers::purchases::create_purchase,
        crate::handlers::purchases::list_purchases,
        crate::handlers::purchases::get_purchase,
        crate::handlers::purchases::update_purchase,
        crate::handlers::purchases::delete_purchase,
        crate::handlers::purchases::change_status,

        // Users
        crate::handlers::users::create_user,
        crate::handlers::users::list_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
    ),
    components(
        schemas(
            crate::errors::ErrorResponse,
            crate::auth::LoginCredentials,
            crate::auth::RefreshTokenRequest,
            crate::auth::TokenPair,
            crate::handlers::inventory::AjusteRequest,
            crate::handlers::products::CreateProductRequest,
            crate::handlers::products::UpdateProductRequest,
            crate::handlers::warehouses::CreateWarehouseRequest,
            crate::handlers::warehouses::UpdateWarehouseRequest,
            crate::handlers::business_entities::CreateEntityRequest,
            crate::handlers::business_entities::UpdateEntityRequest,
            crate::handlers::purchases::CreatePurchaseRequest,
            crate::handlers::purchases::UpdatePurchaseRequest,
            crate::handlers::purchases::PurchaseItemRequest,
            crate::handlers::purchases::ChangeStatusRequest,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::UpdateUserRequest,
            crate::services::inventory::CreateMovementReason,
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

use super::common::{
    created_response, map_service_error, paginated_response, success_response, validate_input,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::warehouses::{CreateWarehouseCommand, UpdateWarehouseCommand},
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWarehouseRequest {
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWarehouseRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseListQuery {
    #[serde(default)]
    pub include_inactive: bool,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Create a warehouse
#[utoipa::path(
    post,
    path = "/api/warehouses",
    request_body = CreateWarehouseRequest,
    responses(
        (status = 201, description = "Warehouse created"),
        (status = 409, description = "Duplicate code", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn create_warehouse(
    State(state): State<AppState>,
    Json(payload): Json<CreateWarehouseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let warehouse = state
        .services
        .warehouses
        .create_warehouse(CreateWarehouseCommand {
            code: payload.code,
            name: payload.name,
            address: payload.address,
        })
        .await
        .map_err(map_service_error)?;

    Ok(created_response(warehouse))
}

/// List warehouses
#[utoipa::path(
    get,
    path = "/api/warehouses",
    params(WarehouseListQuery),
    responses((status = 200, description = "Warehouses returned")),
    tag = "warehouses"
)]
pub async fn list_warehouses(
    State(state): State<AppState>,
    Query(query): Query<WarehouseListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 200);

    let (rows, total) = state
        .services
        .warehouses
        .list_warehouses(query.include_inactive, page, limit)
        .await
        .map_err(map_service_error)?;

    Ok(paginated_response(rows, total, page, limit))
}

/// Get a warehouse by ID
#[utoipa::path(
    get,
    path = "/api/warehouses/{id}",
    params(("id" = Uuid, Path, description = "Warehouse ID")),
    responses(
        (status = 200, description = "Warehouse returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn get_warehouse(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let warehouse = state
        .services
        .warehouses
        .get_warehouse(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Warehouse with ID {} not found", id)))?;

    Ok(success_response(warehouse))
}

/// Update a warehouse
#[utoipa::path(
    put,
    path = "/api/warehouses/{id}",
    params(("id" = Uuid, Path, description = "Warehouse ID")),
    request_body = UpdateWarehouseRequest,
    responses(
        (status = 200, description = "Warehouse updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn update_warehouse(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWarehouseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let warehouse = state
        .services
        .warehouses
        .update_warehouse(
            id,
            UpdateWarehouseCommand {
                name: payload.name,
                address: payload.address,
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(warehouse))
}

/// Deactivate a warehouse (soft delete)
#[utoipa::path(
    delete,
    path = "/api/warehouses/{id}",
    params(("id" = Uuid, Path, description = "Warehouse ID")),
    responses(
        (status = 200, description = "Warehouse deactivated"),
        (status = 409, description = "Warehouse still holds stock", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn delete_warehouse(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let warehouse = state
        .services
        .warehouses
        .deactivate_warehouse(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(warehouse))
}

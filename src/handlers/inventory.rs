use super::common::{
    created_response, map_service_error, paginated_response, success_response, validate_input,
};
use crate::{
    auth::AuthenticatedUser,
    domain::stock::StockStatus,
    entities::inventory_movement::MovementType,
    errors::ApiError,
    handlers::AppState,
    services::inventory::{
        AdjustStockCommand, CreateMovementReason, KardexFilters, StockFilters,
    },
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::str::FromStr;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Query parameters for the stock listing
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct StockQuery {
    /// Warehouse filter
    pub almacen_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    /// Derived status filter: NORMAL, BAJO or CRITICO
    pub estado: Option<String>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    /// "quantity" or "code"
    pub sort_by: Option<String>,
    /// "asc" or "desc"
    pub order: Option<String>,
}

/// Query parameters for the kardex ledger
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct KardexQuery {
    pub product_id: Option<Uuid>,
    pub warehouse_id: Option<Uuid>,
    /// ENTRADA, SALIDA or AJUSTE
    pub tipo_movimiento: Option<String>,
    /// Inclusive lower bound, YYYY-MM-DD
    pub fecha_desde: Option<String>,
    /// Inclusive upper bound, YYYY-MM-DD
    pub fecha_hasta: Option<String>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub page_size: Option<u64>,
}

/// Manual stock adjustment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AjusteRequest {
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    /// Signed nonzero quantity to add or remove
    pub cantidad_ajuste: i32,
    /// Catalog reason id; mutually optional with `adjustmentReason`
    pub reason_id: Option<Uuid>,
    /// Free-text reason when no catalog entry applies
    #[validate(length(max = 255))]
    pub adjustment_reason: Option<String>,
    #[validate(length(max = 1000))]
    pub observaciones: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ReasonsQuery {
    /// Movement type filter (ENTRADA, SALIDA, AJUSTE)
    pub tipo: Option<String>,
}

fn parse_movement_type(raw: &str) -> Result<MovementType, ApiError> {
    MovementType::from_str(raw).map_err(|_| {
        ApiError::ValidationError(format!(
            "Unknown movement type '{}', expected ENTRADA, SALIDA or AJUSTE",
            raw
        ))
    })
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::ValidationError(format!("{} must be a YYYY-MM-DD date", field)))
}

/// Paginated stock listing with derived NORMAL/BAJO/CRITICO status
#[utoipa::path(
    get,
    path = "/api/inventory/stock",
    params(StockQuery),
    responses(
        (status = 200, description = "Stock rows returned"),
        (status = 400, description = "Invalid filter", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_stock(
    State(state): State<AppState>,
    Query(query): Query<StockQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = query
        .estado
        .as_deref()
        .map(|raw| {
            StockStatus::from_str(raw).map_err(|_| {
                ApiError::ValidationError(format!(
                    "Unknown estado '{}', expected NORMAL, BAJO or CRITICO",
                    raw
                ))
            })
        })
        .transpose()?;

    let filters = StockFilters {
        warehouse_id: query.almacen_id,
        product_id: query.product_id,
        status,
        sort_by: query.sort_by,
        descending: !matches!(query.order.as_deref(), Some("asc")),
    };

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 200);

    let (rows, total) = state
        .services
        .inventory
        .list_stock(filters, page, limit)
        .await
        .map_err(map_service_error)?;

    Ok(paginated_response(rows, total, page, limit))
}

/// Paginated kardex ledger, newest first
#[utoipa::path(
    get,
    path = "/api/inventory/kardex",
    params(KardexQuery),
    responses(
        (status = 200, description = "Kardex rows returned"),
        (status = 400, description = "Invalid filter", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn kardex(
    State(state): State<AppState>,
    Query(query): Query<KardexQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let movement_type = query
        .tipo_movimiento
        .as_deref()
        .map(parse_movement_type)
        .transpose()?;
    let date_from = query
        .fecha_desde
        .as_deref()
        .map(|raw| parse_date(raw, "fechaDesde"))
        .transpose()?;
    let date_to = query
        .fecha_hasta
        .as_deref()
        .map(|raw| parse_date(raw, "fechaHasta"))
        .transpose()?;

    if let (Some(from), Some(to)) = (date_from, date_to) {
        if from > to {
            return Err(ApiError::ValidationError(
                "fechaDesde cannot be after fechaHasta".to_string(),
            ));
        }
    }

    let filters = KardexFilters {
        product_id: query.product_id,
        warehouse_id: query.warehouse_id,
        movement_type,
        date_from,
        date_to,
    };

    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(20).clamp(1, 200);

    let (rows, total) = state
        .services
        .inventory
        .kardex(filters, page, page_size)
        .await
        .map_err(map_service_error)?;

    Ok(paginated_response(rows, total, page, page_size))
}

/// Applies a manual stock adjustment (ajuste)
#[utoipa::path(
    post,
    path = "/api/inventory/ajustes",
    request_body = AjusteRequest,
    responses(
        (status = 201, description = "Adjustment applied"),
        (status = 400, description = "Invalid adjustment", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown product or warehouse", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn create_ajuste(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<AjusteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let command = AdjustStockCommand {
        product_id: payload.product_id,
        warehouse_id: payload.warehouse_id,
        delta: payload.cantidad_ajuste,
        reason_id: payload.reason_id,
        adjustment_reason: payload.adjustment_reason,
        notes: payload.observaciones,
        user_id: user.user_uuid(),
    };

    let applied = state
        .services
        .inventory
        .adjust_stock(command)
        .await
        .map_err(map_service_error)?;

    info!(
        movement_id = %applied.movement.id,
        user = %user.username,
        "stock adjustment recorded"
    );

    Ok(created_response(serde_json::json!({
        "movement": applied.movement,
        "stock": {
            "productId": applied.stock_level.product_id,
            "warehouseId": applied.stock_level.warehouse_id,
            "quantity": applied.stock_level.quantity,
        },
        "productStock": applied.product_stock,
    })))
}

/// Stock rows currently in BAJO or CRITICO status
#[utoipa::path(
    get,
    path = "/api/inventory/alertas",
    responses(
        (status = 200, description = "Alert rows returned"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn stock_alerts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .services
        .inventory
        .stock_alerts()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

/// Active movement reasons
#[utoipa::path(
    get,
    path = "/api/inventory/reasons",
    params(ReasonsQuery),
    responses((status = 200, description = "Reasons returned")),
    tag = "inventory"
)]
pub async fn list_reasons(
    State(state): State<AppState>,
    Query(query): Query<ReasonsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let movement_type = query.tipo.as_deref().map(parse_movement_type).transpose()?;
    let reasons = state
        .services
        .inventory
        .list_movement_reasons(movement_type)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(reasons))
}

/// Adds a movement reason to the catalog
#[utoipa::path(
    post,
    path = "/api/inventory/reasons",
    request_body = CreateMovementReason,
    responses(
        (status = 201, description = "Reason created"),
        (status = 409, description = "Duplicate code", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn create_reason(
    State(state): State<AppState>,
    Json(payload): Json<CreateMovementReason>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.code.trim().is_empty() || payload.description.trim().is_empty() {
        return Err(ApiError::ValidationError(
            "code and description are required".to_string(),
        ));
    }

    let reason = state
        .services
        .inventory
        .create_movement_reason(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(reason))
}

use super::common::{
    created_response, map_service_error, message_response, paginated_response, success_response,
    validate_input,
};
use crate::{
    auth::AuthenticatedUser,
    entities::purchase::PurchaseStatus,
    errors::ApiError,
    handlers::AppState,
    services::purchases::{
        CreatePurchaseCommand, PurchaseFilters, PurchaseItemInput, UpdatePurchaseCommand,
    },
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItemRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseRequest {
    pub supplier_id: Uuid,
    pub warehouse_id: Uuid,
    #[serde(default)]
    pub discount: Option<Decimal>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    // Line-level rules (quantity >= 1, price >= 0) are enforced by the service
    #[validate(length(min = 1, message = "at least one item is required"))]
    pub items: Vec<PurchaseItemRequest>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePurchaseRequest {
    pub discount: Option<Decimal>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    pub items: Option<Vec<PurchaseItemRequest>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeStatusRequest {
    /// Pendiente, Recibida or Cancelada
    pub status: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseListQuery {
    /// Pendiente, Recibida or Cancelada
    pub status: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

fn parse_status(raw: &str) -> Result<PurchaseStatus, ApiError> {
    PurchaseStatus::from_str(raw).map_err(|_| {
        ApiError::ValidationError(format!(
            "Unknown status '{}', expected Pendiente, Recibida or Cancelada",
            raw
        ))
    })
}

fn to_item_inputs(items: Vec<PurchaseItemRequest>) -> Vec<PurchaseItemInput> {
    items
        .into_iter()
        .map(|item| PurchaseItemInput {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
        })
        .collect()
}

/// Create a purchase order
#[utoipa::path(
    post,
    path = "/api/purchases",
    request_body = CreatePurchaseRequest,
    responses(
        (status = 201, description = "Purchase order created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown supplier, warehouse or product", body = crate::errors::ErrorResponse)
    ),
    tag = "purchases"
)]
pub async fn create_purchase(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreatePurchaseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let created = state
        .services
        .purchases
        .create_purchase(CreatePurchaseCommand {
            supplier_id: payload.supplier_id,
            warehouse_id: payload.warehouse_id,
            discount: payload.discount.unwrap_or(Decimal::ZERO),
            notes: payload.notes,
            items: to_item_inputs(payload.items),
            created_by: user.user_uuid(),
        })
        .await
        .map_err(map_service_error)?;

    info!(
        purchase_number = %created.purchase.purchase_number,
        user = %user.username,
        "purchase order created"
    );

    Ok(created_response(created))
}

/// List purchase orders
#[utoipa::path(
    get,
    path = "/api/purchases",
    params(PurchaseListQuery),
    responses((status = 200, description = "Purchase orders returned")),
    tag = "purchases"
)]
pub async fn list_purchases(
    State(state): State<AppState>,
    Query(query): Query<PurchaseListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = query.status.as_deref().map(parse_status).transpose()?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 200);

    let (rows, total) = state
        .services
        .purchases
        .list_purchases(
            PurchaseFilters {
                status,
                supplier_id: query.supplier_id,
            },
            page,
            limit,
        )
        .await
        .map_err(map_service_error)?;

    Ok(paginated_response(rows, total, page, limit))
}

/// Get a purchase order with its items
#[utoipa::path(
    get,
    path = "/api/purchases/{id}",
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchases"
)]
pub async fn get_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let purchase = state
        .services
        .purchases
        .get_purchase(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Purchase with ID {} not found", id)))?;

    Ok(success_response(purchase))
}

/// Update a pending purchase order
#[utoipa::path(
    put,
    path = "/api/purchases/{id}",
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    request_body = UpdatePurchaseRequest,
    responses(
        (status = 200, description = "Purchase order updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "No longer pending", body = crate::errors::ErrorResponse)
    ),
    tag = "purchases"
)]
pub async fn update_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePurchaseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let updated = state
        .services
        .purchases
        .update_purchase(
            id,
            UpdatePurchaseCommand {
                discount: payload.discount,
                notes: payload.notes,
                items: payload.items.map(to_item_inputs),
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(updated))
}

/// Delete a pending purchase order
#[utoipa::path(
    delete,
    path = "/api/purchases/{id}",
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    responses(
        (status = 200, description = "Purchase order deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "No longer pending", body = crate::errors::ErrorResponse)
    ),
    tag = "purchases"
)]
pub async fn delete_purchase(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .purchases
        .delete_purchase(id)
        .await
        .map_err(map_service_error)?;

    Ok(message_response("Purchase order deleted"))
}

/// Change the status of a purchase order.
///
/// `Pendiente → Recibida` books one ENTRADA movement per line item into the
/// order's warehouse as a side effect; repeating the request is rejected
/// with a conflict and books nothing.
#[utoipa::path(
    patch,
    path = "/api/purchases/{id}/status",
    params(("id" = Uuid, Path, description = "Purchase order ID")),
    request_body = ChangeStatusRequest,
    responses(
        (status = 200, description = "Status changed"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Invalid transition", body = crate::errors::ErrorResponse)
    ),
    tag = "purchases"
)]
pub async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: AuthenticatedUser,
    Json(payload): Json<ChangeStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_status = parse_status(&payload.status)?;

    let updated = state
        .services
        .purchases
        .change_status(id, new_status, user.user_uuid())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(updated))
}

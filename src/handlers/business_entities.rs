use super::common::{
    created_response, map_service_error, paginated_response, success_response, validate_input,
};
use crate::{
    entities::business_entity::{DocumentType, EntityType},
    errors::ApiError,
    handlers::AppState,
    services::business_entities::{
        BusinessEntityFilters, CreateBusinessEntityCommand, UpdateBusinessEntityCommand,
    },
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntityRequest {
    /// CLIENTE, PROVEEDOR or AMBOS
    pub tipo_entidad: String,
    /// DNI, RUC or CE
    pub tipo_documento: String,
    #[validate(length(min = 1, max = 20))]
    pub numero_documento: String,
    #[validate(length(min = 1, max = 255))]
    pub razon_social: String,
    pub nombre_comercial: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 30))]
    pub telefono: Option<String>,
    pub direccion: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntityRequest {
    pub tipo_entidad: Option<String>,
    pub tipo_documento: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub numero_documento: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub razon_social: Option<String>,
    pub nombre_comercial: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 30))]
    pub telefono: Option<String>,
    pub direccion: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct EntityListQuery {
    /// CLIENTE, PROVEEDOR or AMBOS
    pub tipo: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

fn parse_entity_type(raw: &str) -> Result<EntityType, ApiError> {
    EntityType::from_str(raw).map_err(|_| {
        ApiError::ValidationError(format!(
            "Unknown tipoEntidad '{}', expected CLIENTE, PROVEEDOR or AMBOS",
            raw
        ))
    })
}

fn parse_document_type(raw: &str) -> Result<DocumentType, ApiError> {
    DocumentType::from_str(raw).map_err(|_| {
        ApiError::ValidationError(format!(
            "Unknown tipoDocumento '{}', expected DNI, RUC or CE",
            raw
        ))
    })
}

/// Create a business entity (client/supplier)
#[utoipa::path(
    post,
    path = "/api/entidades",
    request_body = CreateEntityRequest,
    responses(
        (status = 201, description = "Entity created"),
        (status = 400, description = "Invalid document", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate document", body = crate::errors::ErrorResponse)
    ),
    tag = "entidades"
)]
pub async fn create_entity(
    State(state): State<AppState>,
    Json(payload): Json<CreateEntityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let entity_type = parse_entity_type(&payload.tipo_entidad)?;
    let document_type = parse_document_type(&payload.tipo_documento)?;

    let entity = state
        .services
        .business_entities
        .create_entity(CreateBusinessEntityCommand {
            entity_type,
            document_type,
            document_number: payload.numero_documento,
            legal_name: payload.razon_social,
            trade_name: payload.nombre_comercial,
            email: payload.email,
            phone: payload.telefono,
            address: payload.direccion,
        })
        .await
        .map_err(map_service_error)?;

    Ok(created_response(entity))
}

/// List business entities
#[utoipa::path(
    get,
    path = "/api/entidades",
    params(EntityListQuery),
    responses((status = 200, description = "Entities returned")),
    tag = "entidades"
)]
pub async fn list_entities(
    State(state): State<AppState>,
    Query(query): Query<EntityListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let entity_type = query.tipo.as_deref().map(parse_entity_type).transpose()?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 200);

    let (rows, total) = state
        .services
        .business_entities
        .list_entities(
            BusinessEntityFilters {
                entity_type,
                search: query.search,
                include_inactive: query.include_inactive,
            },
            page,
            limit,
        )
        .await
        .map_err(map_service_error)?;

    Ok(paginated_response(rows, total, page, limit))
}

/// Get a business entity by ID
#[utoipa::path(
    get,
    path = "/api/entidades/{id}",
    params(("id" = Uuid, Path, description = "Entity ID")),
    responses(
        (status = 200, description = "Entity returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "entidades"
)]
pub async fn get_entity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let entity = state
        .services
        .business_entities
        .get_entity(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Business entity with ID {} not found", id)))?;

    Ok(success_response(entity))
}

/// Update a business entity
#[utoipa::path(
    put,
    path = "/api/entidades/{id}",
    params(("id" = Uuid, Path, description = "Entity ID")),
    request_body = UpdateEntityRequest,
    responses(
        (status = 200, description = "Entity updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "entidades"
)]
pub async fn update_entity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEntityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let entity_type = payload
        .tipo_entidad
        .as_deref()
        .map(parse_entity_type)
        .transpose()?;
    let document_type = payload
        .tipo_documento
        .as_deref()
        .map(parse_document_type)
        .transpose()?;

    let entity = state
        .services
        .business_entities
        .update_entity(
            id,
            UpdateBusinessEntityCommand {
                entity_type,
                document_type,
                document_number: payload.numero_documento,
                legal_name: payload.razon_social,
                trade_name: payload.nombre_comercial,
                email: payload.email,
                phone: payload.telefono,
                address: payload.direccion,
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(entity))
}

/// Deactivate a business entity (soft delete)
#[utoipa::path(
    delete,
    path = "/api/entidades/{id}",
    params(("id" = Uuid, Path, description = "Entity ID")),
    responses(
        (status = 200, description = "Entity deactivated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "entidades"
)]
pub async fn delete_entity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let entity = state
        .services
        .business_entities
        .deactivate_entity(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(entity))
}

//! Comercio API Library
//!
//! This crate provides the core functionality for the Comercio ERP API
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod rate_limiter;
pub mod services;

use axum::extract::FromRef;
use axum::routing::{get, patch};
use axum::Router;
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::auth::consts as perm;
use crate::auth::AuthRouterExt;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
    pub auth_service: Arc<auth::AuthService>,
}

impl FromRef<AppState> for Arc<auth::AuthService> {
    fn from_ref(state: &AppState) -> Self {
        state.auth_service.clone()
    }
}

// Common response wrappers

/// Response envelope: `{success, message, data | error}`
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: middleware_helpers::request_id::current_request_id()
                .map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn message(message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: None,
            error: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: Some(message.clone()),
            data: None,
            error: Some(message),
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Pagination wrapper carried inside `data` on list endpoints
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit.max(1)
        };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<axum::Json<ApiResponse<T>>, errors::ServiceError>;

// API routes under /api, permission-gated per resource
pub fn api_routes() -> Router<AppState> {
    // Inventory routes with permission gating
    let inventory_read = Router::new()
        .route("/inventory/stock", get(handlers::inventory::list_stock))
        .route("/inventory/kardex", get(handlers::inventory::kardex))
        .route("/inventory/alertas", get(handlers::inventory::stock_alerts))
        .route("/inventory/reasons", get(handlers::inventory::list_reasons))
        .with_permission(perm::INVENTORY_READ);

    let inventory_adjust = Router::new()
        .route(
            "/inventory/ajustes",
            axum::routing::post(handlers::inventory::create_ajuste),
        )
        .route(
            "/inventory/reasons",
            axum::routing::post(handlers::inventory::create_reason),
        )
        .with_permission(perm::INVENTORY_ADJUST);

    // Product catalog
    let products_read = Router::new()
        .route("/products", get(handlers::products::list_products))
        .route("/products/:id", get(handlers::products::get_product))
        .with_permission(perm::PRODUCTS_READ);

    let products_create = Router::new()
        .route(
            "/products",
            axum::routing::post(handlers::products::create_product),
        )
        .with_permission(perm::PRODUCTS_CREATE);

    let products_update = Router::new()
        .route(
            "/products/:id",
            axum::routing::put(handlers::products::update_product),
        )
        .with_permission(perm::PRODUCTS_UPDATE);

    let products_delete = Router::new()
        .route(
            "/products/:id",
            axum::routing::delete(handlers::products::delete_product),
        )
        .with_permission(perm::PRODUCTS_DELETE);

    // Warehouses
    let warehouses_read = Router::new()
        .route("/warehouses", get(handlers::warehouses::list_warehouses))
        .route("/warehouses/:id", get(handlers::warehouses::get_warehouse))
        .with_permission(perm::WAREHOUSES_READ);

    let warehouses_manage = Router::new()
        .route(
            "/warehouses",
            axum::routing::post(handlers::warehouses::create_warehouse),
        )
        .route(
            "/warehouses/:id",
            axum::routing::put(handlers::warehouses::update_warehouse)
                .delete(handlers::warehouses::delete_warehouse),
        )
        .with_permission(perm::WAREHOUSES_MANAGE);

    // Business entities (entidades comerciales)
    let entities_read = Router::new()
        .route("/entidades", get(handlers::business_entities::list_entities))
        .route(
            "/entidades/:id",
            get(handlers::business_entities::get_entity),
        )
        .with_permission(perm::ENTITIES_READ);

    let entities_create = Router::new()
        .route(
            "/entidades",
            axum::routing::post(handlers::business_entities::create_entity),
        )
        .with_permission(perm::ENTITIES_CREATE);

    let entities_update = Router::new()
        .route(
            "/entidades/:id",
            axum::routing::put(handlers::business_entities::update_entity),
        )
        .with_permission(perm::ENTITIES_UPDATE);

    let entities_delete = Router::new()
        .route(
            "/entidades/:id",
            axum::routing::delete(handlers::business_entities::delete_entity),
        )
        .with_permission(perm::ENTITIES_DELETE);

    // Purchases
    let purchases_read = Router::new()
        .route("/purchases", get(handlers::purchases::list_purchases))
        .route("/purchases/:id", get(handlers::purchases::get_purchase))
        .with_permission(perm::PURCHASES_READ);

    let purchases_create = Router::new()
        .route(
            "/purchases",
            axum::routing::post(handlers::purchases::create_purchase),
        )
        .with_permission(perm::PURCHASES_CREATE);

    let purchases_update = Router::new()
        .route(
            "/purchases/:id",
            axum::routing::put(handlers::purchases::update_purchase),
        )
        .with_permission(perm::PURCHASES_UPDATE);

    let purchases_delete = Router::new()
        .route(
            "/purchases/:id",
            axum::routing::delete(handlers::purchases::delete_purchase),
        )
        .with_permission(perm::PURCHASES_DELETE);

    // Receipt rides on the status change endpoint
    let purchases_receive = Router::new()
        .route(
            "/purchases/:id/status",
            patch(handlers::purchases::change_status),
        )
        .with_permission(perm::PURCHASES_RECEIVE);

    // User management (admin)
    let users_manage = Router::new()
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/:id",
            get(handlers::users::get_user).put(handlers::users::update_user),
        )
        .with_permission(perm::USERS_MANAGE);

    Router::new()
        // Status endpoint (public)
        .route("/status", get(handlers::health::api_status))
        // Inventory API (auth + permissions)
        .merge(inventory_read)
        .merge(inventory_adjust)
        // Product catalog API
        .merge(products_read)
        .merge(products_create)
        .merge(products_update)
        .merge(products_delete)
        // Warehouses API
        .merge(warehouses_read)
        .merge(warehouses_manage)
        // Business entities API
        .merge(entities_read)
        .merge(entities_create)
        .merge(entities_update)
        .merge(entities_delete)
        // Purchases API
        .merge(purchases_read)
        .merge(purchases_create)
        .merge(purchases_update)
        .merge(purchases_delete)
        .merge(purchases_receive)
        // Auth API (login/refresh/logout, no bearer required)
        .nest("/auth", auth::auth_routes())
        // User management API
        .merge(users_manage)
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use crate::middleware_helpers::request_id::{scope_request_id, RequestId};
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response = scope_request_id(RequestId::new("meta-123"), async {
            ApiResponse::success("ok")
        })
        .await;

        assert!(response.success);
        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[tokio::test]
    async fn error_response_sets_error_field() {
        let response = scope_request_id(RequestId::new("meta-err"), async {
            ApiResponse::<()>::error("oops".into())
        })
        .await;

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("oops"));
        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-err"));
    }

    #[test]
    fn pagination_math() {
        let page = PaginatedResponse::<u32>::new(vec![1, 2, 3], 45, 2, 20);
        assert_eq!(page.total_pages, 3);

        let empty = PaginatedResponse::<u32>::new(vec![], 0, 1, 20);
        assert_eq!(empty.total_pages, 0);
    }
}

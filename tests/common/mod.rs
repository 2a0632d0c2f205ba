#![allow(dead_code)]

use chrono::Utc;
use comercio_api::{
    db::{establish_connection_with_config, run_migrations, DbConfig, DbPool},
    entities::{business_entity, product, warehouse},
    events::EventSender,
    handlers::AppServices,
    services,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Fresh in-memory database with all migrations applied. A single pooled
/// connection keeps every query on the same sqlite memory instance.
pub async fn setup_db() -> Arc<DbPool> {
    let config = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        connect_timeout: Duration::from_secs(5),
        idle_timeout: Duration::from_secs(60),
        acquire_timeout: Duration::from_secs(5),
    };
    let db = establish_connection_with_config(&config)
        .await
        .expect("Failed to create DB pool");
    run_migrations(&db).await.expect("Failed to run migrations");
    Arc::new(db)
}

/// Event sender whose receiver is drained in the background
pub fn event_sender() -> EventSender {
    let (tx, mut rx) = mpsc::channel(256);
    tokio::spawn(async move { while rx.recv().await.is_some() {} });
    EventSender::new(tx)
}

pub fn inventory_service(db: Arc<DbPool>) -> services::inventory::InventoryService {
    services::inventory::InventoryService::new(db, event_sender())
}

pub fn purchase_service(db: Arc<DbPool>) -> services::purchases::PurchaseService {
    services::purchases::PurchaseService::new(db, event_sender())
}

pub fn entity_service(db: Arc<DbPool>) -> services::business_entities::BusinessEntityService {
    services::business_entities::BusinessEntityService::new(db, event_sender())
}

pub async fn create_test_product(db: &DbPool, code: &str, min_stock: i32) -> product::Model {
    let row = product::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(code.to_string()),
        name: Set(format!("Producto {}", code)),
        description: Set(None),
        category: Set(Some("GENERAL".to_string())),
        unit: Set("UND".to_string()),
        sale_price: Set(Decimal::new(1990, 2)),
        min_stock: Set(min_stock),
        stock: Set(0),
        is_active: Set(true),
        ..Default::default()
    };
    row.insert(db).await.expect("Failed to create product")
}

pub async fn create_test_warehouse(db: &DbPool, code: &str) -> warehouse::Model {
    let row = warehouse::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(code.to_string()),
        name: Set(format!("Almacén {}", code)),
        address: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    };
    row.insert(db).await.expect("Failed to create warehouse")
}

pub async fn create_test_supplier(db: &DbPool, document: &str) -> business_entity::Model {
    let row = business_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        entity_type: Set("PROVEEDOR".to_string()),
        document_type: Set("RUC".to_string()),
        document_number: Set(document.to_string()),
        legal_name: Set("Distribuidora Andina SAC".to_string()),
        trade_name: Set(None),
        email: Set(None),
        phone: Set(None),
        address: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    };
    row.insert(db).await.expect("Failed to create supplier")
}

pub async fn create_test_client(db: &DbPool, document: &str) -> business_entity::Model {
    let row = business_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        entity_type: Set("CLIENTE".to_string()),
        document_type: Set("DNI".to_string()),
        document_number: Set(document.to_string()),
        legal_name: Set("Rosa Quispe".to_string()),
        trade_name: Set(None),
        email: Set(None),
        phone: Set(None),
        address: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    };
    row.insert(db).await.expect("Failed to create client")
}

/// Full services container for handler-level tests
pub fn app_services(db: Arc<DbPool>, auth: Arc<comercio_api::auth::AuthService>) -> AppServices {
    AppServices::new(db, event_sender(), auth)
}

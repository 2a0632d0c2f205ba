mod common;

use comercio_api::{
    domain::stock::StockStatus,
    entities::{
        inventory_movement::{self, Entity as InventoryMovement, MovementType},
        product::Entity as Product,
    },
    errors::ServiceError,
    services::inventory::{AdjustStockCommand, KardexFilters, StockFilters},
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

fn ajuste(product_id: Uuid, warehouse_id: Uuid, delta: i32, reason: &str) -> AdjustStockCommand {
    AdjustStockCommand {
        product_id,
        warehouse_id,
        delta,
        reason_id: None,
        adjustment_reason: Some(reason.to_string()),
        notes: None,
        user_id: None,
    }
}

#[tokio::test]
async fn adjustments_update_stock_and_append_ledger() {
    let db = common::setup_db().await;
    let service = common::inventory_service(db.clone());

    let product = common::create_test_product(&db, "LAP-001", 5).await;
    let warehouse = common::create_test_warehouse(&db, "ALM-01").await;

    // First movement creates the stock row lazily
    let first = service
        .adjust_stock(ajuste(product.id, warehouse.id, 10, "Carga inicial"))
        .await
        .expect("initial load should apply");
    assert_eq!(first.movement.stock_before, 0);
    assert_eq!(first.movement.stock_after, 10);
    assert_eq!(first.stock_level.quantity, 10);
    assert_eq!(first.product_stock, 10);

    let second = service
        .adjust_stock(ajuste(product.id, warehouse.id, -5, "Merma"))
        .await
        .expect("partial removal should apply");
    assert_eq!(second.movement.stock_before, 10);
    assert_eq!(second.movement.stock_after, 5);
    assert_eq!(second.movement.quantity, -5);

    // Ledger has exactly one row per accepted operation and each row's
    // after-before equals the applied delta
    let movements = InventoryMovement::find()
        .filter(inventory_movement::Column::ProductId.eq(product.id))
        .all(db.as_ref())
        .await
        .unwrap();
    assert_eq!(movements.len(), 2);
    for movement in &movements {
        assert_eq!(movement.stock_after - movement.stock_before, movement.quantity);
        assert_eq!(movement.movement_type, MovementType::Ajuste.as_str());
    }
}

#[tokio::test]
async fn negative_result_is_rejected_without_effect() {
    let db = common::setup_db().await;
    let service = common::inventory_service(db.clone());

    let product = common::create_test_product(&db, "MOU-001", 0).await;
    let warehouse = common::create_test_warehouse(&db, "ALM-01").await;

    service
        .adjust_stock(ajuste(product.id, warehouse.id, 10, "Carga inicial"))
        .await
        .unwrap();

    // Stock 10, adjustment -15: rejected, nothing changes
    let err = service
        .adjust_stock(ajuste(product.id, warehouse.id, -15, "Error de conteo"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InsufficientStock(_)));
    assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);

    assert_eq!(
        service.stock_quantity(product.id, warehouse.id).await.unwrap(),
        10
    );
    let movements = InventoryMovement::find()
        .filter(inventory_movement::Column::ProductId.eq(product.id))
        .all(db.as_ref())
        .await
        .unwrap();
    assert_eq!(movements.len(), 1, "rejected adjustment must not append to the ledger");

    // Stock 10, adjustment -5: accepted, before/after recorded
    let applied = service
        .adjust_stock(ajuste(product.id, warehouse.id, -5, "Merma"))
        .await
        .unwrap();
    assert_eq!(applied.movement.stock_before, 10);
    assert_eq!(applied.movement.stock_after, 5);
}

#[tokio::test]
async fn zero_delta_and_missing_reason_are_rejected() {
    let db = common::setup_db().await;
    let service = common::inventory_service(db.clone());

    let product = common::create_test_product(&db, "TEC-001", 0).await;
    let warehouse = common::create_test_warehouse(&db, "ALM-01").await;

    let err = service
        .adjust_stock(ajuste(product.id, warehouse.id, 0, "Nada"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let err = service
        .adjust_stock(AdjustStockCommand {
            product_id: product.id,
            warehouse_id: warehouse.id,
            delta: 3,
            reason_id: None,
            adjustment_reason: None,
            notes: None,
            user_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn unknown_product_or_warehouse_is_not_found() {
    let db = common::setup_db().await;
    let service = common::inventory_service(db.clone());

    let warehouse = common::create_test_warehouse(&db, "ALM-01").await;
    let err = service
        .adjust_stock(ajuste(Uuid::new_v4(), warehouse.id, 5, "Carga"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let product = common::create_test_product(&db, "MON-001", 0).await;
    let err = service
        .adjust_stock(ajuste(product.id, Uuid::new_v4(), 5, "Carga"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn product_aggregate_tracks_sum_across_warehouses() {
    let db = common::setup_db().await;
    let service = common::inventory_service(db.clone());

    let product = common::create_test_product(&db, "CAB-001", 0).await;
    let main = common::create_test_warehouse(&db, "ALM-01").await;
    let secondary = common::create_test_warehouse(&db, "ALM-02").await;

    service
        .adjust_stock(ajuste(product.id, main.id, 8, "Carga inicial"))
        .await
        .unwrap();
    service
        .adjust_stock(ajuste(product.id, secondary.id, 4, "Carga inicial"))
        .await
        .unwrap();
    service
        .adjust_stock(ajuste(product.id, main.id, -3, "Merma"))
        .await
        .unwrap();

    let stored = Product::find_by_id(product.id)
        .one(db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.stock, 9, "aggregate must equal the per-warehouse sum");
    assert_eq!(service.stock_quantity(product.id, main.id).await.unwrap(), 5);
    assert_eq!(
        service.stock_quantity(product.id, secondary.id).await.unwrap(),
        4
    );
}

#[tokio::test]
async fn kardex_filters_and_orders_newest_first() {
    let db = common::setup_db().await;
    let service = common::inventory_service(db.clone());

    let product = common::create_test_product(&db, "IMP-001", 0).await;
    let other = common::create_test_product(&db, "IMP-002", 0).await;
    let warehouse = common::create_test_warehouse(&db, "ALM-01").await;

    for delta in [5, -2, 7] {
        service
            .adjust_stock(ajuste(product.id, warehouse.id, delta, "Conteo"))
            .await
            .unwrap();
    }
    service
        .adjust_stock(ajuste(other.id, warehouse.id, 3, "Conteo"))
        .await
        .unwrap();

    let (rows, total) = service
        .kardex(
            KardexFilters {
                product_id: Some(product.id),
                ..Default::default()
            },
            1,
            10,
        )
        .await
        .unwrap();
    assert_eq!(total, 3);
    assert!(rows.iter().all(|r| r.product_id == product.id));
    assert!(
        rows.windows(2).all(|w| w[0].created_at >= w[1].created_at),
        "kardex must be ordered newest first"
    );
    assert_eq!(rows[0].product_code.as_deref(), Some("IMP-001"));

    // Type filter
    let (rows, total) = service
        .kardex(
            KardexFilters {
                movement_type: Some(MovementType::Entrada),
                ..Default::default()
            },
            1,
            10,
        )
        .await
        .unwrap();
    assert_eq!(total, 0);
    assert!(rows.is_empty());

    // Pagination
    let (page1, total) = service.kardex(KardexFilters::default(), 1, 2).await.unwrap();
    assert_eq!(total, 4);
    assert_eq!(page1.len(), 2);
    let (page2, _) = service.kardex(KardexFilters::default(), 2, 2).await.unwrap();
    assert_eq!(page2.len(), 2);
    assert_ne!(page1[0].id, page2[0].id);
}

#[tokio::test]
async fn stock_listing_derives_estado_and_alerts() {
    let db = common::setup_db().await;
    let service = common::inventory_service(db.clone());

    let healthy = common::create_test_product(&db, "SAN-001", 5).await;
    let low = common::create_test_product(&db, "SAN-002", 10).await;
    let critical = common::create_test_product(&db, "SAN-003", 10).await;
    let warehouse = common::create_test_warehouse(&db, "ALM-01").await;

    service
        .adjust_stock(ajuste(healthy.id, warehouse.id, 20, "Carga"))
        .await
        .unwrap();
    service
        .adjust_stock(ajuste(low.id, warehouse.id, 7, "Carga"))
        .await
        .unwrap();
    service
        .adjust_stock(ajuste(critical.id, warehouse.id, 4, "Carga"))
        .await
        .unwrap();

    let (rows, total) = service
        .list_stock(StockFilters::default(), 1, 50)
        .await
        .unwrap();
    assert_eq!(total, 3);
    let estado_of = |code: &str| {
        rows.iter()
            .find(|r| r.product_code == code)
            .map(|r| r.estado)
            .unwrap()
    };
    assert_eq!(estado_of("SAN-001"), StockStatus::Normal);
    assert_eq!(estado_of("SAN-002"), StockStatus::Bajo);
    assert_eq!(estado_of("SAN-003"), StockStatus::Critico);

    // estado filter applies after derivation
    let (rows, total) = service
        .list_stock(
            StockFilters {
                status: Some(StockStatus::Critico),
                ..Default::default()
            },
            1,
            50,
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(rows[0].product_code, "SAN-003");

    // alerts: critical first
    let alerts = service.stock_alerts().await.unwrap();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].estado, StockStatus::Critico);
    assert_eq!(alerts[1].estado, StockStatus::Bajo);
}

#[tokio::test]
async fn catalog_reason_must_match_movement_type() {
    let db = common::setup_db().await;
    let service = common::inventory_service(db.clone());

    let product = common::create_test_product(&db, "RAZ-001", 0).await;
    let warehouse = common::create_test_warehouse(&db, "ALM-01").await;

    let entrada_reason = service
        .create_movement_reason(comercio_api::services::inventory::CreateMovementReason {
            code: "COMPRA".to_string(),
            description: "Compra a proveedor".to_string(),
            movement_type: MovementType::Entrada,
        })
        .await
        .unwrap();
    let ajuste_reason = service
        .create_movement_reason(comercio_api::services::inventory::CreateMovementReason {
            code: "CONTEO".to_string(),
            description: "Ajuste por conteo físico".to_string(),
            movement_type: MovementType::Ajuste,
        })
        .await
        .unwrap();

    // A reason scoped to ENTRADA cannot justify an ajuste
    let err = service
        .adjust_stock(AdjustStockCommand {
            product_id: product.id,
            warehouse_id: warehouse.id,
            delta: 5,
            reason_id: Some(entrada_reason.id),
            adjustment_reason: None,
            notes: None,
            user_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let applied = service
        .adjust_stock(AdjustStockCommand {
            product_id: product.id,
            warehouse_id: warehouse.id,
            delta: 5,
            reason_id: Some(ajuste_reason.id),
            adjustment_reason: None,
            notes: None,
            user_id: None,
        })
        .await
        .unwrap();
    assert_eq!(applied.movement.reason, "Ajuste por conteo físico");

    // Duplicate reason codes conflict
    let err = service
        .create_movement_reason(comercio_api::services::inventory::CreateMovementReason {
            code: "CONTEO".to_string(),
            description: "Otro".to_string(),
            movement_type: MovementType::Ajuste,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

mod common;

use comercio_api::{
    entities::{
        inventory_movement::{self, Entity as InventoryMovement, MovementType},
        product::Entity as Product,
        purchase::PurchaseStatus,
    },
    errors::ServiceError,
    services::purchases::{
        CreatePurchaseCommand, PurchaseItemInput, UpdatePurchaseCommand,
    },
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

fn item(product_id: Uuid, quantity: i32, unit_price: Decimal) -> PurchaseItemInput {
    PurchaseItemInput {
        product_id,
        quantity,
        unit_price,
    }
}

#[tokio::test]
async fn create_computes_totals_from_items_and_discount() {
    let db = common::setup_db().await;
    let service = common::purchase_service(db.clone());

    let supplier = common::create_test_supplier(&db, "20100123456").await;
    let warehouse = common::create_test_warehouse(&db, "ALM-01").await;
    let p1 = common::create_test_product(&db, "P1", 0).await;
    let p2 = common::create_test_product(&db, "P2", 0).await;

    let created = service
        .create_purchase(CreatePurchaseCommand {
            supplier_id: supplier.id,
            warehouse_id: warehouse.id,
            discount: dec!(5),
            notes: None,
            items: vec![item(p1.id, 2, dec!(10)), item(p2.id, 1, dec!(5))],
            created_by: None,
        })
        .await
        .unwrap();

    assert_eq!(created.purchase.subtotal, dec!(25));
    assert_eq!(created.purchase.discount, dec!(5));
    assert_eq!(created.purchase.total, dec!(20));
    assert_eq!(created.purchase.status, PurchaseStatus::Pendiente.as_str());
    assert!(created.purchase.purchase_number.starts_with("OC-"));
    assert_eq!(created.items.len(), 2);
    assert_eq!(created.items[0].product_code, "P1");
    assert_eq!(created.items[0].total, dec!(20));

    // No stock effect until received
    let movements = InventoryMovement::find().all(db.as_ref()).await.unwrap();
    assert!(movements.is_empty());
}

#[tokio::test]
async fn create_rejects_bad_supplier_discount_and_empty_items() {
    let db = common::setup_db().await;
    let service = common::purchase_service(db.clone());

    let supplier = common::create_test_supplier(&db, "20100123456").await;
    let client = common::create_test_client(&db, "45678912").await;
    let warehouse = common::create_test_warehouse(&db, "ALM-01").await;
    let product = common::create_test_product(&db, "P1", 0).await;

    // A CLIENTE entity cannot supply
    let err = service
        .create_purchase(CreatePurchaseCommand {
            supplier_id: client.id,
            warehouse_id: warehouse.id,
            discount: Decimal::ZERO,
            notes: None,
            items: vec![item(product.id, 1, dec!(10))],
            created_by: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    // Discount above subtotal
    let err = service
        .create_purchase(CreatePurchaseCommand {
            supplier_id: supplier.id,
            warehouse_id: warehouse.id,
            discount: dec!(11),
            notes: None,
            items: vec![item(product.id, 1, dec!(10))],
            created_by: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    // No items
    let err = service
        .create_purchase(CreatePurchaseCommand {
            supplier_id: supplier.id,
            warehouse_id: warehouse.id,
            discount: Decimal::ZERO,
            notes: None,
            items: vec![],
            created_by: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn receipt_books_one_entrada_per_item_exactly_once() {
    let db = common::setup_db().await;
    let purchases = common::purchase_service(db.clone());
    let inventory = common::inventory_service(db.clone());

    let supplier = common::create_test_supplier(&db, "20100123456").await;
    let warehouse = common::create_test_warehouse(&db, "ALM-01").await;
    let p1 = common::create_test_product(&db, "P1", 0).await;
    let p2 = common::create_test_product(&db, "P2", 0).await;

    let created = purchases
        .create_purchase(CreatePurchaseCommand {
            supplier_id: supplier.id,
            warehouse_id: warehouse.id,
            discount: Decimal::ZERO,
            notes: None,
            items: vec![item(p1.id, 12, dec!(4)), item(p2.id, 3, dec!(9))],
            created_by: None,
        })
        .await
        .unwrap();

    let received = purchases
        .change_status(created.purchase.id, PurchaseStatus::Recibida, None)
        .await
        .unwrap();
    assert_eq!(received.purchase.status, PurchaseStatus::Recibida.as_str());
    assert!(received.purchase.received_at.is_some());

    // Stock landed in the order's warehouse
    assert_eq!(inventory.stock_quantity(p1.id, warehouse.id).await.unwrap(), 12);
    assert_eq!(inventory.stock_quantity(p2.id, warehouse.id).await.unwrap(), 3);

    // Aggregates follow
    let stored = Product::find_by_id(p1.id).one(db.as_ref()).await.unwrap().unwrap();
    assert_eq!(stored.stock, 12);

    // Exactly one ENTRADA movement per line, referencing the order
    let movements = InventoryMovement::find()
        .filter(inventory_movement::Column::Reference.eq(created.purchase.purchase_number.clone()))
        .all(db.as_ref())
        .await
        .unwrap();
    assert_eq!(movements.len(), 2);
    for movement in &movements {
        assert_eq!(movement.movement_type, MovementType::Entrada.as_str());
        assert_eq!(movement.stock_after - movement.stock_before, movement.quantity);
    }

    // Re-sending the same transition: conflict, no extra movements
    let err = purchases
        .change_status(created.purchase.id, PurchaseStatus::Recibida, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
    assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);

    let movements_after = InventoryMovement::find().all(db.as_ref()).await.unwrap();
    assert_eq!(movements_after.len(), 2, "repeat receipt must not double-apply stock");
    assert_eq!(inventory.stock_quantity(p1.id, warehouse.id).await.unwrap(), 12);
}

#[tokio::test]
async fn received_orders_are_closed_to_edits_and_deletes() {
    let db = common::setup_db().await;
    let service = common::purchase_service(db.clone());

    let supplier = common::create_test_supplier(&db, "20100123456").await;
    let warehouse = common::create_test_warehouse(&db, "ALM-01").await;
    let product = common::create_test_product(&db, "P1", 0).await;

    let created = service
        .create_purchase(CreatePurchaseCommand {
            supplier_id: supplier.id,
            warehouse_id: warehouse.id,
            discount: Decimal::ZERO,
            notes: None,
            items: vec![item(product.id, 2, dec!(10))],
            created_by: None,
        })
        .await
        .unwrap();

    // While pending: updates recompute totals
    let updated = service
        .update_purchase(
            created.purchase.id,
            UpdatePurchaseCommand {
                discount: Some(dec!(2)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.purchase.total, dec!(18));

    service
        .change_status(created.purchase.id, PurchaseStatus::Recibida, None)
        .await
        .unwrap();

    // After receipt: closed
    let err = service
        .update_purchase(created.purchase.id, UpdatePurchaseCommand::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    let err = service.delete_purchase(created.purchase.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    // A received order cannot be cancelled either
    let err = service
        .change_status(created.purchase.id, PurchaseStatus::Cancelada, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn cancelled_orders_never_touch_stock() {
    let db = common::setup_db().await;
    let purchases = common::purchase_service(db.clone());
    let inventory = common::inventory_service(db.clone());

    let supplier = common::create_test_supplier(&db, "20100123456").await;
    let warehouse = common::create_test_warehouse(&db, "ALM-01").await;
    let product = common::create_test_product(&db, "P1", 0).await;

    let created = purchases
        .create_purchase(CreatePurchaseCommand {
            supplier_id: supplier.id,
            warehouse_id: warehouse.id,
            discount: Decimal::ZERO,
            notes: None,
            items: vec![item(product.id, 6, dec!(2))],
            created_by: None,
        })
        .await
        .unwrap();

    purchases
        .change_status(created.purchase.id, PurchaseStatus::Cancelada, None)
        .await
        .unwrap();
    assert_eq!(
        inventory.stock_quantity(product.id, warehouse.id).await.unwrap(),
        0
    );

    // And cannot be received afterwards
    let err = purchases
        .change_status(created.purchase.id, PurchaseStatus::Recibida, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn deleting_a_pending_order_removes_its_items() {
    let db = common::setup_db().await;
    let service = common::purchase_service(db.clone());

    let supplier = common::create_test_supplier(&db, "20100123456").await;
    let warehouse = common::create_test_warehouse(&db, "ALM-01").await;
    let product = common::create_test_product(&db, "P1", 0).await;

    let created = service
        .create_purchase(CreatePurchaseCommand {
            supplier_id: supplier.id,
            warehouse_id: warehouse.id,
            discount: Decimal::ZERO,
            notes: None,
            items: vec![item(product.id, 1, dec!(10))],
            created_by: None,
        })
        .await
        .unwrap();

    service.delete_purchase(created.purchase.id).await.unwrap();
    assert!(service.get_purchase(created.purchase.id).await.unwrap().is_none());

    let orphans = comercio_api::entities::purchase_item::Entity::find()
        .filter(
            comercio_api::entities::purchase_item::Column::PurchaseId.eq(created.purchase.id),
        )
        .all(db.as_ref())
        .await
        .unwrap();
    assert!(orphans.is_empty());
}

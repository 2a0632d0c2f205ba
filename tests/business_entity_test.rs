mod common;

use comercio_api::{
    entities::business_entity::{DocumentType, Entity as BusinessEntity, EntityType},
    errors::ServiceError,
    services::business_entities::{
        BusinessEntityFilters, CreateBusinessEntityCommand, UpdateBusinessEntityCommand,
    },
};
use sea_orm::{EntityTrait, PaginatorTrait};

fn dni_client(document: &str) -> CreateBusinessEntityCommand {
    CreateBusinessEntityCommand {
        entity_type: EntityType::Cliente,
        document_type: DocumentType::Dni,
        document_number: document.to_string(),
        legal_name: "Rosa Quispe".to_string(),
        trade_name: None,
        email: Some("rosa@example.com".to_string()),
        phone: None,
        address: None,
    }
}

#[tokio::test]
async fn malformed_dni_is_rejected_before_any_write() {
    let db = common::setup_db().await;
    let service = common::entity_service(db.clone());

    // 7 digits, not 8
    let err = service.create_entity(dni_client("1234567")).await.unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
    assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);

    let count = BusinessEntity::find().count(db.as_ref()).await.unwrap();
    assert_eq!(count, 0, "validation must run before any database write");

    // 8 digits passes
    let created = service.create_entity(dni_client("12345678")).await.unwrap();
    assert_eq!(created.document_number, "12345678");
    assert!(created.is_active);
}

#[tokio::test]
async fn ruc_must_be_eleven_digits() {
    let db = common::setup_db().await;
    let service = common::entity_service(db.clone());

    let mut command = dni_client("20100123456");
    command.entity_type = EntityType::Proveedor;
    command.document_type = DocumentType::Ruc;
    command.legal_name = "Distribuidora Andina SAC".to_string();

    let created = service.create_entity(command.clone()).await.unwrap();
    assert_eq!(created.entity_type, "PROVEEDOR");

    command.document_number = "201001234".to_string();
    let err = service.create_entity(command).await.unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn document_uniqueness_is_scoped_to_active_entities() {
    let db = common::setup_db().await;
    let service = common::entity_service(db.clone());

    let first = service.create_entity(dni_client("12345678")).await.unwrap();

    // Same document while the first is active: conflict
    let err = service.create_entity(dni_client("12345678")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    // After deactivation the document can be reused
    service.deactivate_entity(first.id).await.unwrap();
    let second = service.create_entity(dni_client("12345678")).await.unwrap();
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn update_revalidates_changed_documents() {
    let db = common::setup_db().await;
    let service = common::entity_service(db.clone());

    let created = service.create_entity(dni_client("12345678")).await.unwrap();

    let err = service
        .update_entity(
            created.id,
            UpdateBusinessEntityCommand {
                document_number: Some("99".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let updated = service
        .update_entity(
            created.id,
            UpdateBusinessEntityCommand {
                document_number: Some("87654321".to_string()),
                legal_name: Some("Rosa Quispe Mamani".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.document_number, "87654321");
    assert_eq!(updated.legal_name, "Rosa Quispe Mamani");
}

#[tokio::test]
async fn tipo_filter_includes_ambos_entities() {
    let db = common::setup_db().await;
    let service = common::entity_service(db.clone());

    service.create_entity(dni_client("11111111")).await.unwrap();

    let mut supplier = dni_client("20100123456");
    supplier.entity_type = EntityType::Proveedor;
    supplier.document_type = DocumentType::Ruc;
    service.create_entity(supplier).await.unwrap();

    let mut both = dni_client("20200123456");
    both.entity_type = EntityType::Ambos;
    both.document_type = DocumentType::Ruc;
    service.create_entity(both).await.unwrap();

    let (suppliers, total) = service
        .list_entities(
            BusinessEntityFilters {
                entity_type: Some(EntityType::Proveedor),
                ..Default::default()
            },
            1,
            20,
        )
        .await
        .unwrap();
    assert_eq!(total, 2, "AMBOS entities count as suppliers too");
    assert!(suppliers
        .iter()
        .all(|e| e.entity_type == "PROVEEDOR" || e.entity_type == "AMBOS"));
}

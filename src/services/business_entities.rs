use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    domain::documents,
    entities::business_entity::{
        self, Column as EntityColumn, DocumentType, Entity as BusinessEntity, EntityType,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Create request after handler-level validation
#[derive(Debug, Clone)]
pub struct CreateBusinessEntityCommand {
    pub entity_type: EntityType,
    pub document_type: DocumentType,
    pub document_number: String,
    pub legal_name: String,
    pub trade_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Update request; absent fields stay untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateBusinessEntityCommand {
    pub entity_type: Option<EntityType>,
    pub document_type: Option<DocumentType>,
    pub document_number: Option<String>,
    pub legal_name: Option<String>,
    pub trade_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Listing filters
#[derive(Debug, Clone, Default)]
pub struct BusinessEntityFilters {
    pub entity_type: Option<EntityType>,
    pub search: Option<String>,
    pub include_inactive: bool,
}

/// Service for managing business-partner records ("entidades comerciales")
#[derive(Clone)]
pub struct BusinessEntityService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl BusinessEntityService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Create a business entity. The document number is format-checked
    /// before any database access and must be unique among active entities.
    #[instrument(skip(self, command))]
    pub async fn create_entity(
        &self,
        command: CreateBusinessEntityCommand,
    ) -> Result<business_entity::Model, ServiceError> {
        documents::validate_document_number(command.document_type, &command.document_number)
            .map_err(|rule| ServiceError::ValidationError(rule.to_string()))?;

        let db = self.db.as_ref();
        let duplicate = BusinessEntity::find()
            .filter(EntityColumn::DocumentNumber.eq(command.document_number.clone()))
            .filter(EntityColumn::IsActive.eq(true))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "An active entity with document {} already exists",
                command.document_number
            )));
        }

        let entity = business_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            entity_type: Set(command.entity_type.as_str().to_string()),
            document_type: Set(command.document_type.as_str().to_string()),
            document_number: Set(command.document_number),
            legal_name: Set(command.legal_name),
            trade_name: Set(command.trade_name),
            email: Set(command.email),
            phone: Set(command.phone),
            address: Set(command.address),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let created = entity.insert(db).await.map_err(ServiceError::db_error)?;

        info!(entity_id = %created.id, document = %created.document_number, "business entity created");
        self.event_sender
            .send_or_log(Event::BusinessEntityCreated(created.id))
            .await;

        Ok(created)
    }

    /// Get a business entity by ID
    pub async fn get_entity(
        &self,
        id: Uuid,
    ) -> Result<Option<business_entity::Model>, ServiceError> {
        BusinessEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    /// List business entities with pagination and filters
    pub async fn list_entities(
        &self,
        filters: BusinessEntityFilters,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<business_entity::Model>, u64), ServiceError> {
        let mut query = BusinessEntity::find();

        if !filters.include_inactive {
            query = query.filter(EntityColumn::IsActive.eq(true));
        }
        if let Some(entity_type) = filters.entity_type {
            // AMBOS entities act as both clients and suppliers
            query = match entity_type {
                EntityType::Ambos => query.filter(EntityColumn::EntityType.eq(entity_type.as_str())),
                _ => query.filter(
                    Condition::any()
                        .add(EntityColumn::EntityType.eq(entity_type.as_str()))
                        .add(EntityColumn::EntityType.eq(EntityType::Ambos.as_str())),
                ),
            };
        }
        if let Some(search) = filters.search.filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            query = query.filter(
                Condition::any()
                    .add(EntityColumn::LegalName.like(pattern.clone()))
                    .add(EntityColumn::TradeName.like(pattern.clone()))
                    .add(EntityColumn::DocumentNumber.like(pattern)),
            );
        }

        let paginator = query
            .order_by_asc(EntityColumn::LegalName)
            .paginate(self.db.as_ref(), limit.max(1));
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((rows, total))
    }

    /// Update a business entity, revalidating the document when it changes
    #[instrument(skip(self, command))]
    pub async fn update_entity(
        &self,
        id: Uuid,
        command: UpdateBusinessEntityCommand,
    ) -> Result<business_entity::Model, ServiceError> {
        let db = self.db.as_ref();

        let entity = BusinessEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Business entity {} not found", id)))?;

        let document_type = match command.document_type {
            Some(dt) => dt,
            None => DocumentType::from_str(&entity.document_type).map_err(|_| {
                ServiceError::InternalError(format!(
                    "Business entity {} has unknown document type {}",
                    entity.id, entity.document_type
                ))
            })?,
        };
        let document_number = command
            .document_number
            .clone()
            .unwrap_or_else(|| entity.document_number.clone());

        if command.document_type.is_some() || command.document_number.is_some() {
            documents::validate_document_number(document_type, &document_number)
                .map_err(|rule| ServiceError::ValidationError(rule.to_string()))?;

            if document_number != entity.document_number {
                let duplicate = BusinessEntity::find()
                    .filter(EntityColumn::DocumentNumber.eq(document_number.clone()))
                    .filter(EntityColumn::IsActive.eq(true))
                    .filter(EntityColumn::Id.ne(id))
                    .one(db)
                    .await
                    .map_err(ServiceError::db_error)?;
                if duplicate.is_some() {
                    return Err(ServiceError::Conflict(format!(
                        "An active entity with document {} already exists",
                        document_number
                    )));
                }
            }
        }

        let mut active: business_entity::ActiveModel = entity.into();
        if let Some(entity_type) = command.entity_type {
            active.entity_type = Set(entity_type.as_str().to_string());
        }
        active.document_type = Set(document_type.as_str().to_string());
        active.document_number = Set(document_number);
        if let Some(legal_name) = command.legal_name {
            active.legal_name = Set(legal_name);
        }
        if let Some(trade_name) = command.trade_name {
            active.trade_name = Set(Some(trade_name));
        }
        if let Some(email) = command.email {
            active.email = Set(Some(email));
        }
        if let Some(phone) = command.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(address) = command.address {
            active.address = Set(Some(address));
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::BusinessEntityUpdated(updated.id))
            .await;

        Ok(updated)
    }

    /// Soft-delete: deactivate the entity
    #[instrument(skip(self))]
    pub async fn deactivate_entity(
        &self,
        id: Uuid,
    ) -> Result<business_entity::Model, ServiceError> {
        let db = self.db.as_ref();

        let entity = BusinessEntity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Business entity {} not found", id)))?;

        let mut active: business_entity::ActiveModel = entity.into();
        active.is_active = Set(false);
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(db).await.map_err(ServiceError::db_error)?;

        info!(entity_id = %updated.id, "business entity deactivated");
        self.event_sender
            .send_or_log(Event::BusinessEntityDeactivated(updated.id))
            .await;

        Ok(updated)
    }
}

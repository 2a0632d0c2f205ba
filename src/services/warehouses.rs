use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        stock_level::{self, Entity as StockLevel},
        warehouse::{self, Column as WarehouseColumn, Entity as Warehouse},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Create request after handler-level validation
#[derive(Debug, Clone)]
pub struct CreateWarehouseCommand {
    pub code: String,
    pub name: String,
    pub address: Option<String>,
}

/// Update request; absent fields stay untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateWarehouseCommand {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// Service for managing warehouses
#[derive(Clone)]
pub struct WarehouseService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl WarehouseService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Create a new warehouse. Codes are unique among active warehouses.
    #[instrument(skip(self, command))]
    pub async fn create_warehouse(
        &self,
        command: CreateWarehouseCommand,
    ) -> Result<warehouse::Model, ServiceError> {
        let db = self.db.as_ref();

        let duplicate = Warehouse::find()
            .filter(WarehouseColumn::Code.eq(command.code.clone()))
            .filter(WarehouseColumn::IsActive.eq(true))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Warehouse with code '{}' already exists",
                command.code
            )));
        }

        let warehouse = warehouse::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(command.code),
            name: Set(command.name),
            address: Set(command.address),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let created = warehouse.insert(db).await.map_err(ServiceError::db_error)?;

        info!(warehouse_id = %created.id, code = %created.code, "warehouse created");
        self.event_sender
            .send_or_log(Event::WarehouseCreated(created.id))
            .await;

        Ok(created)
    }

    /// Get a warehouse by ID
    pub async fn get_warehouse(&self, id: Uuid) -> Result<Option<warehouse::Model>, ServiceError> {
        Warehouse::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    /// List warehouses with pagination
    pub async fn list_warehouses(
        &self,
        include_inactive: bool,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<warehouse::Model>, u64), ServiceError> {
        let mut query = Warehouse::find();
        if !include_inactive {
            query = query.filter(WarehouseColumn::IsActive.eq(true));
        }

        let paginator = query
            .order_by_asc(WarehouseColumn::Code)
            .paginate(self.db.as_ref(), limit.max(1));
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((rows, total))
    }

    /// Update a warehouse
    #[instrument(skip(self, command))]
    pub async fn update_warehouse(
        &self,
        id: Uuid,
        command: UpdateWarehouseCommand,
    ) -> Result<warehouse::Model, ServiceError> {
        let db = self.db.as_ref();

        let warehouse = Warehouse::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Warehouse {} not found", id)))?;

        let mut active: warehouse::ActiveModel = warehouse.into();
        if let Some(name) = command.name {
            active.name = Set(name);
        }
        if let Some(address) = command.address {
            active.address = Set(Some(address));
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::WarehouseUpdated(updated.id))
            .await;

        Ok(updated)
    }

    /// Soft-delete: deactivate the warehouse. Warehouses still holding stock
    /// refuse deactivation.
    #[instrument(skip(self))]
    pub async fn deactivate_warehouse(&self, id: Uuid) -> Result<warehouse::Model, ServiceError> {
        let db = self.db.as_ref();

        let warehouse = Warehouse::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Warehouse {} not found", id)))?;

        let holdings = StockLevel::find()
            .filter(stock_level::Column::WarehouseId.eq(id))
            .filter(stock_level::Column::Quantity.gt(0))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;
        if holdings > 0 {
            return Err(ServiceError::Conflict(format!(
                "Warehouse {} still holds stock for {} products",
                warehouse.code, holdings
            )));
        }

        let mut active: warehouse::ActiveModel = warehouse.into();
        active.is_active = Set(false);
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(db).await.map_err(ServiceError::db_error)?;

        info!(warehouse_id = %updated.id, code = %updated.code, "warehouse deactivated");
        Ok(updated)
    }
}

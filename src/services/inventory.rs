use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::DbPool,
    domain::stock::{self, StockRuleViolation, StockStatus},
    entities::{
        inventory_movement::{self, Entity as InventoryMovement, MovementType},
        movement_reason::{self, Entity as MovementReason},
        product::{self, Entity as Product},
        stock_level::{self, Entity as StockLevel},
        warehouse::{self, Entity as Warehouse},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// One stock change to apply inside an open transaction
#[derive(Debug, Clone)]
pub struct StockMovementInput {
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub movement_type: MovementType,
    pub delta: i32,
    pub reason: String,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub user_id: Option<Uuid>,
}

/// Result of one applied stock change
#[derive(Debug, Clone)]
pub struct AppliedMovement {
    pub movement: inventory_movement::Model,
    pub stock_level: stock_level::Model,
    /// Product aggregate stock after the change
    pub product_stock: i32,
}

/// Manual adjustment request after handler-level validation
#[derive(Debug, Clone)]
pub struct AdjustStockCommand {
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub delta: i32,
    pub reason_id: Option<Uuid>,
    pub adjustment_reason: Option<String>,
    pub notes: Option<String>,
    pub user_id: Option<Uuid>,
}

/// Filters for the stock listing
#[derive(Debug, Clone, Default)]
pub struct StockFilters {
    pub warehouse_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub status: Option<StockStatus>,
    pub sort_by: Option<String>,
    pub descending: bool,
}

/// Filters for the kardex ledger query
#[derive(Debug, Clone, Default)]
pub struct KardexFilters {
    pub product_id: Option<Uuid>,
    pub warehouse_id: Option<Uuid>,
    pub movement_type: Option<MovementType>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Stock listing row: per-warehouse quantity annotated with catalog data and
/// the derived status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRow {
    pub product_id: Uuid,
    pub product_code: String,
    pub product_name: String,
    pub category: Option<String>,
    pub unit: String,
    pub warehouse_id: Uuid,
    pub warehouse_code: String,
    pub warehouse_name: String,
    pub quantity: i32,
    pub min_stock: Option<i32>,
    pub estado: StockStatus,
    pub updated_at: DateTime<Utc>,
}

/// Kardex row as served to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KardexRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_code: Option<String>,
    pub product_name: Option<String>,
    pub warehouse_id: Uuid,
    pub movement_type: String,
    pub quantity: i32,
    pub stock_before: i32,
    pub stock_after: i32,
    pub reason: String,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Request to add a movement reason to the catalog
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovementReason {
    pub code: String,
    pub description: String,
    pub movement_type: MovementType,
}

/// Inventory service: stock levels, manual adjustments and the kardex ledger
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl InventoryService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Applies a manual stock adjustment (ajuste).
    ///
    /// Everything runs in one transaction: the stock upsert, the ledger
    /// insert and the product aggregate recomputation either all commit or
    /// none do.
    #[instrument(skip(self))]
    pub async fn adjust_stock(
        &self,
        command: AdjustStockCommand,
    ) -> Result<AppliedMovement, ServiceError> {
        if command.delta == 0 {
            return Err(ServiceError::ValidationError(
                "cantidadAjuste must be a nonzero integer".to_string(),
            ));
        }

        let db = self.db.as_ref();
        let reason = self.resolve_reason(db, &command).await?;

        let input = StockMovementInput {
            product_id: command.product_id,
            warehouse_id: command.warehouse_id,
            movement_type: MovementType::Ajuste,
            delta: command.delta,
            reason,
            reference: None,
            notes: command.notes.clone(),
            user_id: command.user_id,
        };

        let applied = db
            .transaction::<_, AppliedMovement, ServiceError>(move |txn| {
                Box::pin(async move {
                    ensure_active_product(txn, input.product_id).await?;
                    ensure_active_warehouse(txn, input.warehouse_id).await?;
                    apply_stock_movement(txn, input).await
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        info!(
            product_id = %applied.movement.product_id,
            warehouse_id = %applied.movement.warehouse_id,
            delta = applied.movement.quantity,
            stock_after = applied.movement.stock_after,
            "stock adjustment applied"
        );

        self.event_sender
            .send_or_log(Event::StockAdjusted {
                product_id: applied.movement.product_id,
                warehouse_id: applied.movement.warehouse_id,
                delta: applied.movement.quantity,
                stock_before: applied.movement.stock_before,
                stock_after: applied.movement.stock_after,
                reason: applied.movement.reason.clone(),
                movement_id: applied.movement.id,
            })
            .await;

        Ok(applied)
    }

    /// Resolves the adjustment reason: a catalog entry by id, or free text
    async fn resolve_reason(
        &self,
        db: &DatabaseConnection,
        command: &AdjustStockCommand,
    ) -> Result<String, ServiceError> {
        if let Some(reason_id) = command.reason_id {
            let reason = MovementReason::find_by_id(reason_id)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Movement reason {} not found", reason_id))
                })?;

            if !reason.is_active {
                return Err(ServiceError::ValidationError(format!(
                    "Movement reason {} is inactive",
                    reason.code
                )));
            }
            if reason.movement_type != MovementType::Ajuste.as_str() {
                return Err(ServiceError::ValidationError(format!(
                    "Movement reason {} does not apply to adjustments",
                    reason.code
                )));
            }
            return Ok(reason.description);
        }

        match command
            .adjustment_reason
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(text) => Ok(text.to_string()),
            None => Err(ServiceError::ValidationError(
                "Either reasonId or adjustmentReason is required".to_string(),
            )),
        }
    }

    /// Paginated stock listing with derived status annotation.
    ///
    /// The status is derived per row, so status filtering and sorting happen
    /// after the join; the row universe (products × warehouses) is small.
    pub async fn list_stock(
        &self,
        filters: StockFilters,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<StockRow>, u64), ServiceError> {
        let db = self.db.as_ref();

        let mut query = StockLevel::find().find_also_related(Product);
        if let Some(warehouse_id) = filters.warehouse_id {
            query = query.filter(stock_level::Column::WarehouseId.eq(warehouse_id));
        }
        if let Some(product_id) = filters.product_id {
            query = query.filter(stock_level::Column::ProductId.eq(product_id));
        }

        let rows = query.all(db).await.map_err(ServiceError::db_error)?;

        let warehouses: HashMap<Uuid, warehouse::Model> = Warehouse::find()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|w| (w.id, w))
            .collect();

        let mut stock_rows: Vec<StockRow> = rows
            .into_iter()
            .filter_map(|(level, maybe_product)| {
                let product = maybe_product?;
                let warehouse = warehouses.get(&level.warehouse_id)?;
                let min_stock = stock::effective_min_stock(level.min_stock, product.min_stock);
                Some(StockRow {
                    product_id: product.id,
                    product_code: product.code,
                    product_name: product.name,
                    category: product.category,
                    unit: product.unit,
                    warehouse_id: warehouse.id,
                    warehouse_code: warehouse.code.clone(),
                    warehouse_name: warehouse.name.clone(),
                    quantity: level.quantity,
                    min_stock,
                    estado: stock::derive_status(level.quantity, min_stock),
                    updated_at: level.updated_at,
                })
            })
            .collect();

        if let Some(status) = filters.status {
            stock_rows.retain(|row| row.estado == status);
        }

        match filters.sort_by.as_deref() {
            Some("quantity") => stock_rows.sort_by_key(|row| row.quantity),
            _ => stock_rows.sort_by(|a, b| a.product_code.cmp(&b.product_code)),
        }
        if filters.descending {
            stock_rows.reverse();
        }

        let total = stock_rows.len() as u64;
        let offset = page.saturating_sub(1) * limit;
        let page_rows = stock_rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        Ok((page_rows, total))
    }

    /// Stock rows currently below their minimum threshold, critical first
    pub async fn stock_alerts(&self) -> Result<Vec<StockRow>, ServiceError> {
        let (mut rows, _) = self
            .list_stock(StockFilters::default(), 1, u64::MAX)
            .await?;
        rows.retain(|row| row.estado.is_alert());
        rows.sort_by_key(|row| match row.estado {
            StockStatus::Critico => 0,
            StockStatus::Bajo => 1,
            StockStatus::Normal => 2,
        });
        Ok(rows)
    }

    /// Paginated kardex query, newest movements first
    pub async fn kardex(
        &self,
        filters: KardexFilters,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<KardexRow>, u64), ServiceError> {
        let db = self.db.as_ref();

        let mut query = InventoryMovement::find();
        if let Some(product_id) = filters.product_id {
            query = query.filter(inventory_movement::Column::ProductId.eq(product_id));
        }
        if let Some(warehouse_id) = filters.warehouse_id {
            query = query.filter(inventory_movement::Column::WarehouseId.eq(warehouse_id));
        }
        if let Some(movement_type) = filters.movement_type {
            query =
                query.filter(inventory_movement::Column::MovementType.eq(movement_type.as_str()));
        }
        if let Some(date_from) = filters.date_from {
            let start = date_from
                .and_hms_opt(0, 0, 0)
                .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
            if let Some(start) = start {
                query = query.filter(inventory_movement::Column::CreatedAt.gte(start));
            }
        }
        if let Some(date_to) = filters.date_to {
            // Inclusive upper bound: everything before the next midnight
            let end = date_to
                .succ_opt()
                .and_then(|next| next.and_hms_opt(0, 0, 0))
                .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
            if let Some(end) = end {
                query = query.filter(inventory_movement::Column::CreatedAt.lt(end));
            }
        }

        let paginator = query
            .order_by_desc(inventory_movement::Column::CreatedAt)
            .find_also_related(Product)
            .paginate(db, page_size.max(1));

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        let kardex_rows = rows
            .into_iter()
            .map(|(movement, maybe_product)| KardexRow {
                id: movement.id,
                product_id: movement.product_id,
                product_code: maybe_product.as_ref().map(|p| p.code.clone()),
                product_name: maybe_product.map(|p| p.name),
                warehouse_id: movement.warehouse_id,
                movement_type: movement.movement_type,
                quantity: movement.quantity,
                stock_before: movement.stock_before,
                stock_after: movement.stock_after,
                reason: movement.reason,
                reference: movement.reference,
                notes: movement.notes,
                user_id: movement.user_id,
                created_at: movement.created_at,
            })
            .collect();

        Ok((kardex_rows, total))
    }

    /// Current per-warehouse quantity, 0 when no stock row exists yet
    pub async fn stock_quantity(
        &self,
        product_id: Uuid,
        warehouse_id: Uuid,
    ) -> Result<i32, ServiceError> {
        let row = StockLevel::find()
            .filter(stock_level::Column::ProductId.eq(product_id))
            .filter(stock_level::Column::WarehouseId.eq(warehouse_id))
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)?;
        Ok(row.map(|r| r.quantity).unwrap_or(0))
    }

    /// Active movement reasons, optionally filtered by movement type
    pub async fn list_movement_reasons(
        &self,
        movement_type: Option<MovementType>,
    ) -> Result<Vec<movement_reason::Model>, ServiceError> {
        let mut query = MovementReason::find().filter(movement_reason::Column::IsActive.eq(true));
        if let Some(movement_type) = movement_type {
            query = query.filter(movement_reason::Column::MovementType.eq(movement_type.as_str()));
        }
        query
            .order_by_asc(movement_reason::Column::Code)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    /// Adds a movement reason to the catalog. Codes are unique.
    pub async fn create_movement_reason(
        &self,
        request: CreateMovementReason,
    ) -> Result<movement_reason::Model, ServiceError> {
        let db = self.db.as_ref();

        let duplicate = MovementReason::find()
            .filter(movement_reason::Column::Code.eq(request.code.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Movement reason code {} already exists",
                request.code
            )));
        }

        let reason = movement_reason::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(request.code),
            description: Set(request.description),
            movement_type: Set(request.movement_type.as_str().to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        };

        reason.insert(db).await.map_err(ServiceError::db_error)
    }
}

/// Applies one stock movement inside the caller's transaction:
/// upserts the stock row, appends the ledger entry and refreshes the product
/// aggregate. The non-negative guard lives in `domain::stock::apply_delta`.
pub(crate) async fn apply_stock_movement<C: ConnectionTrait>(
    conn: &C,
    input: StockMovementInput,
) -> Result<AppliedMovement, ServiceError> {
    let existing = StockLevel::find()
        .filter(stock_level::Column::ProductId.eq(input.product_id))
        .filter(stock_level::Column::WarehouseId.eq(input.warehouse_id))
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?;

    let current = existing.as_ref().map(|r| r.quantity).unwrap_or(0);

    let applied = stock::apply_delta(current, input.delta).map_err(|violation| match violation {
        StockRuleViolation::ZeroDelta => {
            ServiceError::ValidationError("cantidadAjuste must be a nonzero integer".to_string())
        }
        StockRuleViolation::NegativeResult { current, delta } => ServiceError::InsufficientStock(
            format!("resulting stock would be negative: current {}, adjustment {}", current, delta),
        ),
    })?;

    let stock_row = match existing {
        Some(row) => {
            let mut active: stock_level::ActiveModel = row.into();
            active.quantity = Set(applied.stock_after);
            active.updated_at = Set(Utc::now());
            active.update(conn).await.map_err(ServiceError::db_error)?
        }
        None => {
            // Stock rows are created lazily on the first movement
            let row = stock_level::ActiveModel {
                id: Set(Uuid::new_v4()),
                product_id: Set(input.product_id),
                warehouse_id: Set(input.warehouse_id),
                quantity: Set(applied.stock_after),
                min_stock: Set(None),
                updated_at: Set(Utc::now()),
            };
            row.insert(conn).await.map_err(ServiceError::db_error)?
        }
    };

    let movement = inventory_movement::ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(input.product_id),
        warehouse_id: Set(input.warehouse_id),
        movement_type: Set(input.movement_type.as_str().to_string()),
        quantity: Set(applied.delta),
        stock_before: Set(applied.stock_before),
        stock_after: Set(applied.stock_after),
        reason: Set(input.reason),
        reference: Set(input.reference),
        notes: Set(input.notes),
        user_id: Set(input.user_id),
        created_at: Set(Utc::now()),
    };
    let movement = movement.insert(conn).await.map_err(ServiceError::db_error)?;

    let product_stock = refresh_product_aggregate(conn, input.product_id).await?;

    Ok(AppliedMovement {
        movement,
        stock_level: stock_row,
        product_stock,
    })
}

/// Recomputes the product aggregate as the sum over all warehouses and
/// persists it on the product row. Must run inside the same transaction as
/// the stock change it reflects.
pub(crate) async fn refresh_product_aggregate<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
) -> Result<i32, ServiceError> {
    let levels = StockLevel::find()
        .filter(stock_level::Column::ProductId.eq(product_id))
        .all(conn)
        .await
        .map_err(ServiceError::db_error)?;
    let total: i32 = levels.iter().map(|level| level.quantity).sum();

    let product = Product::find_by_id(product_id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

    let mut active: product::ActiveModel = product.into();
    active.stock = Set(total);
    active.update(conn).await.map_err(ServiceError::db_error)?;

    Ok(total)
}

pub(crate) async fn ensure_active_product<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
) -> Result<product::Model, ServiceError> {
    let product = Product::find_by_id(product_id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;
    if !product.is_active {
        return Err(ServiceError::ValidationError(format!(
            "Product {} is inactive",
            product.code
        )));
    }
    Ok(product)
}

pub(crate) async fn ensure_active_warehouse<C: ConnectionTrait>(
    conn: &C,
    warehouse_id: Uuid,
) -> Result<warehouse::Model, ServiceError> {
    let warehouse = Warehouse::find_by_id(warehouse_id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::NotFound(format!("Warehouse {} not found", warehouse_id)))?;
    if !warehouse.is_active {
        return Err(ServiceError::ValidationError(format!(
            "Warehouse {} is inactive",
            warehouse.code
        )));
    }
    Ok(warehouse)
}

pub(crate) fn unwrap_transaction_error(err: TransactionError<ServiceError>) -> ServiceError {
    match err {
        TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
        TransactionError::Transaction(service_err) => service_err,
    }
}

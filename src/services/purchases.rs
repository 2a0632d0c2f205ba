use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    domain::totals::{self, LineAmount, TotalsError},
    entities::{
        business_entity::{self, Entity as BusinessEntity, EntityType},
        inventory_movement::MovementType,
        purchase::{self, Entity as Purchase, PurchaseStatus},
        purchase_item::{self, Entity as PurchaseItem},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::inventory::{
        apply_stock_movement, ensure_active_product, ensure_active_warehouse,
        unwrap_transaction_error, StockMovementInput,
    },
};

/// Reason recorded on ENTRADA movements produced by a purchase receipt
const RECEIPT_REASON: &str = "Recepción de orden de compra";

/// One requested purchase line
#[derive(Debug, Clone)]
pub struct PurchaseItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Create request after handler-level validation
#[derive(Debug, Clone)]
pub struct CreatePurchaseCommand {
    pub supplier_id: Uuid,
    pub warehouse_id: Uuid,
    pub discount: Decimal,
    pub notes: Option<String>,
    pub items: Vec<PurchaseItemInput>,
    pub created_by: Option<Uuid>,
}

/// Update request; only `Pendiente` orders accept it
#[derive(Debug, Clone, Default)]
pub struct UpdatePurchaseCommand {
    pub discount: Option<Decimal>,
    pub notes: Option<String>,
    pub items: Option<Vec<PurchaseItemInput>>,
}

/// Listing filters
#[derive(Debug, Clone, Default)]
pub struct PurchaseFilters {
    pub status: Option<PurchaseStatus>,
    pub supplier_id: Option<Uuid>,
}

/// A purchase order with its line items
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseWithItems {
    #[serde(flatten)]
    pub purchase: purchase::Model,
    pub items: Vec<purchase_item::Model>,
}

/// Purchase order service: lifecycle plus the receipt-to-stock side effect
#[derive(Clone)]
pub struct PurchaseService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl PurchaseService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Creates a purchase order in `Pendiente` status with computed totals
    #[instrument(skip(self, command))]
    pub async fn create_purchase(
        &self,
        command: CreatePurchaseCommand,
    ) -> Result<PurchaseWithItems, ServiceError> {
        if command.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "A purchase order needs at least one item".to_string(),
            ));
        }

        let amounts: Vec<LineAmount> = command
            .items
            .iter()
            .map(|item| LineAmount {
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect();
        let totals = totals::compute_totals(&amounts, command.discount).map_err(map_totals_error)?;

        let db = self.db.as_ref();
        let created = db
            .transaction::<_, PurchaseWithItems, ServiceError>(move |txn| {
                Box::pin(async move {
                    let supplier = BusinessEntity::find_by_id(command.supplier_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Supplier {} not found",
                                command.supplier_id
                            ))
                        })?;
                    ensure_supplier(&supplier)?;
                    ensure_active_warehouse(txn, command.warehouse_id).await?;

                    let purchase_number = next_purchase_number(txn).await?;

                    let purchase = purchase::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        purchase_number: Set(purchase_number),
                        supplier_id: Set(command.supplier_id),
                        warehouse_id: Set(command.warehouse_id),
                        status: Set(PurchaseStatus::Pendiente.as_str().to_string()),
                        subtotal: Set(totals.subtotal),
                        discount: Set(totals.discount),
                        total: Set(totals.total),
                        notes: Set(command.notes.clone()),
                        received_at: Set(None),
                        created_by: Set(command.created_by),
                        created_at: Set(Utc::now()),
                        updated_at: Set(None),
                    };
                    let purchase = purchase.insert(txn).await.map_err(ServiceError::db_error)?;

                    let mut items = Vec::with_capacity(command.items.len());
                    for item in &command.items {
                        let product = ensure_active_product(txn, item.product_id).await?;
                        let row = purchase_item::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            purchase_id: Set(purchase.id),
                            product_id: Set(product.id),
                            product_code: Set(product.code),
                            quantity: Set(item.quantity),
                            unit_price: Set(item.unit_price),
                            total: Set(totals::line_total(item.quantity, item.unit_price)),
                        };
                        items.push(row.insert(txn).await.map_err(ServiceError::db_error)?);
                    }

                    Ok(PurchaseWithItems { purchase, items })
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        info!(purchase_number = %created.purchase.purchase_number, "purchase order created");
        self.event_sender
            .send_or_log(Event::PurchaseCreated(created.purchase.id))
            .await;

        Ok(created)
    }

    /// Fetches a purchase order with its items
    pub async fn get_purchase(&self, id: Uuid) -> Result<Option<PurchaseWithItems>, ServiceError> {
        let db = self.db.as_ref();
        let Some(purchase) = Purchase::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
        else {
            return Ok(None);
        };

        let items = purchase
            .find_related(PurchaseItem)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(Some(PurchaseWithItems { purchase, items }))
    }

    /// Paginated listing, newest first
    pub async fn list_purchases(
        &self,
        filters: PurchaseFilters,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<purchase::Model>, u64), ServiceError> {
        let db = self.db.as_ref();

        let mut query = Purchase::find();
        if let Some(status) = filters.status {
            query = query.filter(purchase::Column::Status.eq(status.as_str()));
        }
        if let Some(supplier_id) = filters.supplier_id {
            query = query.filter(purchase::Column::SupplierId.eq(supplier_id));
        }

        let paginator = query
            .order_by_desc(purchase::Column::CreatedAt)
            .paginate(db, limit.max(1));
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((rows, total))
    }

    /// Updates a `Pendiente` purchase order; replacing the items recomputes
    /// the totals
    #[instrument(skip(self, command))]
    pub async fn update_purchase(
        &self,
        id: Uuid,
        command: UpdatePurchaseCommand,
    ) -> Result<PurchaseWithItems, ServiceError> {
        let db = self.db.as_ref();

        let updated = db
            .transaction::<_, PurchaseWithItems, ServiceError>(move |txn| {
                Box::pin(async move {
                    let purchase = Purchase::find_by_id(id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Purchase {} not found", id))
                        })?;

                    ensure_pending(&purchase)?;

                    let mut items = purchase
                        .find_related(PurchaseItem)
                        .all(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    if let Some(new_items) = &command.items {
                        if new_items.is_empty() {
                            return Err(ServiceError::ValidationError(
                                "A purchase order needs at least one item".to_string(),
                            ));
                        }

                        PurchaseItem::delete_many()
                            .filter(purchase_item::Column::PurchaseId.eq(purchase.id))
                            .exec(txn)
                            .await
                            .map_err(ServiceError::db_error)?;

                        items = Vec::with_capacity(new_items.len());
                        for item in new_items {
                            let product = ensure_active_product(txn, item.product_id).await?;
                            let row = purchase_item::ActiveModel {
                                id: Set(Uuid::new_v4()),
                                purchase_id: Set(purchase.id),
                                product_id: Set(product.id),
                                product_code: Set(product.code),
                                quantity: Set(item.quantity),
                                unit_price: Set(item.unit_price),
                                total: Set(totals::line_total(item.quantity, item.unit_price)),
                            };
                            items.push(row.insert(txn).await.map_err(ServiceError::db_error)?);
                        }
                    }

                    let discount = command.discount.unwrap_or(purchase.discount);
                    let amounts: Vec<LineAmount> = items
                        .iter()
                        .map(|item| LineAmount {
                            quantity: item.quantity,
                            unit_price: item.unit_price,
                        })
                        .collect();
                    let totals =
                        totals::compute_totals(&amounts, discount).map_err(map_totals_error)?;

                    let mut active: purchase::ActiveModel = purchase.into();
                    active.subtotal = Set(totals.subtotal);
                    active.discount = Set(totals.discount);
                    active.total = Set(totals.total);
                    if let Some(notes) = command.notes.clone() {
                        active.notes = Set(Some(notes));
                    }
                    active.updated_at = Set(Some(Utc::now()));
                    let purchase = active.update(txn).await.map_err(ServiceError::db_error)?;

                    Ok(PurchaseWithItems { purchase, items })
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        self.event_sender
            .send_or_log(Event::PurchaseUpdated(updated.purchase.id))
            .await;

        Ok(updated)
    }

    /// Deletes a `Pendiente` purchase order and its items
    #[instrument(skip(self))]
    pub async fn delete_purchase(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = self.db.as_ref();

        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let purchase = Purchase::find_by_id(id)
                    .one(txn)
                    .await
                    .map_err(ServiceError::db_error)?
                    .ok_or_else(|| ServiceError::NotFound(format!("Purchase {} not found", id)))?;

                ensure_pending(&purchase)?;

                PurchaseItem::delete_many()
                    .filter(purchase_item::Column::PurchaseId.eq(purchase.id))
                    .exec(txn)
                    .await
                    .map_err(ServiceError::db_error)?;

                purchase.delete(txn).await.map_err(ServiceError::db_error)?;
                Ok(())
            })
        })
        .await
        .map_err(unwrap_transaction_error)?;

        self.event_sender.send_or_log(Event::PurchaseDeleted(id)).await;
        Ok(())
    }

    /// Transitions the order status.
    ///
    /// `Pendiente → Recibida` applies one ENTRADA movement per line item into
    /// the order's warehouse, inside the same transaction that re-checks and
    /// flips the status. Re-sending the request once received returns a
    /// conflict and applies nothing, which keeps the receipt idempotent.
    #[instrument(skip(self))]
    pub async fn change_status(
        &self,
        id: Uuid,
        new_status: PurchaseStatus,
        user_id: Option<Uuid>,
    ) -> Result<PurchaseWithItems, ServiceError> {
        let db = self.db.as_ref();

        let result = db
            .transaction::<_, (PurchaseWithItems, usize), ServiceError>(move |txn| {
                Box::pin(async move {
                    // Status is re-read inside the transaction so concurrent
                    // receipts serialize on the row
                    let purchase = Purchase::find_by_id(id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Purchase {} not found", id))
                        })?;

                    let current = PurchaseStatus::from_str(&purchase.status).map_err(|_| {
                        ServiceError::InternalError(format!(
                            "Purchase {} has unknown status {}",
                            purchase.id, purchase.status
                        ))
                    })?;

                    match (current, new_status) {
                        (PurchaseStatus::Pendiente, PurchaseStatus::Recibida)
                        | (PurchaseStatus::Pendiente, PurchaseStatus::Cancelada) => {}
                        (PurchaseStatus::Recibida, PurchaseStatus::Recibida) => {
                            return Err(ServiceError::Conflict(format!(
                                "Purchase {} has already been received",
                                purchase.purchase_number
                            )));
                        }
                        (current, requested) => {
                            return Err(ServiceError::Conflict(format!(
                                "Purchase {} cannot change from {} to {}",
                                purchase.purchase_number,
                                current.as_str(),
                                requested.as_str()
                            )));
                        }
                    }

                    let items = purchase
                        .find_related(PurchaseItem)
                        .all(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    let mut applied_items = 0;
                    if new_status == PurchaseStatus::Recibida {
                        for item in &items {
                            apply_stock_movement(
                                txn,
                                StockMovementInput {
                                    product_id: item.product_id,
                                    warehouse_id: purchase.warehouse_id,
                                    movement_type: MovementType::Entrada,
                                    delta: item.quantity,
                                    reason: RECEIPT_REASON.to_string(),
                                    reference: Some(purchase.purchase_number.clone()),
                                    notes: None,
                                    user_id,
                                },
                            )
                            .await?;
                            applied_items += 1;
                        }
                    }

                    let mut active: purchase::ActiveModel = purchase.into();
                    active.status = Set(new_status.as_str().to_string());
                    if new_status == PurchaseStatus::Recibida {
                        active.received_at = Set(Some(Utc::now()));
                    }
                    active.updated_at = Set(Some(Utc::now()));
                    let purchase = active.update(txn).await.map_err(ServiceError::db_error)?;

                    Ok((PurchaseWithItems { purchase, items }, applied_items))
                })
            })
            .await
            .map_err(unwrap_transaction_error)?;

        let (with_items, applied_items) = result;

        match new_status {
            PurchaseStatus::Recibida => {
                info!(
                    purchase_number = %with_items.purchase.purchase_number,
                    items = applied_items,
                    "purchase order received into stock"
                );
                self.event_sender
                    .send_or_log(Event::PurchaseReceived {
                        purchase_id: with_items.purchase.id,
                        warehouse_id: with_items.purchase.warehouse_id,
                        item_count: applied_items,
                    })
                    .await;
            }
            PurchaseStatus::Cancelada => {
                self.event_sender
                    .send_or_log(Event::PurchaseCancelled(with_items.purchase.id))
                    .await;
            }
            PurchaseStatus::Pendiente => {}
        }

        Ok(with_items)
    }
}

fn ensure_pending(purchase: &purchase::Model) -> Result<(), ServiceError> {
    if purchase.status != PurchaseStatus::Pendiente.as_str() {
        return Err(ServiceError::Conflict(format!(
            "Purchase {} is {} and can no longer be modified",
            purchase.purchase_number, purchase.status
        )));
    }
    Ok(())
}

fn ensure_supplier(entity: &business_entity::Model) -> Result<(), ServiceError> {
    if !entity.is_active {
        return Err(ServiceError::ValidationError(format!(
            "Supplier {} is inactive",
            entity.legal_name
        )));
    }
    let entity_type = EntityType::from_str(&entity.entity_type)
        .map_err(|_| ServiceError::InternalError(format!(
            "Business entity {} has unknown type {}",
            entity.id, entity.entity_type
        )))?;
    if !entity_type.can_supply() {
        return Err(ServiceError::ValidationError(format!(
            "Business entity {} is not a supplier",
            entity.legal_name
        )));
    }
    Ok(())
}

fn map_totals_error(err: TotalsError) -> ServiceError {
    ServiceError::ValidationError(err.to_string())
}

/// Allocates the next `OC-` number from the row count. The unique constraint
/// on purchase_number turns a racing allocation into a database error instead
/// of a duplicate.
async fn next_purchase_number<C: sea_orm::ConnectionTrait>(conn: &C) -> Result<String, ServiceError> {
    let count = Purchase::find()
        .count(conn)
        .await
        .map_err(ServiceError::db_error)?;
    Ok(format!("OC-{:06}", count + 1))
}

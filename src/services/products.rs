use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::product::{self, Column as ProductColumn, Entity as Product},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Create request after handler-level validation
#[derive(Debug, Clone)]
pub struct CreateProductCommand {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit: String,
    pub sale_price: Decimal,
    pub min_stock: i32,
}

/// Update request; absent fields stay untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateProductCommand {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub sale_price: Option<Decimal>,
    pub min_stock: Option<i32>,
}

/// Listing filters
#[derive(Debug, Clone, Default)]
pub struct ProductFilters {
    pub category: Option<String>,
    pub search: Option<String>,
    pub include_inactive: bool,
}

/// Service for managing the product catalog
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl ProductService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Create a new product. Codes are unique among active products.
    #[instrument(skip(self, command))]
    pub async fn create_product(
        &self,
        command: CreateProductCommand,
    ) -> Result<product::Model, ServiceError> {
        let db = self.db.as_ref();

        let duplicate = Product::find()
            .filter(ProductColumn::Code.eq(command.code.clone()))
            .filter(ProductColumn::IsActive.eq(true))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Product with code '{}' already exists",
                command.code
            )));
        }

        if command.sale_price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Sale price cannot be negative".to_string(),
            ));
        }
        if command.min_stock < 0 {
            return Err(ServiceError::ValidationError(
                "Minimum stock cannot be negative".to_string(),
            ));
        }

        let product = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(command.code.clone()),
            name: Set(command.name),
            description: Set(command.description),
            category: Set(command.category),
            unit: Set(command.unit),
            sale_price: Set(command.sale_price),
            min_stock: Set(command.min_stock),
            stock: Set(0),
            is_active: Set(true),
            ..Default::default()
        };

        let created = product.insert(db).await.map_err(ServiceError::db_error)?;

        info!(product_id = %created.id, code = %created.code, "product created");
        self.event_sender
            .send_or_log(Event::ProductCreated(created.id))
            .await;

        Ok(created)
    }

    /// Get a product by ID
    pub async fn get_product(&self, id: Uuid) -> Result<Option<product::Model>, ServiceError> {
        Product::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    /// Get an active product by code
    pub async fn get_product_by_code(
        &self,
        code: &str,
    ) -> Result<Option<product::Model>, ServiceError> {
        Product::find()
            .filter(ProductColumn::Code.eq(code))
            .filter(ProductColumn::IsActive.eq(true))
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    /// List products with pagination and filters
    pub async fn list_products(
        &self,
        filters: ProductFilters,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<product::Model>, u64), ServiceError> {
        let mut query = Product::find();

        if !filters.include_inactive {
            query = query.filter(ProductColumn::IsActive.eq(true));
        }
        if let Some(category) = filters.category {
            query = query.filter(ProductColumn::Category.eq(category));
        }
        if let Some(search) = filters.search.filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            query = query.filter(
                Condition::any()
                    .add(ProductColumn::Code.like(pattern.clone()))
                    .add(ProductColumn::Name.like(pattern)),
            );
        }

        let paginator = query
            .order_by_asc(ProductColumn::Code)
            .paginate(self.db.as_ref(), limit.max(1));
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((rows, total))
    }

    /// Update a product
    #[instrument(skip(self, command))]
    pub async fn update_product(
        &self,
        id: Uuid,
        command: UpdateProductCommand,
    ) -> Result<product::Model, ServiceError> {
        let db = self.db.as_ref();

        let product = Product::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))?;

        if let Some(price) = command.sale_price {
            if price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Sale price cannot be negative".to_string(),
                ));
            }
        }
        if let Some(min_stock) = command.min_stock {
            if min_stock < 0 {
                return Err(ServiceError::ValidationError(
                    "Minimum stock cannot be negative".to_string(),
                ));
            }
        }

        let mut active: product::ActiveModel = product.into();
        if let Some(name) = command.name {
            active.name = Set(name);
        }
        if let Some(description) = command.description {
            active.description = Set(Some(description));
        }
        if let Some(category) = command.category {
            active.category = Set(Some(category));
        }
        if let Some(unit) = command.unit {
            active.unit = Set(unit);
        }
        if let Some(sale_price) = command.sale_price {
            active.sale_price = Set(sale_price);
        }
        if let Some(min_stock) = command.min_stock {
            active.min_stock = Set(min_stock);
        }

        let updated = active.update(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::ProductUpdated(updated.id))
            .await;

        Ok(updated)
    }

    /// Soft-delete: deactivate the product. Products still holding stock
    /// refuse deactivation.
    #[instrument(skip(self))]
    pub async fn deactivate_product(&self, id: Uuid) -> Result<product::Model, ServiceError> {
        let db = self.db.as_ref();

        let product = Product::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))?;

        if product.stock != 0 {
            return Err(ServiceError::Conflict(format!(
                "Product {} still has {} units in stock",
                product.code, product.stock
            )));
        }

        let mut active: product::ActiveModel = product.into();
        active.is_active = Set(false);
        let updated = active.update(db).await.map_err(ServiceError::db_error)?;

        info!(product_id = %updated.id, code = %updated.code, "product deactivated");
        self.event_sender
            .send_or_log(Event::ProductDeactivated(updated.id))
            .await;

        Ok(updated)
    }
}

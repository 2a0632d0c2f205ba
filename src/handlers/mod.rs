pub mod business_entities;
pub mod common;
pub mod health;
pub mod inventory;
pub mod products;
pub mod purchases;
pub mod users;
pub mod warehouses;

use crate::auth::AuthService;
use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub inventory: crate::services::inventory::InventoryService,
    pub products: crate::services::products::ProductService,
    pub warehouses: crate::services::warehouses::WarehouseService,
    pub business_entities: crate::services::business_entities::BusinessEntityService,
    pub purchases: crate::services::purchases::PurchaseService,
    pub users: crate::services::users::UserService,
}

impl AppServices {
    /// Build the services container shared by all handlers
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: EventSender,
        auth_service: Arc<AuthService>,
    ) -> Self {
        let inventory = crate::services::inventory::InventoryService::new(
            db_pool.clone(),
            event_sender.clone(),
        );
        let products =
            crate::services::products::ProductService::new(db_pool.clone(), event_sender.clone());
        let warehouses = crate::services::warehouses::WarehouseService::new(
            db_pool.clone(),
            event_sender.clone(),
        );
        let business_entities = crate::services::business_entities::BusinessEntityService::new(
            db_pool.clone(),
            event_sender.clone(),
        );
        let purchases =
            crate::services::purchases::PurchaseService::new(db_pool.clone(), event_sender.clone());
        let users =
            crate::services::users::UserService::new(db_pool, auth_service, event_sender);

        Self {
            inventory,
            products,
            warehouses,
            business_entities,
            purchases,
            users,
        }
    }
}

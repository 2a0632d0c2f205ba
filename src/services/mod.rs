pub mod business_entities;
pub mod inventory;
pub mod products;
pub mod purchases;
pub mod users;
pub mod warehouses;

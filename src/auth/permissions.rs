/*!
 * # Permissions Module
 *
 * This module defines permissions for resources in the system.
 * Permissions are organized by resource type and action.
 */

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Permission definition
#[derive(Debug, Clone)]
pub struct Permission {
    pub name: String,
    pub description: String,
    pub resource_type: String,
    pub action: String,
}

/// Permission actions
pub struct Actions;

impl Actions {
    pub const READ: &'static str = "read";
    pub const CREATE: &'static str = "create";
    pub const UPDATE: &'static str = "update";
    pub const DELETE: &'static str = "delete";
    pub const MANAGE: &'static str = "manage";
    pub const ALL: &'static str = "*";
}

/// Resource types
pub struct Resources;

impl Resources {
    pub const PRODUCTS: &'static str = "products";
    pub const WAREHOUSES: &'static str = "warehouses";
    pub const INVENTORY: &'static str = "inventory";
    pub const PURCHASES: &'static str = "purchases";
    pub const ENTITIES: &'static str = "entities";
    pub const USERS: &'static str = "users";
    pub const ADMIN: &'static str = "admin";
}

/// Common permission string constants for compile-time safety
pub mod consts {
    // Products
    pub const PRODUCTS_READ: &str = "products:read";
    pub const PRODUCTS_CREATE: &str = "products:create";
    pub const PRODUCTS_UPDATE: &str = "products:update";
    pub const PRODUCTS_DELETE: &str = "products:delete";

    // Warehouses
    pub const WAREHOUSES_READ: &str = "warehouses:read";
    pub const WAREHOUSES_MANAGE: &str = "warehouses:manage";

    // Inventory
    pub const INVENTORY_READ: &str = "inventory:read";
    pub const INVENTORY_ADJUST: &str = "inventory:adjust";

    // Purchases
    pub const PURCHASES_READ: &str = "purchases:read";
    pub const PURCHASES_CREATE: &str = "purchases:create";
    pub const PURCHASES_UPDATE: &str = "purchases:update";
    pub const PURCHASES_DELETE: &str = "purchases:delete";
    pub const PURCHASES_RECEIVE: &str = "purchases:receive";

    // Business entities (clients/suppliers)
    pub const ENTITIES_READ: &str = "entities:read";
    pub const ENTITIES_CREATE: &str = "entities:create";
    pub const ENTITIES_UPDATE: &str = "entities:update";
    pub const ENTITIES_DELETE: &str = "entities:delete";

    // User management
    pub const USERS_MANAGE: &str = "users:manage";
}

/// Format a permission string
pub fn format_permission(resource: &str, action: &str) -> String {
    format!("{}:{}", resource, action)
}

// Permission set definition with descriptions
lazy_static! {
    pub static ref PERMISSIONS: HashMap<String, Permission> = {
        let mut perms = HashMap::new();

        let catalog: &[(&str, &str, &str)] = &[
            (Resources::PRODUCTS, Actions::READ, "View the product catalog"),
            (Resources::PRODUCTS, Actions::CREATE, "Create catalog products"),
            (Resources::PRODUCTS, Actions::UPDATE, "Update catalog products"),
            (Resources::PRODUCTS, Actions::DELETE, "Deactivate catalog products"),
            (Resources::WAREHOUSES, Actions::READ, "View warehouses"),
            (Resources::WAREHOUSES, Actions::MANAGE, "Create and update warehouses"),
            (Resources::INVENTORY, Actions::READ, "View stock levels and the kardex ledger"),
            (Resources::INVENTORY, "adjust", "Apply manual stock adjustments"),
            (Resources::PURCHASES, Actions::READ, "View purchase orders"),
            (Resources::PURCHASES, Actions::CREATE, "Create purchase orders"),
            (Resources::PURCHASES, Actions::UPDATE, "Update pending purchase orders"),
            (Resources::PURCHASES, Actions::DELETE, "Delete pending purchase orders"),
            (Resources::PURCHASES, "receive", "Receive purchase orders into stock"),
            (Resources::ENTITIES, Actions::READ, "View business entities"),
            (Resources::ENTITIES, Actions::CREATE, "Create business entities"),
            (Resources::ENTITIES, Actions::UPDATE, "Update business entities"),
            (Resources::ENTITIES, Actions::DELETE, "Deactivate business entities"),
            (Resources::USERS, Actions::MANAGE, "Manage user accounts and permissions"),
        ];

        for (resource, action, description) in catalog {
            let name = format_permission(resource, action);
            perms.insert(
                name.clone(),
                Permission {
                    name,
                    description: description.to_string(),
                    resource_type: resource.to_string(),
                    action: action.to_string(),
                },
            );
        }

        perms
    };
}

/// Returns true when the permission string exists in the static catalog
pub fn is_known_permission(permission: &str) -> bool {
    PERMISSIONS.contains_key(permission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_contains_inventory_permissions() {
        assert!(is_known_permission(consts::INVENTORY_READ));
        assert!(is_known_permission(consts::INVENTORY_ADJUST));
        assert!(!is_known_permission("inventory:teleport"));
    }

    #[test]
    fn consts_match_formatter() {
        assert_eq!(
            consts::PURCHASES_RECEIVE,
            format_permission(Resources::PURCHASES, "receive")
        );
    }
}

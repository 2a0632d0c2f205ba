/*!
 * # Role-Based Access Control (RBAC) Module
 *
 * This module implements role-based access control for the API.
 * It defines roles and their associated permissions.
 */

use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Role definition with associated permissions
#[derive(Debug, Clone)]
pub struct Role {
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
}

// Define standard roles and their permissions
lazy_static! {
    pub static ref ROLES: HashMap<String, Role> = {
        let mut roles = HashMap::new();

        // Admin role - has all permissions
        roles.insert(
            "admin".to_string(),
            Role {
                name: "admin".to_string(),
                description: "Administrator with full access".to_string(),
                permissions: vec![
                    "admin:*".to_string(),
                    "users:*".to_string(),
                    "products:*".to_string(),
                    "warehouses:*".to_string(),
                    "inventory:*".to_string(),
                    "purchases:*".to_string(),
                    "entities:*".to_string(),
                ],
            },
        );

        // Manager role - runs daily operations
        roles.insert(
            "manager".to_string(),
            Role {
                name: "manager".to_string(),
                description: "Manager with elevated access to operations".to_string(),
                permissions: vec![
                    "products:read".to_string(),
                    "products:create".to_string(),
                    "products:update".to_string(),
                    "warehouses:read".to_string(),
                    "warehouses:manage".to_string(),
                    "inventory:read".to_string(),
                    "inventory:adjust".to_string(),
                    "purchases:*".to_string(),
                    "entities:read".to_string(),
                    "entities:create".to_string(),
                    "entities:update".to_string(),
                ],
            },
        );

        // User role (standard employee)
        roles.insert(
            "user".to_string(),
            Role {
                name: "user".to_string(),
                description: "Standard user with basic access".to_string(),
                permissions: vec![
                    "products:read".to_string(),
                    "warehouses:read".to_string(),
                    "inventory:read".to_string(),
                    "purchases:read".to_string(),
                    "purchases:create".to_string(),
                    "entities:read".to_string(),
                ],
            },
        );

        // Read-only role
        roles.insert(
            "readonly".to_string(),
            Role {
                name: "readonly".to_string(),
                description: "Read-only access to data".to_string(),
                permissions: vec![
                    "products:read".to_string(),
                    "warehouses:read".to_string(),
                    "inventory:read".to_string(),
                    "purchases:read".to_string(),
                    "entities:read".to_string(),
                ],
            },
        );

        roles
    };
}

/// RBAC helpers over the static role map
#[derive(Clone, Default)]
pub struct RbacService {}

impl RbacService {
    pub fn new() -> Self {
        Self {}
    }

    /// Get a role by name
    pub fn get_role(&self, role_name: &str) -> Option<&Role> {
        ROLES.get(role_name)
    }

    /// Get all roles
    pub fn get_all_roles(&self) -> Vec<&Role> {
        ROLES.values().collect()
    }

    /// Get all permissions for a role
    pub fn get_role_permissions(&self, role_name: &str) -> Vec<String> {
        match ROLES.get(role_name) {
            Some(role) => role.permissions.clone(),
            None => {
                warn!("Role not found: {}", role_name);
                vec![]
            }
        }
    }

    /// Get all permissions for multiple roles
    pub fn get_permissions_for_roles(&self, role_names: &[String]) -> HashSet<String> {
        let mut permissions = HashSet::new();

        for role_name in role_names {
            if let Some(role) = ROLES.get(role_name) {
                for perm in &role.permissions {
                    permissions.insert(perm.clone());
                }
            }
        }

        permissions
    }

    /// Check if a held permission satisfies a required permission
    pub fn check_permission(&self, user_permission: &str, required_permission: &str) -> bool {
        // Direct match
        if user_permission == required_permission {
            return true;
        }

        // Wildcard match (e.g. "inventory:*" covers "inventory:adjust")
        if user_permission.ends_with(":*") {
            let prefix = user_permission.trim_end_matches('*');
            if required_permission.starts_with(prefix) {
                return true;
            }
        }

        // Super wildcard (admin)
        if user_permission == "*" {
            return true;
        }

        false
    }

    /// Whether `role_name` is one of the static roles
    pub fn is_valid_role(&self, role_name: &str) -> bool {
        ROLES.contains_key(role_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_covers_resource_actions() {
        let rbac = RbacService::new();
        assert!(rbac.check_permission("inventory:*", "inventory:adjust"));
        assert!(rbac.check_permission("*", "purchases:receive"));
        assert!(!rbac.check_permission("inventory:*", "purchases:receive"));
        assert!(!rbac.check_permission("inventory:read", "inventory:adjust"));
    }

    #[test]
    fn manager_can_adjust_but_user_cannot() {
        let rbac = RbacService::new();
        let manager = rbac.get_role_permissions("manager");
        assert!(manager
            .iter()
            .any(|p| rbac.check_permission(p, "inventory:adjust")));

        let user = rbac.get_role_permissions("user");
        assert!(!user
            .iter()
            .any(|p| rbac.check_permission(p, "inventory:adjust")));
    }

    #[test]
    fn unknown_role_has_no_permissions() {
        let rbac = RbacService::new();
        assert!(rbac.get_role_permissions("intruder").is_empty());
        assert!(!rbac.is_valid_role("intruder"));
    }
}

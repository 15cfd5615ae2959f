/*!
 * # Role Registry
 *
 * Named bundles of capabilities assignable to staff accounts. Seeded with
 * the four built-in roles; operators may add their own. The `admin` role
 * is immutable and holds the entire capability catalog.
 */

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth::capabilities::{self, AdminModule};
use crate::errors::AdminError;

/// The one role that can never be edited or deleted.
pub const ADMIN_ROLE_ID: &str = "admin";

/// Built-in role names that imply full navigation visibility during
/// resolution (see `resolver::resolve`).
pub const BUILT_IN_PRIVILEGED_ROLES: [&str; 4] = ["admin", "manager", "staff", "support"];

/// A named, assignable bundle of capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Accent color the console renders the role chip with
    pub color_tag: String,
    pub capability_ids: HashSet<String>,
    /// System roles cannot be deleted
    pub is_system_role: bool,
    pub assigned_principal_count: u32,
}

impl Role {
    pub fn has_capability(&self, capability_id: &str) -> bool {
        self.capability_ids.contains(capability_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, message = "Role name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color_tag")]
    pub color_tag: String,
    #[serde(default)]
    pub capability_ids: HashSet<String>,
}

fn default_color_tag() -> String {
    "slate".to_string()
}

/// Partial update applied through [`RoleRegistry::update`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RolePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color_tag: Option<String>,
    pub capability_ids: Option<HashSet<String>>,
}

/// In-progress capability selection for the role editor.
///
/// Not persisted by itself; committed through [`RoleRegistry::update`]
/// as a `RolePatch`.
#[derive(Debug, Clone)]
pub struct RoleDraft {
    pub role_id: String,
    pub capability_ids: HashSet<String>,
}

impl RoleDraft {
    pub fn from_role(role: &Role) -> Self {
        Self {
            role_id: role.id.clone(),
            capability_ids: role.capability_ids.clone(),
        }
    }

    pub fn toggle_capability(&mut self, capability_id: &str) {
        if !self.capability_ids.remove(capability_id) {
            self.capability_ids.insert(capability_id.to_string());
        }
    }

    /// Bulk convenience: if every capability of `module` is selected,
    /// deselect them all; otherwise select them all.
    pub fn toggle_module(&mut self, module: AdminModule) {
        let module_caps = capabilities::capabilities_for_module(module);
        let all_selected = module_caps
            .iter()
            .all(|c| self.capability_ids.contains(c.id));

        for cap in module_caps {
            if all_selected {
                self.capability_ids.remove(cap.id);
            } else {
                self.capability_ids.insert(cap.id.to_string());
            }
        }
    }

    pub fn into_patch(self) -> RolePatch {
        RolePatch {
            capability_ids: Some(self.capability_ids),
            ..RolePatch::default()
        }
    }
}

/// Registry of every known role, built-in and operator-created.
///
/// Constructed once at process start and mutated only through the
/// operations below; deliberately not a process-wide singleton.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    roles: Vec<Role>,
}

impl RoleRegistry {
    /// A registry seeded with the four built-in roles.
    pub fn new() -> Self {
        Self {
            roles: seed_roles(),
        }
    }

    /// An empty registry, as seen before role data has loaded. The
    /// resolver treats every lookup against it as incomplete data.
    pub fn unloaded() -> Self {
        Self { roles: Vec::new() }
    }

    pub fn get(&self, role_id: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == role_id)
    }

    /// Exact, case-sensitive match on role id, then on role name. The
    /// principal's role attribute may carry either.
    pub fn find(&self, id_or_name: &str) -> Option<&Role> {
        self.get(id_or_name)
            .or_else(|| self.roles.iter().find(|r| r.name == id_or_name))
    }

    /// All roles, built-ins first, in insertion order.
    pub fn list(&self) -> Vec<&Role> {
        self.roles.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Creates an operator-defined role with a fresh unique id.
    pub fn create(&mut self, request: CreateRoleRequest) -> Result<Role, AdminError> {
        request
            .validate()
            .map_err(|e| AdminError::validation(e.to_string()))?;
        if request.name.trim().is_empty() {
            return Err(AdminError::validation("Role name is required"));
        }
        validate_capability_ids(&request.capability_ids)?;

        let role = Role {
            id: Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            description: request.description,
            color_tag: request.color_tag,
            capability_ids: request.capability_ids,
            is_system_role: false,
            assigned_principal_count: 0,
        };

        info!(role_id = %role.id, role_name = %role.name, "Role created");
        self.roles.push(role.clone());
        Ok(role)
    }

    /// Merges `patch` into an existing role. The `admin` role is refused.
    pub fn update(&mut self, role_id: &str, patch: RolePatch) -> Result<Role, AdminError> {
        if role_id == ADMIN_ROLE_ID {
            return Err(AdminError::ImmutableRole(role_id.to_string()));
        }
        if let Some(capability_ids) = &patch.capability_ids {
            validate_capability_ids(capability_ids)?;
        }
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(AdminError::validation("Role name is required"));
            }
        }

        let role = self
            .roles
            .iter_mut()
            .find(|r| r.id == role_id)
            .ok_or_else(|| AdminError::not_found(format!("Role {} not found", role_id)))?;

        if let Some(name) = patch.name {
            role.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            role.description = description;
        }
        if let Some(color_tag) = patch.color_tag {
            role.color_tag = color_tag;
        }
        if let Some(capability_ids) = patch.capability_ids {
            role.capability_ids = capability_ids;
        }

        info!(role_id = %role.id, "Role updated");
        Ok(role.clone())
    }

    /// Removes a non-system role.
    ///
    /// Deletion does not cascade: principals still referencing the role
    /// simply lose their effective capabilities at resolution time.
    pub fn delete(&mut self, role_id: &str) -> Result<(), AdminError> {
        let index = self
            .roles
            .iter()
            .position(|r| r.id == role_id)
            .ok_or_else(|| AdminError::not_found(format!("Role {} not found", role_id)))?;

        if self.roles[index].is_system_role {
            return Err(AdminError::SystemRoleProtected(role_id.to_string()));
        }

        self.roles.remove(index);
        info!(role_id, "Role deleted");
        Ok(())
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_capability_ids(capability_ids: &HashSet<String>) -> Result<(), AdminError> {
    for id in capability_ids {
        if !capabilities::is_known_capability(id) {
            return Err(AdminError::validation(format!(
                "Unknown capability: {}",
                id
            )));
        }
    }
    Ok(())
}

fn seed_roles() -> Vec<Role> {
    use crate::auth::capabilities::consts::*;

    let set = |ids: &[&str]| -> HashSet<String> { ids.iter().map(|s| s.to_string()).collect() };

    vec![
        Role {
            id: "admin".to_string(),
            name: "admin".to_string(),
            description: "Administrator with full access".to_string(),
            color_tag: "red".to_string(),
            capability_ids: capabilities::all_capability_ids(),
            is_system_role: true,
            assigned_principal_count: 1,
        },
        Role {
            id: "manager".to_string(),
            name: "manager".to_string(),
            description: "Manager with elevated access to operations".to_string(),
            color_tag: "blue".to_string(),
            capability_ids: set(&[
                VIEW_DASHBOARD,
                VIEW_ANALYTICS,
                VIEW_PRODUCTS,
                MANAGE_PRODUCTS,
                MANAGE_CATEGORIES,
                VIEW_ORDERS,
                MANAGE_ORDERS,
                CANCEL_ORDERS,
                MANAGE_DEALS,
                MANAGE_BANNERS,
                MANAGE_PROMOTIONS,
                VIEW_USERS,
            ]),
            is_system_role: true,
            assigned_principal_count: 0,
        },
        Role {
            id: "staff".to_string(),
            name: "staff".to_string(),
            description: "Kitchen and counter staff handling orders".to_string(),
            color_tag: "green".to_string(),
            capability_ids: set(&[VIEW_DASHBOARD, VIEW_PRODUCTS, VIEW_ORDERS, MANAGE_ORDERS]),
            is_system_role: true,
            assigned_principal_count: 0,
        },
        Role {
            id: "support".to_string(),
            name: "support".to_string(),
            description: "Customer support with read access".to_string(),
            color_tag: "amber".to_string(),
            capability_ids: set(&[VIEW_DASHBOARD, VIEW_ORDERS, VIEW_USERS]),
            is_system_role: true,
            assigned_principal_count: 0,
        },
    ]
}

/*!
 * # Capability Catalog
 *
 * The fixed set of atomic permissions the console knows about, grouped by
 * admin module. Defined once at process start and never mutated at
 * runtime; roles reference catalog entries by id.
 */

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Back-office module a capability belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AdminModule {
    Dashboard,
    Products,
    Orders,
    Marketing,
    Users,
    Settings,
    System,
}

/// An atomic, named permission.
#[derive(Debug, Clone, Serialize)]
pub struct Capability {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub module: AdminModule,
}

/// Capability id constants for compile-time safety
pub mod consts {
    // Dashboard
    pub const VIEW_DASHBOARD: &str = "view_dashboard";
    pub const VIEW_ANALYTICS: &str = "view_analytics";

    // Products
    pub const VIEW_PRODUCTS: &str = "view_products";
    pub const MANAGE_PRODUCTS: &str = "manage_products";
    pub const MANAGE_CATEGORIES: &str = "manage_categories";

    // Orders
    pub const VIEW_ORDERS: &str = "view_orders";
    pub const MANAGE_ORDERS: &str = "manage_orders";
    pub const CANCEL_ORDERS: &str = "cancel_orders";

    // Marketing
    pub const MANAGE_DEALS: &str = "manage_deals";
    pub const MANAGE_BANNERS: &str = "manage_banners";
    pub const MANAGE_PROMOTIONS: &str = "manage_promotions";

    // Users
    pub const VIEW_USERS: &str = "view_users";
    pub const MANAGE_USERS: &str = "manage_users";

    // Settings
    pub const MANAGE_SETTINGS: &str = "manage_settings";

    // System
    pub const MANAGE_ROLES: &str = "manage_roles";
    pub const VIEW_AUDIT_LOG: &str = "view_audit_log";
}

macro_rules! capability {
    ($id:expr, $label:expr, $description:expr, $module:ident) => {
        Capability {
            id: $id,
            label: $label,
            description: $description,
            module: AdminModule::$module,
        }
    };
}

lazy_static! {
    /// The full, fixed capability catalog (16 entries).
    pub static ref CAPABILITIES: Vec<Capability> = vec![
        capability!(consts::VIEW_DASHBOARD, "View dashboard", "See the dashboard overview and stats", Dashboard),
        capability!(consts::VIEW_ANALYTICS, "View analytics", "See sales and customer analytics", Dashboard),
        capability!(consts::VIEW_PRODUCTS, "View products", "Browse the product catalog", Products),
        capability!(consts::MANAGE_PRODUCTS, "Manage products", "Create, edit and archive products", Products),
        capability!(consts::MANAGE_CATEGORIES, "Manage categories", "Create, edit and delete product categories", Products),
        capability!(consts::VIEW_ORDERS, "View orders", "Browse orders and the fulfillment pipeline", Orders),
        capability!(consts::MANAGE_ORDERS, "Manage orders", "Advance orders and change their status", Orders),
        capability!(consts::CANCEL_ORDERS, "Cancel orders", "Cancel orders that have not been delivered", Orders),
        capability!(consts::MANAGE_DEALS, "Manage deals", "Create and edit time-limited deals", Marketing),
        capability!(consts::MANAGE_BANNERS, "Manage banners", "Create and edit storefront banners", Marketing),
        capability!(consts::MANAGE_PROMOTIONS, "Manage promotions", "Create and edit promotion codes", Marketing),
        capability!(consts::VIEW_USERS, "View users", "Browse customer and staff accounts", Users),
        capability!(consts::MANAGE_USERS, "Manage users", "Edit and deactivate accounts", Users),
        capability!(consts::MANAGE_SETTINGS, "Manage settings", "Edit storefront settings", Settings),
        capability!(consts::MANAGE_ROLES, "Manage roles", "Create roles and assign capabilities", System),
        capability!(consts::VIEW_AUDIT_LOG, "View audit log", "See the administrative activity log", System),
    ];
}

/// Looks up a catalog entry by id.
pub fn capability(id: &str) -> Option<&'static Capability> {
    CAPABILITIES.iter().find(|c| c.id == id)
}

pub fn is_known_capability(id: &str) -> bool {
    capability(id).is_some()
}

/// Catalog entries belonging to one module, in catalog order.
pub fn capabilities_for_module(module: AdminModule) -> Vec<&'static Capability> {
    CAPABILITIES.iter().filter(|c| c.module == module).collect()
}

/// The catalog grouped by module, in module order, for the
/// permission-editing surface.
pub fn catalog_by_module() -> Vec<(AdminModule, Vec<&'static Capability>)> {
    AdminModule::iter()
        .map(|module| (module, capabilities_for_module(module)))
        .collect()
}

/// Every capability id in the catalog.
pub fn all_capability_ids() -> HashSet<String> {
    CAPABILITIES.iter().map(|c| c.id.to_string()).collect()
}

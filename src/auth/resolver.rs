/*!
 * # Permission Resolver
 *
 * Turns the current principal plus the role registry into an effective
 * capability set, a `can_access` predicate, and the visible navigation
 * sections. Resolution never fails: an anonymous principal yields an
 * empty result, and incomplete role data falls back to full navigation
 * visibility rather than a blank console.
 */

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::{debug, warn};

use crate::auth::roles::{Role, RoleRegistry, BUILT_IN_PRIVILEGED_ROLES};

/// An authenticated back-office actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub name: String,
    /// Role id or name, matched case-sensitively against the registry
    #[serde(default)]
    pub role: Option<String>,
}

impl Principal {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.map(str::to_string),
        }
    }
}

/// How missing permission data is treated during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PermissionPolicy {
    /// Only capabilities explicitly held by the matched role are granted.
    Strict,
    /// Every navigation section is visible regardless of granular
    /// capability membership. Applied while role data is still loading
    /// (empty or missing capability set for a signed-in principal) and
    /// for the built-in privileged role names, so the console never
    /// collapses to a blank screen mid-load. An intentional
    /// availability-over-strictness escape hatch.
    ShowAllOnIncompleteData,
}

/// The outcome of resolving a principal against the registry.
#[derive(Debug, Clone)]
pub struct ResolvedPermissions {
    pub role: Option<Role>,
    pub policy: PermissionPolicy,
    capability_ids: HashSet<String>,
}

impl ResolvedPermissions {
    /// The empty result handed to anonymous visitors. Strict, no
    /// capabilities, nothing visible.
    pub fn anonymous() -> Self {
        Self {
            role: None,
            policy: PermissionPolicy::Strict,
            capability_ids: HashSet::new(),
        }
    }

    pub fn can_access(&self, capability_id: &str) -> bool {
        self.show_all() || self.capability_ids.contains(capability_id)
    }

    pub fn show_all(&self) -> bool {
        self.policy == PermissionPolicy::ShowAllOnIncompleteData
    }

    pub fn capability_ids(&self) -> &HashSet<String> {
        &self.capability_ids
    }
}

/// Resolves a (possibly absent) principal to effective permissions.
pub fn resolve(principal: Option<&Principal>, registry: &RoleRegistry) -> ResolvedPermissions {
    let Some(principal) = principal else {
        return ResolvedPermissions::anonymous();
    };

    let role_attr = principal.role.as_deref().unwrap_or("");
    let role = if role_attr.is_empty() {
        None
    } else {
        registry.find(role_attr)
    };

    if !role_attr.is_empty() && role.is_none() {
        warn!(role = role_attr, "Principal references an unknown role");
    }

    let capability_ids: HashSet<String> = role
        .map(|r| r.capability_ids.iter().cloned().collect())
        .unwrap_or_default();

    let privileged = BUILT_IN_PRIVILEGED_ROLES.contains(&role_attr);
    let policy = if capability_ids.is_empty() || privileged {
        PermissionPolicy::ShowAllOnIncompleteData
    } else {
        PermissionPolicy::Strict
    };

    debug!(
        principal = %principal.id,
        role = role_attr,
        policy = ?policy,
        capabilities = capability_ids.len(),
        "Permissions resolved"
    );

    ResolvedPermissions {
        role: role.cloned(),
        policy,
        capability_ids,
    }
}

/// Identifier for a back-office navigation section.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NavSectionId {
    Dashboard,
    Products,
    Orders,
    Marketing,
    Users,
    Settings,
    Roles,
}

/// A fixed navigation entry. Holding any one of the listed capabilities
/// makes the section visible.
#[derive(Debug)]
pub struct NavSection {
    pub id: NavSectionId,
    pub label: &'static str,
    pub required_capabilities: &'static [&'static str],
}

use crate::auth::capabilities::consts;

/// The full navigation, in display order.
pub const NAV_SECTIONS: &[NavSection] = &[
    NavSection {
        id: NavSectionId::Dashboard,
        label: "Dashboard",
        required_capabilities: &[consts::VIEW_DASHBOARD, consts::VIEW_ANALYTICS],
    },
    NavSection {
        id: NavSectionId::Products,
        label: "Products",
        required_capabilities: &[
            consts::VIEW_PRODUCTS,
            consts::MANAGE_PRODUCTS,
            consts::MANAGE_CATEGORIES,
        ],
    },
    NavSection {
        id: NavSectionId::Orders,
        label: "Orders",
        required_capabilities: &[
            consts::VIEW_ORDERS,
            consts::MANAGE_ORDERS,
            consts::CANCEL_ORDERS,
        ],
    },
    NavSection {
        id: NavSectionId::Marketing,
        label: "Marketing",
        required_capabilities: &[
            consts::MANAGE_DEALS,
            consts::MANAGE_BANNERS,
            consts::MANAGE_PROMOTIONS,
        ],
    },
    NavSection {
        id: NavSectionId::Users,
        label: "Users",
        required_capabilities: &[consts::VIEW_USERS, consts::MANAGE_USERS],
    },
    NavSection {
        id: NavSectionId::Settings,
        label: "Settings",
        required_capabilities: &[consts::MANAGE_SETTINGS],
    },
    NavSection {
        id: NavSectionId::Roles,
        label: "Roles",
        required_capabilities: &[consts::MANAGE_ROLES, consts::VIEW_AUDIT_LOG],
    },
];

/// Sections the resolved principal may see, in display order.
///
/// Never returns an empty list: if filtering removes everything, the
/// unfiltered navigation is returned instead, so an operator always has
/// at least one reachable section.
pub fn visible_sections(permissions: &ResolvedPermissions) -> Vec<&'static NavSection> {
    let visible: Vec<&'static NavSection> = NAV_SECTIONS
        .iter()
        .filter(|section| {
            section
                .required_capabilities
                .iter()
                .any(|cap| permissions.can_access(cap))
        })
        .collect();

    if visible.is_empty() {
        return NAV_SECTIONS.iter().collect();
    }
    visible
}

/// Keeps the selected section inside the visible list.
///
/// Reactive invariant: re-applied whenever the visible list changes (role
/// change, late-loading permissions), not just once.
pub fn reconcile_active_section(
    current: NavSectionId,
    visible: &[&'static NavSection],
) -> NavSectionId {
    if visible.iter().any(|s| s.id == current) {
        current
    } else {
        visible.first().map(|s| s.id).unwrap_or(current)
    }
}

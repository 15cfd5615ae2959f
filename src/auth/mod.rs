/*!
 * # Authorization Module
 *
 * Permission handling for the back-office console:
 * - the static capability catalog, grouped by admin module
 * - the role registry (named capability bundles with CRUD)
 * - the permission resolver that turns a signed-in principal into
 *   effective capabilities and a visible navigation list
 */

pub mod capabilities;
pub mod resolver;
pub mod roles;

pub use capabilities::{consts, AdminModule, Capability};
pub use resolver::{
    reconcile_active_section, resolve, visible_sections, NavSection, NavSectionId,
    PermissionPolicy, Principal, ResolvedPermissions, NAV_SECTIONS,
};
pub use roles::{
    CreateRoleRequest, Role, RoleDraft, RolePatch, RoleRegistry, ADMIN_ROLE_ID,
    BUILT_IN_PRIVILEGED_ROLES,
};

//! Role and permission behavior of the admin control plane.
//!
//! Tests cover:
//! - Protection of the admin and built-in system roles
//! - Registry CRUD validation
//! - The show-all fallback for built-in privileged roles and missing data
//! - Navigation visibility and the non-empty guarantee
//! - Active-section reconciliation after a role change

use assert_matches::assert_matches;
use std::collections::HashSet;
use std::sync::Arc;

use mealdesk::auth::{
    capabilities, consts, reconcile_active_section, resolve, visible_sections,
    CreateRoleRequest, NavSectionId, PermissionPolicy, Principal, RoleDraft, RolePatch,
    RoleRegistry, ADMIN_ROLE_ID, NAV_SECTIONS,
};
use mealdesk::errors::AdminError;
use mealdesk::orders::store::InMemoryOrderStore;
use mealdesk::AdminOrchestrator;

fn caps(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn create_role(registry: &mut RoleRegistry, name: &str, ids: &[&str]) -> String {
    registry
        .create(CreateRoleRequest {
            name: name.to_string(),
            description: String::new(),
            color_tag: "slate".to_string(),
            capability_ids: caps(ids),
        })
        .expect("role created")
        .id
}

// ==================== Role Protection ====================

#[test]
fn admin_role_cannot_be_deleted_or_edited() {
    let mut registry = RoleRegistry::new();

    assert_matches!(
        registry.delete(ADMIN_ROLE_ID).unwrap_err(),
        AdminError::SystemRoleProtected(_)
    );

    // every patch payload is refused, even an empty one
    let patches = [
        RolePatch::default(),
        RolePatch {
            name: Some("root".to_string()),
            ..RolePatch::default()
        },
        RolePatch {
            capability_ids: Some(HashSet::new()),
            ..RolePatch::default()
        },
    ];
    for patch in patches {
        assert_matches!(
            registry.update(ADMIN_ROLE_ID, patch).unwrap_err(),
            AdminError::ImmutableRole(_)
        );
    }

    let admin = registry.get(ADMIN_ROLE_ID).expect("admin still present");
    assert_eq!(admin.capability_ids, capabilities::all_capability_ids());
}

#[test]
fn system_roles_survive_delete_attempts() {
    let mut registry = RoleRegistry::new();
    for id in ["manager", "staff", "support"] {
        assert_matches!(
            registry.delete(id).unwrap_err(),
            AdminError::SystemRoleProtected(_)
        );
    }
    assert_eq!(registry.len(), 4);
}

#[test]
fn deleting_a_role_does_not_cascade_to_principals() {
    let mut registry = RoleRegistry::new();
    let role_id = create_role(&mut registry, "weekend-crew", &[consts::VIEW_ORDERS]);
    let principal = Principal::new("u1", "Sam", Some(role_id.as_str()));

    registry.delete(&role_id).unwrap();

    // The principal still references the dead role; resolution simply
    // finds no capabilities for it (and falls back to show-all for
    // availability, by design).
    let resolved = resolve(Some(&principal), &registry);
    assert!(resolved.role.is_none());
    assert!(resolved.capability_ids().is_empty());
    assert_eq!(resolved.policy, PermissionPolicy::ShowAllOnIncompleteData);
}

// ==================== Registry Validation ====================

#[test]
fn create_rejects_blank_names_and_unknown_capabilities() {
    let mut registry = RoleRegistry::new();

    let err = registry
        .create(CreateRoleRequest {
            name: String::new(),
            description: String::new(),
            color_tag: "slate".to_string(),
            capability_ids: HashSet::new(),
        })
        .unwrap_err();
    assert_matches!(err, AdminError::Validation(_));

    let err = registry
        .create(CreateRoleRequest {
            name: "ops".to_string(),
            description: String::new(),
            color_tag: "slate".to_string(),
            capability_ids: caps(&["manage_time_travel"]),
        })
        .unwrap_err();
    assert_matches!(err, AdminError::Validation(_));

    assert_eq!(registry.len(), 4, "no partial mutation on failure");
}

#[test]
fn toggle_module_drafts_commit_through_update() {
    let mut registry = RoleRegistry::new();
    let role_id = create_role(&mut registry, "ops", &[consts::VIEW_ORDERS]);

    let mut draft = RoleDraft::from_role(registry.get(&role_id).unwrap());
    draft.toggle_module(capabilities::AdminModule::Orders); // partial -> full
    let updated = registry.update(&role_id, draft.into_patch()).unwrap();

    for cap in capabilities::capabilities_for_module(capabilities::AdminModule::Orders) {
        assert!(updated.has_capability(cap.id));
    }
}

// ==================== Show-All Fallback ====================

#[test]
fn builtin_privileged_roles_see_every_section() {
    let registry = RoleRegistry::new();
    for name in ["admin", "manager", "staff", "support"] {
        let principal = Principal::new("u1", "Pat", Some(name));
        let resolved = resolve(Some(&principal), &registry);
        let sections = visible_sections(&resolved);
        assert_eq!(
            sections.len(),
            NAV_SECTIONS.len(),
            "built-in '{}' should see the full navigation",
            name
        );
    }
}

#[test]
fn custom_support_role_sees_exactly_three_sections() {
    // Fully populated registry, role name outside the four built-ins:
    // the show-all fallback must NOT apply.
    let mut registry = RoleRegistry::new();
    let role_id = create_role(
        &mut registry,
        "support-tier2",
        &[consts::VIEW_DASHBOARD, consts::VIEW_ORDERS, consts::VIEW_USERS],
    );

    let principal = Principal::new("u1", "Pat", Some(role_id.as_str()));
    let resolved = resolve(Some(&principal), &registry);
    assert_eq!(resolved.policy, PermissionPolicy::Strict);

    let sections: Vec<NavSectionId> = visible_sections(&resolved).iter().map(|s| s.id).collect();
    assert_eq!(
        sections,
        vec![
            NavSectionId::Dashboard,
            NavSectionId::Orders,
            NavSectionId::Users
        ]
    );
}

#[test]
fn navigation_never_empties_even_with_zero_capabilities() {
    let mut registry = RoleRegistry::new();
    let role_id = create_role(&mut registry, "ghost", &[]);
    let principal = Principal::new("u1", "Pat", Some(role_id.as_str()));

    let resolved = resolve(Some(&principal), &registry);
    let sections = visible_sections(&resolved);
    assert!(!sections.is_empty());
}

// ==================== Active-Section Reconciliation ====================

#[test]
fn active_section_resets_when_role_loses_it() {
    let mut registry = RoleRegistry::new();
    let role_id = create_role(&mut registry, "ops", &[consts::VIEW_ORDERS]);
    let principal = Principal::new("u1", "Pat", Some(role_id.as_str()));
    let resolved = resolve(Some(&principal), &registry);
    let visible = visible_sections(&resolved);

    assert_eq!(
        reconcile_active_section(NavSectionId::Roles, &visible),
        NavSectionId::Orders
    );
}

#[tokio::test]
async fn orchestrator_snaps_section_on_principal_change() {
    let store = Arc::new(InMemoryOrderStore::new());
    let mut registry = RoleRegistry::new();
    let role_id = create_role(&mut registry, "ops", &[consts::VIEW_ORDERS]);

    let mut admin = AdminOrchestrator::new(store, registry);
    admin.set_principal(Some(Principal::new("root", "Root", Some("admin"))));
    admin.set_active_section(NavSectionId::Settings);
    assert_eq!(admin.active_section(), NavSectionId::Settings);

    // Switching to the strict ops role hides Settings.
    admin.set_principal(Some(Principal::new("u1", "Pat", Some(role_id.as_str()))));
    assert_eq!(admin.active_section(), NavSectionId::Orders);
}

// ==================== Guarded Role CRUD ====================

#[tokio::test]
async fn role_mutations_require_manage_roles() {
    let store = Arc::new(InMemoryOrderStore::new());
    let mut registry = RoleRegistry::new();
    let viewer = create_role(&mut registry, "viewer", &[consts::VIEW_ORDERS]);

    let mut admin = AdminOrchestrator::new(store, registry);
    admin.set_principal(Some(Principal::new("u1", "Pat", Some(viewer.as_str()))));

    let err = admin
        .create_role(CreateRoleRequest {
            name: "sneaky".to_string(),
            description: String::new(),
            color_tag: "slate".to_string(),
            capability_ids: HashSet::new(),
        })
        .unwrap_err();
    assert_matches!(err, AdminError::Unauthorized(_));
    assert_matches!(
        admin.delete_role("manager").unwrap_err(),
        AdminError::Unauthorized(_)
    );
}

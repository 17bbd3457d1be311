use super::*;
use crate::test_helpers::{sample_tenant, user_with_role};

fn signed_in(role: Role) -> SessionState {
    SessionState { user: Some(user_with_role(role)), loading: false }
}

fn anonymous() -> SessionState {
    SessionState { user: None, loading: false }
}

// =============================================================
// decide
// =============================================================

#[test]
fn org_admin_without_selection_is_sent_to_tenant_selection() {
    let decision = decide(&signed_in(Role::OrgAdmin), None, true);
    assert_eq!(decision, AccessDecision::RedirectToTenantSelection);
}

#[test]
fn system_admin_bypasses_tenant_requirement() {
    assert_eq!(decide(&signed_in(Role::SystemAdmin), None, true), AccessDecision::Allow);
    assert_eq!(decide(&signed_in(Role::SystemAdmin), None, false), AccessDecision::Allow);
}

#[test]
fn anonymous_is_always_sent_to_login() {
    let tenant = sample_tenant(1, "A");
    for selection in [None, Some(&tenant)] {
        for requires_tenant in [true, false] {
            assert_eq!(decide(&anonymous(), selection, requires_tenant), AccessDecision::RedirectToLogin);
        }
    }
}

#[test]
fn staff_with_selection_is_allowed() {
    let tenant = sample_tenant(5, "A");
    assert_eq!(decide(&signed_in(Role::Staff), Some(&tenant), true), AccessDecision::Allow);
}

#[test]
fn route_without_tenant_requirement_allows_any_signed_in_role() {
    for role in [Role::Staff, Role::OrgAdmin, Role::Other("auditor".to_owned())] {
        assert_eq!(decide(&signed_in(role), None, false), AccessDecision::Allow);
    }
}

#[test]
fn unknown_role_is_treated_like_staff() {
    let role = Role::Other("accountant".to_owned());
    assert_eq!(decide(&signed_in(role), None, true), AccessDecision::RedirectToTenantSelection);
}

#[test]
fn loading_flag_does_not_change_decision() {
    let state = SessionState { user: None, loading: true };
    assert_eq!(decide(&state, None, false), AccessDecision::RedirectToLogin);
}

// =============================================================
// guard / redirect_target
// =============================================================

#[test]
fn guard_allows_public_routes_for_anonymous_users() {
    let login = routes::route_for(routes::LOGIN).unwrap();
    assert_eq!(guard(&login, &anonymous(), None), AccessDecision::Allow);
}

#[test]
fn guard_applies_route_tenant_requirement() {
    let home = routes::route_for(routes::HOME).unwrap();
    let libraries = routes::route_for(routes::LIBRARIES).unwrap();
    let session = signed_in(Role::Staff);
    assert_eq!(guard(&home, &session, None), AccessDecision::RedirectToTenantSelection);
    assert_eq!(guard(&libraries, &session, None), AccessDecision::Allow);
    assert_eq!(guard(&libraries, &anonymous(), None), AccessDecision::RedirectToLogin);
}

#[test]
fn redirect_targets_point_at_entry_routes() {
    assert_eq!(redirect_target(AccessDecision::Allow), None);
    assert_eq!(redirect_target(AccessDecision::RedirectToLogin), Some(routes::LOGIN));
    assert_eq!(redirect_target(AccessDecision::RedirectToTenantSelection), Some(routes::LIBRARIES));
}

// =============================================================
// Role-derived chrome
// =============================================================

#[test]
fn landing_route_depends_on_role() {
    assert_eq!(landing_route(&Role::SystemAdmin), routes::ADMIN_HOME);
    assert_eq!(landing_route(&Role::OrgAdmin), routes::HOME);
    assert_eq!(landing_route(&Role::Staff), routes::HOME);
}

#[test]
fn role_labels_are_readable() {
    assert_eq!(role_label(&Role::OrgAdmin), "Organization Admin");
    assert_eq!(role_label(&Role::Other("auditor".to_owned())), "auditor");
}

#[test]
fn menu_hides_tenant_scoped_entries_until_selected() {
    let without: Vec<_> = menu_items(&Role::Staff, false).into_iter().map(|m| m.path).collect();
    assert_eq!(without, vec![routes::LIBRARIES]);

    let with: Vec<_> = menu_items(&Role::Staff, true).into_iter().map(|m| m.path).collect();
    assert_eq!(with, vec![routes::HOME, routes::LIBRARIES]);
}

#[test]
fn system_admin_menu_ignores_selection() {
    let menu = menu_items(&Role::SystemAdmin, false);
    assert_eq!(menu.len(), 3);
    assert_eq!(menu[0].path, routes::ADMIN_HOME);
}

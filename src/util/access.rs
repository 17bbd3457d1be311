//! Access policy: the single place where session, role and tenant selection
//! are combined into navigation decisions.
//!
//! DESIGN
//! ======
//! Everything here is pure. Role comparisons live only in this module so the
//! rest of the client never matches on role strings. Decisions are advisory
//! UX gating; the server remains the authority on permissions.

#[cfg(test)]
#[path = "access_test.rs"]
mod access_test;

use crate::net::types::{Role, Tenant};
use crate::routes::{self, RouteSpec};
use crate::state::session::SessionState;

/// Outcome of evaluating a route against the current session and selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    RedirectToLogin,
    RedirectToTenantSelection,
}

/// Evaluate the access rules in order:
///
/// 1. no authenticated user → login
/// 2. system admins bypass the tenant requirement
/// 3. tenant-scoped route without a selection → tenant selection
/// 4. otherwise allow
pub fn decide(session: &SessionState, selection: Option<&Tenant>, route_requires_tenant: bool) -> AccessDecision {
    let Some(user) = session.user.as_ref() else {
        return AccessDecision::RedirectToLogin;
    };
    if is_system_admin(&user.role) {
        return AccessDecision::Allow;
    }
    if route_requires_tenant && selection.is_none() {
        return AccessDecision::RedirectToTenantSelection;
    }
    AccessDecision::Allow
}

/// Apply a route's declarations: public routes are always allowed, the rest
/// go through [`decide`].
pub fn guard(route: &RouteSpec, session: &SessionState, selection: Option<&Tenant>) -> AccessDecision {
    if !route.requires_auth {
        return AccessDecision::Allow;
    }
    decide(session, selection, route.requires_tenant)
}

/// Route a redirect decision points at, if any.
pub fn redirect_target(decision: AccessDecision) -> Option<&'static str> {
    match decision {
        AccessDecision::Allow => None,
        AccessDecision::RedirectToLogin => Some(routes::LOGIN),
        AccessDecision::RedirectToTenantSelection => Some(routes::LIBRARIES),
    }
}

pub fn is_system_admin(role: &Role) -> bool {
    matches!(role, Role::SystemAdmin)
}

/// Landing route after a successful login.
pub fn landing_route(role: &Role) -> &'static str {
    if is_system_admin(role) { routes::ADMIN_HOME } else { routes::HOME }
}

/// Human-readable role name for the app chrome.
pub fn role_label(role: &Role) -> &str {
    match role {
        Role::SystemAdmin => "System Admin",
        Role::OrgAdmin => "Organization Admin",
        Role::Staff => "Staff",
        Role::Other(raw) => raw,
    }
}

/// Entry in the app-layout navigation menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
}

/// Navigation menu for `role`. Tenant-scoped entries are dropped while no
/// tenant is selected, except for system admins.
pub fn menu_items(role: &Role, has_tenant: bool) -> Vec<MenuItem> {
    let candidates: &[MenuItem] = if is_system_admin(role) {
        &[
            MenuItem { label: "Admin Dashboard", path: routes::ADMIN_HOME },
            MenuItem { label: "Libraries", path: routes::LIBRARIES },
            MenuItem { label: "Register Library", path: routes::REGISTER },
        ]
    } else {
        &[
            MenuItem { label: "Dashboard", path: routes::HOME },
            MenuItem { label: "Switch Library", path: routes::LIBRARIES },
        ]
    };
    candidates
        .iter()
        .copied()
        .filter(|item| {
            let requires_tenant = routes::route_for(item.path).is_some_and(|r| r.requires_tenant);
            !requires_tenant || has_tenant || is_system_admin(role)
        })
        .collect()
}

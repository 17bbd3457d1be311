//! Route table and per-route access declarations.
//!
//! Each route states whether it needs an authenticated session and whether it
//! needs a selected tenant; `util::access::guard` turns those declarations
//! into allow/redirect decisions.

pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";
pub const LIBRARIES: &str = "/libraries";
pub const ADMIN_HOME: &str = "/admin";
pub const HOME: &str = "/dashboard";

/// Access requirements declared by a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteSpec {
    pub path: &'static str,
    pub requires_auth: bool,
    pub requires_tenant: bool,
}

impl RouteSpec {
    pub const fn public(path: &'static str) -> Self {
        Self { path, requires_auth: false, requires_tenant: false }
    }

    pub const fn authenticated(path: &'static str) -> Self {
        Self { path, requires_auth: true, requires_tenant: false }
    }

    pub const fn tenant_scoped(path: &'static str) -> Self {
        Self { path, requires_auth: true, requires_tenant: true }
    }
}

pub const LOGIN_ROUTE: RouteSpec = RouteSpec::public(LOGIN);
pub const REGISTER_ROUTE: RouteSpec = RouteSpec::public(REGISTER);
pub const LIBRARIES_ROUTE: RouteSpec = RouteSpec::authenticated(LIBRARIES);
pub const ADMIN_HOME_ROUTE: RouteSpec = RouteSpec::tenant_scoped(ADMIN_HOME);
pub const HOME_ROUTE: RouteSpec = RouteSpec::tenant_scoped(HOME);

pub const ROUTES: [RouteSpec; 5] = [LOGIN_ROUTE, REGISTER_ROUTE, LIBRARIES_ROUTE, ADMIN_HOME_ROUTE, HOME_ROUTE];

/// Declaration for `path`, ignoring a trailing slash.
pub fn route_for(path: &str) -> Option<RouteSpec> {
    let trimmed = match path.trim_end_matches('/') {
        "" => "/",
        p => p,
    };
    ROUTES.iter().copied().find(|r| r.path == trimmed)
}

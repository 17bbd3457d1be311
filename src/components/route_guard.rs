//! Route-level access gate.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps a page and re-evaluates `util::access::guard` whenever the session
//! or the tenant selection changes. While the persisted session is still
//! being restored a protected route renders nothing, so a reload never
//! flashes the login page for a signed-in user.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::Redirect;

use crate::net::types::Tenant;
use crate::routes::RouteSpec;
use crate::state::session::SessionState;
use crate::util::access;

#[component]
pub fn RouteGuard(route: RouteSpec, children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let selected = expect_context::<RwSignal<Option<Tenant>>>();

    let decision = Memo::new(move |_| {
        let state = session.get();
        if route.requires_auth && state.loading {
            return None;
        }
        Some(selected.with(|tenant| access::guard(&route, &state, tenant.as_ref())))
    });

    move || match decision.get().map(access::redirect_target) {
        None => ().into_any(),
        Some(None) => children().into_any(),
        Some(Some(target)) => {
            leptos::logging::log!("{} redirected to {target}", route.path);
            view! { <Redirect path=target options=NavigateOptions { replace: true, ..NavigateOptions::default() }/> }
                .into_any()
        }
    }
}

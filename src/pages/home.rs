//! Landing page for `/dashboard` and `/admin`.
//!
//! Shows who is signed in, the selected library and the role-derived menu.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::net::types::Tenant;
use crate::state::session::{SessionManager, SessionState};
use crate::util::access;

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<SessionManager>();
    let state = expect_context::<RwSignal<SessionState>>();
    let selected = expect_context::<RwSignal<Option<Tenant>>>();

    let identity = move || {
        state.with(|s| {
            s.user.as_ref().map(|u| (u.email.clone(), access::role_label(&u.role).to_owned())).unwrap_or_default()
        })
    };
    let menu = move || {
        let has_tenant = selected.with(Option::is_some);
        state
            .with(|s| s.user.as_ref().map(|u| access::menu_items(&u.role, has_tenant)))
            .unwrap_or_default()
            .into_iter()
            .map(|item| view! { <li><A href=item.path>{item.label}</A></li> })
            .collect::<Vec<_>>()
    };

    view! {
        <div class="home-page">
            <header class="home-page__header toolbar">
                <span class="toolbar__self">
                    {move || identity().0}
                    " ("
                    <span class="toolbar__role">{move || identity().1}</span>
                    ")"
                </span>
                <span class="toolbar__library">
                    {move || {
                        selected.with(|t| t.as_ref().map_or_else(|| "No library selected".to_owned(), |t| t.name.clone()))
                    }}
                </span>
                <span class="toolbar__spacer"></span>
                <button class="btn toolbar__logout" on:click=move |_| session.logout() title="Sign out">
                    "Logout"
                </button>
            </header>
            <nav class="home-page__menu">
                <ul>{menu}</ul>
            </nav>
        </div>
    }
}

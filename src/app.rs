//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds the process-wide state holders once, mirrors their snapshots
//! into signals so views re-render, and installs everything as context:
//!
//! * `SessionManager`, `TenantSelection`, `HttpApi`
//! * `RwSignal<SessionState>`, `RwSignal<Option<Tenant>>`
//! * `NavigationQueue`, `ToastQueue`

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::StaticSegment;
use leptos_router::components::{Redirect, Route, Router, Routes};

use crate::components::navigation_bridge::NavigationBridge;
use crate::components::route_guard::RouteGuard;
use crate::components::toast_stack::ToastStack;
use crate::config::ClientConfig;
use crate::net::api::HttpApi;
use crate::net::types::Tenant;
use crate::pages::{home::HomePage, libraries::LibrariesPage, login::LoginPage, register::RegisterPage};
use crate::routes;
use crate::state::effects::{NavigationQueue, ToastQueue};
use crate::state::session::{SessionManager, SessionState};
use crate::state::tenant::TenantSelection;
use crate::util::storage::PersistedStore;

fn load_config() -> ClientConfig {
    ClientConfig::from_build_env().unwrap_or_else(|e| {
        leptos::logging::warn!("invalid build configuration, using defaults: {e}");
        ClientConfig::default()
    })
}

fn open_store(config: &ClientConfig) -> PersistedStore {
    #[cfg(feature = "csr")]
    {
        PersistedStore::browser(&config.storage_prefix)
    }
    #[cfg(not(feature = "csr"))]
    {
        PersistedStore::with_prefix(Arc::new(crate::util::storage::MemoryStorage::new()), &config.storage_prefix)
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = load_config();
    let store = open_store(&config);

    let navigation = NavigationQueue::new();
    let toasts = ToastQueue::new();
    let session = SessionManager::new(store.clone(), Arc::new(navigation), Arc::new(toasts));
    let selection = TenantSelection::new(store.clone());
    let api = HttpApi::new(config.api_base, store);

    let session_state = RwSignal::new(session.snapshot());
    session.subscribe(move |state| session_state.set(state.clone()));
    let selected_tenant = RwSignal::new(selection.selected());
    selection.subscribe(move |tenant| selected_tenant.set(tenant.cloned()));

    session.bootstrap();

    provide_context(session);
    provide_context(selection);
    provide_context(api);
    provide_context::<RwSignal<SessionState>>(session_state);
    provide_context::<RwSignal<Option<Tenant>>>(selected_tenant);
    provide_context(navigation);
    provide_context(toasts);

    view! {
        <Title text="Fee Desk"/>

        <Router>
            <NavigationBridge/>
            <main class="app-main">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=|| view! { <Redirect path=routes::HOME/> }/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("register") view=RegisterPage/>
                    <Route
                        path=StaticSegment("libraries")
                        view=|| view! { <RouteGuard route=routes::LIBRARIES_ROUTE><LibrariesPage/></RouteGuard> }
                    />
                    <Route
                        path=StaticSegment("admin")
                        view=|| view! { <RouteGuard route=routes::ADMIN_HOME_ROUTE><HomePage/></RouteGuard> }
                    />
                    <Route
                        path=StaticSegment("dashboard")
                        view=|| view! { <RouteGuard route=routes::HOME_ROUTE><HomePage/></RouteGuard> }
                    />
                </Routes>
            </main>
        </Router>
        <ToastStack/>
    }
}

//! Library (tenant) picker.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected page that needs a library redirects here when nothing is
//! selected. Each successful list fetch is followed by
//! [`TenantSelection::reconcile`], which is how a selection restored from
//! storage picks up fresh server data after a reload.
//!
//! System admins also get a small form to register a new library.

#[cfg(test)]
#[path = "libraries_test.rs"]
mod libraries_test;

use leptos::prelude::*;

use crate::net::api::{ApiError, TenantApi};
use crate::net::types::{NewTenant, Tenant};
use crate::state::effects::{NavigationQueue, Navigator, Notifier, Severity, ToastQueue};
use crate::state::session::SessionState;
use crate::state::tenant::TenantSelection;
use crate::util::access;

/// Fetch the library list and reconcile the held selection against it.
///
/// # Errors
///
/// Propagates the fetch error; the selection is untouched in that case.
pub async fn refresh_tenants<A>(api: &A, selection: &TenantSelection) -> Result<Vec<Tenant>, ApiError>
where
    A: TenantApi + ?Sized,
{
    let mut tenants = api.list_all().await?;
    if selection.reconcile(&tenants) {
        leptos::logging::log!("selected library refreshed from server list");
    }
    tenants.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(tenants)
}

/// Build a create request from the admin form.
///
/// # Errors
///
/// Returns a user-facing message for the first invalid field.
pub fn new_tenant_from_form(name: &str, code: &str, seat_limit: &str) -> Result<NewTenant, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Library name is required".to_owned());
    }
    let code = code.trim().to_ascii_uppercase();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Library code must be letters and digits".to_owned());
    }
    let seat_limit = match seat_limit.trim() {
        "" => 0,
        raw => raw.parse::<u32>().map_err(|_| format!("Seat limit must be a whole number, got {raw:?}"))?,
    };
    Ok(NewTenant { name: name.to_owned(), code, seat_limit, kind: "library".to_owned(), ..NewTenant::default() })
}

#[component]
pub fn LibrariesPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let selected = expect_context::<RwSignal<Option<Tenant>>>();
    let selection = expect_context::<TenantSelection>();
    let toasts = expect_context::<ToastQueue>();
    let navigation = expect_context::<NavigationQueue>();

    let tenants = RwSignal::new(Vec::<Tenant>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);

    #[cfg(feature = "csr")]
    {
        let api = expect_context::<crate::net::api::HttpApi>();
        let selection = selection.clone();
        leptos::task::spawn_local(async move {
            match refresh_tenants(&api, &selection).await {
                Ok(list) => tenants.set(list),
                Err(e) => {
                    leptos::logging::warn!("library list fetch failed: {e}");
                    toasts.notify(Severity::Error, "Could not load libraries.");
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    }
    #[cfg(not(feature = "csr"))]
    loading.set(false);

    let is_admin = move || session.with(|s| s.user.as_ref().is_some_and(|u| access::is_system_admin(&u.role)));

    let on_select = move |tenant: Tenant| {
        selection.select(Some(&tenant));
        toasts.notify(Severity::Info, &format!("Switched to {}.", tenant.name));
        let target = session.with(|s| s.user.as_ref().map(|u| access::landing_route(&u.role)));
        if let Some(target) = target {
            navigation.navigate(target, false);
        }
    };

    view! {
        <div class="libraries-page">
            <header class="libraries-page__header">
                <h1>"Choose a library"</h1>
                <span class="libraries-page__current">
                    {move || selected.with(|t| t.as_ref().map(|t| format!("Current: {}", t.name)))}
                </span>
            </header>
            <Show when=move || error.get().is_some()>
                <p class="libraries-page__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <Show when=move || !loading.get() fallback=move || view! { <p>"Loading libraries..."</p> }>
                <ul class="libraries-page__list">
                    {
                        let on_select = on_select.clone();
                        move || {
                            tenants
                                .get()
                                .into_iter()
                                .map(|tenant| {
                                    let on_select = on_select.clone();
                                    let is_current = selected.with(|s| s.as_ref().is_some_and(|s| s.id == tenant.id));
                                    let label = format!("{} ({})", tenant.name, tenant.code);
                                    let class = if is_current {
                                        "libraries-page__item libraries-page__item--current"
                                    } else {
                                        "libraries-page__item"
                                    };
                                    view! {
                                        <li class=class>
                                            <button class="btn" on:click=move |_| on_select(tenant.clone())>
                                                {label}
                                            </button>
                                        </li>
                                    }
                                })
                                .collect::<Vec<_>>()
                        }
                    }
                </ul>
            </Show>
            <Show when=is_admin>
                <CreateLibraryForm tenants=tenants/>
            </Show>
        </div>
    }
}

#[component]
fn CreateLibraryForm(tenants: RwSignal<Vec<Tenant>>) -> impl IntoView {
    let toasts = expect_context::<ToastQueue>();
    let name = RwSignal::new(String::new());
    let code = RwSignal::new(String::new());
    let seats = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let fields = match new_tenant_from_form(&name.get(), &code.get(), &seats.get()) {
            Ok(fields) => fields,
            Err(message) => {
                toasts.notify(Severity::Error, &message);
                return;
            }
        };
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let api = expect_context::<crate::net::api::HttpApi>();
            leptos::task::spawn_local(async move {
                match api.create(&fields).await {
                    Ok(created) => {
                        toasts.notify(Severity::Success, &format!("Registered {}.", created.name));
                        tenants.update(|list| list.push(created));
                        name.set(String::new());
                        code.set(String::new());
                        seats.set(String::new());
                    }
                    Err(e) => toasts.notify(Severity::Error, &e.to_string()),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (fields, tenants);
            busy.set(false);
        }
    };

    view! {
        <form class="libraries-page__create" on:submit=on_submit>
            <h2>"Register a library"</h2>
            <input
                type="text"
                placeholder="Name"
                prop:value=move || name.get()
                on:input=move |ev| name.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Code"
                prop:value=move || code.get()
                on:input=move |ev| code.set(event_target_value(&ev))
            />
            <input
                type="number"
                min="0"
                placeholder="Seat limit"
                prop:value=move || seats.get()
                on:input=move |ev| seats.set(event_target_value(&ev))
            />
            <button class="btn" type="submit" disabled=move || busy.get()>
                "Register"
            </button>
        </form>
    }
}

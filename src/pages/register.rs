//! Library self-registration page.
//!
//! A successful registration never signs the user in; [`SessionManager::register`]
//! sends them back to the login page. Server-side validation problems are
//! shown next to the field they belong to.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use std::collections::BTreeMap;

use leptos::prelude::*;
use leptos_router::components::A;

use super::login::looks_like_email;
use crate::net::types::RegisterRequest;
use crate::routes;
use crate::state::session::SessionManager;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Raw form values as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub organization_name: String,
    pub city: String,
    pub phone: String,
}

/// Validate the form locally. Errors are keyed by the same field names the
/// server uses, so local and remote problems render the same way.
///
/// # Errors
///
/// Returns every failing field with its message.
pub fn validate_registration(form: &RegisterForm) -> Result<RegisterRequest, BTreeMap<String, String>> {
    let mut errors = BTreeMap::new();
    let name = form.name.trim();
    let email = form.email.trim();
    let organization = form.organization_name.trim();

    if name.is_empty() {
        errors.insert("name".to_owned(), "Name is required".to_owned());
    }
    if !looks_like_email(email) {
        errors.insert("email".to_owned(), "Enter a valid email address".to_owned());
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert("password".to_owned(), format!("Password must be at least {MIN_PASSWORD_LEN} characters"));
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let details = [("city", form.city.trim()), ("phone", form.phone.trim())]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.to_owned(), serde_json::Value::from(value)))
        .collect();

    Ok(RegisterRequest {
        name: name.to_owned(),
        email: email.to_owned(),
        password: form.password.clone(),
        organization_name: (!organization.is_empty()).then(|| organization.to_owned()),
        details,
    })
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let session = expect_context::<SessionManager>();
    let form = RwSignal::new(RegisterForm::default());
    let field_errors = RwSignal::new(BTreeMap::<String, String>::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let request = match validate_registration(&form.get()) {
            Ok(request) => request,
            Err(errors) => {
                field_errors.set(errors);
                return;
            }
        };
        field_errors.set(BTreeMap::new());
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let session = session.clone();
            let api = expect_context::<crate::net::api::HttpApi>();
            leptos::task::spawn_local(async move {
                if let Err(e) = session.register(&api, &request).await {
                    field_errors.set(e.field_errors().cloned().unwrap_or_default());
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&session, request);
            busy.set(false);
        }
    };

    let error_for = move |field: &'static str| move || field_errors.with(|errors| errors.get(field).cloned());

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Register"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Your name"
                        prop:value=move || form.with(|f| f.name.clone())
                        on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                    />
                    <p class="field-error">{error_for("name")}</p>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@library.org"
                        prop:value=move || form.with(|f| f.email.clone())
                        on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                    />
                    <p class="field-error">{error_for("email")}</p>
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || form.with(|f| f.password.clone())
                        on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                    />
                    <p class="field-error">{error_for("password")}</p>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Library name (optional)"
                        prop:value=move || form.with(|f| f.organization_name.clone())
                        on:input=move |ev| form.update(|f| f.organization_name = event_target_value(&ev))
                    />
                    <p class="field-error">{error_for("organizationName")}</p>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="City (optional)"
                        prop:value=move || form.with(|f| f.city.clone())
                        on:input=move |ev| form.update(|f| f.city = event_target_value(&ev))
                    />
                    <p class="field-error">{error_for("city")}</p>
                    <input
                        class="login-input"
                        type="tel"
                        placeholder="Phone (optional)"
                        prop:value=move || form.with(|f| f.phone.clone())
                        on:input=move |ev| form.update(|f| f.phone = event_target_value(&ev))
                    />
                    <p class="field-error">{error_for("phone")}</p>
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Create Account"
                    </button>
                </form>
                <p class="login-card__footer">
                    "Already registered? " <A href=routes::LOGIN>"Sign in"</A>
                </p>
            </div>
        </div>
    }
}

//! Login page with email + password and "remember me".
//!
//! SYSTEM CONTEXT
//! ==============
//! The page only validates input and hands off to [`SessionManager::login`],
//! which owns persistence, the success toast and the post-login redirect.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::components::{A, Redirect};

use crate::routes;
use crate::state::session::{SessionManager, SessionState};
use crate::util::access;

/// Trimmed credentials ready to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoginInputError {
    #[error("Enter your email address.")]
    MissingEmail,
    #[error("Enter a valid email address.")]
    InvalidEmail,
    #[error("Enter your password.")]
    MissingPassword,
}

/// Check the form before any request is made. The password is not trimmed.
///
/// # Errors
///
/// Returns the first problem found, in field order.
pub fn validate_login_input(email: &str, password: &str) -> Result<LoginInput, LoginInputError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(LoginInputError::MissingEmail);
    }
    if !looks_like_email(email) {
        return Err(LoginInputError::InvalidEmail);
    }
    if password.is_empty() {
        return Err(LoginInputError::MissingPassword);
    }
    Ok(LoginInput { email: email.to_owned(), password: password.to_owned() })
}

/// Loose shape check: one `@`, something before it, a dotted domain after.
pub(crate) fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
        && !value.chars().any(char::is_whitespace)
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<SessionManager>();
    let state = expect_context::<RwSignal<SessionState>>();

    let remembered = session.remembered_email();
    let email = RwSignal::new(remembered.clone().unwrap_or_default());
    let password = RwSignal::new(String::new());
    let remember_me = RwSignal::new(remembered.is_some());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let input = match validate_login_input(&email.get(), &password.get()) {
            Ok(input) => input,
            Err(e) => {
                info.set(e.to_string());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "csr")]
        {
            let session = session.clone();
            let api = expect_context::<crate::net::api::HttpApi>();
            let remember = remember_me.get();
            leptos::task::spawn_local(async move {
                match session.login(&api, &input.email, &input.password, remember).await {
                    Ok(_) => info.set(String::new()),
                    Err(e) => info.set(e.user_message()),
                }
                password.set(String::new());
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = input;
            busy.set(false);
        }
    };

    let landing = move || {
        state.with(|s| s.user.as_ref().map(|u| access::landing_route(&u.role))).unwrap_or(routes::HOME)
    };

    view! {
        <Show when=move || !state.with(|s| s.loading || s.is_authenticated()) fallback=move || {
            view! {
                <Show when=move || state.with(SessionState::is_authenticated)>
                    <Redirect path=landing()/>
                </Show>
            }
        }>
            <div class="login-page">
                <div class="login-card">
                    <h1>"Fee Desk"</h1>
                    <p class="login-card__subtitle">"Sign in to your library"</p>
                    <form class="login-form" on:submit=on_submit>
                        <input
                            class="login-input"
                            type="email"
                            placeholder="you@library.org"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                        <input
                            class="login-input"
                            type="password"
                            placeholder="Password"
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                        <label class="login-remember">
                            <input
                                type="checkbox"
                                prop:checked=move || remember_me.get()
                                on:change=move |ev| remember_me.set(event_target_checked(&ev))
                            />
                            "Remember me"
                        </label>
                        <button class="login-button" type="submit" disabled=move || busy.get()>
                            "Sign In"
                        </button>
                    </form>
                    <Show when=move || !info.get().is_empty()>
                        <p class="login-message">{move || info.get()}</p>
                    </Show>
                    <p class="login-card__footer">
                        "New library? " <A href=routes::REGISTER>"Register"</A>
                    </p>
                </div>
            </div>
        </Show>
    }
}

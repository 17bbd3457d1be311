//! Applies navigation requested by state transitions.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::effects::NavigationQueue;

/// Drains the [`NavigationQueue`] into the router. Must render inside `<Router>`.
#[component]
pub fn NavigationBridge() -> impl IntoView {
    let queue = expect_context::<NavigationQueue>();
    let navigate = use_navigate();

    Effect::new(move || {
        if queue.pending().is_none() {
            return;
        }
        if let Some(request) = queue.take() {
            navigate(&request.path, NavigateOptions { replace: request.replace, ..NavigateOptions::default() });
        }
    });
}

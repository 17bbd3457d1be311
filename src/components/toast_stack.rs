//! Transient notifications raised through [`ToastQueue`].

use leptos::prelude::*;

use crate::state::effects::{Toast, ToastQueue};

#[cfg(feature = "csr")]
const AUTO_DISMISS: std::time::Duration = std::time::Duration::from_secs(4);

#[component]
pub fn ToastStack() -> impl IntoView {
    let queue = expect_context::<ToastQueue>();

    view! {
        <div class="toast-stack" role="status" aria-live="polite">
            {move || queue.toasts().into_iter().map(|toast| view! { <ToastItem toast=toast queue=queue/> }).collect::<Vec<_>>()}
        </div>
    }
}

/// One toast. Dismissed on click, and after a few seconds in the browser.
#[component]
fn ToastItem(toast: Toast, queue: ToastQueue) -> impl IntoView {
    let id = toast.id;

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        gloo_timers::future::sleep(AUTO_DISMISS).await;
        queue.dismiss(id);
    });

    let class = format!("toast toast--{}", toast.severity.css_modifier());
    view! {
        <div class=class on:click=move |_| queue.dismiss(id)>
            {toast.message}
        </div>
    }
}

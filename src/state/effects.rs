//! Side-effect collaborators: navigation requests and user notifications.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session manager decides *that* the app should move to another route or
//! tell the user something; the UI decides *how*. Both sides meet here. The
//! signal-backed implementations queue requests in Leptos signals that the
//! router bridge and the toast stack consume.

#[cfg(test)]
#[path = "effects_test.rs"]
mod effects_test;

use leptos::prelude::*;

/// Target of a navigation side effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationRequest {
    pub path: String,
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

/// Accepts route changes requested by state transitions.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str, replace: bool);
}

/// How prominently a notification should be presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn css_modifier(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Accepts user-visible notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// Navigation requests parked in a signal until the router bridge applies them.
#[derive(Clone, Copy, Debug)]
pub struct NavigationQueue {
    pending: RwSignal<Option<NavigationRequest>>,
}

impl NavigationQueue {
    pub fn new() -> Self {
        Self { pending: RwSignal::new(None) }
    }

    /// Tracked read of the pending request, for effects.
    pub fn pending(&self) -> Option<NavigationRequest> {
        self.pending.get()
    }

    /// Remove and return the pending request.
    pub fn take(&self) -> Option<NavigationRequest> {
        let mut taken = None;
        self.pending.update(|p| taken = p.take());
        taken
    }
}

impl Default for NavigationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for NavigationQueue {
    fn navigate(&self, path: &str, replace: bool) {
        self.pending.set(Some(NavigationRequest { path: path.to_owned(), replace }));
    }
}

/// A notification waiting to be displayed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: uuid::Uuid,
    pub severity: Severity,
    pub message: String,
}

/// Toast list backed by a signal; the toast stack renders and dismisses.
#[derive(Clone, Copy, Debug)]
pub struct ToastQueue {
    toasts: RwSignal<Vec<Toast>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self { toasts: RwSignal::new(Vec::new()) }
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.get()
    }

    pub fn dismiss(&self, id: uuid::Uuid) {
        self.toasts.update(|t| t.retain(|toast| toast.id != id));
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, severity: Severity, message: &str) {
        let toast = Toast { id: uuid::Uuid::new_v4(), severity, message: message.to_owned() };
        self.toasts.update(|t| t.push(toast));
    }
}

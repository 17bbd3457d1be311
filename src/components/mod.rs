//! Reusable UI components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read shared state from Leptos context providers installed by
//! [`crate::app::App`].

pub mod navigation_bridge;
pub mod route_guard;
pub mod toast_stack;

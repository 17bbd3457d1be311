//! Shared client state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` and `tenant` are the two independent state holders; `effects`
//! carries the navigation and notification side effects they emit.

pub mod effects;
pub mod session;
pub mod tenant;

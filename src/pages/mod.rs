//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates access control to
//! `components::route_guard`.

pub mod home;
pub mod libraries;
pub mod login;
pub mod register;

//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `storage` isolates browser persistence; `access` holds the pure route and
//! role rules so pages and components never compare roles themselves.

pub mod access;
pub mod storage;

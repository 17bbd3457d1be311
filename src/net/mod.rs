//! Networking modules for the REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `types` defines the wire schema and `api` the async client traits plus the
//! browser HTTP implementation.

pub mod api;
pub mod types;

//! # feedesk
//!
//! Leptos + WASM front-end core for a multi-tenant library fee desk.
//!
//! This crate holds the client's persisted session, the selected library
//! (tenant), the route-access rules that combine both, the REST client, and
//! the pages that sit on top of them. Everything outside the `csr` feature is
//! plain Rust and runs under `cargo test` without a browser.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod routes;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_helpers;

/// Browser entry point called by the generated JS glue.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn mount() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(app::App);
}

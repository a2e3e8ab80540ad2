//! Family reunion web server and UI.
//!
//! The server side (`ssr`) hosts the JSON API, OIDC login, and the Leptos
//! app; the browser side (`hydrate`) runs the same app with the role gate.

#![allow(non_snake_case)]

pub mod app;
pub mod guard;
pub mod types;
pub mod user;

#[cfg(feature = "ssr")]
pub mod api;
#[cfg(feature = "ssr")]
pub mod auth;
#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod db;
#[cfg(feature = "ssr")]
pub mod error;
#[cfg(feature = "ssr")]
pub mod server_helpers;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::App;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}

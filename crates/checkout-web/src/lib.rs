//! Checkout Web Frontend
//!
//! Leptos-based WASM page hosting the payment method form controller. The
//! server renders a bootstrap script tag; the page renders the methods,
//! requisites and summary from it and routes clicks, input and submit into
//! the controller.

mod app;
mod bootstrap;
mod components;
mod pages;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::INFO)
            .build(),
    );
    leptos::mount::mount_to_body(App);
}

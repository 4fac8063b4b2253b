//! Main App Component

use leptos::prelude::*;

use crate::bootstrap;
use crate::pages::CheckoutPageView;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    match bootstrap::from_document() {
        Ok(bootstrap) => view! {
            <main class="app">
                <CheckoutPageView bootstrap=bootstrap />
            </main>
        }
        .into_any(),
        Err(e) => view! { <p class="error">{format!("Checkout unavailable: {e}")}</p> }.into_any(),
    }
}

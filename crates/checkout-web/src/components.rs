//! UI Components

use leptos::prelude::*;

use checkout_core::{CheckoutPage, FormField, Notifier, PaymentMethodEntry};

/// Browser `alert()` notices
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNotifier;

impl Notifier for BrowserNotifier {
    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

/// Selectable payment method
#[component]
pub fn MethodItem(
    entry: PaymentMethodEntry,
    page: ReadSignal<CheckoutPage>,
    on_select: Callback<String>,
) -> impl IntoView {
    let id = entry.identifier.clone();
    let active_id = entry.identifier.clone();
    let is_active = move || page.with(|p| p.active.as_deref() == Some(active_id.as_str()));

    view! {
        <div
            class="item"
            class:active=is_active
            data-identifier=entry.identifier.clone()
            data-form=entry.form_ref.clone()
            on:click=move |_| on_select.run(id.clone())
        >
            <span class="name">{entry.identifier.clone()}</span>
            <span class="price">{format!("{} {}", entry.amount, entry.currency)}</span>
        </div>
    }
}

/// Text input bound to one field of the page
#[component]
pub fn FieldInput(
    field: FormField,
    page: ReadSignal<CheckoutPage>,
    on_input: Callback<(String, String)>,
) -> impl IntoView {
    let id = field.id.clone();
    let value_id = field.id.clone();
    let disabled_id = field.id.clone();

    view! {
        <input
            type="text"
            id=field.id.clone()
            name=field.name.clone()
            class=if field.numeric { "number" } else { "" }
            prop:value=move || page.with(|p| p.field(&value_id).map(|f| f.value.clone()).unwrap_or_default())
            prop:disabled=move || page.with(|p| p.field(&disabled_id).is_some_and(|f| f.disabled))
            on:input=move |ev| on_input.run((id.clone(), event_target_value(&ev)))
        />
    }
}

/// Amount and fee breakdown of the active method
#[component]
pub fn SummaryPanel(page: ReadSignal<CheckoutPage>) -> impl IntoView {
    view! {
        <div class="details">
            <div class="amount">
                <div class="main">{move || page.with(|p| p.summary.main.clone())}</div>
                <div class="commissions">
                    {move || {
                        page.with(|p| {
                            p.summary
                                .breakdown
                                .iter()
                                .map(|line| view! { <div>{line.clone()}</div> })
                                .collect_view()
                        })
                    }}
                </div>
            </div>
        </div>
    }
}

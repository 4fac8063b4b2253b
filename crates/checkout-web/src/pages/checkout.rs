//! Checkout Page

use std::rc::Rc;

use leptos::prelude::*;

use checkout_core::{CheckoutController, FormField, Notifier, watch_status};
use checkout_runtime::build_controller;

use crate::bootstrap::{self, Bootstrap};
use crate::components::{BrowserNotifier, FieldInput, MethodItem, SummaryPanel};

#[component]
pub fn CheckoutPageView(bootstrap: Bootstrap) -> impl IntoView {
    let config = bootstrap.runtime_config(&bootstrap::origin());
    let notifier: Rc<dyn Notifier> = Rc::new(BrowserNotifier);

    match build_controller(bootstrap.page, &config, notifier) {
        Ok(controller) => {
            let controller = StoredValue::new_local(controller);
            view! { <CheckoutForm controller=controller /> }.into_any()
        }
        Err(e) => {
            tracing::error!(error = %e, "Checkout page rejected");
            view! { <p class="error">{e.user_message()}</p> }.into_any()
        }
    }
}

#[component]
fn CheckoutForm(controller: StoredValue<CheckoutController, LocalStorage>) -> impl IntoView {
    let initial = controller.with_value(|c| c.page().clone());
    let (page, set_page) = signal(initial.clone());
    let (submitting, set_submitting) = signal(false);
    let redirect_form = NodeRef::<leptos::html::Form>::new();

    let sync = move || set_page.set(controller.with_value(|c| c.page().clone()));

    let on_select = Callback::new(move |id: String| {
        let selected = controller.try_update_value(|c| c.select(&id).map(|_| ()));
        if let Some(Err(e)) = selected {
            tracing::warn!(error = %e, "Selection ignored");
        }
        sync();
    });

    let on_input = Callback::new(move |(field_id, value): (String, String)| {
        let stored = controller.try_update_value(|c| c.input(&field_id, value).map(|_| ()));
        if let Some(Err(e)) = stored {
            tracing::warn!(error = %e, "Input ignored");
        }
        sync();
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        set_submitting.set(true);

        let payload = controller.with_value(|c| c.prepare_submission());
        let api = controller.with_value(CheckoutController::api);

        leptos::task::spawn_local(async move {
            let reply = api.submit(&payload).await;
            let outcome = controller.try_update_value(|c| c.complete_submission(reply));
            sync();
            set_submitting.set(false);

            let Some(Ok(url)) = outcome else {
                return;
            };

            if let Some(form) = redirect_form.get_untracked() {
                form.set_action(&url);
                if let Err(e) = form.submit() {
                    tracing::error!(error = ?e, "Redirect form submit failed");
                }
            }

            let request = controller.with_value(|c| c.status_request(&payload));
            if let Some(subscription) = match request {
                Some(request) => request.open().await,
                None => None,
            } {
                watch_status(subscription, &BrowserNotifier).await;
            }
        });
    };

    let methods = initial
        .entries
        .iter()
        .cloned()
        .map(|entry| view! { <MethodItem entry=entry page=page on_select=on_select /> })
        .collect_view();

    let requisites = initial
        .forms
        .iter()
        .map(|form| {
            let form_ref = form.form_ref.clone();
            let visible = move || page.with(|p| p.form(&form_ref).is_some_and(|f| f.visible));
            view! {
                <div class="form" id=form.form_ref.clone() style:display=move || if visible() { "block" } else { "none" }>
                    {fields(&form.fields, page, on_input)}
                </div>
            }
        })
        .collect_view();

    let order_fields = fields(&initial.order_fields, page, on_input);
    let selected_name = initial.selected_method.name.clone();

    view! {
        <div class="checkout">
            <div class="payment-methods">{methods}</div>

            <form id="order-form" on:submit=on_submit>
                {order_fields}
                <input
                    type="hidden"
                    name=selected_name
                    prop:value=move || page.with(|p| p.selected_method.value.clone())
                />
                <div class="payment-method-requisites">{requisites}</div>
                <SummaryPanel page=page />
                <button type="submit" disabled=move || submitting.get()>
                    {move || if submitting.get() { "..." } else { "Pay" }}
                </button>
            </form>

            <form id="redirect-form" method="post" node_ref=redirect_form></form>
        </div>
    }
}

fn fields(
    fields: &[FormField],
    page: ReadSignal<checkout_core::CheckoutPage>,
    on_input: Callback<(String, String)>,
) -> impl IntoView + use<> {
    fields
        .iter()
        .cloned()
        .map(|field| view! { <FieldInput field=field page=page on_input=on_input /> })
        .collect_view()
}

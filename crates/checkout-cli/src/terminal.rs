//! Terminal rendering of the page state

use checkout_core::{CheckoutPage, Notifier};

/// Prints notices to stderr, where a browser would show an alert
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }
}

/// Render the payment method list, the active requisites and the summary
pub fn render_page(page: &CheckoutPage) -> String {
    let mut out = String::new();

    out.push_str("Payment methods:\n");
    for entry in &page.entries {
        let marker = if page.active.as_deref() == Some(entry.identifier.as_str()) {
            '*'
        } else {
            ' '
        };
        out.push_str(&format!(
            " {marker} {} ({} {})\n",
            entry.identifier, entry.amount, entry.currency
        ));
    }

    for form in page.active_forms() {
        out.push_str(&format!("Requisites [{}]:\n", form.form_ref));
        for field in &form.fields {
            out.push_str(&format!("   {} = {}\n", field.name, field.value));
        }
    }

    out.push_str("Total:\n");
    for line in page.summary.to_string().lines() {
        out.push_str(&format!("   {line}\n"));
    }

    out
}

pub fn print_page(page: &CheckoutPage) {
    print!("{}", render_page(page));
}

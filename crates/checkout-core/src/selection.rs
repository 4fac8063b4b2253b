//! Payment Method Selection
//!
//! Owns the page and keeps it consistent with the active entry: exactly one
//! entry is active, exactly its requisites sub-form is shown and enabled, the
//! hidden selection field names it and the summary describes it.

use std::collections::HashSet;

use crate::entry::PaymentMethodEntry;
use crate::error::{CheckoutError, Result};
use crate::page::CheckoutPage;
use crate::payload::SubmissionPayload;
use crate::sanitize::digits_only;
use crate::summary::SummaryDisplay;

/// Result of a selection event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The entry was already active; nothing changed
    Unchanged,

    /// Another entry became active
    Switched { from: String, to: String },
}

/// Selection state machine over a validated page
#[derive(Clone, Debug)]
pub struct PaymentForm {
    page: CheckoutPage,
    active: usize,
}

impl PaymentForm {
    /// Validate the page and apply the initial selection.
    ///
    /// A non-empty hidden selection naming a known entry wins over the first
    /// entry. A pre-rendered summary is kept as is.
    pub fn init(page: CheckoutPage) -> Result<Self> {
        validate(&page)?;

        let preset = page.selected_method.value.trim().to_string();
        let active = if preset.is_empty() {
            0
        } else if let Some(idx) = page.entries.iter().position(|e| e.identifier == preset) {
            idx
        } else {
            tracing::warn!(
                payment_method = %preset,
                "Preselected payment method is not on the page, falling back to the first one"
            );
            0
        };

        let mut form = Self { page, active };
        form.show_active_form();

        let identifier = form.active().identifier.clone();
        form.page.active = Some(identifier.clone());
        if form.page.selected_method.value != identifier {
            form.page.selected_method.value = identifier;
        }
        if form.page.summary.is_empty() {
            form.page.summary = SummaryDisplay::render(form.active());
        }

        tracing::debug!(
            payment_method = %form.active().identifier,
            entries = form.page.entries.len(),
            "Payment form initialized"
        );

        Ok(form)
    }

    /// The entry carrying the "active" designation
    pub fn active(&self) -> &PaymentMethodEntry {
        &self.page.entries[self.active]
    }

    pub fn page(&self) -> &CheckoutPage {
        &self.page
    }

    pub fn into_page(self) -> CheckoutPage {
        self.page
    }

    pub fn summary(&self) -> &SummaryDisplay {
        &self.page.summary
    }

    /// Make `identifier` the active entry
    pub fn select(&mut self, identifier: &str) -> Result<Transition> {
        let idx = self
            .page
            .entries
            .iter()
            .position(|e| e.identifier == identifier)
            .ok_or_else(|| CheckoutError::UnknownPaymentMethod(identifier.to_string()))?;

        if idx == self.active {
            return Ok(Transition::Unchanged);
        }

        let from = self.active().identifier.clone();
        self.active = idx;
        self.show_active_form();

        let entry = self.active().clone();
        self.page.summary = SummaryDisplay::render(&entry);
        self.page.selected_method.value.clone_from(&entry.identifier);
        self.page.active = Some(entry.identifier.clone());

        tracing::info!(from = %from, to = %entry.identifier, "Payment method selected");

        Ok(Transition::Switched {
            from,
            to: entry.identifier,
        })
    }

    /// Strip non-digits from a numeric-only field; returns whether the value changed
    pub fn sanitize(&mut self, field_id: &str) -> Result<bool> {
        let field = self
            .page
            .field_mut(field_id)
            .ok_or_else(|| CheckoutError::UnknownField(field_id.to_string()))?;

        if !field.numeric {
            return Ok(false);
        }

        let clean = digits_only(&field.value);
        if clean == field.value {
            return Ok(false);
        }

        field.value = clean;
        Ok(true)
    }

    /// Keystroke: store the new value, then sanitize it
    pub fn input(&mut self, field_id: &str, value: impl Into<String>) -> Result<&str> {
        let field = self
            .page
            .field_mut(field_id)
            .ok_or_else(|| CheckoutError::UnknownField(field_id.to_string()))?;
        field.value = value.into();

        self.sanitize(field_id)?;
        Ok(self
            .page
            .field(field_id)
            .map_or("", |f| f.value.as_str()))
    }

    /// Serialize the enabled inputs
    pub fn payload(&self) -> SubmissionPayload {
        SubmissionPayload::from_page(&self.page)
    }

    /// Point the auxiliary redirect form at `url` and submit it
    pub(crate) fn hand_off(&mut self, url: &str) {
        self.page.redirect_form.submit_to(url);
    }

    fn show_active_form(&mut self) {
        let form_ref = self.page.entries[self.active].form_ref.clone();
        for form in &mut self.page.forms {
            if form.form_ref == form_ref {
                form.activate();
            } else {
                form.deactivate();
            }
        }
    }
}

fn validate(page: &CheckoutPage) -> Result<()> {
    if page.entries.is_empty() {
        return Err(CheckoutError::NoPaymentMethods);
    }

    let mut form_refs = HashSet::new();
    for form in &page.forms {
        if !form_refs.insert(form.form_ref.as_str()) {
            return Err(CheckoutError::DuplicateRequisitesForm(form.form_ref.clone()));
        }
    }

    let mut ids = HashSet::new();
    let mut claimed = HashSet::new();
    for entry in &page.entries {
        if !ids.insert(entry.identifier.as_str()) {
            return Err(CheckoutError::DuplicatePaymentMethod(entry.identifier.clone()));
        }
        if !form_refs.contains(entry.form_ref.as_str()) {
            return Err(CheckoutError::UnknownRequisitesForm(entry.form_ref.clone()));
        }
        // one sub-form per entry
        if !claimed.insert(entry.form_ref.as_str()) {
            return Err(CheckoutError::DuplicateRequisitesForm(entry.form_ref.clone()));
        }
    }

    let mut field_ids = HashSet::new();
    for field in page.fields() {
        if !field_ids.insert(field.id.as_str()) {
            return Err(CheckoutError::DuplicateField(field.id.clone()));
        }
    }

    Ok(())
}

//! Page Model
//!
//! Headless snapshot of the checkout page: the elements the controller reads
//! and writes. Hosts build it from server-rendered markup (or JSON) and render
//! it back after every event.

use serde::{Deserialize, Serialize};

use crate::entry::PaymentMethodEntry;
use crate::summary::SummaryDisplay;

/// Name of the hidden input carrying the selected method
pub const PAYMENT_METHOD_FIELD: &str = "payment_method_id";

/// Name of the order identifier field
pub const ORDER_ID_FIELD: &str = "order_id";

/// A form input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    /// Element id, unique on the page
    pub id: String,

    /// Serialization key
    pub name: String,

    #[serde(default)]
    pub value: String,

    /// Tagged numeric-only (digits are kept on every keystroke)
    #[serde(default)]
    pub numeric: bool,

    /// Disabled inputs are excluded from submission
    #[serde(default)]
    pub disabled: bool,
}

impl FormField {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: String::new(),
            numeric: false,
            disabled: false,
        }
    }

    #[must_use]
    pub fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// Requisites sub-form belonging to one payment method
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequisitesForm {
    /// Element id, referenced by `PaymentMethodEntry::form_ref`
    pub form_ref: String,

    #[serde(default)]
    pub visible: bool,

    #[serde(default)]
    pub fields: Vec<FormField>,
}

impl RequisitesForm {
    pub fn new(form_ref: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            form_ref: form_ref.into(),
            visible: false,
            fields,
        }
    }

    /// Show and enable
    pub(crate) fn activate(&mut self) {
        self.visible = true;
        for field in &mut self.fields {
            field.disabled = false;
        }
    }

    /// Hide and disable
    pub(crate) fn deactivate(&mut self) {
        self.visible = false;
        for field in &mut self.fields {
            field.disabled = true;
        }
    }

    pub fn is_active(&self) -> bool {
        self.visible && self.fields.iter().all(|f| !f.disabled)
    }
}

/// Hidden input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenField {
    pub name: String,

    #[serde(default)]
    pub value: String,
}

impl Default for HiddenField {
    fn default() -> Self {
        Self {
            name: PAYMENT_METHOD_FIELD.into(),
            value: String::new(),
        }
    }
}

/// Auxiliary form used only to navigate to the gateway
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectForm {
    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    pub submitted: bool,
}

impl RedirectForm {
    pub(crate) fn submit_to(&mut self, url: &str) {
        self.action = Some(url.to_string());
        self.submitted = true;
    }
}

/// Everything the controller owns on the page
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutPage {
    /// Selectable methods, in display order
    pub entries: Vec<PaymentMethodEntry>,

    /// Identifier of the entry carrying the "active" class
    #[serde(default)]
    pub active: Option<String>,

    /// One requisites sub-form per entry
    pub forms: Vec<RequisitesForm>,

    /// Order-level inputs outside the requisites sub-forms (order id, email, ...)
    #[serde(default)]
    pub order_fields: Vec<FormField>,

    #[serde(default)]
    pub selected_method: HiddenField,

    #[serde(default)]
    pub summary: SummaryDisplay,

    #[serde(default)]
    pub redirect_form: RedirectForm,
}

impl CheckoutPage {
    pub fn new(entries: Vec<PaymentMethodEntry>, forms: Vec<RequisitesForm>) -> Self {
        Self {
            entries,
            forms,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_order_field(mut self, field: FormField) -> Self {
        self.order_fields.push(field);
        self
    }

    #[must_use]
    pub fn with_selected(mut self, identifier: impl Into<String>) -> Self {
        self.selected_method.value = identifier.into();
        self
    }

    #[must_use]
    pub fn with_summary(mut self, summary: SummaryDisplay) -> Self {
        self.summary = summary;
        self
    }

    pub fn entry(&self, identifier: &str) -> Option<&PaymentMethodEntry> {
        self.entries.iter().find(|e| e.identifier == identifier)
    }

    pub fn form(&self, form_ref: &str) -> Option<&RequisitesForm> {
        self.forms.iter().find(|f| f.form_ref == form_ref)
    }

    /// All inputs: order-level first, then every sub-form in page order
    pub fn fields(&self) -> impl Iterator<Item = &FormField> {
        self.order_fields
            .iter()
            .chain(self.forms.iter().flat_map(|f| f.fields.iter()))
    }

    pub(crate) fn field_mut(&mut self, id: &str) -> Option<&mut FormField> {
        self.order_fields
            .iter_mut()
            .chain(self.forms.iter_mut().flat_map(|f| f.fields.iter_mut()))
            .find(|f| f.id == id)
    }

    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields().find(|f| f.id == id)
    }

    /// Sub-forms currently shown with enabled inputs
    pub fn active_forms(&self) -> impl Iterator<Item = &RequisitesForm> {
        self.forms.iter().filter(|f| f.is_active())
    }
}

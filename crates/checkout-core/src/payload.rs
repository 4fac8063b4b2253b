//! Submission payload

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::page::{CheckoutPage, ORDER_ID_FIELD, PAYMENT_METHOD_FIELD};

/// Flat `name -> value` map of the enabled inputs, sent as a JSON object
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionPayload(BTreeMap<String, String>);

impl SubmissionPayload {
    /// Serialize the page the way a browser serializes a form: disabled
    /// inputs are skipped and a later input overwrites an earlier one with
    /// the same name.
    pub fn from_page(page: &CheckoutPage) -> Self {
        let mut map = BTreeMap::new();

        let selected = &page.selected_method;
        map.insert(selected.name.clone(), selected.value.clone());

        for field in page.fields().filter(|f| !f.disabled) {
            map.insert(field.name.clone(), field.value.clone());
        }

        Self(map)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn payment_method_id(&self) -> Option<&str> {
        self.get(PAYMENT_METHOD_FIELD)
    }

    /// Non-empty order identifier, if the form carries one
    pub fn order_id(&self) -> Option<&str> {
        self.get(ORDER_ID_FIELD).filter(|v| !v.is_empty())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::PaymentMethodEntry;
    use crate::page::{FormField, RequisitesForm};

    #[test]
    fn test_disabled_fields_excluded() {
        let mut card = RequisitesForm::new("form-card", vec![FormField::new("pan", "pan").with_value("4111")]);
        card.fields[0].disabled = false;
        let mut wallet = RequisitesForm::new("form-wallet", vec![FormField::new("wallet", "account").with_value("w-1")]);
        wallet.fields[0].disabled = true;

        let page = CheckoutPage::new(
            vec![
                PaymentMethodEntry::new("card", "form-card", "10", "USD"),
                PaymentMethodEntry::new("wallet", "form-wallet", "10", "USD"),
            ],
            vec![card, wallet],
        )
        .with_selected("card")
        .with_order_field(FormField::new("order", ORDER_ID_FIELD).with_value("ord-1"));

        let payload = SubmissionPayload::from_page(&page);
        assert_eq!(payload.payment_method_id(), Some("card"));
        assert_eq!(payload.order_id(), Some("ord-1"));
        assert_eq!(payload.get("pan"), Some("4111"));
        assert_eq!(payload.get("account"), None);
        assert_eq!(payload.len(), 3);
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let mut payload = SubmissionPayload::default();
        payload.insert(PAYMENT_METHOD_FIELD, "card");
        payload.insert("email", "a@b.c");

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"payment_method_id": "card", "email": "a@b.c"}));
        assert_eq!(payload.order_id(), None);
    }
}

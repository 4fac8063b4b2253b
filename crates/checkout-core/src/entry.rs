//! Payment Method Entries
//!
//! One selectable payment option as rendered by the host page.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A selectable payment method
///
/// Field names follow the page's data attributes (`data-identifier`,
/// `data-form`, `data-amount`, ...). Entries are read-only after load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodEntry {
    /// Opaque token submitted as `payment_method_id`
    #[serde(alias = "id")]
    pub identifier: String,

    /// Element id of the requisites sub-form owned by this entry
    #[serde(alias = "form")]
    pub form_ref: String,

    /// Total amount, as displayed
    pub amount: String,

    /// Currency code or symbol
    pub currency: String,

    /// VAT share of the amount
    #[serde(default)]
    pub vat: Option<String>,

    /// Commission share of the amount
    #[serde(default)]
    pub commission: Option<String>,
}

impl PaymentMethodEntry {
    pub fn new(
        identifier: impl Into<String>,
        form_ref: impl Into<String>,
        amount: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            form_ref: form_ref.into(),
            amount: amount.into(),
            currency: currency.into(),
            vat: None,
            commission: None,
        }
    }

    #[must_use]
    pub fn with_vat(mut self, vat: impl Into<String>) -> Self {
        self.vat = Some(vat.into());
        self
    }

    #[must_use]
    pub fn with_commission(mut self, commission: impl Into<String>) -> Self {
        self.commission = Some(commission.into());
        self
    }

    /// VAT, if present and non-zero
    pub fn vat(&self) -> Option<&str> {
        fee_component(self.vat.as_deref())
    }

    /// Commission, if present and non-zero
    pub fn commission(&self) -> Option<&str> {
        fee_component(self.commission.as_deref())
    }

    pub fn has_fees(&self) -> bool {
        self.vat().is_some() || self.commission().is_some()
    }
}

/// A fee component counts as present only when it is non-blank and not zero.
///
/// Zero is compared numerically, so `"0.00"` is absent too and renders no
/// fee line, even though it is a non-empty string.
///
/// Values that do not parse as decimals are kept verbatim; the page may
/// render localized amounts.
fn fee_component(raw: Option<&str>) -> Option<&str> {
    let value = raw?.trim();
    if value.is_empty() {
        return None;
    }

    match value.parse::<Decimal>() {
        Ok(d) if d.is_zero() => None,
        _ => Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_and_blank_fees_are_absent() {
        let entry = PaymentMethodEntry::new("card", "form-card", "100", "USD")
            .with_vat("0.00")
            .with_commission("  ");
        assert_eq!(entry.vat(), None);
        assert_eq!(entry.commission(), None);
        assert!(!entry.has_fees());
    }

    #[test]
    fn test_fee_kept_verbatim() {
        let entry = PaymentMethodEntry::new("card", "form-card", "100", "USD").with_vat("5.50");
        assert_eq!(entry.vat(), Some("5.50"));
        assert!(entry.has_fees());
    }

    #[test]
    fn test_deserialize_data_attribute_aliases() {
        let entry: PaymentMethodEntry = serde_json::from_str(
            r#"{"id":"qiwi","form":"form-qiwi","amount":"250","currency":"RUB","commission":"3"}"#,
        )
        .unwrap();
        assert_eq!(entry.identifier, "qiwi");
        assert_eq!(entry.form_ref, "form-qiwi");
        assert_eq!(entry.commission(), Some("3"));
        assert_eq!(entry.vat(), None);
    }
}

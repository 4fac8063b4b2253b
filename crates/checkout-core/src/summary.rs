//! Amount and fee summary

use serde::{Deserialize, Serialize};

use crate::entry::PaymentMethodEntry;

/// Header line opening the fee breakdown block
pub const BREAKDOWN_HEADER: &str = "of them:";

/// Rendered amount/fee summary for the active payment method
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryDisplay {
    /// Primary line, e.g. `100 USD`
    #[serde(default)]
    pub main: String,

    /// Breakdown lines, empty when the entry carries no fees
    #[serde(default)]
    pub breakdown: Vec<String>,
}

impl SummaryDisplay {
    /// Render the summary for an entry
    pub fn render(entry: &PaymentMethodEntry) -> Self {
        let currency = &entry.currency;
        let main = format!("{} {}", entry.amount, currency);

        let mut breakdown = Vec::new();
        if entry.has_fees() {
            breakdown.push(BREAKDOWN_HEADER.to_string());
            if let Some(vat) = entry.vat() {
                breakdown.push(format!("VAT {vat} {currency}"));
            }
            if let Some(commission) = entry.commission() {
                breakdown.push(format!("Commission {commission} {currency}"));
            }
        }

        Self { main, breakdown }
    }

    /// True when nothing has been rendered (server left the container blank)
    pub fn is_empty(&self) -> bool {
        self.main.trim().is_empty()
    }
}

impl std::fmt::Display for SummaryDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.main)?;
        for line in &self.breakdown {
            write!(f, "\n{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vat_only_breakdown() {
        let entry = PaymentMethodEntry::new("card", "form-card", "100", "USD").with_vat("5");
        let summary = SummaryDisplay::render(&entry);

        assert_eq!(summary.main, "100 USD");
        assert_eq!(summary.breakdown, vec!["of them:", "VAT 5 USD"]);
        assert!(!summary.to_string().contains("Commission"));
    }

    #[test]
    fn test_both_fees() {
        let entry = PaymentMethodEntry::new("card", "form-card", "120", "EUR")
            .with_vat("20")
            .with_commission("2.40");
        let text = SummaryDisplay::render(&entry).to_string();
        assert_eq!(text, "120 EUR\nof them:\nVAT 20 EUR\nCommission 2.40 EUR");
    }

    #[test]
    fn test_no_fees_omits_block() {
        let entry = PaymentMethodEntry::new("btc", "form-btc", "0.002", "BTC").with_vat("0");
        let summary = SummaryDisplay::render(&entry);
        assert!(summary.breakdown.is_empty());
        assert_eq!(summary.to_string(), "0.002 BTC");
    }
}

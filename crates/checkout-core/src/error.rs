//! Error Types

use thiserror::Error;

/// Result type alias for checkout operations
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Text shown when the server error body carries no usable message
pub const GENERIC_FAILURE: &str = "Payment request failed";

/// Text shown when a successful response carries no redirect target
pub const MISSING_REDIRECT_NOTICE: &str =
    "Process was stopped because required parameters were not found.";

/// Checkout error types
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Page snapshot has no payment methods to select from
    #[error("No payment methods rendered on the page")]
    NoPaymentMethods,

    /// Two entries share an identifier
    #[error("Duplicate payment method: {0}")]
    DuplicatePaymentMethod(String),

    /// Two inputs share an element id
    #[error("Duplicate field id: {0}")]
    DuplicateField(String),

    /// Selection targeted an entry that is not on the page
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    /// Entry references a requisites sub-form that is not on the page
    #[error("Unknown requisites form: {0}")]
    UnknownRequisitesForm(String),

    /// Two sub-forms share a reference, or two entries claim one sub-form
    #[error("Duplicate requisites form: {0}")]
    DuplicateRequisitesForm(String),

    /// Event targeted a field that is not on the page
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Successful response without a redirect target
    #[error("Response has no redirect_url")]
    MissingRedirect,

    /// Server answered with an error status
    #[error("Payment rejected: {0}")]
    Rejected(String),

    /// Request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Status subscription could not be opened or read
    #[error("Status channel error: {0}")]
    Channel(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl CheckoutError {
    /// Whether the error ended a submission attempt (as opposed to a bad page or event)
    pub const fn is_submission_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingRedirect | Self::Rejected(_) | Self::Transport(_)
        )
    }

    /// Convert to a user-facing message
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingRedirect => MISSING_REDIRECT_NOTICE.into(),
            Self::Rejected(msg) => msg.clone(),
            Self::Transport(_) => GENERIC_FAILURE.into(),
            Self::UnknownPaymentMethod(_) => "The selected payment method is not available.".into(),
            Self::NoPaymentMethods => "No payment methods are available for this order.".into(),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for CheckoutError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_keeps_server_text() {
        let err = CheckoutError::Rejected("card declined".into());
        assert_eq!(err.user_message(), "card declined");
        assert!(err.is_submission_failure());
    }

    #[test]
    fn test_transport_is_generic() {
        let err = CheckoutError::Transport("connection refused".into());
        assert_eq!(err.user_message(), GENERIC_FAILURE);
        assert!(!CheckoutError::UnknownField("x".into()).is_submission_failure());
    }
}

//! Payment API Seam
//!
//! The controller talks to the payment endpoint through [`PaymentApi`] so the
//! submission flow can run against `reqwest` in the browser/CLI and against
//! scripted replies in tests.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{CheckoutError, GENERIC_FAILURE, Result};
use crate::payload::SubmissionPayload;

/// Default path of the payment endpoint
pub const PAYMENT_ENDPOINT: &str = "/api/v1/payment";

/// Raw reply from the payment endpoint
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

impl ApiReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Interpret the reply: the gateway URL on success, a typed error otherwise
    pub fn redirect_target(&self) -> Result<String> {
        if self.is_success() {
            return serde_json::from_str::<SuccessBody>(&self.body)
                .ok()
                .and_then(|b| b.redirect_url)
                .filter(|url| !url.is_empty())
                .ok_or(CheckoutError::MissingRedirect);
        }

        Err(CheckoutError::Rejected(error_message(&self.body)))
    }
}

#[derive(Deserialize)]
struct SuccessBody {
    #[serde(default)]
    redirect_url: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Extract `error` from an error body, defaulting to a generic message when
/// the body is not the expected JSON object
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|msg| !msg.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

/// Transport for payment submissions.
///
/// Futures are not `Send`: the form lives on a single UI thread.
#[async_trait(?Send)]
pub trait PaymentApi {
    /// POST the payload as JSON. Any HTTP status is a reply; only a missing
    /// response is an error (`CheckoutError::Transport`).
    async fn submit(&self, payload: &SubmissionPayload) -> Result<ApiReply>;
}

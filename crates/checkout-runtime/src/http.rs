//! HTTP Payment API
//!
//! `reqwest` implementation of `PaymentApi`: one JSON POST per submit, no
//! retries.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};

use checkout_core::{ApiReply, CheckoutError, PaymentApi, Result, SubmissionPayload};

use crate::config::RuntimeConfig;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Payment endpoint client
#[derive(Clone, Debug)]
pub struct HttpPaymentApi {
    client: reqwest::Client,
    url: String,
}

impl HttpPaymentApi {
    /// Create a client posting to `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Create from configuration
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(config.payment_url())
    }

    /// Reuse an existing client
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait(?Send)]
impl PaymentApi for HttpPaymentApi {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<ApiReply> {
        let body = serde_json::to_string(payload)?;

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .body(body)
            .send()
            .await
            .map_err(|e| CheckoutError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Transport(e.to_string()))?;

        tracing::debug!(url = %self.url, status, bytes = body.len(), "Payment endpoint replied");

        Ok(ApiReply { status, body })
    }
}

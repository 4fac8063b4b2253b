//! Page Bootstrap
//!
//! The server embeds the page snapshot and the status channel credentials in
//! a JSON script tag:
//!
//! ```html
//! <script id="checkout-page" type="application/json">{"page": {...}, "channel": {...}}</script>
//! ```

use serde::Deserialize;

use checkout_core::{CheckoutPage, ErrorSurface, PAYMENT_ENDPOINT, status::DEFAULT_CHANNEL_PREFIX};
use checkout_runtime::{ChannelConfig, RuntimeConfig};

/// Element id of the bootstrap script tag
pub const BOOTSTRAP_ELEMENT_ID: &str = "checkout-page";

/// Status channel credentials issued to this page
#[derive(Clone, Debug, Deserialize)]
pub struct ChannelBootstrap {
    pub url: String,
    pub token: String,
    #[serde(default)]
    pub prefix: Option<String>,
}

/// Everything the server hands the page at load time
#[derive(Clone, Debug, Deserialize)]
pub struct Bootstrap {
    pub page: CheckoutPage,

    #[serde(default)]
    pub channel: Option<ChannelBootstrap>,

    #[serde(default)]
    pub error_surface: ErrorSurface,
}

impl Bootstrap {
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Runtime configuration for a page served from `origin`
    pub fn runtime_config(&self, origin: &str) -> RuntimeConfig {
        RuntimeConfig {
            api_base_url: origin.to_string(),
            payment_path: PAYMENT_ENDPOINT.into(),
            channel: self.channel.as_ref().map(|c| ChannelConfig {
                url: c.url.clone(),
                token: c.token.clone(),
                prefix: c
                    .prefix
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CHANNEL_PREFIX.into()),
            }),
            error_surface: self.error_surface,
        }
    }
}

/// Read the bootstrap from the current document
pub fn from_document() -> Result<Bootstrap, String> {
    let raw = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(BOOTSTRAP_ELEMENT_ID))
        .and_then(|el| el.text_content())
        .ok_or_else(|| format!("#{BOOTSTRAP_ELEMENT_ID} not found"))?;

    Bootstrap::parse(&raw).map_err(|e| e.to_string())
}

/// Origin the page was served from
pub fn origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:8080".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = r#"{
        "page": {
            "entries": [
                {"identifier": "card", "form": "form-card", "amount": "100", "currency": "USD", "vat": "5"}
            ],
            "forms": [
                {"form_ref": "form-card", "fields": [{"id": "card-pan", "name": "pan", "numeric": true}]}
            ],
            "order_fields": [{"id": "order-id", "name": "order_id", "value": "5c1a"}]
        },
        "channel": {"url": "https://cf.example/connection/uni_http_stream", "token": "jwt"}
    }"#;

    #[test]
    fn test_parse_bootstrap() {
        let bootstrap = Bootstrap::parse(RAW).unwrap();
        assert_eq!(bootstrap.page.entries.len(), 1);
        assert_eq!(bootstrap.error_surface, ErrorSurface::Alert);

        let config = bootstrap.runtime_config("https://pay.example");
        assert_eq!(config.payment_url(), "https://pay.example/api/v1/payment");
        let channel = config.channel.unwrap();
        assert_eq!(channel.token, "jwt");
        assert_eq!(channel.prefix, "payment:notify#");
    }

    #[test]
    fn test_parse_without_channel() {
        let bootstrap =
            Bootstrap::parse(r#"{"page": {"entries": [], "forms": []}, "error_surface": "log"}"#).unwrap();
        assert!(bootstrap.channel.is_none());
        assert_eq!(bootstrap.runtime_config("http://x").error_surface, ErrorSurface::Log);
    }
}

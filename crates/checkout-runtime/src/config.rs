//! Runtime Configuration
//!
//! Endpoint, status channel and error surface settings, read from the
//! environment with defaults for local development.

use checkout_core::{
    CheckoutError, ControllerConfig, ErrorSurface, PAYMENT_ENDPOINT, Result,
    status::DEFAULT_CHANNEL_PREFIX,
};

/// Status channel connection settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Streaming connection endpoint
    pub url: String,

    /// Bearer token issued to the page for this order
    pub token: String,

    /// Channel prefix; the order id is appended
    pub prefix: String,
}

/// Checkout runtime configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Origin of the payment API
    pub api_base_url: String,

    /// Path of the payment endpoint
    pub payment_path: String,

    /// Status channel (None = no real-time tracking)
    pub channel: Option<ChannelConfig>,

    /// Where submission failures are shown
    pub error_surface: ErrorSurface,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".into(),
            payment_path: PAYMENT_ENDPOINT.into(),
            channel: None,
            error_surface: ErrorSurface::default(),
        }
    }
}

impl RuntimeConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let channel = match get("CHECKOUT_CHANNEL_URL") {
            Some(url) => {
                let token = get("CHECKOUT_CHANNEL_TOKEN").ok_or_else(|| {
                    CheckoutError::Config(
                        "CHECKOUT_CHANNEL_TOKEN must be set when CHECKOUT_CHANNEL_URL is".into(),
                    )
                })?;
                Some(ChannelConfig {
                    url,
                    token,
                    prefix: get("CHECKOUT_CHANNEL_PREFIX")
                        .unwrap_or_else(|| DEFAULT_CHANNEL_PREFIX.into()),
                })
            }
            None => None,
        };

        let error_surface = match get("CHECKOUT_ERROR_SURFACE") {
            Some(raw) => ErrorSurface::parse(&raw).ok_or_else(|| {
                CheckoutError::Config(format!("CHECKOUT_ERROR_SURFACE must be alert or log, got {raw}"))
            })?,
            None => defaults.error_surface,
        };

        Ok(Self {
            api_base_url: get("CHECKOUT_API_BASE_URL").unwrap_or(defaults.api_base_url),
            payment_path: get("CHECKOUT_PAYMENT_PATH").unwrap_or(defaults.payment_path),
            channel,
            error_surface,
        })
    }

    /// Full URL of the payment endpoint
    pub fn payment_url(&self) -> String {
        join_url(&self.api_base_url, &self.payment_path)
    }

    /// Controller settings derived from this configuration
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            error_surface: self.error_surface,
            channel_prefix: self
                .channel
                .as_ref()
                .map_or_else(|| DEFAULT_CHANNEL_PREFIX.into(), |c| c.prefix.clone()),
        }
    }
}

/// Join an origin and a path with exactly one slash between them
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

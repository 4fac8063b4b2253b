//! # checkout-runtime
//!
//! Integrations for the checkout form controller.
//!
//! ## Integrations
//!
//! - **HTTP** (always): `POST /api/v1/payment` via `reqwest`
//! - **Centrifugo** (default feature): real-time payment status over the
//!   unidirectional HTTP stream
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_runtime::{RuntimeConfig, build_controller};
//!
//! let config = RuntimeConfig::from_env()?;
//! let mut controller = build_controller(page, &config, Rc::new(TracingNotifier))?;
//! let handoff = controller.submit().await?;
//! ```

use std::rc::Rc;

pub mod config;
pub mod http;

#[cfg(feature = "centrifugo")]
pub mod centrifugo;

#[cfg(feature = "centrifugo")]
pub use centrifugo::CentrifugoChannel;
pub use config::{ChannelConfig, RuntimeConfig};
pub use http::HttpPaymentApi;

// Re-export core types for convenience
pub use checkout_core::{
    CheckoutController, CheckoutError, CheckoutPage, Handoff, Notifier, Result, watch_status,
};

/// Wire a controller for `page` from configuration
pub fn build_controller(
    page: CheckoutPage,
    config: &RuntimeConfig,
    notifier: Rc<dyn Notifier>,
) -> Result<CheckoutController> {
    let api = Rc::new(HttpPaymentApi::from_config(config));
    let controller = CheckoutController::new(page, api, notifier)?
        .with_config(config.controller_config());

    Ok(attach_status_channel(controller, config))
}

#[cfg(feature = "centrifugo")]
fn attach_status_channel(controller: CheckoutController, config: &RuntimeConfig) -> CheckoutController {
    match &config.channel {
        Some(channel) => {
            controller.with_status_channel(Rc::new(CentrifugoChannel::from_config(channel)))
        }
        None => controller,
    }
}

#[cfg(not(feature = "centrifugo"))]
fn attach_status_channel(controller: CheckoutController, config: &RuntimeConfig) -> CheckoutController {
    if config.channel.is_some() {
        tracing::warn!("Status channel configured but the centrifugo feature is disabled");
    }
    controller
}

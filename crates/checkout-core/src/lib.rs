//! # checkout-core
//!
//! Payment method selection, fee summary and submission flow for a checkout
//! form, independent of any UI toolkit or HTTP client.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    CheckoutController                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌─────────────────────┐  │
//! │  │ PaymentForm  │  │  PaymentApi  │  │ StatusChannel       │  │
//! │  │ (selection,  │──│  (submit)    │──│ (optional, after    │  │
//! │  │  summary,    │  └──────────────┘  │  gateway handoff)   │  │
//! │  │  sanitize)   │                    └─────────────────────┘  │
//! │  └──────────────┘           Notifier (alert / log)            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Hosts (the WASM page, the CLI) own a `CheckoutPage` snapshot, hand it to
//! the controller and render it back after each event.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_core::{CheckoutController, TracingNotifier};
//!
//! let mut controller = CheckoutController::new(page, api, Rc::new(TracingNotifier))?;
//! controller.select("bank_card")?;
//! controller.input("card-pan", "4111 1111 1111 1111")?;
//! let handoff = controller.submit().await?;
//! ```

pub mod api;
pub mod controller;
pub mod entry;
pub mod error;
pub mod notify;
pub mod page;
pub mod payload;
pub mod sanitize;
pub mod selection;
pub mod status;
pub mod summary;

pub use api::{ApiReply, PAYMENT_ENDPOINT, PaymentApi};
pub use controller::{CheckoutController, ControllerConfig, Handoff, StatusRequest};
pub use entry::PaymentMethodEntry;
pub use error::{CheckoutError, Result};
pub use notify::{ErrorSurface, Notifier, RecordingNotifier, TracingNotifier};
pub use page::{CheckoutPage, FormField, HiddenField, RedirectForm, RequisitesForm};
pub use payload::SubmissionPayload;
pub use selection::{PaymentForm, Transition};
pub use status::{StatusChannel, StatusMessage, StatusStream, StatusSubscription, watch_status};
pub use summary::SummaryDisplay;

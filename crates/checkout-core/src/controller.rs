//! Checkout Controller
//!
//! Explicit event-dispatch surface for one checkout form: `select`,
//! `sanitize`/`input` and `submit`. One controller per form instance; all
//! collaborators (payment API, status channel, notifier) are injected.
//!
//! ## Submission
//!
//! Submission is asynchronous: the payload is snapshotted before the request
//! goes out, so the form stays interactive while it is in flight and later
//! edits never leak into it. Hosts that cannot hold `&mut` across an await
//! use the split API:
//!
//! ```rust,ignore
//! let payload = controller.prepare_submission();
//! let reply = api.submit(&payload).await;
//! let url = controller.complete_submission(reply)?;
//! if let Some(request) = controller.status_request(&payload) {
//!     if let Some(sub) = request.open().await {
//!         watch_status(sub, &notifier).await;
//!     }
//! }
//! ```

use std::rc::Rc;

use crate::api::{ApiReply, PaymentApi};
use crate::error::{CheckoutError, Result};
use crate::notify::{ErrorSurface, Notifier};
use crate::page::CheckoutPage;
use crate::payload::SubmissionPayload;
use crate::selection::{PaymentForm, Transition};
use crate::status::{DEFAULT_CHANNEL_PREFIX, StatusChannel, StatusSubscription, channel_name};
use crate::summary::SummaryDisplay;

/// Controller behaviour knobs
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Where submission failures are shown
    pub error_surface: ErrorSurface,

    /// Prefix of the per-order status channel
    pub channel_prefix: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            error_surface: ErrorSurface::default(),
            channel_prefix: DEFAULT_CHANNEL_PREFIX.into(),
        }
    }
}

/// Successful gateway handoff
#[derive(Debug)]
pub struct Handoff {
    /// Gateway URL the redirect form was submitted to
    pub url: String,

    /// Status subscription, when a channel is configured and opened
    pub status: Option<StatusSubscription>,
}

/// Pending subscription for an order's status channel
pub struct StatusRequest {
    channel: Rc<dyn StatusChannel>,
    pub name: String,
}

impl StatusRequest {
    /// Open the subscription; failure is logged, never propagated
    pub async fn open(self) -> Option<StatusSubscription> {
        match self.channel.subscribe(&self.name).await {
            Ok(sub) => {
                tracing::info!(channel = %self.name, "Subscribed to payment status");
                Some(sub)
            }
            Err(e) => {
                tracing::warn!(channel = %self.name, error = %e, "Status subscription failed");
                None
            }
        }
    }
}

/// The payment method form controller
pub struct CheckoutController {
    form: PaymentForm,
    api: Rc<dyn PaymentApi>,
    status: Option<Rc<dyn StatusChannel>>,
    notifier: Rc<dyn Notifier>,
    config: ControllerConfig,
}

impl CheckoutController {
    /// Initialize the form on `page`
    pub fn new(
        page: CheckoutPage,
        api: Rc<dyn PaymentApi>,
        notifier: Rc<dyn Notifier>,
    ) -> Result<Self> {
        Ok(Self {
            form: PaymentForm::init(page)?,
            api,
            status: None,
            notifier,
            config: ControllerConfig::default(),
        })
    }

    #[must_use]
    pub fn with_status_channel(mut self, channel: Rc<dyn StatusChannel>) -> Self {
        self.status = Some(channel);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    pub const fn form(&self) -> &PaymentForm {
        &self.form
    }

    pub fn page(&self) -> &CheckoutPage {
        self.form.page()
    }

    pub fn summary(&self) -> &SummaryDisplay {
        self.form.summary()
    }

    pub fn notifier(&self) -> Rc<dyn Notifier> {
        Rc::clone(&self.notifier)
    }

    /// Transport, for hosts driving the split submission themselves
    pub fn api(&self) -> Rc<dyn PaymentApi> {
        Rc::clone(&self.api)
    }

    /// Click on a payment method
    pub fn select(&mut self, identifier: &str) -> Result<Transition> {
        self.form.select(identifier)
    }

    /// Keyup on a numeric-only field
    pub fn sanitize(&mut self, field_id: &str) -> Result<bool> {
        self.form.sanitize(field_id)
    }

    /// Input event: store and sanitize
    pub fn input(&mut self, field_id: &str, value: impl Into<String>) -> Result<&str> {
        self.form.input(field_id, value)
    }

    /// Submit the form and hand off to the gateway
    pub async fn submit(&mut self) -> Result<Handoff> {
        let payload = self.prepare_submission();
        let api = Rc::clone(&self.api);
        let reply = api.submit(&payload).await;
        let url = self.complete_submission(reply)?;

        let status = match self.status_request(&payload) {
            Some(request) => request.open().await,
            None => None,
        };

        Ok(Handoff { url, status })
    }

    /// Snapshot the enabled inputs for submission
    pub fn prepare_submission(&self) -> SubmissionPayload {
        let payload = self.form.payload();
        tracing::info!(
            payment_method = payload.payment_method_id().unwrap_or_default(),
            order_id = payload.order_id().unwrap_or_default(),
            fields = payload.len(),
            "Submitting payment"
        );
        payload
    }

    /// Apply the endpoint's reply: redirect on success, surface the failure otherwise.
    ///
    /// The selection state is untouched either way, so the user can resubmit.
    pub fn complete_submission(&mut self, reply: Result<ApiReply>) -> Result<String> {
        let target = reply.and_then(|r| {
            tracing::debug!(status = r.status, "Payment endpoint replied");
            r.redirect_target()
        });

        match target {
            Ok(url) => {
                tracing::info!(redirect_url = %url, "Handing off to payment gateway");
                self.form.hand_off(&url);
                Ok(url)
            }
            Err(e) => {
                self.surface(&e);
                Err(e)
            }
        }
    }

    /// Status subscription to open after a handoff, if tracking applies
    pub fn status_request(&self, payload: &SubmissionPayload) -> Option<StatusRequest> {
        let channel = self.status.as_ref()?;
        let Some(order_id) = payload.order_id() else {
            tracing::debug!("No order_id in payload, skipping status subscription");
            return None;
        };

        Some(StatusRequest {
            channel: Rc::clone(channel),
            name: channel_name(&self.config.channel_prefix, order_id),
        })
    }

    fn surface(&self, error: &CheckoutError) {
        if let CheckoutError::Transport(detail) = error {
            tracing::error!(error = %detail, "Payment request failed");
            return;
        }

        let message = error.user_message();
        if matches!(error, CheckoutError::MissingRedirect) {
            tracing::warn!(error = %error, "Payment submission stopped");
            self.notifier.alert(&message);
            return;
        }

        match self.config.error_surface {
            ErrorSurface::Alert => {
                tracing::warn!(error = %error, "Payment submission failed");
                self.notifier.alert(&message);
            }
            ErrorSurface::Log => {
                tracing::error!(error = %error, notice = %message, "Payment submission failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use async_trait::async_trait;
    use futures::StreamExt;

    use super::*;
    use crate::error::{GENERIC_FAILURE, MISSING_REDIRECT_NOTICE};
    use crate::notify::RecordingNotifier;
    use crate::selection::tests::sample_page;
    use crate::status::{StatusMessage, watch_status};

    /// Replays one scripted reply and records what was sent
    struct ScriptedApi {
        reply: RefCell<Option<Result<ApiReply>>>,
        sent: RefCell<Vec<SubmissionPayload>>,
    }

    impl ScriptedApi {
        fn replying(status: u16, body: &str) -> Rc<Self> {
            Rc::new(Self {
                reply: RefCell::new(Some(Ok(ApiReply::new(status, body)))),
                sent: RefCell::new(Vec::new()),
            })
        }

        fn failing() -> Rc<Self> {
            Rc::new(Self {
                reply: RefCell::new(Some(Err(CheckoutError::Transport("connection refused".into())))),
                sent: RefCell::new(Vec::new()),
            })
        }
    }

    #[async_trait(?Send)]
    impl PaymentApi for ScriptedApi {
        async fn submit(&self, payload: &SubmissionPayload) -> Result<ApiReply> {
            self.sent.borrow_mut().push(payload.clone());
            self.reply
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Err(CheckoutError::Transport("no more replies".into())))
        }
    }

    /// Records subscribed channels and yields a fixed message
    #[derive(Default)]
    struct ScriptedChannel {
        subscribed: RefCell<Vec<String>>,
        fail: bool,
    }

    #[async_trait(?Send)]
    impl StatusChannel for ScriptedChannel {
        async fn subscribe(&self, channel: &str) -> Result<StatusSubscription> {
            self.subscribed.borrow_mut().push(channel.to_string());
            if self.fail {
                return Err(CheckoutError::Channel("401 unauthorized".into()));
            }
            let stream = futures::stream::iter(vec![Ok(StatusMessage::new("completed"))]).boxed_local();
            Ok(StatusSubscription::new(channel, stream))
        }
    }

    fn controller(api: Rc<ScriptedApi>, notifier: &RecordingNotifier) -> CheckoutController {
        CheckoutController::new(sample_page(), api, Rc::new(notifier.clone())).unwrap()
    }

    #[tokio::test]
    async fn test_redirect_hands_off() {
        let api = ScriptedApi::replying(200, r#"{"redirect_url":"https://gw.example/pay"}"#);
        let notifier = RecordingNotifier::new();
        let mut ctrl = controller(Rc::clone(&api), &notifier);

        let handoff = ctrl.submit().await.unwrap();

        assert_eq!(handoff.url, "https://gw.example/pay");
        assert!(handoff.status.is_none());
        assert_eq!(ctrl.page().redirect_form.action.as_deref(), Some("https://gw.example/pay"));
        assert!(ctrl.page().redirect_form.submitted);
        assert!(notifier.messages().is_empty());

        let sent = api.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].payment_method_id(), Some("card"));
    }

    #[tokio::test]
    async fn test_missing_redirect_notice() {
        let notifier = RecordingNotifier::new();
        let mut ctrl = controller(ScriptedApi::replying(200, "{}"), &notifier);

        let err = ctrl.submit().await.unwrap_err();

        assert!(matches!(err, CheckoutError::MissingRedirect));
        assert_eq!(notifier.last().as_deref(), Some(MISSING_REDIRECT_NOTICE));
        assert!(!ctrl.page().redirect_form.submitted);
        assert_eq!(ctrl.page().redirect_form.action, None);
    }

    #[tokio::test]
    async fn test_error_message_surfaced() {
        let notifier = RecordingNotifier::new();
        let mut ctrl = controller(ScriptedApi::replying(400, r#"{"error":"card declined"}"#), &notifier);
        ctrl.select("qiwi").unwrap();

        let err = ctrl.submit().await.unwrap_err();

        assert!(matches!(err, CheckoutError::Rejected(_)));
        assert_eq!(notifier.messages(), vec!["card declined"]);
        assert!(!ctrl.page().redirect_form.submitted);
        assert_eq!(ctrl.form().active().identifier, "qiwi");
    }

    #[tokio::test]
    async fn test_malformed_error_body_generic() {
        let notifier = RecordingNotifier::new();
        let mut ctrl = controller(ScriptedApi::replying(500, "Internal Server Error"), &notifier);

        ctrl.submit().await.unwrap_err();
        assert_eq!(notifier.messages(), vec![GENERIC_FAILURE]);
    }

    #[tokio::test]
    async fn test_log_surface_does_not_alert() {
        let notifier = RecordingNotifier::new();
        let mut ctrl = controller(ScriptedApi::replying(400, r#"{"error":"card declined"}"#), &notifier)
            .with_config(ControllerConfig {
                error_surface: ErrorSurface::Log,
                ..Default::default()
            });

        assert!(ctrl.submit().await.is_err());
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_log_surface_still_shows_missing_redirect() {
        let notifier = RecordingNotifier::new();
        let mut ctrl = controller(ScriptedApi::replying(200, "{}"), &notifier).with_config(ControllerConfig {
            error_surface: ErrorSurface::Log,
            ..Default::default()
        });

        let err = ctrl.submit().await.unwrap_err();
        assert!(matches!(err, CheckoutError::MissingRedirect));
        assert_eq!(notifier.messages(), vec![MISSING_REDIRECT_NOTICE.to_string()]);
        assert!(!ctrl.page().redirect_form.submitted);
    }

    #[tokio::test]
    async fn test_transport_failure_only_logged() {
        let notifier = RecordingNotifier::new();
        let mut ctrl = controller(ScriptedApi::failing(), &notifier);

        let err = ctrl.submit().await.unwrap_err();
        assert!(matches!(err, CheckoutError::Transport(_)));
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_status_subscription_after_handoff() {
        let api = ScriptedApi::replying(200, r#"{"redirect_url":"https://gw.example/pay"}"#);
        let channel = Rc::new(ScriptedChannel::default());
        let notifier = RecordingNotifier::new();
        let mut ctrl = controller(api, &notifier).with_status_channel(Rc::clone(&channel) as Rc<dyn StatusChannel>);

        let handoff = ctrl.submit().await.unwrap();

        assert_eq!(*channel.subscribed.borrow(), vec!["payment:notify#5c1a"]);
        let sub = handoff.status.unwrap();
        let msg = watch_status(sub, &notifier).await.unwrap();
        assert_eq!(msg.status, "completed");
        assert_eq!(notifier.messages(), vec!["payment complete with status: completed"]);
    }

    #[tokio::test]
    async fn test_status_failure_does_not_block_redirect() {
        let api = ScriptedApi::replying(200, r#"{"redirect_url":"https://gw.example/pay"}"#);
        let channel = Rc::new(ScriptedChannel {
            fail: true,
            ..Default::default()
        });
        let notifier = RecordingNotifier::new();
        let mut ctrl = controller(api, &notifier).with_status_channel(channel);

        let handoff = ctrl.submit().await.unwrap();
        assert!(handoff.status.is_none());
        assert!(ctrl.page().redirect_form.submitted);
    }

    #[tokio::test]
    async fn test_no_subscription_on_failure() {
        let channel = Rc::new(ScriptedChannel::default());
        let notifier = RecordingNotifier::new();
        let mut ctrl = controller(ScriptedApi::replying(200, "{}"), &notifier)
            .with_status_channel(Rc::clone(&channel) as Rc<dyn StatusChannel>);

        assert!(ctrl.submit().await.is_err());
        assert!(channel.subscribed.borrow().is_empty());
    }

    #[test]
    fn test_split_submission_snapshots_payload() {
        let notifier = RecordingNotifier::new();
        let mut ctrl = controller(ScriptedApi::replying(200, "{}"), &notifier);
        ctrl.input("card-pan", "4242").unwrap();

        let payload = ctrl.prepare_submission();
        ctrl.select("btc").unwrap();

        assert_eq!(payload.payment_method_id(), Some("card"));
        assert_eq!(payload.get("pan"), Some("4242"));

        let url = ctrl
            .complete_submission(Ok(ApiReply::new(201, r#"{"redirect_url":"/pay/inline"}"#)))
            .unwrap();
        assert_eq!(url, "/pay/inline");
        assert_eq!(ctrl.form().active().identifier, "btc");
    }
}

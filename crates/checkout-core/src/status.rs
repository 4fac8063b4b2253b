//! Payment Status Channel
//!
//! After the gateway handoff the page may subscribe to a publish/subscribe
//! channel named after the order and wait for the payment outcome.

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::LocalBoxStream;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::notify::Notifier;

/// Default channel prefix; the order id is appended
pub const DEFAULT_CHANNEL_PREFIX: &str = "payment:notify#";

/// Channel name for an order
pub fn channel_name(prefix: &str, order_id: &str) -> String {
    format!("{prefix}{order_id}")
}

/// A message published on the status channel
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl StatusMessage {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Text shown to the user
    pub fn notice(&self) -> String {
        format!("payment complete with status: {}", self.status)
    }
}

/// Stream of status messages for one channel
pub type StatusStream = LocalBoxStream<'static, Result<StatusMessage>>;

/// An open subscription; dropping it tears the connection down
pub struct StatusSubscription {
    pub channel: String,
    stream: StatusStream,
}

impl StatusSubscription {
    pub fn new(channel: impl Into<String>, stream: StatusStream) -> Self {
        Self {
            channel: channel.into(),
            stream,
        }
    }

    /// Next message, `None` when the server closed the stream
    pub async fn next(&mut self) -> Option<Result<StatusMessage>> {
        self.stream.next().await
    }
}

impl std::fmt::Debug for StatusSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusSubscription")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

/// Publish/subscribe transport for payment status
#[async_trait(?Send)]
pub trait StatusChannel {
    /// Open a subscription on `channel`
    async fn subscribe(&self, channel: &str) -> Result<StatusSubscription>;
}

/// Wait for the first status message and show it.
///
/// The subscription is consumed: the first message is terminal.
pub async fn watch_status(
    mut subscription: StatusSubscription,
    notifier: &dyn Notifier,
) -> Option<StatusMessage> {
    match subscription.next().await {
        Some(Ok(message)) => {
            tracing::info!(
                channel = %subscription.channel,
                status = %message.status,
                "Payment status received"
            );
            notifier.alert(&message.notice());
            Some(message)
        }
        Some(Err(e)) => {
            tracing::warn!(channel = %subscription.channel, error = %e, "Status channel failed");
            None
        }
        None => {
            tracing::debug!(channel = %subscription.channel, "Status channel closed without a message");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckoutError;
    use crate::notify::RecordingNotifier;

    fn subscription(items: Vec<Result<StatusMessage>>) -> StatusSubscription {
        StatusSubscription::new("payment:notify#42", futures::stream::iter(items).boxed_local())
    }

    #[test]
    fn test_channel_name() {
        assert_eq!(channel_name(DEFAULT_CHANNEL_PREFIX, "42"), "payment:notify#42");
    }

    #[test]
    fn test_status_message_keeps_extra_fields() {
        let msg: StatusMessage =
            serde_json::from_str(r#"{"status":"completed","order_id":"42"}"#).unwrap();
        assert_eq!(msg.status, "completed");
        assert_eq!(msg.extra["order_id"], "42");
        assert_eq!(msg.notice(), "payment complete with status: completed");
    }

    #[tokio::test]
    async fn test_watch_surfaces_first_message_only() {
        let notifier = RecordingNotifier::new();
        let sub = subscription(vec![
            Ok(StatusMessage::new("completed")),
            Ok(StatusMessage::new("refunded")),
        ]);

        let msg = watch_status(sub, &notifier).await.unwrap();
        assert_eq!(msg.status, "completed");
        assert_eq!(notifier.messages(), vec!["payment complete with status: completed"]);
    }

    #[tokio::test]
    async fn test_watch_error_and_close_are_silent() {
        let notifier = RecordingNotifier::new();
        let failed = subscription(vec![Err(CheckoutError::Channel("reset".into()))]);
        assert!(watch_status(failed, &notifier).await.is_none());
        assert!(watch_status(subscription(Vec::new()), &notifier).await.is_none());
        assert!(notifier.messages().is_empty());
    }
}

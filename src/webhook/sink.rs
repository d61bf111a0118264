//! Downstream hand-off for accepted webhook events.

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::{SinkError, WebhookPayload};

/// Fire-and-forget consumer of verified events.
///
/// `submit` must not wait for processing: the gate acknowledges the request
/// as soon as the event is handed off.
pub trait EventSink: Send + Sync {
    /// Queues `payload` for processing.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] if the event cannot be queued.
    fn submit(&self, payload: WebhookPayload) -> Result<(), SinkError>;
}

impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn submit(&self, payload: WebhookPayload) -> Result<(), SinkError> {
        (**self).submit(payload)
    }
}

/// [`EventSink`] backed by a bounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<WebhookPayload>,
}

impl ChannelSink {
    /// Creates a sink and the receiver its events arrive on.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<WebhookPayload>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn submit(&self, payload: WebhookPayload) -> Result<(), SinkError> {
        self.sender.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => SinkError::Full,
            TrySendError::Closed(_) => SinkError::Closed,
        })
    }
}

/// Processes queued events until every sender is dropped.
///
/// Returns the number of events processed.
pub async fn process_events(mut receiver: mpsc::Receiver<WebhookPayload>) -> usize {
    let mut processed = 0;
    while let Some(event) = receiver.recv().await {
        let WebhookPayload { event_type, data } = event;
        tracing::info!(event_type = %event_type, "Processing Notion webhook event");
        let data = Value::Object(data);
        tracing::debug!(event_type = %event_type, data = %data, "Webhook payload data");
        processed += 1;
    }
    tracing::debug!(processed, "Webhook worker stopped");
    processed
}

//! Shape of inbound webhook events.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An inbound webhook event.
///
/// Only the shape is checked; `data` is passed downstream as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Event name such as `page.updated`
    pub event_type: String,
    /// Event-specific data
    pub data: Map<String, Value>,
}

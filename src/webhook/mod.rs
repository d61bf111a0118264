//! Inbound Notion webhooks.
//!
//! This module provides:
//! - HMAC-SHA256 signature checks ([`verify`], [`sign`])
//! - The event shape ([`WebhookPayload`])
//! - Asynchronous hand-off ([`EventSink`], [`ChannelSink`], [`process_events`])
//! - The request guard tying them together ([`WebhookGate`])

mod error;
mod gate;
mod payload;
mod signature;
mod sink;


pub use error::{SignatureError, SinkError, WebhookError};
pub use gate::WebhookGate;
pub use payload::WebhookPayload;
pub use signature::{SIGNATURE_HEADER, Verification, sign, verify};
pub use sink::{ChannelSink, EventSink, process_events};

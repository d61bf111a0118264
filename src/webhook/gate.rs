//! The webhook gate: signature check, payload decoding and hand-off.

use std::fmt;

use axum::http::HeaderMap;

use super::signature::{self, SIGNATURE_HEADER};
use super::{EventSink, WebhookError, WebhookPayload};

/// Authenticates inbound webhook requests before anything else reads them.
///
/// Order of checks in [`WebhookGate::receive`]:
/// 1. a secret must be configured (otherwise 500)
/// 2. the signature must match the raw body (otherwise 400)
/// 3. the body must decode as a [`WebhookPayload`] (otherwise 422)
/// 4. the sink must accept the event (otherwise 503 or 500)
pub struct WebhookGate<K> {
    secret: Option<String>,
    sink: K,
}

impl<K> WebhookGate<K> {
    /// Creates a gate. An empty secret counts as not configured.
    pub fn new(secret: Option<String>, sink: K) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            sink,
        }
    }

    /// Returns true if a secret is configured.
    pub const fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// The sink accepted events are handed to.
    pub const fn sink(&self) -> &K {
        &self.sink
    }
}

impl<K: EventSink> WebhookGate<K> {
    /// Verifies, decodes and queues one webhook request.
    ///
    /// Returns once the event is queued, without waiting for processing.
    ///
    /// # Errors
    ///
    /// Returns the [`WebhookError`] of the first failing check.
    pub fn receive(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), WebhookError> {
        let provided = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        let verification = match signature::verify(self.secret.as_deref(), body, provided) {
            Ok(verification) => verification,
            Err(e) => {
                tracing::error!(error = %e, "Rejecting webhook: secret is not usable");
                return Err(e.into());
            }
        };
        if !verification.is_accepted() {
            tracing::warn!(
                signature_present = !provided.is_empty(),
                "Rejecting webhook with invalid signature"
            );
            return Err(WebhookError::InvalidSignature);
        }

        let payload: WebhookPayload = serde_json::from_slice(body).map_err(|e| {
            tracing::warn!(error = %e, "Rejecting signed webhook with malformed payload");
            WebhookError::InvalidPayload(e)
        })?;

        let event_type = payload.event_type.clone();
        self.sink.submit(payload).inspect_err(|e| {
            tracing::error!(event_type = %event_type, error = %e, "Failed to queue webhook event");
        })?;
        tracing::info!(event_type = %event_type, "Accepted Notion webhook event");
        Ok(())
    }
}

impl<K> fmt::Debug for WebhookGate<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookGate")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

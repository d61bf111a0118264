//! Error types for the webhook path.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Failure to evaluate a signature at all.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// No secret is configured; the gate must fail closed.
    #[error("Webhook secret is not configured.")]
    MissingSecret,

    /// The secret could not be used as an HMAC key.
    #[error("Webhook secret is not a usable HMAC key")]
    InvalidKey,
}

/// Failure to hand an accepted event to the downstream processor.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SinkError {
    /// The queue is at capacity.
    #[error("Webhook queue is full.")]
    Full,

    /// The consumer has shut down.
    #[error("Webhook queue is closed.")]
    Closed,
}

/// Why the webhook gate refused a request.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Server misconfiguration: no secret to verify against.
    #[error("Webhook secret is not configured.")]
    SecretNotConfigured,

    /// The secret is configured but unusable.
    #[error("Webhook secret is invalid.")]
    InvalidSecret(#[source] SignatureError),

    /// Missing or mismatching signature.
    #[error("Invalid webhook signature.")]
    InvalidSignature,

    /// Correctly signed body that is not a webhook payload.
    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    /// The event could not be queued.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl From<SignatureError> for WebhookError {
    fn from(error: SignatureError) -> Self {
        match error {
            SignatureError::MissingSecret => Self::SecretNotConfigured,
            other @ SignatureError::InvalidKey => Self::InvalidSecret(other),
        }
    }
}

impl WebhookError {
    /// HTTP status answered for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::SecretNotConfigured | Self::InvalidSecret(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::InvalidSignature => StatusCode::BAD_REQUEST,
            Self::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Sink(SinkError::Full) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Sink(SinkError::Closed) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({"detail": self.to_string()})),
        )
            .into_response()
    }
}

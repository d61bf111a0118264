//! Error taxonomy for Notion API calls.
//!
//! Every failed call resolves into exactly one [`ApiError`]. Status-derived
//! variants are chosen by [`ErrorKind::from_status`], the only place where
//! status codes are mapped to kinds, and [`ErrorKind::is_retryable`] is the
//! only place that decides which kinds are worth another attempt.

use std::fmt;
use std::time::Duration;

use http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::transport::HttpError;

/// Message used when the provider's error body carries none.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Discriminant of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400
    BadRequest,
    /// 401
    Authentication,
    /// 403
    Permission,
    /// 404
    NotFound,
    /// 409
    Conflict,
    /// 429
    RateLimited,
    /// 5xx other than 503
    InternalServer,
    /// 503
    ServiceUnavailable,
    /// Any other status, transport failures and local faults.
    Generic,
}

impl ErrorKind {
    /// Maps a non-success status code to its kind.
    ///
    /// Total: statuses without a dedicated kind map to [`ErrorKind::Generic`].
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::BadRequest,
            StatusCode::UNAUTHORIZED => Self::Authentication,
            StatusCode::FORBIDDEN => Self::Permission,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::Conflict,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            StatusCode::SERVICE_UNAVAILABLE => Self::ServiceUnavailable,
            s if s.is_server_error() => Self::InternalServer,
            _ => Self::Generic,
        }
    }

    /// Returns true if a failure of this kind may succeed when re-attempted.
    ///
    /// Transport timeouts are [`ErrorKind::Generic`] but retryable as well;
    /// use [`ApiError::is_retryable`] for the complete decision.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::RateLimited | Self::ServiceUnavailable)
    }

    /// Short human-readable name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "bad request",
            Self::Authentication => "authentication failed",
            Self::Permission => "permission denied",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::RateLimited => "rate limited",
            Self::InternalServer => "internal server error",
            Self::ServiceUnavailable => "service unavailable",
            Self::Generic => "request failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the provider told us about a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    /// HTTP status of the response
    pub status: StatusCode,
    /// Provider message, or [`UNKNOWN_ERROR_MESSAGE`]
    pub message: String,
    /// Provider error code such as `object_not_found`
    pub code: Option<String>,
}

impl ErrorDetails {
    /// Extracts message and code from a raw error body.
    ///
    /// Never fails: an empty, non-JSON or oddly shaped body yields the
    /// generic message and no code.
    #[must_use]
    pub fn parse(status: StatusCode, body: &[u8]) -> Self {
        let envelope: ErrorEnvelope = serde_json::from_slice(body).unwrap_or_default();
        Self {
            status,
            message: envelope
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
            code: envelope.code,
        }
    }
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.status.as_u16(), self.message)?;
        if let Some(code) = &self.code {
            write!(f, " [{code}]")?;
        }
        Ok(())
    }
}

/// The provider's JSON error envelope, read leniently.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default, deserialize_with = "lenient_string")]
    message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    code: Option<String>,
}

/// Accepts any JSON value; keeps it only if it is a string.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

/// A failed Notion API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 Bad Request.
    #[error("Notion API error: bad request {0}")]
    BadRequest(ErrorDetails),

    /// 401 Unauthorized.
    #[error("Notion API error: authentication failed {0}")]
    Authentication(ErrorDetails),

    /// 403 Forbidden.
    #[error("Notion API error: permission denied {0}")]
    Permission(ErrorDetails),

    /// 404 Not Found.
    #[error("Notion API error: not found {0}")]
    NotFound(ErrorDetails),

    /// 409 Conflict.
    #[error("Notion API error: conflict {0}")]
    Conflict(ErrorDetails),

    /// 429 Too Many Requests.
    #[error("Notion API error: rate limited {details}")]
    RateLimited {
        /// Status, message and code
        details: ErrorDetails,
        /// Server-suggested wait from the `Retry-After` header
        retry_after: Option<Duration>,
    },

    /// 5xx other than 503.
    #[error("Notion API error: internal server error {0}")]
    InternalServer(ErrorDetails),

    /// 503 Service Unavailable.
    #[error("Notion API error: service unavailable {0}")]
    ServiceUnavailable(ErrorDetails),

    /// Any other non-success status.
    #[error("Notion API error: unexpected status {0}")]
    Unexpected(ErrorDetails),

    /// The HTTP exchange itself failed.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] HttpError),

    /// The endpoint could not be joined onto the base URL.
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// Endpoint as given by the caller
        endpoint: String,
        /// Why the resulting URL is invalid
        reason: String,
    },

    /// An object id cannot be used as a path segment.
    #[error("Invalid id '{id}': {reason}")]
    InvalidId {
        /// Id as given by the caller
        id: String,
        /// Why it was refused
        reason: &'static str,
    },

    /// The integration token cannot be sent as an HTTP header.
    #[error("Integration token is not a valid header value")]
    InvalidToken,

    /// A request payload could not be encoded as JSON.
    #[error("Failed to encode request payload: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A success response could not be decoded into the expected shape.
    #[error("Failed to decode Notion response: {0}")]
    Deserialization(#[source] serde_json::Error),
}

impl ApiError {
    /// Classifies a non-success response.
    ///
    /// Always produces an error, whatever the body looks like.
    #[must_use]
    pub fn from_response(status: StatusCode, headers: &http::HeaderMap, body: &[u8]) -> Self {
        let details = ErrorDetails::parse(status, body);
        match ErrorKind::from_status(status) {
            ErrorKind::BadRequest => Self::BadRequest(details),
            ErrorKind::Authentication => Self::Authentication(details),
            ErrorKind::Permission => Self::Permission(details),
            ErrorKind::NotFound => Self::NotFound(details),
            ErrorKind::Conflict => Self::Conflict(details),
            ErrorKind::RateLimited => Self::RateLimited {
                details,
                retry_after: parse_retry_after(headers),
            },
            ErrorKind::InternalServer => Self::InternalServer(details),
            ErrorKind::ServiceUnavailable => Self::ServiceUnavailable(details),
            ErrorKind::Generic => Self::Unexpected(details),
        }
    }

    /// Returns the discriminant of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::Permission(_) => ErrorKind::Permission,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::InternalServer(_) => ErrorKind::InternalServer,
            Self::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            Self::Unexpected(_)
            | Self::Transport(_)
            | Self::InvalidEndpoint { .. }
            | Self::InvalidId { .. }
            | Self::InvalidToken
            | Self::Serialization(_)
            | Self::Deserialization(_) => ErrorKind::Generic,
        }
    }

    /// Returns the provider details for status-derived errors.
    #[must_use]
    pub const fn details(&self) -> Option<&ErrorDetails> {
        match self {
            Self::BadRequest(d)
            | Self::Authentication(d)
            | Self::Permission(d)
            | Self::NotFound(d)
            | Self::Conflict(d)
            | Self::RateLimited { details: d, .. }
            | Self::InternalServer(d)
            | Self::ServiceUnavailable(d)
            | Self::Unexpected(d) => Some(d),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if there was one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.details().map(|d| d.status)
    }

    /// Provider error code, if the response carried one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.details().and_then(|d| d.code.as_deref())
    }

    /// Server-suggested wait before retrying (rate limiting only).
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Returns true if the retry policy should re-attempt the call.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            other => other.kind().is_retryable(),
        }
    }
}

fn parse_retry_after(headers: &http::HeaderMap) -> Option<Duration> {
    headers
        .get(http::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

//! Transport-level errors.

use thiserror::Error;

/// A failure to complete an HTTP exchange at all.
///
/// A response with a non-2xx status is *not* an `HttpError`; it reaches the
/// caller as an [`HttpResponse`](super::HttpResponse) and is classified one
/// layer up.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// Covers DNS resolution failures, refused or reset connections and
    /// errors while reading the response body.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The attempt did not finish within the transport timeout.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be built (bad URL, bad header).
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl HttpError {
    /// Returns true for [`HttpError::Timeout`].
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

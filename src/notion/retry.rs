//! Retry policy for transient Notion API failures.

use std::future::Future;
use std::time::Duration;

use crate::time::Sleeper;

use super::ApiError;

/// Exponential backoff for the retryable subset of [`ApiError`].
///
/// The policy is a plain value: compose it with an operation through
/// [`RetryPolicy::run`]. Each `run` keeps its own attempt counter and delay,
/// so one policy can serve any number of concurrent calls.
///
/// Delays follow `initial_delay * backoff_factor^k` exactly, with no jitter
/// and no cap.
///
/// # Defaults
///
/// - `max_retries`: 3 (so at most 4 attempts)
/// - `initial_delay`: 1 second
/// - `backoff_factor`: 2.0
///
/// # Example
///
/// ```
/// use notion_gateway::notion::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new()
///     .with_max_retries(5)
///     .with_initial_delay(Duration::from_millis(250))
///     .with_backoff_factor(1.5);
///
/// assert_eq!(policy.max_attempts(), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Re-attempts allowed after the first try. Zero disables retrying.
    pub max_retries: u32,

    /// Delay before the first retry.
    pub initial_delay: Duration,

    /// Factor applied to the delay after each retry.
    pub backoff_factor: f64,
}

impl RetryPolicy {
    /// Default number of retries.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Default initial delay (1 second).
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

    /// Default backoff factor (2.0).
    pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;

    /// Creates a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            initial_delay: Self::DEFAULT_INITIAL_DELAY,
            backoff_factor: Self::DEFAULT_BACKOFF_FACTOR,
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self::new().with_max_retries(0)
    }

    /// Sets the number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before the first retry.
    ///
    /// Zero is allowed and turns the backoff into an immediate retry loop.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the backoff factor.
    ///
    /// # Panics
    ///
    /// Panics if `factor` is not a positive finite number.
    #[must_use]
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        assert!(
            factor > 0.0 && factor.is_finite(),
            "backoff_factor must be a positive finite number"
        );
        self.backoff_factor = factor;
        self
    }

    /// Total attempts a failing call may make (`max_retries + 1`).
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Computes the delay before the given retry (0 = first retry).
    ///
    /// Saturates at [`Duration::MAX`] instead of overflowing.
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.backoff_factor.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    /// Runs `operation`, re-invoking it while it fails with a retryable error.
    ///
    /// - Success returns at once, without sleeping.
    /// - A non-retryable error is returned at once, without sleeping.
    /// - A retryable error sleeps `delay_for_retry(k)` and tries again, until
    ///   `max_retries` retries have been spent; the last error is returned.
    ///
    /// Attempts run strictly one after another. Dropping the returned future
    /// cancels the in-flight attempt or the pending sleep.
    ///
    /// # Errors
    ///
    /// Returns the error of the last attempt made.
    pub async fn run<T, F, Fut, S>(
        &self,
        sleeper: &S,
        operation: &str,
        mut attempt_fn: F,
    ) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
        S: Sleeper,
    {
        let mut retry = 0;
        loop {
            let error = match attempt_fn().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !error.is_retryable() {
                return Err(error);
            }

            if retry == self.max_retries {
                tracing::error!(
                    operation,
                    retries = self.max_retries,
                    error = %error,
                    "Notion request failed after exhausting retries"
                );
                return Err(error);
            }

            let delay = self.delay_for_retry(retry);
            retry += 1;
            tracing::warn!(
                operation,
                attempt = retry,
                max_retries = self.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "Retryable Notion failure, backing off"
            );
            sleeper.sleep(delay).await;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

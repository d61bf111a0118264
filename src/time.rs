//! Sleep abstraction for testability.
//!
//! Retry delays go through a [`Sleeper`] so that tests can observe the
//! backoff sequence without actually waiting, while production code suspends
//! the task cooperatively on the tokio timer.

use std::time::Duration;

/// Abstraction over waiting for a duration.
///
/// Implementations must not block the executor thread: a sleeping call is a
/// suspension point that lets other in-flight requests make progress.
/// Dropping the returned future cancels the wait.
///
/// # Example
///
/// ```
/// use notion_gateway::time::{InstantSleeper, Sleeper};
/// use std::time::Duration;
///
/// # async fn example() {
/// InstantSleeper.sleep(Duration::from_secs(60)).await; // returns immediately
/// # }
/// ```
pub trait Sleeper: Send + Sync {
    /// Waits for the given duration.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Production sleeper backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately.
///
/// Useful in tests and for retry policies with a zero delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

impl<T: Sleeper> Sleeper for std::sync::Arc<T> {
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        (**self).sleep(duration)
    }
}

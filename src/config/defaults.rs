//! Default values for configuration options.

use std::time::Duration;

/// Default Notion API base URL.
pub const BASE_URL: &str = crate::notion::DEFAULT_BASE_URL;

/// Default per-attempt request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 30;

/// Default capacity of the webhook event queue.
pub const QUEUE_CAPACITY: usize = 1024;

/// Default bind address of the HTTP facade.
pub const LISTEN: &str = "127.0.0.1:8000";

/// Default maximum number of retries.
pub const RETRY_MAX_RETRIES: u32 = 3;

/// Default initial retry delay in seconds.
pub const RETRY_INITIAL_DELAY_SECS: f64 = 1.0;

/// Default retry backoff factor.
pub const RETRY_BACKOFF_FACTOR: f64 = 2.0;

/// Default request timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_secs(TIMEOUT_SECS)
}

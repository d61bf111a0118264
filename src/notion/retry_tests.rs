//! Tests for `RetryPolicy`.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use http::{HeaderMap, StatusCode};

use super::test_fixtures::RecordingSleeper;
use super::{ApiError, RetryPolicy};
use crate::time::InstantSleeper;
use crate::transport::HttpError;

fn status_error(code: u16) -> ApiError {
    ApiError::from_response(StatusCode::from_u16(code).unwrap(), &HeaderMap::new(), b"")
}

mod configuration {
    use super::*;

    #[test]
    fn defaults() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.initial_delay, Duration::from_secs(1));
        assert!((policy.backoff_factor - 2.0).abs() < f64::EPSILON);
        assert_eq!(policy.max_attempts(), 4);
    }

    #[test]
    fn none_never_retries() {
        assert_eq!(RetryPolicy::none().max_attempts(), 1);
    }

    #[test]
    fn delays_follow_geometric_sequence() {
        let policy = RetryPolicy::new()
            .with_initial_delay(Duration::from_millis(500))
            .with_backoff_factor(3.0);

        assert_eq!(policy.delay_for_retry(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for_retry(1), Duration::from_millis(1500));
        assert_eq!(policy.delay_for_retry(2), Duration::from_millis(4500));
    }

    #[test]
    fn huge_exponent_saturates() {
        let policy = RetryPolicy::new();
        assert_eq!(policy.delay_for_retry(u32::MAX), Duration::MAX);
    }

    #[test]
    #[should_panic(expected = "backoff_factor must be a positive finite number")]
    fn zero_backoff_factor_panics() {
        let _ = RetryPolicy::new().with_backoff_factor(0.0);
    }

    #[test]
    #[should_panic(expected = "backoff_factor must be a positive finite number")]
    fn nan_backoff_factor_panics() {
        let _ = RetryPolicy::new().with_backoff_factor(f64::NAN);
    }
}

mod run {
    use super::*;

    #[tokio::test]
    async fn success_returns_without_sleeping() {
        let sleeper = RecordingSleeper::default();
        let calls = &AtomicU32::new(0);

        let result = RetryPolicy::new()
            .run(&sleeper, "GET users/me", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ApiError>("done")
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn retryable_failures_exhaust_with_exact_backoff() {
        for code in [429, 503] {
            let sleeper = RecordingSleeper::default();
            let calls = &AtomicU32::new(0);

            let result: Result<(), _> = RetryPolicy::new()
                .run(&sleeper, "GET pages/p1", move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(status_error(code))
                })
                .await;

            assert_eq!(result.unwrap_err().status().unwrap().as_u16(), code);
            assert_eq!(calls.load(Ordering::SeqCst), 4, "status {code}");
            assert_eq!(
                sleeper.delays(),
                vec![
                    Duration::from_secs(1),
                    Duration::from_secs(2),
                    Duration::from_secs(4)
                ]
            );
        }
    }

    #[tokio::test]
    async fn timeout_is_retried() {
        let sleeper = RecordingSleeper::default();
        let calls = &AtomicU32::new(0);

        let result: Result<(), _> = RetryPolicy::new()
            .with_max_retries(2)
            .run(&sleeper, "GET users", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::Transport(HttpError::Timeout))
            })
            .await;

        assert!(matches!(
            result,
            Err(ApiError::Transport(HttpError::Timeout))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_failures_run_once() {
        for code in [400, 401, 403, 404, 409, 500, 418] {
            let sleeper = RecordingSleeper::default();
            let calls = &AtomicU32::new(0);

            let result: Result<(), _> = RetryPolicy::new()
                .run(&sleeper, "GET databases/d1", move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(status_error(code))
                })
                .await;

            assert!(result.is_err());
            assert_eq!(calls.load(Ordering::SeqCst), 1, "status {code}");
            assert!(sleeper.delays().is_empty());
        }
    }

    #[tokio::test]
    async fn connection_failure_is_not_retried() {
        let calls = &AtomicU32::new(0);

        let result: Result<(), _> = RetryPolicy::new()
            .run(&InstantSleeper, "GET users", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::Transport(HttpError::Connection(Box::new(
                    std::io::Error::other("connection reset"),
                ))))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovers_on_last_allowed_attempt() {
        let sleeper = RecordingSleeper::default();
        let calls = &AtomicU32::new(0);

        let result = RetryPolicy::new()
            .run(&sleeper, "POST pages", move || async move {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                if attempt < 3 {
                    Err(status_error(429))
                } else {
                    Ok(attempt)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(sleeper.delays().len(), 3);
    }

    #[tokio::test]
    async fn zero_retries_makes_one_attempt() {
        let calls = &AtomicU32::new(0);

        let result: Result<(), _> = RetryPolicy::none()
            .run(&InstantSleeper, "GET users", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(status_error(503))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

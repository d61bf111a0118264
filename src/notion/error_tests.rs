//! Tests for the error taxonomy.

use std::time::Duration;

use http::{HeaderMap, HeaderValue, StatusCode};

use super::{ApiError, ErrorDetails, ErrorKind, UNKNOWN_ERROR_MESSAGE};
use crate::transport::HttpError;

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap()
}

mod kind_mapping {
    use super::*;

    #[test]
    fn mapped_statuses() {
        let table = [
            (400, ErrorKind::BadRequest),
            (401, ErrorKind::Authentication),
            (403, ErrorKind::Permission),
            (404, ErrorKind::NotFound),
            (409, ErrorKind::Conflict),
            (429, ErrorKind::RateLimited),
            (500, ErrorKind::InternalServer),
            (502, ErrorKind::InternalServer),
            (504, ErrorKind::InternalServer),
            (503, ErrorKind::ServiceUnavailable),
        ];

        for (code, expected) in table {
            assert_eq!(ErrorKind::from_status(status(code)), expected, "status {code}");
        }
    }

    #[test]
    fn unmapped_statuses_fall_back_to_generic() {
        for code in [301, 402, 405, 418, 422] {
            assert_eq!(ErrorKind::from_status(status(code)), ErrorKind::Generic);
        }
    }

    #[test]
    fn only_rate_limit_and_unavailable_are_retryable() {
        let retryable: Vec<_> = [
            ErrorKind::BadRequest,
            ErrorKind::Authentication,
            ErrorKind::Permission,
            ErrorKind::NotFound,
            ErrorKind::Conflict,
            ErrorKind::RateLimited,
            ErrorKind::InternalServer,
            ErrorKind::ServiceUnavailable,
            ErrorKind::Generic,
        ]
        .into_iter()
        .filter(|k| k.is_retryable())
        .collect();

        assert_eq!(
            retryable,
            vec![ErrorKind::RateLimited, ErrorKind::ServiceUnavailable]
        );
    }
}

mod details {
    use super::*;

    #[test]
    fn parses_message_and_code() {
        let details = ErrorDetails::parse(
            status(404),
            br#"{"object":"error","code":"object_not_found","message":"Could not find page"}"#,
        );

        assert_eq!(details.message, "Could not find page");
        assert_eq!(details.code.as_deref(), Some("object_not_found"));
        assert_eq!(
            details.to_string(),
            "(404) Could not find page [object_not_found]"
        );
    }

    #[test]
    fn malformed_body_uses_generic_message() {
        for body in [&b""[..], b"<html>oops</html>", b"[1,2]", br#"{"message": 42}"#] {
            let details = ErrorDetails::parse(status(500), body);
            assert_eq!(details.message, UNKNOWN_ERROR_MESSAGE);
            assert!(details.code.is_none());
        }
    }

    #[test]
    fn missing_message_keeps_code() {
        let details = ErrorDetails::parse(
            status(404),
            br#"{"object":"error","code":"object_not_found"}"#,
        );

        assert_eq!(details.message, UNKNOWN_ERROR_MESSAGE);
        assert_eq!(details.code.as_deref(), Some("object_not_found"));
    }
}

mod from_response {
    use super::*;

    #[test]
    fn every_non_success_status_produces_an_error() {
        for code in [400, 401, 403, 404, 409, 429, 500, 503, 302, 418] {
            let error = ApiError::from_response(status(code), &HeaderMap::new(), b"");
            assert_eq!(error.status(), Some(status(code)));
            assert_eq!(error.kind(), ErrorKind::from_status(status(code)));
        }
    }

    #[test]
    fn rate_limit_carries_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::RETRY_AFTER, HeaderValue::from_static("12"));

        let error = ApiError::from_response(status(429), &headers, b"{}");

        assert!(matches!(error, ApiError::RateLimited { .. }));
        assert_eq!(error.retry_after(), Some(Duration::from_secs(12)));
    }

    #[test]
    fn unparseable_retry_after_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );

        let error = ApiError::from_response(status(429), &headers, b"{}");

        assert!(error.retry_after().is_none());
    }

    #[test]
    fn display_includes_status_and_message() {
        let error = ApiError::from_response(
            status(401),
            &HeaderMap::new(),
            br#"{"code":"unauthorized","message":"API token is invalid."}"#,
        );

        let text = error.to_string();
        assert!(text.contains("401"));
        assert!(text.contains("API token is invalid."));
        assert_eq!(error.code(), Some("unauthorized"));
    }
}

mod retryability {
    use super::*;

    #[test]
    fn transport_timeout_is_retryable() {
        assert!(ApiError::Transport(HttpError::Timeout).is_retryable());
        assert_eq!(
            ApiError::Transport(HttpError::Timeout).kind(),
            ErrorKind::Generic
        );
    }

    #[test]
    fn other_transport_failures_are_not() {
        let reset = ApiError::Transport(HttpError::Connection(Box::new(
            std::io::Error::other("connection reset by peer"),
        )));
        assert!(!reset.is_retryable());
        assert!(reset.status().is_none());
        assert!(!ApiError::InvalidToken.is_retryable());
    }

    #[test]
    fn invalid_id_is_a_local_generic_fault() {
        let error = ApiError::InvalidId {
            id: "..".to_string(),
            reason: "id is a relative path segment",
        };

        assert_eq!(error.kind(), ErrorKind::Generic);
        assert!(!error.is_retryable());
        assert!(error.status().is_none());
        assert_eq!(
            error.to_string(),
            "Invalid id '..': id is a relative path segment"
        );
    }

    #[test]
    fn status_errors_follow_their_kind() {
        for code in [429, 503] {
            assert!(ApiError::from_response(status(code), &HeaderMap::new(), b"").is_retryable());
        }
        for code in [400, 401, 403, 404, 409, 500, 502] {
            assert!(!ApiError::from_response(status(code), &HeaderMap::new(), b"").is_retryable());
        }
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<ApiError>();
    }
}

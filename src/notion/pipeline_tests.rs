//! Tests for `RequestPipeline`.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use super::test_fixtures::{
    RecordingSleeper, ScriptedClient, TEST_TOKEN, error_body, json_response, test_pipeline,
};
use super::{ApiError, ApiRequest, ErrorKind, RequestPipeline, RetryPolicy};
use crate::transport::{HttpError, HttpResponse};

mod request_descriptor {
    use super::*;

    #[test]
    fn builders_set_method_endpoint_payload_and_query() {
        let request = ApiRequest::post("databases/d1/query")
            .with_payload(json!({"page_size": 10}))
            .with_query("start_cursor", "abc");

        assert_eq!(request.method(), &http::Method::POST);
        assert_eq!(request.endpoint(), "databases/d1/query");
        assert_eq!(request.payload(), Some(&json!({"page_size": 10})));
        assert_eq!(
            request.query(),
            &[("start_cursor".to_string(), "abc".to_string())]
        );
    }

    #[test]
    fn method_shortcuts() {
        assert_eq!(ApiRequest::get("users").method(), &http::Method::GET);
        assert_eq!(ApiRequest::patch("pages/p").method(), &http::Method::PATCH);
        assert_eq!(ApiRequest::delete("blocks/b").method(), &http::Method::DELETE);
    }
}

mod construction {
    use super::*;

    #[test]
    fn attaches_fixed_headers() {
        let pipeline = test_pipeline(ScriptedClient::new(vec![]));
        let headers = pipeline.headers();

        assert_eq!(
            headers.get(http::header::AUTHORIZATION).unwrap(),
            &format!("Bearer {TEST_TOKEN}")
        );
        assert!(headers.get(http::header::AUTHORIZATION).unwrap().is_sensitive());
        assert_eq!(
            headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(headers.get("notion-version").unwrap(), "2022-06-28");
    }

    #[test]
    fn rejects_token_with_control_characters() {
        let result = RequestPipeline::new(ScriptedClient::new(vec![]), "bad\ntoken");
        assert!(matches!(result, Err(ApiError::InvalidToken)));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let base = url::Url::parse("http://127.0.0.1:9000/v1/").unwrap();
        let pipeline = test_pipeline(ScriptedClient::new(vec![])).with_base_url(&base);

        assert_eq!(pipeline.base_url(), "http://127.0.0.1:9000/v1");
    }

    #[test]
    fn leading_slash_in_endpoint_does_not_double() {
        let pipeline = test_pipeline(ScriptedClient::new(vec![]));

        let with_slash = pipeline.url_for(&ApiRequest::get("/users/me")).unwrap();
        let without = pipeline.url_for(&ApiRequest::get("users/me")).unwrap();

        assert_eq!(with_slash.as_str(), "https://api.notion.com/v1/users/me");
        assert_eq!(with_slash, without);
    }

    #[test]
    fn query_parameters_are_encoded() {
        let pipeline = test_pipeline(ScriptedClient::new(vec![]));

        let url = pipeline
            .url_for(&ApiRequest::get("comments").with_query("block_id", "a b&c"))
            .unwrap();

        assert_eq!(url.query(), Some("block_id=a+b%26c"));
    }
}

mod execute {
    use super::*;

    #[tokio::test]
    async fn success_returns_body_unchanged() {
        let body = json!({
            "object": "database",
            "id": "d1",
            "title": [],
            "extra": {"nested": [1, 2, {"x": null}]}
        });
        let client = ScriptedClient::replying(200, &body);
        let pipeline = test_pipeline(Arc::clone(&client));

        let value = pipeline
            .execute(&ApiRequest::get("databases/d1"))
            .await
            .unwrap();

        assert_eq!(value, body);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn sends_method_url_headers_and_body() {
        let client = ScriptedClient::replying(200, &json!({"object": "page", "id": "p1"}));
        let pipeline = test_pipeline(Arc::clone(&client));

        pipeline
            .execute(
                &ApiRequest::patch("pages/p1").with_payload(json!({"properties": {}, "archived": true})),
            )
            .await
            .unwrap();

        let sent = client.last_request();
        assert_eq!(sent.method, http::Method::PATCH);
        assert_eq!(sent.url.as_str(), "https://api.notion.com/v1/pages/p1");
        assert_eq!(sent.headers.get("notion-version").unwrap(), "2022-06-28");
        let body: serde_json::Value = serde_json::from_slice(sent.body.as_ref().unwrap()).unwrap();
        assert_eq!(body, json!({"properties": {}, "archived": true}));
    }

    #[tokio::test]
    async fn get_without_payload_sends_no_body() {
        let client = ScriptedClient::replying(200, &json!({}));
        let pipeline = test_pipeline(Arc::clone(&client));

        pipeline.execute(&ApiRequest::get("users")).await.unwrap();

        assert!(client.last_request().body.is_none());
    }

    #[tokio::test]
    async fn empty_success_body_is_null() {
        let client = ScriptedClient::new(vec![Ok(HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            vec![],
        ))]);
        let pipeline = test_pipeline(client);

        let value = pipeline
            .execute(&ApiRequest::delete("blocks/b1"))
            .await
            .unwrap();

        assert!(value.is_null());
    }

    #[tokio::test]
    async fn invalid_success_body_is_deserialization_error() {
        let client = ScriptedClient::new(vec![Ok(HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            b"<html>".to_vec(),
        ))]);
        let pipeline = test_pipeline(client);

        let result = pipeline.execute(&ApiRequest::get("users")).await;

        assert!(matches!(result, Err(ApiError::Deserialization(_))));
    }

    #[tokio::test]
    async fn status_codes_map_to_taxonomy_kinds() {
        let table = [
            (400, ErrorKind::BadRequest),
            (401, ErrorKind::Authentication),
            (403, ErrorKind::Permission),
            (404, ErrorKind::NotFound),
            (409, ErrorKind::Conflict),
            (429, ErrorKind::RateLimited),
            (500, ErrorKind::InternalServer),
            (503, ErrorKind::ServiceUnavailable),
        ];

        for (code, kind) in table {
            let client = ScriptedClient::replying(code, &error_body("some_code", "boom"));
            let pipeline = test_pipeline(Arc::clone(&client))
                .with_retry_policy(RetryPolicy::none());

            let error = pipeline
                .execute(&ApiRequest::get("databases/d1"))
                .await
                .unwrap_err();

            assert_eq!(error.kind(), kind, "status {code}");
            assert_eq!(error.status().unwrap().as_u16(), code);
            assert_eq!(error.code(), Some("some_code"));
            assert_eq!(client.calls(), 1);
        }
    }

    #[tokio::test]
    async fn not_found_scenario() {
        let client = ScriptedClient::replying(
            404,
            &json!({"object": "error", "code": "object_not_found"}),
        );
        let pipeline = test_pipeline(client);

        let error = pipeline
            .execute(&ApiRequest::get("databases/d1"))
            .await
            .unwrap_err();

        assert!(matches!(error, ApiError::NotFound(_)));
        assert_eq!(error.status(), Some(http::StatusCode::NOT_FOUND));
        assert_eq!(error.details().unwrap().message, "Unknown error");
    }

    #[tokio::test]
    async fn non_json_error_body_still_classifies() {
        let client = ScriptedClient::new(vec![Ok(HttpResponse::new(
            http::StatusCode::BAD_GATEWAY,
            http::HeaderMap::new(),
            b"<html>Bad Gateway</html>".to_vec(),
        ))]);
        let pipeline = test_pipeline(client);

        let error = pipeline
            .execute(&ApiRequest::get("users"))
            .await
            .unwrap_err();

        assert!(matches!(error, ApiError::InternalServer(_)));
    }

    #[tokio::test]
    async fn connection_failure_is_generic_and_not_retried() {
        let client = ScriptedClient::new(vec![Err(HttpError::Connection(Box::new(
            std::io::Error::other("dns failure"),
        )))]);
        let pipeline = test_pipeline(Arc::clone(&client));

        let error = pipeline
            .execute(&ApiRequest::get("users"))
            .await
            .unwrap_err();

        assert!(matches!(error, ApiError::Transport(HttpError::Connection(_))));
        assert_eq!(error.kind(), ErrorKind::Generic);
        assert!(error.to_string().contains("dns failure"));
        assert_eq!(client.calls(), 1);
    }
}

mod retries {
    use super::*;

    #[tokio::test]
    async fn rate_limits_then_success_on_last_attempt() {
        let body = json!({"object": "user", "id": "bot"});
        let client = ScriptedClient::new(vec![
            json_response(429, &error_body("rate_limited", "slow down")),
            json_response(429, &error_body("rate_limited", "slow down")),
            json_response(429, &error_body("rate_limited", "slow down")),
            json_response(200, &body),
        ]);
        let sleeper = Arc::new(RecordingSleeper::default());
        let pipeline = test_pipeline(Arc::clone(&client)).with_sleeper(Arc::clone(&sleeper));

        let value = pipeline.execute(&ApiRequest::get("users/me")).await.unwrap();

        assert_eq!(value, body);
        assert_eq!(client.calls(), 4);
        assert_eq!(
            sleeper.delays(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
    }

    #[tokio::test]
    async fn exhaustion_returns_last_error_after_max_attempts() {
        let client = ScriptedClient::new(vec![
            json_response(503, &error_body("service_unavailable", "first")),
            json_response(503, &error_body("service_unavailable", "second")),
            json_response(503, &error_body("service_unavailable", "third")),
        ]);
        let pipeline = test_pipeline(Arc::clone(&client))
            .with_retry_policy(RetryPolicy::new().with_max_retries(2));

        let error = pipeline
            .execute(&ApiRequest::get("users"))
            .await
            .unwrap_err();

        assert!(matches!(error, ApiError::ServiceUnavailable(_)));
        assert_eq!(error.details().unwrap().message, "third");
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn timeouts_are_retried() {
        let client = ScriptedClient::new(vec![
            Err(HttpError::Timeout),
            json_response(200, &json!({"ok": true})),
        ]);
        let pipeline = test_pipeline(Arc::clone(&client));

        let value = pipeline.execute(&ApiRequest::get("users")).await.unwrap();

        assert_eq!(value, json!({"ok": true}));
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn every_attempt_sends_the_same_request() {
        let client = ScriptedClient::new(vec![
            json_response(429, &json!({})),
            json_response(200, &json!({})),
        ]);
        let pipeline = test_pipeline(Arc::clone(&client));

        pipeline
            .execute(&ApiRequest::post("pages").with_payload(json!({"properties": {}})))
            .await
            .unwrap();

        let sent = client.captured_requests();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].url, sent[1].url);
        assert_eq!(sent[0].body, sent[1].body);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_call_cancels_pending_retries() {
        let client = ScriptedClient::new(
            (0..4)
                .map(|_| json_response(429, &json!({})))
                .collect(),
        );
        let pipeline = RequestPipeline::new(Arc::clone(&client), TEST_TOKEN).unwrap();

        // Attempts at t=0 and t=1s; the deadline hits during the 2s backoff.
        let result = tokio::time::timeout(
            Duration::from_millis(1500),
            pipeline.execute(&ApiRequest::get("users")),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(client.calls(), 2);

        tokio::time::advance(Duration::from_secs(60)).await;
        tokio::task::yield_now().await;
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn concurrent_calls_keep_independent_retry_state() {
        let client = ScriptedClient::new(vec![
            json_response(429, &json!({})),
            json_response(200, &json!({"n": 1})),
            json_response(200, &json!({"n": 2})),
        ]);
        let pipeline = test_pipeline(Arc::clone(&client));

        let users = ApiRequest::get("users");
        let me = ApiRequest::get("users/me");

        let (a, b) = tokio::join!(pipeline.execute(&users), pipeline.execute(&me));

        assert!(a.is_ok() && b.is_ok());
        assert_eq!(client.calls(), 3);
    }
}

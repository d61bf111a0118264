//! Tests for `ReqwestClient` against a local listener.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};

use super::*;

/// Serves a small fixture app on an ephemeral port.
async fn spawn_fixture() -> SocketAddr {
    let app = Router::new()
        .route(
            "/echo",
            post(|headers: HeaderMap, body: Bytes| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                (StatusCode::CREATED, [("x-echo-auth", auth)], body)
            }),
        )
        .route(
            "/limited",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, [("retry-after", "7")], "{}") }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn url(addr: SocketAddr, path: &str) -> url::Url {
    url::Url::parse(&format!("http://{addr}{path}")).unwrap()
}

mod construction {
    use super::*;

    #[test]
    fn default_creates_same_as_new() {
        let _ = format!("{:?}", ReqwestClient::new());
        let _ = format!("{:?}", ReqwestClient::default());
    }

    #[test]
    fn with_timeout_builds() {
        let client = ReqwestClient::with_timeout(Duration::from_secs(30)).unwrap();
        assert!(format!("{client:?}").contains("ReqwestClient"));
    }

    #[test]
    fn from_client_accepts_custom_client() {
        let custom = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .build()
            .unwrap();
        let _ = ReqwestClient::from_client(custom);
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReqwestClient>();
    }
}

mod dispatch {
    use super::*;

    #[tokio::test]
    async fn sends_headers_and_body() {
        let addr = spawn_fixture().await;
        let client = ReqwestClient::new();

        let request = HttpRequest::post(url(addr, "/echo"))
            .with_header(
                http::header::AUTHORIZATION,
                http::HeaderValue::from_static("Bearer secret_abc"),
            )
            .with_body(br#"{"hello":"world"}"#.to_vec());
        let response = client.request(request).await.unwrap();

        assert_eq!(response.status, http::StatusCode::CREATED);
        assert_eq!(
            response.header_str(&http::HeaderName::from_static("x-echo-auth")),
            Some("Bearer secret_abc")
        );
        assert_eq!(response.body, br#"{"hello":"world"}"#.to_vec());
    }

    #[tokio::test]
    async fn non_success_status_is_returned_as_data() {
        let addr = spawn_fixture().await;
        let client = ReqwestClient::new();

        let response = client
            .request(HttpRequest::get(url(addr, "/limited")))
            .await
            .unwrap();

        assert_eq!(response.status, http::StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.header_str(&http::header::RETRY_AFTER), Some("7"));
    }

    #[tokio::test]
    async fn slow_response_maps_to_timeout() {
        let addr = spawn_fixture().await;
        let client = ReqwestClient::with_timeout(Duration::from_millis(100)).unwrap();

        let result = client.request(HttpRequest::get(url(addr, "/slow"))).await;

        assert!(matches!(result, Err(HttpError::Timeout)));
    }

    #[tokio::test]
    async fn refused_connection_maps_to_connection_error() {
        // Bind and immediately release a port so nothing is listening on it.
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let client = ReqwestClient::new();

        let result = client.request(HttpRequest::get(url(addr, "/"))).await;

        assert!(matches!(result, Err(HttpError::Connection(_))));
    }
}

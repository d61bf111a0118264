//! The outbound request pipeline.
//!
//! [`RequestPipeline::execute`] is the single primitive every resource
//! operation is built on: it turns an [`ApiRequest`] into an HTTP call,
//! classifies failures into [`ApiError`] and retries the transient ones.

use http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use serde_json::Value;
use url::Url;

use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{HttpClient, HttpRequest};

use super::{ApiError, RetryPolicy};

/// Production base URL of the Notion API.
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// Pinned `Notion-Version` header value.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// Name of the API version header.
pub const NOTION_VERSION_HEADER: &str = "notion-version";

/// Description of one API call, built fresh for every invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    endpoint: String,
    payload: Option<Value>,
    query: Vec<(String, String)>,
}

impl ApiRequest {
    fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            payload: None,
            query: Vec::new(),
        }
    }

    /// A GET against `endpoint` (relative to the base URL).
    #[must_use]
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    /// A POST against `endpoint`.
    #[must_use]
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    /// A PATCH against `endpoint`.
    #[must_use]
    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    /// A DELETE against `endpoint`.
    #[must_use]
    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Endpoint as given, relative to the base URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// JSON body, if any.
    #[must_use]
    pub const fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Query parameters in insertion order.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}

/// Sends [`ApiRequest`]s to Notion with authentication, classification and retries.
///
/// # Type Parameters
///
/// - `H`: the HTTP transport, shared across all calls
/// - `S`: the sleeper used between retries (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use notion_gateway::notion::{ApiRequest, RequestPipeline};
/// use notion_gateway::transport::ReqwestClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pipeline = RequestPipeline::new(ReqwestClient::new(), "secret_token")?;
/// let me = pipeline.execute(&ApiRequest::get("users/me")).await?;
/// println!("{me}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RequestPipeline<H, S = TokioSleeper> {
    client: H,
    sleeper: S,
    base_url: String,
    headers: HeaderMap,
    retry_policy: RetryPolicy,
}

impl<H> RequestPipeline<H, TokioSleeper> {
    /// Creates a pipeline against the production base URL with the default
    /// retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidToken`] if the token cannot be sent as a
    /// header value.
    pub fn new(client: H, token: &str) -> Result<Self, ApiError> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ApiError::InvalidToken)?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(NOTION_VERSION_HEADER),
            HeaderValue::from_static(NOTION_API_VERSION),
        );

        Ok(Self {
            client,
            sleeper: TokioSleeper,
            base_url: DEFAULT_BASE_URL.to_string(),
            headers,
            retry_policy: RetryPolicy::default(),
        })
    }
}

impl<H, S> RequestPipeline<H, S> {
    /// Sets a custom sleeper for retry delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RequestPipeline<H, S2> {
        RequestPipeline {
            client: self.client,
            sleeper,
            base_url: self.base_url,
            headers: self.headers,
            retry_policy: self.retry_policy,
        }
    }

    /// Points the pipeline at another base URL (e.g. a local stub).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &Url) -> Self {
        self.base_url = base_url.as_str().trim_end_matches('/').to_string();
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Headers attached to every request.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Resolves the endpoint against the base URL and appends the query.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidEndpoint`] if the result is not a valid URL.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.base_url,
            request.endpoint.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined).map_err(|e| ApiError::InvalidEndpoint {
            endpoint: request.endpoint.clone(),
            reason: e.to_string(),
        })?;

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    /// Builds the HTTP request for one attempt.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidEndpoint`] or [`ApiError::Serialization`].
    pub fn build_request(&self, request: &ApiRequest) -> Result<HttpRequest, ApiError> {
        let url = self.url_for(request)?;
        let mut http_request =
            HttpRequest::new(request.method.clone(), url).with_headers(self.headers.clone());

        if let Some(payload) = &request.payload {
            let body = serde_json::to_vec(payload).map_err(ApiError::Serialization)?;
            http_request = http_request.with_body(body);
        }

        Ok(http_request)
    }
}

impl<H: HttpClient, S: Sleeper> RequestPipeline<H, S> {
    /// Executes the request, retrying transient failures.
    ///
    /// Returns the 2xx body exactly as received. An empty 2xx body is
    /// returned as [`Value::Null`].
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the last attempt. Non-retryable errors
    /// are returned after a single attempt.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let http_request = &self.build_request(request)?;
        let operation = format!("{} {}", request.method, request.endpoint);

        self.retry_policy
            .run(&self.sleeper, &operation, move || self.attempt(http_request))
            .await
    }

    /// Makes exactly one network call and classifies the outcome.
    async fn attempt(&self, request: &HttpRequest) -> Result<Value, ApiError> {
        let response = match self.client.request(request.clone()).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    method = %request.method,
                    url = %request.url,
                    error = %e,
                    "HTTP request to Notion API failed"
                );
                return Err(ApiError::Transport(e));
            }
        };

        if !response.is_success() {
            let error = ApiError::from_response(response.status, &response.headers, &response.body);
            tracing::error!(
                method = %request.method,
                url = %request.url,
                status = response.status.as_u16(),
                code = error.code().unwrap_or_default(),
                error = %error,
                "Notion API request failed"
            );
            return Err(error);
        }

        if response.body.is_empty() {
            return Ok(Value::Null);
        }
        response.decode().map_err(ApiError::Deserialization)
    }
}

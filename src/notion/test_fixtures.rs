//! Shared test fixtures for Notion client tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use crate::time::{InstantSleeper, Sleeper};
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};

use super::{NotionClient, RequestPipeline};

pub const TEST_TOKEN: &str = "secret_test_token";

/// Mock HTTP client that replays a scripted sequence of outcomes and
/// captures every request it receives.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedClient {
    pub fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// A client whose single response is `status` with a JSON body.
    pub fn replying(status: u16, body: &Value) -> Arc<Self> {
        Self::new(vec![json_response(status, body)])
    }

    /// Number of requests made so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was made")
    }
}

impl HttpClient for ScriptedClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted response left")
    }
}

/// Sleeper that returns immediately and remembers each requested delay.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

pub fn json_response(status: u16, body: &Value) -> Result<HttpResponse, HttpError> {
    Ok(HttpResponse::json(
        http::StatusCode::from_u16(status).unwrap(),
        body,
    ))
}

pub fn error_body(code: &str, message: &str) -> Value {
    serde_json::json!({"object": "error", "status": 0, "code": code, "message": message})
}

pub fn test_pipeline(client: Arc<ScriptedClient>) -> RequestPipeline<Arc<ScriptedClient>, InstantSleeper> {
    RequestPipeline::new(client, TEST_TOKEN)
        .unwrap()
        .with_sleeper(InstantSleeper)
}

pub fn test_client(client: Arc<ScriptedClient>) -> NotionClient<Arc<ScriptedClient>, InstantSleeper> {
    NotionClient::new(test_pipeline(client))
}

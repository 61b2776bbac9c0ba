//! A recording [`HttpTransport`] for integration tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use cloudsearch_client::{
    CloudSearchClient, CloudSearchConfig, HttpResponse, HttpTransport, TransportError,
};

/// HTTP method of a recorded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A request seen by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Parses the request body as JSON.
    pub fn json_body(&self) -> Value {
        let body = self.body.as_deref().expect("request has no body");
        serde_json::from_str(body).expect("request body is not JSON")
    }

    /// Looks up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Replays queued responses and records every request.
///
/// When the queue is empty, requests get `200 {}`.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues a response with the given status and body.
    pub fn respond(&self, status: u16, body: Value) {
        self.responses
            .lock()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    /// Queues a transport failure.
    pub fn fail(&self, error: TransportError) {
        self.responses.lock().push_back(Err(error));
    }

    /// All requests seen so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// The single request seen so far.
    pub fn only_request(&self) -> RecordedRequest {
        let requests = self.requests.lock();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests[0].clone()
    }

    fn next(&self, request: RecordedRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(200, Value::Object(Default::default()))))
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.next(RecordedRequest {
            method: Method::Get,
            url: url.to_string(),
            body: None,
            headers: Vec::new(),
        })
    }

    async fn post(
        &self,
        url: &str,
        body: String,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, TransportError> {
        self.next(RecordedRequest {
            method: Method::Post,
            url: url.to_string(),
            body: Some(body),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
    }
}

/// Creates a client wired to a fresh [`MockTransport`].
pub fn mock_client(config: CloudSearchConfig) -> (CloudSearchClient, Arc<MockTransport>) {
    let transport = MockTransport::new();
    let client = CloudSearchClient::with_transport(config, transport.clone());
    (client, transport)
}

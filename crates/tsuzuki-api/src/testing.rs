//! Scripted in-memory [`Transport`] that records every request.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use crate::traits::{HttpResponse, Transport, TransportError};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// GraphQL `variables` of a POST body.
    pub fn variables(&self) -> &Value {
        self.body
            .as_ref()
            .and_then(|b| b.get("variables"))
            .unwrap_or(&Value::Null)
    }
}

/// Answers requests with queued responses in FIFO order. Once the queue is
/// drained every request gets a bodiless 500.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: Value) -> Self {
        self.push_response(status, body);
        self
    }

    pub fn push_response(&self, status: u16, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(HttpResponse { status, body });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn answer(&self, request: RecordedRequest) -> HttpResponse {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(HttpResponse {
                status: 500,
                body: Value::Null,
            })
    }
}

impl Transport for RecordingTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &Value,
    ) -> Result<HttpResponse, TransportError> {
        Ok(self.answer(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: Some(body.clone()),
        }))
    }

    async fn get_json(&self, url: &str) -> Result<HttpResponse, TransportError> {
        Ok(self.answer(RecordedRequest {
            method: "GET",
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        }))
    }
}

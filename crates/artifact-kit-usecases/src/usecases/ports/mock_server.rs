//! Mock HTTP server port.

use std::time::Duration;

use crate::usecases::ports::errors::MockServerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl MockResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A request the mock server received, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the query string.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

pub trait MockServer: Send + Sync {
    /// Starts listening on `port` (0 picks a free port); returns the bound port.
    fn start(&self, port: u16) -> Result<u16, MockServerError>;

    /// Idempotent.
    fn stop(&self) -> Result<(), MockServerError>;

    fn port(&self) -> Option<u16>;

    /// Responses are served in FIFO order.
    fn enqueue(&self, response: MockResponse) -> Result<(), MockServerError>;

    fn take_request(&self, timeout: Duration) -> Result<RecordedRequest, MockServerError>;
}

#![allow(dead_code, reason = "Test helpers are used selectively.")]

//! Shared helpers for the integration tests.

use std::io::Read;
use std::io::Write;
use std::net::TcpStream;
use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;

use artifact_kit::ArtifactKit;
use artifact_kit::common::init_tracing;
use artifact_kit::domain::CompareMode;
use serde::Deserialize;
use serde::Serialize;

static TRACING: Once = Once::new();

pub fn init_test_tracing() {
    TRACING.call_once(|| {
        // The subscriber lives for the whole test binary.
        std::mem::forget(init_tracing("warn"));
    });
}

pub fn resources_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/resources")
}

/// Kit over `tests/resources` with settings pinned so the environment
/// cannot change test outcomes.
pub fn kit() -> ArtifactKit {
    init_test_tracing();
    ArtifactKit::builder()
        .resource_root(resources_dir())
        .compare_mode(CompareMode::Exact)
        .pretty_json(false)
        .take_request_timeout(Duration::from_secs(5))
        .build()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestData {
    pub id: String,
    pub content: String,
}

impl TestData {
    pub fn new(id: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            content: content.to_string(),
        }
    }
}

/// Minimal HTTP/1.1 client; returns the raw response text.
pub fn send(port: u16, method: &str, path: &str, body: &str) -> String {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(request.as_bytes()).unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

pub fn status_line(response: &str) -> &str {
    response.lines().next().unwrap_or_default()
}

pub fn response_body(response: &str) -> &str {
    response
        .split_once("\r\n\r\n")
        .map(|(_, body)| body)
        .unwrap_or_default()
}

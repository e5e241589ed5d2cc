//! Mock HTTP server on a tokio runtime owned by a dedicated thread.
//!
//! The listener is bound synchronously so the port is known when `start`
//! returns. Every request is answered with the next enqueued response (404
//! when the queue is empty) and recorded for `take_request`.

use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::response::Response;
use crossbeam_channel::Receiver;
use crossbeam_channel::RecvTimeoutError;
use crossbeam_channel::Sender;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::common::mutex_lock_or_recover;
use crate::usecases::ports::MockResponse;
use crate::usecases::ports::MockServer;
use crate::usecases::ports::MockServerError;
use crate::usecases::ports::RecordedRequest;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

struct Shared {
    responses: Mutex<VecDeque<MockResponse>>,
    requests_tx: Sender<RecordedRequest>,
}

struct Running {
    port: u16,
    shutdown_tx: watch::Sender<bool>,
    join: thread::JoinHandle<()>,
}

pub struct HttpMockServer {
    shared: Arc<Shared>,
    requests_rx: Receiver<RecordedRequest>,
    running: Mutex<Option<Running>>,
}

impl Default for HttpMockServer {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpMockServer {
    pub fn new() -> Self {
        let (requests_tx, requests_rx) = crossbeam_channel::unbounded();
        Self {
            shared: Arc::new(Shared {
                responses: Mutex::new(VecDeque::new()),
                requests_tx,
            }),
            requests_rx,
            running: Mutex::new(None),
        }
    }

    /// Responses still waiting to be served.
    pub fn pending_responses(&self) -> usize {
        mutex_lock_or_recover(&self.shared.responses).len()
    }

    fn reset(&self) {
        mutex_lock_or_recover(&self.shared.responses).clear();
        let dropped = self.requests_rx.try_iter().count();
        if dropped > 0 {
            debug!(dropped, "Discarded untaken mock server requests");
        }
    }
}

impl MockServer for HttpMockServer {
    fn start(&self, port: u16) -> Result<u16, MockServerError> {
        let mut running = mutex_lock_or_recover(&self.running);
        if let Some(current) = running.as_ref() {
            return Err(MockServerError::AlreadyStarted { port: current.port });
        }

        let (listener, local_addr) = bind_listener(port)?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<(), String>>(1);
        let shared = Arc::clone(&self.shared);

        let join = thread::Builder::new()
            .name(format!("artifact-kit-mock-server-{}", local_addr.port()))
            .spawn(move || run_server(listener, shared, shutdown_rx, ready_tx))
            .map_err(|e| MockServerError::Runtime(format!("failed to spawn server thread: {e}")))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(reason)) => {
                let _ = join.join();
                return Err(MockServerError::Runtime(reason));
            }
            Err(_) => {
                let _ = join.join();
                return Err(MockServerError::Runtime(
                    "server thread exited before it was ready".to_string(),
                ));
            }
        }

        info!(port = local_addr.port(), "Mock server listening");
        *running = Some(Running {
            port: local_addr.port(),
            shutdown_tx,
            join,
        });
        Ok(local_addr.port())
    }

    fn stop(&self) -> Result<(), MockServerError> {
        let Some(running) = mutex_lock_or_recover(&self.running).take() else {
            return Ok(());
        };
        let _ = running.shutdown_tx.send(true);

        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        let join = running.join;
        let _ = thread::Builder::new()
            .name("artifact-kit-mock-server-shutdown".to_string())
            .spawn(move || {
                let _ = join.join();
                let _ = done_tx.send(());
            });
        if done_rx.recv_timeout(SHUTDOWN_TIMEOUT).is_err() {
            warn!(
                port = running.port,
                timeout_ms = SHUTDOWN_TIMEOUT.as_millis() as u64,
                "Mock server did not stop within shutdown timeout"
            );
        }

        self.reset();
        info!(port = running.port, "Mock server stopped");
        Ok(())
    }

    fn port(&self) -> Option<u16> {
        mutex_lock_or_recover(&self.running)
            .as_ref()
            .map(|running| running.port)
    }

    fn enqueue(&self, response: MockResponse) -> Result<(), MockServerError> {
        debug!(status = response.status, bytes = response.body.len(), "Enqueued mock response");
        mutex_lock_or_recover(&self.shared.responses).push_back(response);
        Ok(())
    }

    fn take_request(&self, timeout: Duration) -> Result<RecordedRequest, MockServerError> {
        if self.port().is_none() {
            return Err(MockServerError::NotStarted);
        }
        match self.requests_rx.recv_timeout(timeout) {
            Ok(request) => Ok(request),
            Err(RecvTimeoutError::Timeout) => Err(MockServerError::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
            Err(RecvTimeoutError::Disconnected) => Err(MockServerError::Runtime(
                "request channel closed".to_string(),
            )),
        }
    }
}

impl Drop for HttpMockServer {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

fn bind_listener(port: u16) -> Result<(std::net::TcpListener, SocketAddr), MockServerError> {
    let bind_error = |e: std::io::Error| MockServerError::Bind {
        port,
        reason: e.to_string(),
    };
    let listener =
        std::net::TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, port))).map_err(bind_error)?;
    listener.set_nonblocking(true).map_err(bind_error)?;
    let local_addr = listener.local_addr().map_err(bind_error)?;
    Ok((listener, local_addr))
}

fn run_server(
    listener: std::net::TcpListener,
    shared: Arc<Shared>,
    mut shutdown_rx: watch::Receiver<bool>,
    ready_tx: Sender<Result<(), String>>,
) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build();
    let runtime = match runtime {
        Ok(rt) => rt,
        Err(err) => {
            error!(error = %err, "Failed to build mock server runtime");
            let _ = ready_tx.send(Err(format!("failed to build runtime: {err}")));
            return;
        }
    };

    runtime.block_on(async move {
        let listener = match TcpListener::from_std(listener) {
            Ok(l) => l,
            Err(err) => {
                error!(error = %err, "Failed to create async listener");
                let _ = ready_tx.send(Err(format!("failed to create async listener: {err}")));
                return;
            }
        };
        let app = Router::new().fallback(respond).with_state(shared);
        let _ = ready_tx.send(Ok(()));

        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        });
        if let Err(err) = server.await {
            error!(error = %err, "Mock server failed");
        }
    });
}

async fn respond(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path_and_query()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let recorded = RecordedRequest {
        method: method.to_string(),
        path,
        headers: headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect(),
        body: body.to_vec(),
    };
    debug!(method = %recorded.method, path = %recorded.path, "Mock server received request");

    let next = mutex_lock_or_recover(&shared.responses).pop_front();
    let _ = shared.requests_tx.send(recorded);

    match next {
        Some(response) => build_response(response),
        None => {
            warn!(method = %method, uri = %uri, "No mock response enqueued; answering 404");
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::NOT_FOUND;
            response
        }
    }
}

fn build_response(mock: MockResponse) -> Response {
    let status = StatusCode::from_u16(mock.status).unwrap_or_else(|_| {
        warn!(status = mock.status, "Invalid mock response status; answering 500");
        StatusCode::INTERNAL_SERVER_ERROR
    });
    let mut response = Response::new(Body::from(mock.body));
    *response.status_mut() = status;
    for (name, value) in mock.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().append(name, value);
            }
            _ => warn!(header = %name, "Skipping invalid mock response header"),
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::io::Write;
    use std::net::TcpStream;

    fn send(port: u16, method: &str, path: &str, body: &str) -> String {
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

    #[test]
    fn test_serves_enqueued_responses_in_order() {
        let server = HttpMockServer::new();
        let port = server.start(0).unwrap();
        assert_ne!(port, 0);
        server
            .enqueue(MockResponse::new(200, r#"{"n":1}"#).header("Content-Type", "application/json"))
            .unwrap();
        server.enqueue(MockResponse::new(201, r#"{"n":2}"#)).unwrap();

        let first = send(port, "GET", "/items?page=1", "");
        let second = send(port, "POST", "/items", r#"{"name":"x"}"#);

        assert!(first.starts_with("HTTP/1.1 200"));
        assert!(first.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(first.ends_with(r#"{"n":1}"#));
        assert!(second.starts_with("HTTP/1.1 201"));
        assert_eq!(server.pending_responses(), 0);

        let recorded = server.take_request(Duration::from_secs(1)).unwrap();
        assert_eq!(recorded.method, "GET");
        assert_eq!(recorded.path, "/items?page=1");
        let recorded = server.take_request(Duration::from_secs(1)).unwrap();
        assert_eq!(recorded.method, "POST");
        assert_eq!(recorded.body_text(), Some(r#"{"name":"x"}"#));
        assert_eq!(recorded.header("content-type"), Some("application/json"));

        server.stop().unwrap();
    }

    #[test]
    fn test_empty_queue_answers_not_found() {
        let server = HttpMockServer::new();
        let port = server.start(0).unwrap();

        let response = send(port, "GET", "/", "");

        assert!(response.starts_with("HTTP/1.1 404"));
        assert!(server.take_request(Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn test_take_request_times_out() {
        let server = HttpMockServer::new();
        server.start(0).unwrap();
        assert_eq!(
            server.take_request(Duration::from_millis(20)),
            Err(MockServerError::Timeout { timeout_ms: 20 })
        );
    }

    #[test]
    fn test_lifecycle_errors() {
        let server = HttpMockServer::new();
        assert_eq!(
            server.take_request(Duration::from_millis(1)),
            Err(MockServerError::NotStarted)
        );
        assert_eq!(server.port(), None);

        let port = server.start(0).unwrap();
        assert_eq!(server.port(), Some(port));
        assert_eq!(
            server.start(0),
            Err(MockServerError::AlreadyStarted { port })
        );

        server.stop().unwrap();
        server.stop().unwrap();
        assert_eq!(server.port(), None);
    }

    #[test]
    fn test_restart_discards_previous_state() {
        let server = HttpMockServer::new();
        server.start(0).unwrap();
        server.enqueue(MockResponse::new(200, "stale")).unwrap();
        server.stop().unwrap();
        assert_eq!(server.pending_responses(), 0);

        let port = server.start(0).unwrap();
        let response = send(port, "GET", "/", "");
        assert!(response.starts_with("HTTP/1.1 404"));
    }

    #[test]
    fn test_occupied_port_is_bind_error() {
        let blocker = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = blocker.local_addr().unwrap().port();
        let server = HttpMockServer::new();
        assert!(matches!(
            server.start(port),
            Err(MockServerError::Bind { .. })
        ));
    }
}

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::common::mutex_lock_or_recover;
use crate::usecases::ports::MockResponse;
use crate::usecases::ports::MockServer;
use crate::usecases::ports::MockServerError;
use crate::usecases::ports::RecordedRequest;

const EPHEMERAL_PORT: u16 = 49152;

#[derive(Default)]
struct DoubleState {
    port: Option<u16>,
    queued: Vec<MockResponse>,
    requests: VecDeque<RecordedRequest>,
    starts: usize,
}

/// In-process mock server: nothing listens; requests are pushed by the test.
#[derive(Default)]
pub struct MockServerDouble {
    state: Mutex<DoubleState>,
}

impl MockServerDouble {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_request(&self, request: RecordedRequest) {
        mutex_lock_or_recover(&self.state).requests.push_back(request);
    }

    pub fn queued(&self) -> Vec<MockResponse> {
        mutex_lock_or_recover(&self.state).queued.clone()
    }

    pub fn start_count(&self) -> usize {
        mutex_lock_or_recover(&self.state).starts
    }
}

impl MockServer for MockServerDouble {
    fn start(&self, port: u16) -> Result<u16, MockServerError> {
        let mut state = mutex_lock_or_recover(&self.state);
        if let Some(port) = state.port {
            return Err(MockServerError::AlreadyStarted { port });
        }
        let bound = if port == 0 { EPHEMERAL_PORT } else { port };
        state.port = Some(bound);
        state.starts += 1;
        Ok(bound)
    }

    fn stop(&self) -> Result<(), MockServerError> {
        let mut state = mutex_lock_or_recover(&self.state);
        state.port = None;
        state.queued.clear();
        state.requests.clear();
        Ok(())
    }

    fn port(&self) -> Option<u16> {
        mutex_lock_or_recover(&self.state).port
    }

    fn enqueue(&self, response: MockResponse) -> Result<(), MockServerError> {
        mutex_lock_or_recover(&self.state).queued.push(response);
        Ok(())
    }

    fn take_request(&self, timeout: Duration) -> Result<RecordedRequest, MockServerError> {
        let mut state = mutex_lock_or_recover(&self.state);
        if state.port.is_none() {
            return Err(MockServerError::NotStarted);
        }
        state
            .requests
            .pop_front()
            .ok_or(MockServerError::Timeout {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            })
    }
}

//! Per-test tracing scope for the lifecycle layers.
//!
//! Inner layers log through these helpers so that every event emitted while a
//! test runs carries the suite and test case it belongs to.

use std::fmt::Display;

use tracing::Span;
use tracing::info_span;
use tracing::warn;

const UNBOUND_SUITE: &str = "<unbound>";

/// Span entered around one test method's `before_each`, body and `after_each`.
#[derive(Debug, Clone)]
pub struct TestSpan(Span);

impl TestSpan {
    pub fn new(suite: Option<&str>, test_case: &str, method: &str) -> Self {
        Self(info_span!(
            "fixture_test",
            suite = suite.unwrap_or(UNBOUND_SUITE),
            test_case,
            method
        ))
    }

    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        self.0.in_scope(f)
    }
}

/// A best-effort teardown step failed; the caller keeps unwinding and
/// reports the error that triggered the teardown instead.
pub fn log_cleanup_failure(step: &'static str, component: &str, error: &dyn Display) {
    warn!(
        step,
        component,
        error = %error,
        "Cleanup failed while unwinding a failed test setup"
    );
}

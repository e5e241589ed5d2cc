use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::CompareMode;
use crate::domain::ConfigurationError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Failed to decode {target} at line {line}, column {column}: {message}")]
    Decode {
        target: String,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("Failed to decode {target}: {reason}")]
    Utf8 { target: String, reason: String },
    #[error("Failed to encode value: {message}")]
    Encode { message: String },
}

impl CodecError {
    pub fn operation(&self) -> &'static str {
        match self {
            CodecError::Decode { .. } | CodecError::Utf8 { .. } => "decode",
            CodecError::Encode { .. } => "encode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifferenceReason {
    MissingKey,
    UnexpectedKey,
    ValueMismatch,
    TypeMismatch,
    LengthMismatch,
}

impl DifferenceReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DifferenceReason::MissingKey => "missing key",
            DifferenceReason::UnexpectedKey => "unexpected key",
            DifferenceReason::ValueMismatch => "value mismatch",
            DifferenceReason::TypeMismatch => "type mismatch",
            DifferenceReason::LengthMismatch => "array length mismatch",
        }
    }
}

/// One structural difference, located by JSON pointer (`""` is the root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    pub path: String,
    pub reason: DifferenceReason,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{path}: {}", self.reason.as_str())?;
        match (&self.expected, &self.actual) {
            (Some(expected), Some(actual)) => write!(f, " (expected {expected}, got {actual})"),
            (Some(expected), None) => write!(f, " (expected {expected})"),
            (None, Some(actual)) => write!(f, " (got {actual})"),
            (None, None) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    pub mode: CompareMode,
    pub expected: String,
    pub actual: String,
    pub differences: Vec<Difference>,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JSON mismatch ({} mode, {} difference(s))",
            self.mode,
            self.differences.len()
        )?;
        for difference in &self.differences {
            write!(f, "\n  {difference}")?;
        }
        write!(f, "\nexpected: {}\nactual:   {}", self.expected, self.actual)
    }
}

impl std::error::Error for AssertionFailure {}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MockServerError {
    #[error("Mock server is not running")]
    NotStarted,
    #[error("Mock server already running on port {port}")]
    AlreadyStarted { port: u16 },
    #[error("Failed to bind mock server on port {port}: {reason}")]
    Bind { port: u16, reason: String },
    #[error("No request received within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("Mock server runtime failure: {0}")]
    Runtime(String),
}

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("{what} not found: {location}")]
    NotFound { what: &'static str, location: String },
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("{0}")]
    Assertion(#[from] AssertionFailure),
    #[error("Illegal state: {0}")]
    IllegalState(String),
    #[error("I/O error during {operation} of {}: {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Mock server error: {0}")]
    MockServer(#[from] MockServerError),
}

impl FixtureError {
    pub fn kind(&self) -> &'static str {
        match self {
            FixtureError::Configuration(_) => "configuration",
            FixtureError::NotFound { .. } => "not_found",
            FixtureError::Codec(_) => "codec",
            FixtureError::Assertion(_) => "assertion",
            FixtureError::IllegalState(_) => "illegal_state",
            FixtureError::Io { .. } => "io",
            FixtureError::MockServer(_) => "mock_server",
        }
    }

    /// Fixture failures are deterministic; nothing is retried.
    pub fn is_retryable(&self) -> bool {
        false
    }

    pub fn suggestion(&self) -> Option<String> {
        match self {
            FixtureError::Configuration(err) => Some(err.suggestion()),
            FixtureError::NotFound { .. } => Some(
                "Check the resource roots and the suite/test_case/kind/name layout.".to_string(),
            ),
            FixtureError::IllegalState(_) => Some(
                "Bind a suite first: run the test through a LifecycleBinder or call set_suite."
                    .to_string(),
            ),
            FixtureError::MockServer(MockServerError::NotStarted) => {
                Some("Start the mock server before using it.".to_string())
            }
            _ => None,
        }
    }

    pub(crate) fn suite_not_set() -> Self {
        FixtureError::IllegalState("Suite property is not set".to_string())
    }
}

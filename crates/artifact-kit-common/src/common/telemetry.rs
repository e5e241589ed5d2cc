#![expect(clippy::print_stderr, reason = "Tracing not initialized yet")]

//! Tracing setup for test binaries.
//!
//! Without `ARTIFACT_KIT_LOG`, events go through libtest's captured writer, so
//! fixture and mock-server logs only show up for failing tests (or with
//! `--nocapture`). Later calls are no-ops that return a disabled guard.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::writer::TestWriter;

pub const LOG_FILE_ENV: &str = "ARTIFACT_KIT_LOG";
pub const LOG_FORMAT_ENV: &str = "ARTIFACT_KIT_LOG_FORMAT";

#[derive(Debug)]
pub struct TelemetryGuard {
    _guard: Option<WorkerGuard>,
    installed: bool,
}

impl TelemetryGuard {
    fn disabled() -> Self {
        Self {
            _guard: None,
            installed: false,
        }
    }

    /// Whether this call installed the global subscriber.
    pub fn is_installed(&self) -> bool {
        self.installed
    }
}

pub fn init_tracing(default_level: &str) -> TelemetryGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let log_format = log_format_from_env();
    let (writer, guard) = match log_file_path_from_env() {
        Some(path) => match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            Ok(file) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file);
                (BoxMakeWriter::new(non_blocking), Some(guard))
            }
            Err(err) => {
                eprintln!(
                    "Warning: failed to open fixture log {}: {}",
                    path.display(),
                    err
                );
                (BoxMakeWriter::new(TestWriter::default()), None)
            }
        },
        None => (BoxMakeWriter::new(TestWriter::default()), None),
    };

    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = match log_format {
        LogFormat::Json => Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(true)
                .with_ansi(false)
                .json()
                .with_writer(writer)
                .finish(),
        ),
        LogFormat::Text => Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_thread_names(true)
                .with_ansi(false)
                .with_writer(writer)
                .finish(),
        ),
    };

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return TelemetryGuard::disabled();
    }

    TelemetryGuard {
        _guard: guard,
        installed: true,
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn log_file_path_from_env() -> Option<PathBuf> {
    env_value(LOG_FILE_ENV).map(PathBuf::from)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

fn log_format_from_env() -> LogFormat {
    match env_value(LOG_FORMAT_ENV) {
        Some(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
        _ => LogFormat::Text,
    }
}

mod sync;
pub mod telemetry;
mod test_scope;

pub use sync::mutex_lock_or_recover;
pub use sync::rwlock_read_or_recover;
pub use sync::rwlock_write_or_recover;
pub use telemetry::TelemetryGuard;
pub use telemetry::init_tracing;
pub use test_scope::TestSpan;
pub use test_scope::log_cleanup_failure;

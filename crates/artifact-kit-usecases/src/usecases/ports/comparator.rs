//! Structural JSON comparison port.

use crate::domain::CompareMode;
use crate::usecases::ports::errors::FixtureError;

pub trait JsonComparator: Send + Sync {
    /// `Ok(())` when `actual` matches `expected` under `mode`; otherwise
    /// an assertion failure listing every difference, or a codec error when
    /// either side is not valid JSON.
    fn compare(&self, expected: &str, actual: &str, mode: CompareMode)
    -> Result<(), FixtureError>;
}

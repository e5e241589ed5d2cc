//! Resource lookup port.

use std::path::Path;
use std::path::PathBuf;

use crate::usecases::ports::errors::FixtureError;

pub trait ResourceRoot: Send + Sync {
    /// Directory that holds the suite's fixtures.
    fn locate(&self, suite: &str) -> Result<PathBuf, FixtureError>;

    fn read(&self, path: &Path) -> Result<Vec<u8>, FixtureError>;
}

use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::common::mutex_lock_or_recover;
use crate::usecases::ports::FixtureError;
use crate::usecases::ports::ResourceRoot;

/// Resource root backed by a map of paths below [`InMemoryResources::root`].
#[derive(Default)]
pub struct InMemoryResources {
    suites: HashSet<String>,
    files: HashMap<PathBuf, Vec<u8>>,
    locate_calls: Mutex<Vec<String>>,
}

impl InMemoryResources {
    pub fn root() -> PathBuf {
        PathBuf::from("/fixtures")
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suite(mut self, suite: &str) -> Self {
        self.suites.insert(suite.to_string());
        self
    }

    pub fn with_artifact(
        self,
        suite: &str,
        test_case: &str,
        kind: &str,
        name: &str,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        let mut resources = self.with_suite(suite);
        let path = Self::root()
            .join(suite)
            .join(test_case)
            .join(kind)
            .join(name);
        resources.files.insert(path, content.into());
        resources
    }

    pub fn locate_calls(&self) -> Vec<String> {
        mutex_lock_or_recover(&self.locate_calls).clone()
    }
}

impl ResourceRoot for InMemoryResources {
    fn locate(&self, suite: &str) -> Result<PathBuf, FixtureError> {
        mutex_lock_or_recover(&self.locate_calls).push(suite.to_string());
        if self.suites.contains(suite) {
            Ok(Self::root().join(suite))
        } else {
            Err(FixtureError::NotFound {
                what: "suite resource root",
                location: suite.to_string(),
            })
        }
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, FixtureError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FixtureError::NotFound {
                what: "artifact",
                location: path.display().to_string(),
            })
    }
}

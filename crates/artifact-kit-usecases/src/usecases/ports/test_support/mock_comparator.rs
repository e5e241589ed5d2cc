use std::sync::Mutex;

use crate::common::mutex_lock_or_recover;
use crate::domain::CompareMode;
use crate::usecases::ports::AssertionFailure;
use crate::usecases::ports::FixtureError;
use crate::usecases::ports::JsonComparator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonCall {
    pub expected: String,
    pub actual: String,
    pub mode: CompareMode,
}

/// Records every comparison; accepts all of them unless built `failing`.
#[derive(Default)]
pub struct MockComparator {
    calls: Mutex<Vec<ComparisonCall>>,
    fail: bool,
}

impl MockComparator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ComparisonCall> {
        mutex_lock_or_recover(&self.calls).clone()
    }
}

impl JsonComparator for MockComparator {
    fn compare(
        &self,
        expected: &str,
        actual: &str,
        mode: CompareMode,
    ) -> Result<(), FixtureError> {
        mutex_lock_or_recover(&self.calls).push(ComparisonCall {
            expected: expected.to_string(),
            actual: actual.to_string(),
            mode,
        });
        if self.fail {
            Err(FixtureError::Assertion(AssertionFailure {
                mode,
                expected: expected.to_string(),
                actual: actual.to_string(),
                differences: Vec::new(),
            }))
        } else {
            Ok(())
        }
    }
}

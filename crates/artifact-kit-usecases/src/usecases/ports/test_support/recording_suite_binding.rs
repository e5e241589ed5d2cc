use std::sync::Mutex;

use crate::common::mutex_lock_or_recover;
use crate::usecases::ports::SuiteBinding;

#[derive(Default)]
pub struct RecordingSuiteBinding {
    suite: Mutex<Option<String>>,
    binds: Mutex<usize>,
}

impl RecordingSuiteBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_count(&self) -> usize {
        *mutex_lock_or_recover(&self.binds)
    }
}

impl SuiteBinding for RecordingSuiteBinding {
    fn bound_suite(&self) -> Option<String> {
        mutex_lock_or_recover(&self.suite).clone()
    }

    fn bind_suite(&self, suite: Option<&str>) {
        *mutex_lock_or_recover(&self.binds) += 1;
        *mutex_lock_or_recover(&self.suite) = suite.map(str::to_string);
    }
}

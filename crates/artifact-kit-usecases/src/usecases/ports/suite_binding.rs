//! Target of suite binding: anything that reads fixtures for a test class.

pub trait SuiteBinding: Send + Sync {
    fn bound_suite(&self) -> Option<String>;

    fn bind_suite(&self, suite: Option<&str>);
}

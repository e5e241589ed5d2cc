use std::fmt;

/// Hierarchical namespace of a test class's fixtures (`service/impl/SampleTest`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Suite(String);

impl Suite {
    /// `None` for blank input; a blank suite is never usable.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn nested(prefix: &str, class_name: &str) -> Self {
        Self(format!("{prefix}/{class_name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Suite {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

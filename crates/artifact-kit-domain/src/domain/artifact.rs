//! Artifact addressing: `suite/testCase/artifactKind/artifactName`.

use std::fmt;
use std::path::PathBuf;

use crate::domain::type_descriptor::TypeDescriptor;

pub const ARTIFACT_EXTENSION: &str = "json";

/// Role of a fixture within a test case. Open set; used verbatim as a path
/// segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKind(String);

impl ArtifactKind {
    pub const INPUT: &'static str = "input";
    pub const EXPECTED: &'static str = "expected";

    pub fn input() -> Self {
        Self(Self::INPUT.to_string())
    }

    pub fn expected() -> Self {
        Self(Self::EXPECTED.to_string())
    }

    pub fn custom(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ArtifactKind {
    fn default() -> Self {
        Self::input()
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArtifactKind {
    fn from(kind: &str) -> Self {
        Self(kind.to_string())
    }
}

impl From<String> for ArtifactKind {
    fn from(kind: String) -> Self {
        Self(kind)
    }
}

/// `{SimpleName}.json`
pub fn default_artifact_name(descriptor: &TypeDescriptor) -> String {
    format!("{}.{ARTIFACT_EXTENSION}", descriptor.simple_name())
}

pub fn artifact_file_name<T: ?Sized>() -> String {
    default_artifact_name(&TypeDescriptor::of::<T>())
}

/// Identifies exactly one JSON resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Artifact {
    pub suite: String,
    pub test_case: String,
    pub kind: ArtifactKind,
    pub name: String,
}

impl Artifact {
    pub fn new(
        suite: impl Into<String>,
        test_case: impl Into<String>,
        kind: impl Into<ArtifactKind>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            suite: suite.into(),
            test_case: test_case.into(),
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Path below the suite's resource root: `testCase/kind/name`.
    pub fn path_in_suite(&self) -> PathBuf {
        [
            self.test_case.as_str(),
            self.kind.as_str(),
            self.name.as_str(),
        ]
        .iter()
        .collect()
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.suite, self.test_case, self.kind, self.name
        )
    }
}

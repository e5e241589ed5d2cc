//! Fixture addressing model: who a test is, which artifact it wants, and
//! how the artifact's type is named.

pub mod artifact;
pub mod compare_mode;
pub mod error;
pub mod metadata;
pub mod suite;
pub mod type_descriptor;

pub use artifact::Artifact;
pub use artifact::ArtifactKind;
pub use artifact::artifact_file_name;
pub use artifact::default_artifact_name;
pub use compare_mode::CompareMode;
pub use error::ConfigurationError;
pub use metadata::ClassMetadata;
pub use metadata::EnqueueResponse;
pub use metadata::FixedClockSpec;
pub use metadata::MethodMetadata;
pub use metadata::MockServerSpec;
pub use metadata::ParameterSpec;
pub use metadata::SuiteSpec;
pub use suite::Suite;
pub use type_descriptor::TypeDescriptor;
pub use type_descriptor::TypeRef;

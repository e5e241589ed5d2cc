//! Everything a test needs in one import.

pub use crate::app::ArtifactKit;
pub use crate::app::ArtifactKitBuilder;
pub use crate::app::KitFixtures;
pub use crate::app::KitMockServer;

pub use crate::domain::ArtifactKind;
pub use crate::domain::ClassMetadata;
pub use crate::domain::CompareMode;
pub use crate::domain::ConfigurationError;
pub use crate::domain::EnqueueResponse;
pub use crate::domain::FixedClockSpec;
pub use crate::domain::MethodMetadata;
pub use crate::domain::MockServerSpec;
pub use crate::domain::ParameterSpec;
pub use crate::domain::SuiteSpec;
pub use crate::domain::TypeDescriptor;
pub use crate::domain::TypeRef;
pub use crate::domain::artifact_file_name;

pub use crate::usecases::BindingStrategy;
pub use crate::usecases::Container;
pub use crate::usecases::DirectBindings;
pub use crate::usecases::Fixtures;
pub use crate::usecases::LifecycleBinder;
pub use crate::usecases::LifecycleHook;
pub use crate::usecases::MockServerControl;
pub use crate::usecases::MockServerHook;
pub use crate::usecases::MockServerSupport;
pub use crate::usecases::TEST_CASE_PARAMETER;
pub use crate::usecases::TestContext;
pub use crate::usecases::ports::Clock;
pub use crate::usecases::ports::FixtureError;
pub use crate::usecases::ports::FreezableClock;
pub use crate::usecases::ports::RecordedRequest;
pub use crate::usecases::ports::SuiteBinding;

pub use crate::infra::KitConfig;
pub use crate::infra::MockableClock;

#![deny(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! JSON test fixtures addressed by `suite/test_case/kind/name`.
//!
//! ```no_run
//! use artifact_kit::prelude::*;
//!
//! # #[derive(serde::Deserialize)] struct TestData;
//! let kit = ArtifactKit::builder().build();
//! let fixtures = kit.fixtures();
//! fixtures.set_suite(Some("plain/SampleTest"));
//! let input: TestData = fixtures.read_input("basic")?;
//! # Ok::<(), FixtureError>(())
//! ```

mod app;
pub mod prelude;

pub use app::ArtifactKit;
pub use app::ArtifactKitBuilder;
pub use app::KitFixtures;
pub use app::KitMockServer;

pub mod common {
    pub use artifact_kit_common::common::*;
}

pub mod domain {
    pub use artifact_kit_domain::domain::*;
}

pub mod usecases {
    pub use artifact_kit_usecases::usecases::*;
}

pub mod adapters {
    pub use artifact_kit_adapters::adapters::*;
}

pub mod infra {
    pub use artifact_kit_infra::infra::*;
}

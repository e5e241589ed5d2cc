#![deny(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Infrastructure adapters crate.

pub mod infra;
pub use infra::*;

pub mod common {
    pub use artifact_kit_common::common::*;
}

pub mod domain {
    pub use artifact_kit_domain::domain::*;
}

pub mod usecases {
    pub use artifact_kit_usecases::usecases::*;
}

#![deny(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Interface adapters crate.

pub mod adapters;
pub use adapters::*;

pub mod common {
    pub use artifact_kit_common::common::*;
}

pub mod domain {
    pub use artifact_kit_domain::domain::*;
}

pub mod usecases {
    pub use artifact_kit_usecases::usecases::*;
}

//! Composition root: wires the filesystem, serde_json and axum
//! implementations behind the fixture use cases.

mod kit;

pub use kit::ArtifactKit;
pub use kit::ArtifactKitBuilder;
pub use kit::KitFixtures;
pub use kit::KitMockServer;

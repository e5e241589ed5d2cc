//! Infrastructure implementations of the use-case ports.

pub mod config;
pub mod fs_resource_root;
pub mod http_mock_server;
pub mod mockable_clock;

pub use config::KitConfig;
pub use fs_resource_root::FsResourceRoot;
pub use http_mock_server::HttpMockServer;
pub use mockable_clock::MockableClock;

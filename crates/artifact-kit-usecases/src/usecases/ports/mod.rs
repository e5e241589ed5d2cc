//! Port interfaces owned by use cases.

pub mod clock;
pub mod codec;
pub mod comparator;
pub mod errors;
pub mod mock_server;
pub mod resource_root;
pub mod suite_binding;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::Clock;
pub use clock::FreezableClock;
pub use codec::Codec;
pub use comparator::JsonComparator;
pub use errors::AssertionFailure;
pub use errors::CodecError;
pub use errors::Difference;
pub use errors::DifferenceReason;
pub use errors::FixtureError;
pub use errors::MockServerError;
pub use mock_server::MockResponse;
pub use mock_server::MockServer;
pub use mock_server::RecordedRequest;
pub use resource_root::ResourceRoot;
pub use suite_binding::SuiteBinding;

//! Port doubles for use case tests.

mod in_memory_resources;
mod mock_codec;
mod mock_comparator;
mod mock_server_double;
mod recording_clock;
mod recording_suite_binding;

pub use in_memory_resources::InMemoryResources;
pub use mock_codec::MockCodec;
pub use mock_comparator::ComparisonCall;
pub use mock_comparator::MockComparator;
pub use mock_server_double::MockServerDouble;
pub use recording_clock::RecordingClock;
pub use recording_suite_binding::RecordingSuiteBinding;

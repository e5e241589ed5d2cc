//! Adapters implementing the codec and comparator ports over `serde_json`.

pub mod serde_json_codec;
pub mod structural_comparator;

pub use serde_json_codec::SerdeJsonCodec;
pub use structural_comparator::StructuralComparator;

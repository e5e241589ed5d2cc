use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::TypeDescriptor;
use crate::usecases::ports::Codec;
use crate::usecases::ports::CodecError;

/// Compact `serde_json` codec that counts its calls.
#[derive(Default)]
pub struct MockCodec {
    decodes: AtomicUsize,
    encodes: AtomicUsize,
}

impl MockCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode_count(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }

    pub fn encode_count(&self) -> usize {
        self.encodes.load(Ordering::SeqCst)
    }
}

impl Codec for MockCodec {
    fn decode<T: DeserializeOwned>(
        &self,
        text: &str,
        target: &TypeDescriptor,
    ) -> Result<T, CodecError> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        serde_json::from_str(text).map_err(|e| CodecError::Decode {
            target: target.to_string(),
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        })
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CodecError> {
        self.encodes.fetch_add(1, Ordering::SeqCst);
        serde_json::to_string(value).map_err(|e| CodecError::Encode {
            message: e.to_string(),
        })
    }
}

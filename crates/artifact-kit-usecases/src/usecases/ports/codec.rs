//! Codec port: JSON text to typed values and back.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::TypeDescriptor;
use crate::usecases::ports::errors::CodecError;

pub trait Codec: Send + Sync {
    /// Decodes `text` into `T`; `target` names the type in error messages.
    fn decode<T: DeserializeOwned>(
        &self,
        text: &str,
        target: &TypeDescriptor,
    ) -> Result<T, CodecError>;

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CodecError>;

    fn decode_bytes<T: DeserializeOwned>(
        &self,
        bytes: &[u8],
        target: &TypeDescriptor,
    ) -> Result<T, CodecError> {
        let text = std::str::from_utf8(bytes).map_err(|e| CodecError::Utf8 {
            target: target.to_string(),
            reason: e.to_string(),
        })?;
        self.decode(text, target)
    }
}

//! `serde_json` implementation of the codec port.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::TypeDescriptor;
use crate::usecases::ports::Codec;
use crate::usecases::ports::CodecError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerdeJsonCodec {
    pretty: bool,
}

impl SerdeJsonCodec {
    /// Compact output.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl Codec for SerdeJsonCodec {
    fn decode<T: DeserializeOwned>(
        &self,
        text: &str,
        target: &TypeDescriptor,
    ) -> Result<T, CodecError> {
        serde_json::from_str(text).map_err(|err| {
            debug!(target_type = %target, error = %err, "Failed to decode JSON artifact");
            CodecError::Decode {
                target: target.to_string(),
                line: err.line(),
                column: err.column(),
                message: err.to_string(),
            }
        })
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CodecError> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        encoded.map_err(|err| CodecError::Encode {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        id: String,
        content: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Envelope {
        id: String,
        revision: i64,
        note: Option<String>,
        tags: BTreeMap<String, Vec<u32>>,
        payload: Option<TestData>,
        history: Vec<TestData>,
    }

    fn test_data() -> impl Strategy<Value = TestData> {
        (any::<String>(), any::<String>()).prop_map(|(id, content)| TestData { id, content })
    }

    fn envelope() -> impl Strategy<Value = Envelope> {
        (
            any::<String>(),
            any::<i64>(),
            prop::option::of(any::<String>()),
            prop::collection::btree_map(any::<String>(), prop::collection::vec(any::<u32>(), 0..4), 0..4),
            prop::option::of(test_data()),
            prop::collection::vec(test_data(), 0..3),
        )
            .prop_map(|(id, revision, note, tags, payload, history)| Envelope {
                id,
                revision,
                note,
                tags,
                payload,
                history,
            })
    }

    fn decode_own<T: DeserializeOwned>(codec: SerdeJsonCodec, text: &str) -> T {
        codec.decode(text, &TypeDescriptor::of::<T>()).unwrap()
    }

    #[test]
    fn test_decode_plain_type() {
        let codec = SerdeJsonCodec::new();
        let data: TestData = codec
            .decode(
                r#"{"id":"abc","content":"hi"}"#,
                &TypeDescriptor::of::<TestData>(),
            )
            .unwrap();
        assert_eq!(data.id, "abc");
    }

    #[test]
    fn test_decode_generic_type() {
        let codec = SerdeJsonCodec::new();
        let map: BTreeMap<String, Vec<u32>> = codec
            .decode(
                r#"{"a":[1,2],"b":[]}"#,
                &TypeDescriptor::of::<BTreeMap<String, Vec<u32>>>(),
            )
            .unwrap();
        assert_eq!(map["a"], vec![1, 2]);
        assert!(map["b"].is_empty());
    }

    #[test]
    fn test_decode_error_reports_location_and_target() {
        let codec = SerdeJsonCodec::new();
        let err = codec
            .decode::<TestData>("{\n  \"id\": 5\n}", &TypeDescriptor::of::<TestData>())
            .unwrap_err();
        match err {
            CodecError::Decode {
                target,
                line,
                column,
                ..
            } => {
                assert_eq!(target, "TestData");
                assert_eq!(line, 2);
                assert!(column > 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_bytes_rejects_invalid_utf8() {
        let codec = SerdeJsonCodec::new();
        let err = codec
            .decode_bytes::<TestData>(&[0xff, b'{'], &TypeDescriptor::of::<TestData>())
            .unwrap_err();
        assert!(matches!(err, CodecError::Utf8 { .. }));
    }

    #[test]
    fn test_pretty_and_compact_encode_same_value() {
        let value = TestData {
            id: "1".to_string(),
            content: "c".to_string(),
        };
        let compact = SerdeJsonCodec::new().encode(&value).unwrap();
        let pretty = SerdeJsonCodec::pretty().encode(&value).unwrap();

        assert_eq!(compact, r#"{"id":"1","content":"c"}"#);
        assert!(pretty.contains('\n'));
        let round_trip: TestData = SerdeJsonCodec::new()
            .decode(&pretty, &TypeDescriptor::of::<TestData>())
            .unwrap();
        assert_eq!(round_trip, value);
    }

    proptest! {
        #[test]
        fn prop_compact_encoding_round_trips(value in envelope()) {
            let codec = SerdeJsonCodec::new();
            let text = codec.encode(&value).unwrap();
            prop_assert!(!text.contains('\n'));
            prop_assert_eq!(decode_own::<Envelope>(codec, &text), value);
        }

        #[test]
        fn prop_pretty_encoding_round_trips(value in envelope()) {
            let codec = SerdeJsonCodec::pretty();
            let text = codec.encode(&value).unwrap();
            prop_assert_eq!(decode_own::<Envelope>(codec, &text), value);
        }

        #[test]
        fn prop_generic_map_round_trips(
            value in prop::collection::btree_map(
                "[a-z]{1,6}",
                prop::option::of(prop::collection::vec(test_data(), 0..3)),
                0..4,
            ),
        ) {
            for codec in [SerdeJsonCodec::new(), SerdeJsonCodec::pretty()] {
                let text = codec.encode(&value).unwrap();
                let decoded: BTreeMap<String, Option<Vec<TestData>>> = decode_own(codec, &text);
                prop_assert_eq!(&decoded, &value);
            }
        }
    }
}

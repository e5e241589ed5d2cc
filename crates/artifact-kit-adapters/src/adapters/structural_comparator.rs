//! Structural JSON comparison over `serde_json::Value`.
//!
//! Objects are compared key by key. In exact mode both sides must carry the
//! same keys; in lenient mode the actual document may carry extra keys at any
//! depth. Arrays must match in length and order in both modes. Numbers
//! compare by value, so `1` equals `1.0`.

use serde_json::Map;
use serde_json::Number;
use serde_json::Value;
use tracing::debug;

use crate::domain::CompareMode;
use crate::usecases::ports::AssertionFailure;
use crate::usecases::ports::CodecError;
use crate::usecases::ports::Difference;
use crate::usecases::ports::DifferenceReason;
use crate::usecases::ports::FixtureError;
use crate::usecases::ports::JsonComparator;

#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralComparator;

impl StructuralComparator {
    pub fn new() -> Self {
        Self
    }

    /// Every difference between the two documents; empty when they match.
    pub fn differences(&self, expected: &Value, actual: &Value, mode: CompareMode) -> Vec<Difference> {
        let mut differences = Vec::new();
        diff_values(expected, actual, mode, "", &mut differences);
        differences
    }
}

impl JsonComparator for StructuralComparator {
    fn compare(
        &self,
        expected: &str,
        actual: &str,
        mode: CompareMode,
    ) -> Result<(), FixtureError> {
        let expected_value = parse_document(expected, "expected JSON")?;
        let actual_value = parse_document(actual, "actual JSON")?;

        let differences = self.differences(&expected_value, &actual_value, mode);
        if differences.is_empty() {
            return Ok(());
        }
        debug!(
            mode = %mode,
            differences = differences.len(),
            "JSON documents differ"
        );
        Err(FixtureError::Assertion(AssertionFailure {
            mode,
            expected: expected.to_string(),
            actual: actual.to_string(),
            differences,
        }))
    }
}

fn parse_document(text: &str, target: &str) -> Result<Value, CodecError> {
    serde_json::from_str(text).map_err(|err| CodecError::Decode {
        target: target.to_string(),
        line: err.line(),
        column: err.column(),
        message: err.to_string(),
    })
}

fn diff_values(
    expected: &Value,
    actual: &Value,
    mode: CompareMode,
    path: &str,
    out: &mut Vec<Difference>,
) {
    match (expected, actual) {
        (Value::Object(expected), Value::Object(actual)) => {
            diff_objects(expected, actual, mode, path, out)
        }
        (Value::Array(expected), Value::Array(actual)) => {
            if expected.len() != actual.len() {
                out.push(Difference {
                    path: path.to_string(),
                    reason: DifferenceReason::LengthMismatch,
                    expected: Some(expected.len().to_string()),
                    actual: Some(actual.len().to_string()),
                });
            }
            for (index, (expected, actual)) in expected.iter().zip(actual).enumerate() {
                diff_values(expected, actual, mode, &format!("{path}/{index}"), out);
            }
        }
        (Value::Number(expected_number), Value::Number(actual_number)) => {
            if !numbers_equal(expected_number, actual_number) {
                out.push(value_mismatch(path, expected, actual));
            }
        }
        (expected, actual) if kind(expected) == kind(actual) => {
            if expected != actual {
                out.push(value_mismatch(path, expected, actual));
            }
        }
        (expected, actual) => out.push(Difference {
            path: path.to_string(),
            reason: DifferenceReason::TypeMismatch,
            expected: Some(format!("{} {}", kind(expected), expected)),
            actual: Some(format!("{} {}", kind(actual), actual)),
        }),
    }
}

fn diff_objects(
    expected: &Map<String, Value>,
    actual: &Map<String, Value>,
    mode: CompareMode,
    path: &str,
    out: &mut Vec<Difference>,
) {
    for (key, expected_value) in expected {
        let child = child_pointer(path, key);
        match actual.get(key) {
            Some(actual_value) => diff_values(expected_value, actual_value, mode, &child, out),
            None => out.push(Difference {
                path: child,
                reason: DifferenceReason::MissingKey,
                expected: Some(expected_value.to_string()),
                actual: None,
            }),
        }
    }
    if mode.allows_extra_keys() {
        return;
    }
    for (key, actual_value) in actual {
        if !expected.contains_key(key) {
            out.push(Difference {
                path: child_pointer(path, key),
                reason: DifferenceReason::UnexpectedKey,
                expected: None,
                actual: Some(actual_value.to_string()),
            });
        }
    }
}

fn numbers_equal(expected: &Number, actual: &Number) -> bool {
    if let (Some(expected), Some(actual)) = (expected.as_i64(), actual.as_i64()) {
        return expected == actual;
    }
    if let (Some(expected), Some(actual)) = (expected.as_u64(), actual.as_u64()) {
        return expected == actual;
    }
    match (expected.as_f64(), actual.as_f64()) {
        (Some(expected), Some(actual)) => expected == actual,
        _ => false,
    }
}

fn value_mismatch(path: &str, expected: &Value, actual: &Value) -> Difference {
    Difference {
        path: path.to_string(),
        reason: DifferenceReason::ValueMismatch,
        expected: Some(expected.to_string()),
        actual: Some(actual.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// RFC 6901 escaping of one reference token.
fn child_pointer(parent: &str, key: &str) -> String {
    format!("{parent}/{}", key.replace('~', "~0").replace('/', "~1"))
}

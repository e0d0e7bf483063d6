//! Partial structural matching of attributes against a filter pattern.

use serde_json::{Map, Value};

/// Returns true if `target` contains everything `pattern` describes.
///
/// - Objects: every key in the pattern must be present in the target with a
///   matching value. Extra target keys are ignored.
/// - Arrays: every pattern element must match some target element.
/// - Anything else compares by value.
pub fn matches(target: &Value, pattern: &Value) -> bool {
    match (pattern, target) {
        (Value::Object(_), Value::Object(actual)) => matches_attributes(actual, pattern),
        (Value::Object(expected), _) => expected.is_empty(),
        (Value::Array(expected), Value::Array(actual)) => expected
            .iter()
            .all(|want| actual.iter().any(|have| matches(have, want))),
        (Value::Number(expected), Value::Number(actual)) => {
            match (expected.as_f64(), actual.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => expected == actual,
            }
        }
        (expected, actual) => expected == actual,
    }
}

/// [`matches`] against an attribute map without wrapping it in a `Value`.
///
/// Only object patterns can match.
pub fn matches_attributes(attributes: &Map<String, Value>, pattern: &Value) -> bool {
    let Value::Object(expected) = pattern else {
        return false;
    };
    expected.iter().all(|(key, want)| {
        attributes
            .get(key)
            .map(|have| matches(have, want))
            .unwrap_or(false)
    })
}

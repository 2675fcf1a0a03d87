//! Text form of a single coordinate value.
//!
//! Numbers are written with the shortest representation that parses back to
//! the same `f64` (via `serde_json`), so the output never depends on locale and
//! survives a round trip unchanged.
use serde_json::{Number, Value};

use crate::error::{Error, Result};

/// Converts a finite coordinate value into a JSON number.
///
/// # Errors
///
/// Returns [`Error::InvariantViolation`] for `NaN` and infinities, which have no
/// JSON representation.
pub fn encode_number(axis: char, value: f64) -> Result<Number> {
    Number::from_f64(value).ok_or(Error::InvariantViolation { axis, value })
}

/// Canonical text of a coordinate value.
///
/// # Errors
///
/// Returns [`Error::InvariantViolation`] for non-finite values.
pub fn encode(value: f64) -> Result<String> {
    Ok(encode_number('?', value)?.to_string())
}

/// Parses coordinate text, accepting only JSON number syntax.
///
/// # Errors
///
/// Returns [`Error::Format`] when the text is not a finite number, or is an
/// integer a double cannot hold exactly.
pub fn decode(text: &str) -> Result<f64> {
    let number = serde_json::from_str::<Number>(text.trim()).map_err(|err| Error::Format {
        value: format!("'{text}'"),
        reason: err.to_string(),
    })?;
    number_to_f64(&number)
}

/// Integers beyond 2^53 would be rounded by the conversion, so they are rejected.
fn number_to_f64(number: &Number) -> Result<f64> {
    let inexact = || Error::Format {
        value: number.to_string(),
        reason: "not exactly representable as a double".to_string(),
    };
    let value = number.as_f64().ok_or_else(inexact)?;

    #[allow(clippy::cast_possible_truncation)]
    let integral = value as i128;
    let exact = match (number.as_i64(), number.as_u64()) {
        (Some(int), _) => integral == i128::from(int),
        (None, Some(uint)) => integral == i128::from(uint),
        (None, None) => true,
    };
    if exact {
        Ok(value)
    } else {
        Err(inexact())
    }
}

/// Reads a coordinate out of a document node.
///
/// Numbers are taken as is and strings go through [`decode`]. Arrays signal a
/// nesting problem rather than a bad value.
pub(crate) fn decode_value(value: &Value) -> Result<f64> {
    match value {
        Value::Number(number) => number_to_f64(number),
        Value::String(text) => decode(text),
        Value::Array(_) => Err(Error::schema("a number", "an array")),
        other => Err(Error::Format {
            value: other.to_string(),
            reason: "expected a number".to_string(),
        }),
    }
}

//! Comparison of a script's result against the expected value of a setup.
//!
//! The kind of the *actual* result picks the comparison rule; the expected
//! value is then coerced to that kind. An expected value that cannot be read
//! as the actual's kind is a type error, not a mismatch.

use serde_json::Value;
use thiserror::Error;

use crate::models::ResultValue;

/// Maximum absolute difference at which two floating-point results are equal.
/// A difference of exactly the tolerance passes.
pub const FLOAT_TOLERANCE: f64 = 1e-5;

/// Why a result did not verify.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VerificationError {
    /// The result has the right kind but the wrong value.
    #[error("Expected {expected}, got {actual}")]
    Mismatch {
        /// The expected value, rendered in the result's kind.
        expected: String,
        /// The actual result.
        actual: String,
    },

    /// The expected value cannot be read as the result's kind.
    #[error("Type error: expected value {expected} is not comparable to {kind} result {actual}")]
    Type {
        /// Kind of the actual result.
        kind: &'static str,
        /// The expected value as written in the setup.
        expected: String,
        /// The actual result.
        actual: String,
    },

    /// The engine returned a kind of value that has no comparison rule.
    #[error("Type error: unsupported result kind {kind}: {actual}")]
    UnsupportedKind {
        /// Kind of the actual result.
        kind: &'static str,
        /// The actual result.
        actual: String,
    },
}

impl VerificationError {
    /// True for errors about kinds rather than values.
    pub fn is_type_error(&self) -> bool {
        !matches!(self, VerificationError::Mismatch { .. })
    }
}

/// Verifies `actual` against `expected`.
pub fn verify(actual: &ResultValue, expected: &Value) -> Result<(), VerificationError> {
    let type_error = || VerificationError::Type {
        kind: actual.kind(),
        expected: expected.to_string(),
        actual: render(actual),
    };

    let equal = match actual {
        ResultValue::Number(a) => {
            let e = expected.as_f64().ok_or_else(type_error)?;
            (a - e).abs() <= FLOAT_TOLERANCE
        }
        ResultValue::Text(a) => a == expected.as_str().ok_or_else(type_error)?,
        ResultValue::Integer(a) => *a == as_integer(expected).ok_or_else(type_error)?,
        ResultValue::Boolean(a) => *a == expected.as_bool().ok_or_else(type_error)?,
        ResultValue::Unknown(_) => {
            return Err(VerificationError::UnsupportedKind {
                kind: actual.kind(),
                actual: render(actual),
            });
        }
    };

    if equal {
        Ok(())
    } else {
        Err(VerificationError::Mismatch {
            expected: render(&ResultValue::from(expected)),
            actual: render(actual),
        })
    }
}

/// Reads an integral JSON number, accepting floats without a fractional part.
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    let f = value.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

fn render(value: &ResultValue) -> String {
    match value {
        ResultValue::Text(s) => Value::from(s.as_str()).to_string(),
        other => other.to_string(),
    }
}

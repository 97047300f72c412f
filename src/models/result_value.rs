use std::fmt;

use serde_json::Value;

/// A script result, tagged with the kind decoded from the engine's JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    /// A floating-point number.
    Number(f64),
    /// A string.
    Text(String),
    /// A number written without a fractional part or exponent.
    Integer(i64),
    /// A boolean.
    Boolean(bool),
    /// Anything else: `null`, arrays, objects and integers outside `i64`.
    Unknown(Value),
}

impl ResultValue {
    /// The name of this value's kind, as shown in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ResultValue::Number(_) => "number",
            ResultValue::Text(_) => "text",
            ResultValue::Integer(_) => "integer",
            ResultValue::Boolean(_) => "boolean",
            ResultValue::Unknown(Value::Null) => "null",
            ResultValue::Unknown(Value::Array(_)) => "array",
            ResultValue::Unknown(Value::Object(_)) => "object",
            ResultValue::Unknown(_) => "unknown",
        }
    }
}

impl From<&Value> for ResultValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(b) => ResultValue::Boolean(*b),
            Value::String(s) => ResultValue::Text(s.clone()),
            Value::Number(n) if n.is_i64() || n.is_u64() => match n.as_i64() {
                Some(i) => ResultValue::Integer(i),
                None => ResultValue::Unknown(value.clone()),
            },
            Value::Number(n) => match n.as_f64() {
                Some(f) => ResultValue::Number(f),
                None => ResultValue::Unknown(value.clone()),
            },
            other => ResultValue::Unknown(other.clone()),
        }
    }
}

impl From<Value> for ResultValue {
    fn from(value: Value) -> Self {
        ResultValue::from(&value)
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultValue::Number(n) => write!(f, "{n}"),
            ResultValue::Text(s) => write!(f, "{s}"),
            ResultValue::Integer(i) => write!(f, "{i}"),
            ResultValue::Boolean(b) => write!(f, "{b}"),
            ResultValue::Unknown(v) => write!(f, "{v}"),
        }
    }
}

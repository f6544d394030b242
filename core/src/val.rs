use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar result handed back across the host boundary.
///
/// Workloads either return nothing (`Nil`) or a single number. The untagged
/// serde representation maps `Nil` to JSON `null` so hosts see the same shape
/// a JavaScript caller would get from a void function.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostValue {
    #[default]
    Nil,
    Int(i64),
    Float(f64),
}

impl HostValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Nil => "Nil",
            HostValue::Int(_) => "Int",
            HostValue::Float(_) => "Float",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, HostValue::Nil)
    }

    /// Numeric view used by hosts that only understand doubles.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HostValue::Nil => None,
            HostValue::Int(i) => Some(*i as f64),
            HostValue::Float(f) => Some(*f),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HostValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Discriminant written through the C ABI: 0 nil, 1 int, 2 float.
    pub fn kind_code(&self) -> i32 {
        match self {
            HostValue::Nil => 0,
            HostValue::Int(_) => 1,
            HostValue::Float(_) => 2,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            HostValue::Nil => serde_json::Value::Null,
            HostValue::Int(i) => serde_json::Value::from(*i),
            HostValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Nil => f.write_str("nil"),
            HostValue::Int(i) => {
                let mut buf = itoa::Buffer::new();
                f.write_str(buf.format(*i))
            }
            HostValue::Float(v) => {
                let mut buf = ryu::Buffer::new();
                f.write_str(buf.format(*v))
            }
        }
    }
}

impl From<()> for HostValue {
    fn from(_: ()) -> Self {
        HostValue::Nil
    }
}

impl From<i64> for HostValue {
    fn from(value: i64) -> Self {
        HostValue::Int(value)
    }
}

impl From<i32> for HostValue {
    fn from(value: i32) -> Self {
        HostValue::Int(value as i64)
    }
}

impl From<u32> for HostValue {
    fn from(value: u32) -> Self {
        HostValue::Int(value as i64)
    }
}

impl From<usize> for HostValue {
    fn from(value: usize) -> Self {
        HostValue::Int(value as i64)
    }
}

impl From<f64> for HostValue {
    fn from(value: f64) -> Self {
        HostValue::Float(value)
    }
}

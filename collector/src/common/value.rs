use indexmap::IndexMap;
use std::fmt::{Debug, Display, Formatter};

/// Represents the value held by a model field or a record entry.
///
/// # Purpose
/// Provides one representation for everything the remote store can return or
/// accept. The remote speaks JSON, so the variants mirror JSON: null, booleans,
/// numbers, strings, arrays and objects.
///
/// # Variants
/// - Null: Absence of a value, the default for every declared field
/// - Bool(bool): Boolean true/false
/// - I64/U64: Integers; negative JSON integers decode to I64, larger ones to U64
/// - F64: Floating point numbers
/// - String(String): Text value
/// - Array(Vec<Value>): Ordered collection of values
/// - Map(IndexMap<String, Value>): Nested object, insertion ordered
///
/// # Characteristics
/// - **Untagged**: serializes as plain JSON, no variant names on the wire
/// - **Numeric equality**: `I64(5) == U64(5)`
/// - **Wire text**: `Display` renders strings unquoted and numbers as digits,
///   which is what ends up in query parameters
///
/// # Usage
/// ```text
/// let v1: Value = 42.into();
/// let v2 = Value::from("hello");
/// let v3 = Value::from(None::<String>); // Value::Null
/// ```
#[derive(Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(String),
    Array(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::I64(_) | Value::U64(_) | Value::F64(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&String> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::I64(i) => Some(*i as f64),
            Value::U64(u) => Some(*u as f64),
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Interprets the value as a signed integer.
    ///
    /// Integer variants convert directly, floats only when they carry no
    /// fractional part and strings only when they parse as an integer.
    /// Anything else yields `None`; nothing is truncated or rounded.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::I64(i) => Some(*i),
            Value::U64(u) => i64::try_from(*u).ok(),
            Value::F64(f) if f.is_finite() && f.fract() == 0.0 => {
                if *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Moves the value out, leaving `Null` in its place.
    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }

    fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            log::error!("Failed to render value as JSON: {}", err);
            String::new()
        })
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json_string())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I64(i) => write!(f, "{}", i),
            Value::U64(u) => write!(f, "{}", u),
            Value::F64(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(_) | Value::Map(_) => write!(f, "{}", self.to_json_string()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::I64(a), Value::U64(b)) | (Value::U64(b), Value::I64(a)) => {
                u64::try_from(*a).is_ok_and(|a| a == *b)
            }
            (Value::F64(a), Value::F64(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::F64(a), Value::I64(_) | Value::U64(_)) => other.as_f64() == Some(*a),
            (Value::I64(_) | Value::U64(_), Value::F64(b)) => self.as_f64() == Some(*b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I64(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::U64(value as u64)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::U64(value)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::U64(value as u64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_null() {
        assert!(Value::default().is_null());
    }

    #[test]
    fn test_display_renders_wire_text() {
        assert_eq!(Value::from("foo").to_string(), "foo");
        assert_eq!(Value::from(5).to_string(), "5");
        assert_eq!(Value::from(5u64).to_string(), "5");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1,2]");
    }

    #[test]
    fn test_integer_equality_across_variants() {
        assert_eq!(Value::I64(5), Value::U64(5));
        assert_eq!(Value::U64(5), Value::I64(5));
        assert_ne!(Value::I64(-1), Value::U64(u64::MAX));
        assert_eq!(Value::F64(2.0), Value::I64(2));
        assert_ne!(Value::from("5"), Value::I64(5));
    }

    #[test]
    fn test_as_integer() {
        assert_eq!(Value::from(10).as_integer(), Some(10));
        assert_eq!(Value::from(10u64).as_integer(), Some(10));
        assert_eq!(Value::from("42").as_integer(), Some(42));
        assert_eq!(Value::from(3.0).as_integer(), Some(3));
        assert_eq!(Value::from(3.5).as_integer(), None);
        assert_eq!(Value::from("five").as_integer(), None);
        assert_eq!(Value::Null.as_integer(), None);
        assert_eq!(Value::from(u64::MAX).as_integer(), None);
    }

    #[test]
    fn test_as_integer_float_bounds() {
        // 2^63 is the nearest float to i64::MAX and lies outside the range
        assert_eq!(Value::from(9_223_372_036_854_775_808.0f64).as_integer(), None);
        assert_eq!(Value::from(i64::MAX as f64).as_integer(), None);
        assert_eq!(Value::from(-9_223_372_036_854_775_808.0f64).as_integer(), Some(i64::MIN));
        assert_eq!(
            Value::from(9_223_372_036_854_774_784.0f64).as_integer(),
            Some(9_223_372_036_854_774_784)
        );
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(Some("x")), Value::from("x"));
        assert!(Value::from(None::<i64>).is_null());
    }

    #[test]
    fn test_json_round_trip_is_untagged() {
        let json = r#"{"a":1,"b":"two","c":null,"d":[true,1.5],"e":{"f":-3}}"#;
        let value: Value = serde_json::from_str(json).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map["a"], Value::I64(1));
        assert_eq!(map["b"], Value::from("two"));
        assert!(map["c"].is_null());
        assert_eq!(map["d"], Value::Array(vec![Value::Bool(true), Value::F64(1.5)]));
        assert_eq!(serde_json::to_string(&value).unwrap(), json);
    }

    #[test]
    fn test_take_leaves_null() {
        let mut value = Value::from("x");
        let taken = value.take();
        assert_eq!(taken, Value::from("x"));
        assert!(value.is_null());
    }
}

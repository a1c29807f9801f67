//! Value type definitions.
//!
//! This module defines the `Value` enum which represents any scalar that can be
//! stored in a relation cell.

use crate::types::DataType;
use alloc::string::{String, ToString};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

/// A scalar value stored in a row.
#[derive(Clone, Debug)]
pub enum Value {
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    Text(String),
    /// Boolean value
    Boolean(bool),
}

impl Value {
    /// Returns the data type of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Integer,
            Value::Float(_) => DataType::Float,
            Value::Text(_) => DataType::Text,
            Value::Boolean(_) => DataType::Boolean,
        }
    }

    /// Returns the i64 value if this is an Integer, None otherwise.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as f64 if it is numeric. Integers are promoted.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is Text, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Returns the boolean value if this is a Boolean, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Compares two values under the relational comparison rules.
    ///
    /// Values of the same kind compare naturally. Integer and Float compare after
    /// promoting the Integer operand. Every other cross-kind pair, and any
    /// comparison involving NaN, is incomparable and yields `None`.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Returns true if both values compare equal under [`Value::compare`].
    #[inline]
    pub fn equals(&self, other: &Value) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

// Structural equality: used for row deduplication. Unlike `compare`, values of
// different kinds are never equal here.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => {
                // 0.0 == -0.0, so both must hash alike.
                let normalized = if *f == 0.0 { 0.0f64 } else { *f };
                normalized.to_bits().hash(state)
            }
            Value::Text(s) => s.hash(state),
            Value::Boolean(b) => b.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => {
                if v.is_finite() && libm::trunc(*v) == *v {
                    write!(f, "{:.1}", v)
                } else {
                    write!(f, "{}", v)
                }
            }
            Value::Text(v) => f.write_str(v),
            Value::Boolean(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::format;

    #[test]
    fn test_value_type_check() {
        assert_eq!(Value::Integer(42).data_type(), DataType::Integer);
        assert_eq!(Value::Float(1.5).data_type(), DataType::Float);
        assert_eq!(Value::Text("a".into()).data_type(), DataType::Text);
        assert_eq!(Value::Boolean(true).data_type(), DataType::Boolean);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(100).as_i64(), Some(100));
        assert_eq!(Value::Integer(2).as_f64(), Some(2.0));
        assert_eq!(Value::Float(3.5).as_f64(), Some(3.5));
        assert_eq!(Value::Text("hello".into()).as_str(), Some("hello"));
        assert_eq!(Value::Boolean(true).as_bool(), Some(true));
        assert_eq!(Value::Text("x".into()).as_i64(), None);
    }

    #[test]
    fn test_value_equality_is_structural() {
        assert_eq!(Value::Integer(42), Value::Integer(42));
        assert_ne!(Value::Integer(42), Value::Float(42.0));
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_eq!(Value::Text("test".into()), Value::Text("test".into()));
    }

    #[test]
    fn test_compare_promotes_integer() {
        assert_eq!(Value::Integer(1).compare(&Value::Float(1.5)), Some(Ordering::Less));
        assert_eq!(Value::Float(2.0).compare(&Value::Integer(2)), Some(Ordering::Equal));
        assert!(Value::Integer(3).equals(&Value::Float(3.0)));
    }

    #[test]
    fn test_compare_cross_kind_is_none() {
        assert_eq!(Value::Text("1".into()).compare(&Value::Integer(1)), None);
        assert_eq!(Value::Boolean(true).compare(&Value::Integer(1)), None);
        assert_eq!(Value::Float(f64::NAN).compare(&Value::Float(1.0)), None);
    }

    #[test]
    fn test_compare_within_kind() {
        assert_eq!(
            Value::Text("a".into()).compare(&Value::Text("b".into())),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Boolean(false).compare(&Value::Boolean(true)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_signed_zero_hashes_alike() {
        use core::hash::BuildHasher;
        use std::collections::hash_map::RandomState;

        let state = RandomState::new();
        assert_eq!(Value::Float(0.0), Value::Float(-0.0));
        assert_eq!(
            state.hash_one(&Value::Float(0.0)),
            state.hash_one(&Value::Float(-0.0))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Value::Integer(-3)), "-3");
        assert_eq!(format!("{}", Value::Float(2.0)), "2.0");
        assert_eq!(format!("{}", Value::Float(2.25)), "2.25");
        assert_eq!(format!("{}", Value::Float(-3.0)), "-3.0");
        assert_eq!(format!("{}", Value::Float(f64::INFINITY)), "inf");
        assert_eq!(format!("{}", Value::Text("Alice".into())), "Alice");
        assert_eq!(format!("{}", Value::Boolean(false)), "false");
    }

    #[test]
    fn test_value_from_impls() {
        let v: Value = 42i32.into();
        assert_eq!(v.as_i64(), Some(42));

        let v: Value = "hello".into();
        assert_eq!(v.as_str(), Some("hello"));

        let v: Value = 1.5f64.into();
        assert_eq!(v.as_f64(), Some(1.5));
    }
}

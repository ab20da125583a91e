//! # Value Model
//!
//! ## Purpose
//!
//! [`Value`] is the closed set of primitives that can travel inside an
//! OpenWire property map, map message or stream message body. Containers
//! nest arbitrarily: a [`ValueList`] or [`ValueMap`] holds further values.
//!
//! ## Semantics
//!
//! - Exactly one variant is active; replacing it drops the previous payload.
//! - `clone()` is a deep copy.
//! - Equality compares the type tag first, then the payload. Floats compare
//!   by bit pattern, so a `NaN` read back from the wire equals the `NaN`
//!   that was written.
//! - Strict accessors (`as_int`, `as_string`, ...) never coerce. Use
//!   [`FromValue`](crate::FromValue) for the CMS conversion rules.
//!
//! `Char` holds one UTF-16 code unit, matching the 2-byte wire encoding.

use crate::{ValueError, ValueList, ValueMap, ValueResult, ValueType};
use std::fmt;

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Byte(u8),
    Char(u16),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    ByteArray(Vec<u8>),
    List(ValueList),
    Map(ValueMap),
}

impl Value {
    /// Tag of the active variant. Never returns [`ValueType::BigString`].
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Byte(_) => ValueType::Byte,
            Value::Char(_) => ValueType::Char,
            Value::Short(_) => ValueType::Short,
            Value::Int(_) => ValueType::Integer,
            Value::Long(_) => ValueType::Long,
            Value::Float(_) => ValueType::Float,
            Value::Double(_) => ValueType::Double,
            Value::String(_) => ValueType::String,
            Value::ByteArray(_) => ValueType::ByteArray,
            Value::List(_) => ValueType::List,
            Value::Map(_) => ValueType::Map,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Replace the payload, switching the variant if needed.
    pub fn set(&mut self, value: impl Into<Value>) {
        *self = value.into();
    }

    /// Drop the payload and become `Null`.
    pub fn clear(&mut self) {
        *self = Value::Null;
    }

    /// Take the payload out, leaving `Null` behind.
    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }

    fn mismatch(&self, expected: ValueType) -> ValueError {
        ValueError::type_mismatch(expected, self.value_type())
    }

    pub fn as_bool(&self) -> ValueResult<bool> {
        match self {
            Value::Boolean(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::Boolean)),
        }
    }

    pub fn as_byte(&self) -> ValueResult<u8> {
        match self {
            Value::Byte(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::Byte)),
        }
    }

    pub fn as_char(&self) -> ValueResult<u16> {
        match self {
            Value::Char(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::Char)),
        }
    }

    pub fn as_short(&self) -> ValueResult<i16> {
        match self {
            Value::Short(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::Short)),
        }
    }

    pub fn as_int(&self) -> ValueResult<i32> {
        match self {
            Value::Int(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::Integer)),
        }
    }

    pub fn as_long(&self) -> ValueResult<i64> {
        match self {
            Value::Long(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::Long)),
        }
    }

    pub fn as_float(&self) -> ValueResult<f32> {
        match self {
            Value::Float(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::Float)),
        }
    }

    pub fn as_double(&self) -> ValueResult<f64> {
        match self {
            Value::Double(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::Double)),
        }
    }

    pub fn as_string(&self) -> ValueResult<&str> {
        match self {
            Value::String(v) => Ok(v),
            other => Err(other.mismatch(ValueType::String)),
        }
    }

    pub fn as_byte_array(&self) -> ValueResult<&[u8]> {
        match self {
            Value::ByteArray(v) => Ok(v),
            other => Err(other.mismatch(ValueType::ByteArray)),
        }
    }

    pub fn as_list(&self) -> ValueResult<&ValueList> {
        match self {
            Value::List(v) => Ok(v),
            other => Err(other.mismatch(ValueType::List)),
        }
    }

    pub fn as_list_mut(&mut self) -> ValueResult<&mut ValueList> {
        match self {
            Value::List(v) => Ok(v),
            other => Err(other.mismatch(ValueType::List)),
        }
    }

    pub fn as_map(&self) -> ValueResult<&ValueMap> {
        match self {
            Value::Map(v) => Ok(v),
            other => Err(other.mismatch(ValueType::Map)),
        }
    }

    pub fn as_map_mut(&mut self) -> ValueResult<&mut ValueMap> {
        match self {
            Value::Map(v) => Ok(v),
            other => Err(other.mismatch(ValueType::Map)),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::ByteArray(a), Value::ByteArray(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Char(v) => {
                let c = char::from_u32(u32::from(*v)).unwrap_or(char::REPLACEMENT_CHARACTER);
                write!(f, "{c}")
            }
            Value::Short(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::ByteArray(v) => write!(f, "{v:?}"),
            Value::List(v) => write!(f, "{v}"),
            Value::Map(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Boolean,
    u8 => Byte,
    u16 => Char,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Vec<u8> => ByteArray,
    ValueList => List,
    ValueMap => Map,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::ByteArray(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_null() {
        assert!(Value::default().is_null());
        assert_eq!(Value::default().value_type(), ValueType::Null);
    }

    #[test]
    fn test_set_switches_variant() {
        let mut v = Value::from("hello");
        v.set(42i32);
        assert_eq!(v.value_type(), ValueType::Integer);
        assert_eq!(v.as_int().unwrap(), 42);
        v.clear();
        assert!(v.is_null());
    }

    #[test]
    fn test_strict_accessor_rejects_other_variant() {
        let v = Value::Short(7);
        let err = v.as_int().unwrap_err();
        assert_eq!(
            err,
            ValueError::TypeMismatch {
                expected: ValueType::Integer,
                actual: ValueType::Short
            }
        );
        assert!(v.as_string().is_err());
    }

    #[test]
    fn test_cross_tag_equality_is_false() {
        assert_ne!(Value::Int(1), Value::Long(1));
        assert_ne!(Value::Byte(0), Value::Boolean(false));
        assert_ne!(Value::Null, Value::String(String::new()));
    }

    #[test]
    fn test_float_equality_by_bits() {
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
    }

    #[test]
    fn test_clone_is_deep() {
        let mut inner = ValueList::new();
        inner.push(1i32);
        let original = Value::List(inner);
        let mut copy = original.clone();
        copy.as_list_mut().unwrap().push(2i32);
        assert_eq!(original.as_list().unwrap().len(), 1);
        assert_eq!(copy.as_list().unwrap().len(), 2);
    }

    #[test]
    fn test_display_nested() {
        let mut map = ValueMap::new();
        map.insert("a", 1i32);
        let mut list = ValueList::new();
        list.push(true);
        list.push(Value::Map(map));
        assert_eq!(Value::List(list).to_string(), "[true, {a=1}]");
        assert_eq!(Value::Char(u16::from(b'x')).to_string(), "x");
    }

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(3i64)), Value::Long(3));
    }
}

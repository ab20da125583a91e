//! # CMS Conversion Rules
//!
//! Map and stream message getters read values through the JMS/CMS
//! conversion table rather than the strict accessors on [`Value`]:
//!
//! ```text
//! target   accepted source variants
//! bool     Boolean, String
//! u8       Byte, String
//! u16      Char, String (numeric code unit)
//! i16      Byte, Short, String
//! i32      Byte, Short, Int, String
//! i64      Byte, Short, Int, Long, String
//! f32      Float, String
//! f64      Float, Double, String
//! String   every scalar and Null ("")
//! Vec<u8>  ByteArray
//! ```
//!
//! Anything outside the table, or a string that does not parse, is an
//! "Unsupported Type Conversion". Strings are parsed as-is; surrounding
//! whitespace is a parse failure.

use crate::{Value, ValueError, ValueResult};
use std::str::FromStr;

/// Read a Rust type out of a [`Value`] using the conversion table.
pub trait FromValue: Sized {
    /// Name used in conversion errors.
    const TARGET: &'static str;

    fn from_value(value: &Value) -> ValueResult<Self>;
}

fn parse<T: FromStr>(s: &str, target: &'static str) -> ValueResult<T> {
    s.parse::<T>()
        .map_err(|_| ValueError::parse_failure(s, target))
}

impl FromValue for bool {
    const TARGET: &'static str = "bool";

    fn from_value(value: &Value) -> ValueResult<Self> {
        match value {
            Value::Boolean(v) => Ok(*v),
            // Any string other than "true" (case-insensitive) reads as false.
            Value::String(s) => Ok(s.eq_ignore_ascii_case("true")),
            other => Err(ValueError::unsupported(other.value_type(), Self::TARGET)),
        }
    }
}

impl FromValue for u8 {
    const TARGET: &'static str = "byte";

    fn from_value(value: &Value) -> ValueResult<Self> {
        match value {
            Value::Byte(v) => Ok(*v),
            Value::String(s) => parse::<i8>(s, Self::TARGET)
                .map(|b| b as u8)
                .or_else(|_| parse::<u8>(s, Self::TARGET)),
            other => Err(ValueError::unsupported(other.value_type(), Self::TARGET)),
        }
    }
}

impl FromValue for u16 {
    const TARGET: &'static str = "char";

    fn from_value(value: &Value) -> ValueResult<Self> {
        match value {
            Value::Char(v) => Ok(*v),
            Value::String(s) => parse::<u16>(s, Self::TARGET),
            other => Err(ValueError::unsupported(other.value_type(), Self::TARGET)),
        }
    }
}

impl FromValue for i16 {
    const TARGET: &'static str = "short";

    fn from_value(value: &Value) -> ValueResult<Self> {
        match value {
            Value::Byte(v) => Ok(i16::from(*v)),
            Value::Short(v) => Ok(*v),
            Value::String(s) => parse(s, Self::TARGET),
            other => Err(ValueError::unsupported(other.value_type(), Self::TARGET)),
        }
    }
}

impl FromValue for i32 {
    const TARGET: &'static str = "int";

    fn from_value(value: &Value) -> ValueResult<Self> {
        match value {
            Value::Byte(v) => Ok(i32::from(*v)),
            Value::Short(v) => Ok(i32::from(*v)),
            Value::Int(v) => Ok(*v),
            Value::String(s) => parse(s, Self::TARGET),
            other => Err(ValueError::unsupported(other.value_type(), Self::TARGET)),
        }
    }
}

impl FromValue for i64 {
    const TARGET: &'static str = "long";

    fn from_value(value: &Value) -> ValueResult<Self> {
        match value {
            Value::Byte(v) => Ok(i64::from(*v)),
            Value::Short(v) => Ok(i64::from(*v)),
            Value::Int(v) => Ok(i64::from(*v)),
            Value::Long(v) => Ok(*v),
            Value::String(s) => parse(s, Self::TARGET),
            other => Err(ValueError::unsupported(other.value_type(), Self::TARGET)),
        }
    }
}

impl FromValue for f32 {
    const TARGET: &'static str = "float";

    fn from_value(value: &Value) -> ValueResult<Self> {
        match value {
            Value::Float(v) => Ok(*v),
            Value::String(s) => parse(s, Self::TARGET),
            other => Err(ValueError::unsupported(other.value_type(), Self::TARGET)),
        }
    }
}

impl FromValue for f64 {
    const TARGET: &'static str = "double";

    fn from_value(value: &Value) -> ValueResult<Self> {
        match value {
            Value::Float(v) => Ok(f64::from(*v)),
            Value::Double(v) => Ok(*v),
            Value::String(s) => parse(s, Self::TARGET),
            other => Err(ValueError::unsupported(other.value_type(), Self::TARGET)),
        }
    }
}

impl FromValue for String {
    const TARGET: &'static str = "string";

    fn from_value(value: &Value) -> ValueResult<Self> {
        match value {
            Value::Null => Ok(String::new()),
            Value::ByteArray(_) | Value::List(_) | Value::Map(_) => {
                Err(ValueError::unsupported(value.value_type(), Self::TARGET))
            }
            scalar => Ok(scalar.to_string()),
        }
    }
}

impl FromValue for Vec<u8> {
    const TARGET: &'static str = "byte array";

    fn from_value(value: &Value) -> ValueResult<Self> {
        match value {
            Value::ByteArray(v) => Ok(v.clone()),
            other => Err(ValueError::unsupported(other.value_type(), Self::TARGET)),
        }
    }
}

impl Value {
    /// Convert using the CMS table.
    pub fn convert<T: FromValue>(&self) -> ValueResult<T> {
        T::from_value(self)
    }

    /// Shortcut for `convert::<String>()`.
    pub fn to_cms_string(&self) -> ValueResult<String> {
        String::from_value(self)
    }
}

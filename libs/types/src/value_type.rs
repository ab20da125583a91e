//! # Primitive Type Tags
//!
//! Canonical OpenWire `PrimitiveMap` marshalling tags. Every encoded value
//! starts with one of these bytes, so the numbers must never change.
//!
//! `BigString` exists only on the wire: it marks a string whose byte length
//! needs a 32-bit prefix. In memory such a value is an ordinary
//! [`Value::String`](crate::Value::String).

use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

/// Type tag for a [`Value`](crate::Value) and its wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ValueType {
    Null = 0,
    Boolean = 1,
    Byte = 2,
    Char = 3,
    Short = 4,
    Integer = 5,
    Long = 6,
    Double = 7,
    Float = 8,
    String = 9,
    ByteArray = 10,
    Map = 11,
    List = 12,
    BigString = 13,
}

impl ValueType {
    /// Wire tag byte.
    pub const fn tag(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            ValueType::Null => "Null",
            ValueType::Boolean => "Boolean",
            ValueType::Byte => "Byte",
            ValueType::Char => "Char",
            ValueType::Short => "Short",
            ValueType::Integer => "Integer",
            ValueType::Long => "Long",
            ValueType::Double => "Double",
            ValueType::Float => "Float",
            ValueType::String => "String",
            ValueType::ByteArray => "ByteArray",
            ValueType::Map => "Map",
            ValueType::List => "List",
            ValueType::BigString => "BigString",
        }
    }

    /// True for tags whose payload is another map or list.
    pub const fn is_container(self) -> bool {
        matches!(self, ValueType::Map | ValueType::List)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//! Errors raised by value access and conversion.

use crate::ValueType;
use thiserror::Error;

/// Failures when reading a [`Value`](crate::Value) as a concrete type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// Strict accessor called on a value holding a different variant
    #[error("Type mismatch: expected {expected}, value holds {actual}")]
    TypeMismatch {
        expected: ValueType,
        actual: ValueType,
    },

    /// Conversion table has no rule from the stored variant to the target
    #[error("Unsupported Type Conversion: {from} cannot be read as {target}")]
    UnsupportedConversion {
        from: ValueType,
        target: &'static str,
    },

    /// String payload did not parse as the requested scalar
    #[error("Unsupported Type Conversion: '{input}' does not parse as {target}")]
    ParseFailure {
        input: String,
        target: &'static str,
    },

    #[error("No value stored under key '{key}'")]
    NoSuchKey { key: String },

    #[error("Index {index} out of bounds for list of {len} values")]
    IndexOutOfBounds { index: usize, len: usize },
}

impl ValueError {
    pub fn type_mismatch(expected: ValueType, actual: ValueType) -> Self {
        Self::TypeMismatch { expected, actual }
    }

    pub fn unsupported(from: ValueType, target: &'static str) -> Self {
        Self::UnsupportedConversion { from, target }
    }

    pub fn parse_failure(input: impl Into<String>, target: &'static str) -> Self {
        Self::ParseFailure {
            input: input.into(),
            target,
        }
    }

    /// True when the failure came from a lookup rather than from the stored value.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::NoSuchKey { .. } | Self::IndexOutOfBounds { .. })
    }
}

pub type ValueResult<T> = std::result::Result<T, ValueError>;

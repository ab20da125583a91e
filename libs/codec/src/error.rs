//! Codec-level errors for primitive marshalling and body streams
//!
//! Every variant carries enough context to tell which field or stage failed.
//! [`CodecError::kind`] folds the variants into the four families callers
//! branch on: end of stream, malformed input, unsupported value, and I/O.

use std::io;
use thiserror::Error;

/// Broad classification used by the message layer to pick its own error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input ended before a complete field could be read
    Eof,
    /// Input is present but does not follow the wire format
    Format,
    /// Value or length has no wire representation
    Unsupported,
    /// Underlying sink or source failed
    Io,
}

#[derive(Debug, Error)]
pub enum CodecError {
    /// Source ran out of bytes in the middle of a field
    #[error("Unexpected end of stream while reading {context}")]
    UnexpectedEof { context: String },

    /// Tag byte outside the primitive type registry
    #[error("Unsupported data type: tag {tag} is not a known primitive type (known tags are 0-13)")]
    UnknownTag { tag: u8 },

    /// Length prefix decoded as a negative number
    #[error("Negative length {length} for {context}")]
    NegativeLength { length: i64, context: String },

    /// String payload is not valid UTF-8
    #[error("Invalid UTF-8 in {context}: {reason}")]
    InvalidUtf8 { context: String, reason: String },

    /// Modified UTF-8 sequence is malformed
    #[error("Malformed modified UTF-8 at byte {offset} of {length}: {description}")]
    MalformedUtf { offset: usize, length: usize, description: String },

    /// Encoded form would not fit its length prefix
    #[error("{context} too large: {size} bytes exceeds limit {limit}")]
    LengthTooLarge { size: usize, limit: usize, context: String },

    /// Nested list/map decoding went deeper than allowed
    #[error("Nesting depth exceeded: containers nested more than {max_depth} levels")]
    DepthExceeded { max_depth: usize },

    /// Deflate/inflate stage rejected its input
    #[error("Corrupt compressed body: {reason}")]
    CorruptCompression { reason: String },

    /// Sink or source failure not covered above
    #[error("I/O failure during {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl CodecError {
    pub fn unexpected_eof(context: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            context: context.into(),
        }
    }

    pub fn negative_length(length: i64, context: impl Into<String>) -> Self {
        Self::NegativeLength {
            length,
            context: context.into(),
        }
    }

    pub fn too_large(size: usize, limit: usize, context: impl Into<String>) -> Self {
        Self::LengthTooLarge {
            size,
            limit,
            context: context.into(),
        }
    }

    pub fn invalid_utf8(context: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUtf8 {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed_utf(offset: usize, length: usize, description: impl Into<String>) -> Self {
        Self::MalformedUtf {
            offset,
            length,
            description: description.into(),
        }
    }

    /// Translate an I/O error raised while handling `context`.
    ///
    /// Short reads become [`CodecError::UnexpectedEof`]; data errors from the
    /// inflate stage become [`CodecError::CorruptCompression`].
    pub fn from_io(source: io::Error, context: impl Into<String>) -> Self {
        match source.kind() {
            io::ErrorKind::UnexpectedEof => Self::unexpected_eof(context),
            io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput => {
                Self::CorruptCompression {
                    reason: source.to_string(),
                }
            }
            _ => Self::Io {
                context: context.into(),
                source,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnexpectedEof { .. } => ErrorKind::Eof,
            Self::UnknownTag { .. }
            | Self::NegativeLength { .. }
            | Self::InvalidUtf8 { .. }
            | Self::MalformedUtf { .. }
            | Self::DepthExceeded { .. }
            | Self::CorruptCompression { .. } => ErrorKind::Format,
            Self::LengthTooLarge { .. } => ErrorKind::Unsupported,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind() == ErrorKind::Eof
    }
}

/// Wraps a bare `io::Error` with no extra context. Prefer [`CodecError::from_io`].
impl From<io::Error> for CodecError {
    fn from(source: io::Error) -> Self {
        Self::from_io(source, "stream operation")
    }
}

pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Attach a field description to I/O results from byteorder calls.
pub(crate) trait IoContext<T> {
    fn context(self, context: &str) -> CodecResult<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn context(self, context: &str) -> CodecResult<T> {
        self.map_err(|e| CodecError::from_io(e, context))
    }
}

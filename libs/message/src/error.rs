//! Message-level errors
//!
//! Mirrors the CMS exception families: not-writeable, not-readable,
//! end-of-stream and format failures. Codec and conversion errors are kept
//! as sources so the original diagnostic survives.

use openwire_codec::{CodecError, ErrorKind};
use openwire_types::ValueError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageErrorKind {
    /// Write attempted on a read-only body or property set
    NotWriteable,
    /// Read attempted on a write-only body
    NotReadable,
    /// Body has no more data
    EndOfStream,
    /// Body or value does not match the expected format
    Format,
    /// Value cannot be represented on the wire
    Unsupported,
    /// Lookup of an absent map entry or list element
    NotFound,
    /// Caller passed an inconsistent argument
    InvalidArgument,
    /// Stream failure not covered above
    Io,
}

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("Message {target} is in read-only mode and cannot be written to")]
    NotWriteable { target: &'static str },

    #[error("Message body is in write-only mode and cannot be read from")]
    NotReadable,

    #[error("Reached end of message body at element {position} of {len}")]
    EndOfBody { position: usize, len: usize },

    #[error("Byte range offset {offset} length {length} exceeds buffer of {size} bytes")]
    InvalidRange {
        offset: usize,
        length: usize,
        size: usize,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Value(#[from] ValueError),
}

impl MessageError {
    pub fn body_read_only() -> Self {
        Self::NotWriteable { target: "body" }
    }

    pub fn properties_read_only() -> Self {
        Self::NotWriteable {
            target: "properties",
        }
    }

    pub fn kind(&self) -> MessageErrorKind {
        match self {
            Self::NotWriteable { .. } => MessageErrorKind::NotWriteable,
            Self::NotReadable => MessageErrorKind::NotReadable,
            Self::EndOfBody { .. } => MessageErrorKind::EndOfStream,
            Self::InvalidRange { .. } => MessageErrorKind::InvalidArgument,
            Self::Codec(e) => match e.kind() {
                ErrorKind::Eof => MessageErrorKind::EndOfStream,
                ErrorKind::Format => MessageErrorKind::Format,
                ErrorKind::Unsupported => MessageErrorKind::Unsupported,
                ErrorKind::Io => MessageErrorKind::Io,
            },
            Self::Value(e) if e.is_missing() => MessageErrorKind::NotFound,
            Self::Value(_) => MessageErrorKind::Format,
        }
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.kind() == MessageErrorKind::EndOfStream
    }

    /// True for failures raised before any body bytes were touched.
    pub fn is_state_violation(&self) -> bool {
        matches!(
            self.kind(),
            MessageErrorKind::NotWriteable | MessageErrorKind::NotReadable
        )
    }
}

pub type MessageResult<T> = std::result::Result<T, MessageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_kinds_translate() {
        let eof: MessageError = CodecError::unexpected_eof("int value").into();
        assert_eq!(eof.kind(), MessageErrorKind::EndOfStream);

        let format: MessageError = CodecError::UnknownTag { tag: 99 }.into();
        assert_eq!(format.kind(), MessageErrorKind::Format);
        assert!(format.to_string().contains("tag 99"));
    }

    #[test]
    fn test_value_errors_translate() {
        let missing: MessageError = ValueError::NoSuchKey { key: "k".into() }.into();
        assert_eq!(missing.kind(), MessageErrorKind::NotFound);

        let conversion: MessageError =
            ValueError::unsupported(openwire_types::ValueType::Map, "int").into();
        assert_eq!(conversion.kind(), MessageErrorKind::Format);
    }

    #[test]
    fn test_state_messages() {
        assert_eq!(
            MessageError::body_read_only().to_string(),
            "Message body is in read-only mode and cannot be written to"
        );
        assert!(MessageError::NotReadable.is_state_violation());
    }
}

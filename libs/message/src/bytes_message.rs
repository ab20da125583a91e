//! # Bytes Message Body Stream
//!
//! ## Purpose
//!
//! A message whose body is a sequence of typed primitives, written in order
//! and read back in the same order. The body lives in the message content;
//! writes go through a lazily created [`WritePipeline`] and reads through a
//! lazily created [`ReadPipeline`].
//!
//! ## Body Lifecycle
//!
//! ```text
//!            first write                 store_content / on_send / reset
//!  Fresh ───────────────▶ Writing ─────────────────────────────────▶ Stored
//!    ▲                       ▲                                          │
//!    │ clear_body            └──────────── first write ─────────────────┤
//!    │ (from any state)                                                 │ first read
//!    └──────────────────────────────────────────────────────── Reading ◀┘
//! ```
//!
//! Writes require a writable body and reads a read-only body; both checks
//! happen before any pipeline is created. `reset()` stores pending writes
//! and flips the body to read-only. `on_send()` only stores.
//!
//! When the message's [`CompressionPolicy`](openwire_codec::CompressionPolicy)
//! asks for compression, stored content is a 4-byte big-endian original
//! length followed by the zlib stream, and the message is flagged compressed.
//!
//! ## Wire Format of Typed Values
//!
//! Big-endian, no tags: booleans and bytes are 1 byte, chars and shorts 2,
//! ints and floats 4, longs and doubles 8. `write_utf` writes a 2-byte
//! length plus modified UTF-8; `write_string` writes each UTF-16 code unit
//! as 2 bytes with no length.

use crate::error::{MessageError, MessageResult};
use crate::message::Message;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use openwire_codec::{data, CodecError, ReadPipeline, WritePipeline};
use std::io::{self, Read, Write};
use tracing::{debug, trace};

/// Observable position of the body in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageBodyState {
    /// No pipelines and no stored content
    Fresh,
    /// Write pipeline open
    Writing,
    /// Content stored, no pipeline open
    Stored,
    /// Read pipeline open over stored content
    Reading,
}

#[derive(Debug, Default)]
pub struct BytesMessage {
    message: Message,
    writer: Option<WritePipeline>,
    reader: Option<ReadPipeline>,
    length: u64,
    stored: bool,
}

impl BytesMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing message, e.g. one received from the wire.
    pub fn from_message(message: Message) -> Self {
        let stored = !message.content().is_empty();
        Self {
            message,
            writer: None,
            reader: None,
            length: 0,
            stored,
        }
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Access to flags and properties. Changing the content here while a
    /// pipeline is open is not reflected until the next `clear_body`/`reset`.
    pub fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }

    /// Store pending writes and hand back the underlying message.
    pub fn into_message(mut self) -> MessageResult<Message> {
        self.store_content()?;
        Ok(self.message)
    }

    pub fn is_read_only_body(&self) -> bool {
        self.message.is_read_only_body()
    }

    pub fn body_state(&self) -> MessageBodyState {
        if self.writer.is_some() {
            MessageBodyState::Writing
        } else if self.reader.is_some() {
            MessageBodyState::Reading
        } else if self.stored {
            MessageBodyState::Stored
        } else {
            MessageBodyState::Fresh
        }
    }

    /// Open the write pipeline if needed. Fails on a read-only body.
    ///
    /// The pipeline follows the compression policy the message was created
    /// with (see [`Message::with_settings`]).
    pub fn initialize_writing(&mut self) -> MessageResult<&mut WritePipeline> {
        self.message.fail_if_read_only_body()?;
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => {
                let policy = self.message.compression_policy();
                debug!(
                    compressed = policy.use_compression,
                    level = policy.level,
                    "opening message body for writing"
                );
                self.reader = None;
                self.length = 0;
                WritePipeline::for_policy(policy)
            }
        };
        Ok(self.writer.insert(writer))
    }

    /// Open the read pipeline if needed. Fails on a write-only body.
    ///
    /// Writes still pending in an open write pipeline are stored first.
    pub fn initialize_reading(&mut self) -> MessageResult<&mut ReadPipeline> {
        self.message.fail_if_write_only_body()?;
        if self.writer.is_some() {
            self.store_content()?;
        }
        let reader = match self.reader.take() {
            Some(reader) => reader,
            None => {
                let reader =
                    ReadPipeline::open(self.message.content().clone(), self.message.is_compressed())?;
                self.length = reader.logical_len();
                debug!(
                    length = self.length,
                    compressed = reader.is_compressed(),
                    "opening message body for reading"
                );
                reader
            }
        };
        Ok(self.reader.insert(reader))
    }

    /// Close the write pipeline and persist its bytes as the message content.
    ///
    /// A pipeline that received no bytes is dropped and the content already
    /// stored, with its compressed flag, is left as it was.
    pub fn store_content(&mut self) -> MessageResult<()> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        self.stored = true;
        if writer.bytes_written() == 0 {
            trace!("empty write pipeline released, content kept");
            return Ok(());
        }
        let body = writer.finish()?;
        let original_len = body.original_len;
        let compressed = body.compressed;
        let content = body.into_content()?;
        debug!(
            original_len,
            stored_len = content.len(),
            compressed,
            "stored message body"
        );
        self.message.set_content(content);
        self.message.set_compressed(compressed);
        self.reader = None;
        Ok(())
    }

    /// Store the body before the message is handed to the transport.
    pub fn on_send(&mut self) -> MessageResult<()> {
        self.store_content()
    }

    /// Store the body, drop all pipelines and make the body read-only.
    pub fn reset(&mut self) -> MessageResult<()> {
        self.store_content()?;
        self.writer = None;
        self.reader = None;
        self.length = 0;
        self.stored = true;
        self.message.set_read_only_body(true);
        Ok(())
    }

    /// Discard the body and all pipelines, and make the body writable.
    pub fn clear_body(&mut self) {
        self.message.clear_body();
        self.writer = None;
        self.reader = None;
        self.length = 0;
        self.stored = false;
    }

    /// Logical (uncompressed) body length.
    ///
    /// On a read-only body this opens the read pipeline and reports the full
    /// body size. On a writable body it reports the bytes written so far,
    /// which is 0 right after `clear_body`.
    pub fn body_length(&mut self) -> MessageResult<u64> {
        if self.message.is_read_only_body() {
            self.initialize_reading()?;
            return Ok(self.length);
        }
        Ok(self.writer.as_ref().map_or(0, WritePipeline::bytes_written))
    }

    /// Replace nothing, append `bytes` to the body.
    pub fn set_body_bytes(&mut self, bytes: &[u8]) -> MessageResult<()> {
        self.write_with("body bytes", |w| w.write_all(bytes))
    }

    /// Unread remainder of the body; the whole body right after `reset`.
    pub fn body_bytes(&mut self) -> MessageResult<Vec<u8>> {
        let reader = self.initialize_reading()?;
        let mut out = Vec::new();
        reader
            .read_to_end(&mut out)
            .map_err(|e| CodecError::from_io(e, "body bytes"))?;
        Ok(out)
    }

    fn write_with<F>(&mut self, context: &str, f: F) -> MessageResult<()>
    where
        F: FnOnce(&mut WritePipeline) -> io::Result<()>,
    {
        let writer = self.initialize_writing()?;
        f(writer).map_err(|e| MessageError::from(CodecError::from_io(e, context)))
    }

    fn read_with<T, F>(&mut self, context: &str, f: F) -> MessageResult<T>
    where
        F: FnOnce(&mut ReadPipeline) -> io::Result<T>,
    {
        let reader = self.initialize_reading()?;
        f(reader).map_err(|e| MessageError::from(CodecError::from_io(e, context)))
    }

    pub fn write_boolean(&mut self, value: bool) -> MessageResult<()> {
        self.write_with("boolean", |w| w.write_u8(u8::from(value)))
    }

    pub fn read_boolean(&mut self) -> MessageResult<bool> {
        self.read_with("boolean", |r| r.read_u8().map(|b| b != 0))
    }

    pub fn write_byte(&mut self, value: u8) -> MessageResult<()> {
        self.write_with("byte", |w| w.write_u8(value))
    }

    pub fn read_byte(&mut self) -> MessageResult<u8> {
        self.read_with("byte", |r| r.read_u8())
    }

    pub fn write_bytes(&mut self, value: &[u8]) -> MessageResult<()> {
        self.write_with("bytes", |w| w.write_all(value))
    }

    /// Append `length` bytes of `value` starting at `offset`.
    pub fn write_bytes_range(&mut self, value: &[u8], offset: usize, length: usize) -> MessageResult<()> {
        let range = offset
            .checked_add(length)
            .filter(|end| *end <= value.len())
            .map(|end| offset..end)
            .ok_or(MessageError::InvalidRange {
                offset,
                length,
                size: value.len(),
            })?;
        self.write_bytes(&value[range])
    }

    /// Fill `buf` from the body.
    ///
    /// Returns the number of bytes read, which is less than `buf.len()` only
    /// at the end of the body, or `None` when the body was already exhausted.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> MessageResult<Option<usize>> {
        if buf.is_empty() {
            self.initialize_reading()?;
            return Ok(Some(0));
        }
        self.read_with("bytes", |r| {
            let mut filled = 0;
            while filled < buf.len() {
                match r.read(&mut buf[filled..]) {
                    Ok(0) => break,
                    Ok(n) => filled += n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
            Ok(if filled == 0 { None } else { Some(filled) })
        })
    }

    /// Write one UTF-16 code unit.
    pub fn write_char(&mut self, value: u16) -> MessageResult<()> {
        self.write_with("char", |w| w.write_u16::<BigEndian>(value))
    }

    pub fn read_char(&mut self) -> MessageResult<u16> {
        self.read_with("char", |r| r.read_u16::<BigEndian>())
    }

    pub fn write_short(&mut self, value: i16) -> MessageResult<()> {
        self.write_with("short", |w| w.write_i16::<BigEndian>(value))
    }

    pub fn read_short(&mut self) -> MessageResult<i16> {
        self.read_with("short", |r| r.read_i16::<BigEndian>())
    }

    pub fn write_unsigned_short(&mut self, value: u16) -> MessageResult<()> {
        self.write_with("unsigned short", |w| w.write_u16::<BigEndian>(value))
    }

    pub fn read_unsigned_short(&mut self) -> MessageResult<u16> {
        self.read_with("unsigned short", |r| r.read_u16::<BigEndian>())
    }

    pub fn write_int(&mut self, value: i32) -> MessageResult<()> {
        self.write_with("int", |w| w.write_i32::<BigEndian>(value))
    }

    pub fn read_int(&mut self) -> MessageResult<i32> {
        self.read_with("int", |r| r.read_i32::<BigEndian>())
    }

    pub fn write_long(&mut self, value: i64) -> MessageResult<()> {
        self.write_with("long", |w| w.write_i64::<BigEndian>(value))
    }

    pub fn read_long(&mut self) -> MessageResult<i64> {
        self.read_with("long", |r| r.read_i64::<BigEndian>())
    }

    pub fn write_float(&mut self, value: f32) -> MessageResult<()> {
        self.write_with("float", |w| w.write_f32::<BigEndian>(value))
    }

    pub fn read_float(&mut self) -> MessageResult<f32> {
        self.read_with("float", |r| r.read_f32::<BigEndian>())
    }

    pub fn write_double(&mut self, value: f64) -> MessageResult<()> {
        self.write_with("double", |w| w.write_f64::<BigEndian>(value))
    }

    pub fn read_double(&mut self) -> MessageResult<f64> {
        self.read_with("double", |r| r.read_f64::<BigEndian>())
    }

    /// Raw UTF-16 code units, 2 bytes each, no length prefix.
    /// Read back with `read_char`.
    pub fn write_string(&mut self, value: &str) -> MessageResult<()> {
        let writer = self.initialize_writing()?;
        data::write_chars(writer, value)?;
        Ok(())
    }

    /// 2-byte length plus modified UTF-8.
    pub fn write_utf(&mut self, value: &str) -> MessageResult<()> {
        let writer = self.initialize_writing()?;
        data::write_utf(writer, value)?;
        Ok(())
    }

    pub fn read_utf(&mut self) -> MessageResult<String> {
        let reader = self.initialize_reading()?;
        Ok(data::read_utf(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageErrorKind;
    use openwire_codec::{CompressionPolicy, PrimitiveCodec};

    fn compressed_message() -> BytesMessage {
        BytesMessage::from_message(Message::with_settings(
            CompressionPolicy::enabled(-1),
            PrimitiveCodec::default(),
        ))
    }

    #[test]
    fn test_fifo_after_reset() {
        let mut msg = BytesMessage::new();
        msg.write_int(42).unwrap();
        msg.write_utf("hi").unwrap();
        msg.reset().unwrap();

        assert_eq!(msg.body_length().unwrap(), 4 + 2 + 2);
        assert_eq!(msg.read_int().unwrap(), 42);
        assert_eq!(msg.read_utf().unwrap(), "hi");
        assert!(msg.read_byte().unwrap_err().is_end_of_stream());
    }

    #[test]
    fn test_state_transitions() {
        let mut msg = BytesMessage::new();
        assert_eq!(msg.body_state(), MessageBodyState::Fresh);
        msg.write_boolean(true).unwrap();
        assert_eq!(msg.body_state(), MessageBodyState::Writing);
        msg.store_content().unwrap();
        assert_eq!(msg.body_state(), MessageBodyState::Stored);
        msg.message_mut().set_read_only_body(true);
        msg.read_boolean().unwrap();
        assert_eq!(msg.body_state(), MessageBodyState::Reading);
        msg.clear_body();
        assert_eq!(msg.body_state(), MessageBodyState::Fresh);
    }

    #[test]
    fn test_write_after_reset_fails_before_touching_content() {
        let mut msg = BytesMessage::new();
        msg.write_long(7).unwrap();
        msg.reset().unwrap();
        let before = msg.message().content().clone();

        let err = msg.write_int(1).unwrap_err();
        assert_eq!(err.kind(), MessageErrorKind::NotWriteable);
        assert!(err.is_state_violation());
        assert_eq!(msg.message().content(), &before);
        assert_eq!(msg.body_state(), MessageBodyState::Stored);
    }

    #[test]
    fn test_read_on_fresh_message_fails() {
        let mut msg = BytesMessage::new();
        let err = msg.read_int().unwrap_err();
        assert_eq!(err.kind(), MessageErrorKind::NotReadable);
        assert_eq!(msg.body_state(), MessageBodyState::Fresh);
    }

    #[test]
    fn test_clear_body_allows_fresh_writes() {
        let mut msg = BytesMessage::new();
        msg.write_int(1).unwrap();
        msg.reset().unwrap();
        msg.clear_body();
        assert_eq!(msg.body_length().unwrap(), 0);
        msg.write_short(5).unwrap();
        assert_eq!(msg.body_length().unwrap(), 2);
        msg.reset().unwrap();
        assert_eq!(msg.read_short().unwrap(), 5);
    }

    #[test]
    fn test_on_send_keeps_mode() {
        let mut msg = BytesMessage::new();
        msg.write_byte(9).unwrap();
        msg.on_send().unwrap();
        assert!(!msg.is_read_only_body());
        assert_eq!(msg.message().content().as_ref(), &[9]);
    }

    #[test]
    fn test_compressed_body_round_trip() {
        let mut msg = compressed_message();
        msg.write_bytes(&[0u8; 1000]).unwrap();
        msg.store_content().unwrap();

        let content = msg.message().content().clone();
        assert!(msg.message().is_compressed());
        assert_eq!(&content[..4], &1000i32.to_be_bytes());

        msg.reset().unwrap();
        assert_eq!(msg.body_length().unwrap(), 1000);
        assert_eq!(msg.body_bytes().unwrap(), vec![0u8; 1000]);
    }

    #[test]
    fn test_empty_store_keeps_earlier_content() {
        let mut msg = compressed_message();
        msg.initialize_writing().unwrap();
        msg.store_content().unwrap();
        assert!(msg.message().content().is_empty());
        assert!(!msg.message().is_compressed());

        msg.write_int(7).unwrap();
        msg.on_send().unwrap();
        let stored = msg.message().content().clone();
        assert!(msg.message().is_compressed());

        msg.write_bytes(&[]).unwrap();
        msg.on_send().unwrap();
        assert_eq!(msg.message().content(), &stored);
        assert!(msg.message().is_compressed());

        msg.reset().unwrap();
        assert_eq!(msg.read_int().unwrap(), 7);
    }

    #[test]
    fn test_empty_store_keeps_plain_content() {
        let mut msg = BytesMessage::new();
        msg.write_int(7).unwrap();
        msg.on_send().unwrap();
        msg.write_bytes(&[]).unwrap();
        msg.on_send().unwrap();
        assert_eq!(msg.message().content().as_ref(), &[0, 0, 0, 7]);
        assert!(!msg.message().is_compressed());
    }

    #[test]
    fn test_reset_on_empty_body_is_stored() {
        let mut msg = BytesMessage::new();
        msg.reset().unwrap();
        assert!(msg.is_read_only_body());
        assert_eq!(msg.body_state(), MessageBodyState::Stored);
        assert_eq!(msg.body_length().unwrap(), 0);
        assert_eq!(msg.body_state(), MessageBodyState::Reading);
        msg.clear_body();
        assert_eq!(msg.body_state(), MessageBodyState::Fresh);
    }

    #[test]
    fn test_writer_follows_injected_policy() {
        let mut plain = BytesMessage::new();
        assert!(!plain.initialize_writing().unwrap().is_compressed());

        let mut compressed = compressed_message();
        assert!(compressed.initialize_writing().unwrap().is_compressed());
    }

    #[test]
    fn test_read_bytes_partial_then_exhausted() {
        let mut msg = BytesMessage::new();
        msg.set_body_bytes(&[1, 2, 3]).unwrap();
        msg.reset().unwrap();

        let mut buf = [0u8; 2];
        assert_eq!(msg.read_bytes(&mut buf).unwrap(), Some(2));
        assert_eq!(buf, [1, 2]);
        assert_eq!(msg.read_bytes(&mut buf).unwrap(), Some(1));
        assert_eq!(buf[0], 3);
        assert_eq!(msg.read_bytes(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_write_bytes_range_bounds() {
        let mut msg = BytesMessage::new();
        msg.write_bytes_range(&[1, 2, 3, 4], 1, 2).unwrap();
        let err = msg.write_bytes_range(&[1, 2], 1, 5).unwrap_err();
        assert_eq!(err.kind(), MessageErrorKind::InvalidArgument);
        msg.reset().unwrap();
        assert_eq!(msg.body_bytes().unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_write_string_is_raw_utf16() {
        let mut msg = BytesMessage::new();
        msg.write_string("hé").unwrap();
        msg.reset().unwrap();
        assert_eq!(msg.body_length().unwrap(), 4);
        assert_eq!(msg.read_char().unwrap(), u16::from(b'h'));
        assert_eq!(msg.read_char().unwrap(), 0x00E9);
    }

    #[test]
    fn test_reading_stores_pending_writes() {
        let mut msg = BytesMessage::new();
        msg.write_int(3).unwrap();
        msg.message_mut().set_read_only_body(true);
        assert_eq!(msg.read_int().unwrap(), 3);
    }
}

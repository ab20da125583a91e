//! Stream message body
//!
//! An ordered list of primitive values. Writes append; reads walk the list
//! with a cursor and convert each element with the CMS rules. The list is
//! stored in the message content with the primitive list encoding.

use crate::error::{MessageError, MessageResult};
use crate::message::Message;
use openwire_types::{FromValue, Value, ValueList};
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct StreamMessage {
    message: Message,
    list: Option<ValueList>,
    position: usize,
}

impl StreamMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_message(message: Message) -> Self {
        Self {
            message,
            list: None,
            position: 0,
        }
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }

    fn load(&mut self) -> MessageResult<&mut ValueList> {
        let list = match self.list.take() {
            Some(list) => list,
            None => {
                let list = self.message.codec().decode_list(self.message.content())?;
                trace!(elements = list.len(), "decoded stream message body");
                list
            }
        };
        Ok(self.list.insert(list))
    }

    /// Number of elements in the body.
    pub fn len(&mut self) -> MessageResult<usize> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&mut self) -> MessageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Index of the next element to be read.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Append a value. Fails on a read-only body.
    pub fn write_value(&mut self, value: impl Into<Value>) -> MessageResult<()> {
        self.message.fail_if_read_only_body()?;
        self.load()?.push(value);
        Ok(())
    }

    pub fn write_boolean(&mut self, value: bool) -> MessageResult<()> {
        self.write_value(value)
    }

    pub fn write_byte(&mut self, value: u8) -> MessageResult<()> {
        self.write_value(value)
    }

    pub fn write_bytes(&mut self, value: &[u8]) -> MessageResult<()> {
        self.write_value(value)
    }

    /// Append `length` bytes of `value` starting at `offset` as one element.
    pub fn write_bytes_range(&mut self, value: &[u8], offset: usize, length: usize) -> MessageResult<()> {
        let end = offset
            .checked_add(length)
            .filter(|end| *end <= value.len())
            .ok_or(MessageError::InvalidRange {
                offset,
                length,
                size: value.len(),
            })?;
        self.write_bytes(&value[offset..end])
    }

    pub fn write_char(&mut self, value: u16) -> MessageResult<()> {
        self.write_value(Value::Char(value))
    }

    pub fn write_short(&mut self, value: i16) -> MessageResult<()> {
        self.write_value(value)
    }

    pub fn write_int(&mut self, value: i32) -> MessageResult<()> {
        self.write_value(value)
    }

    pub fn write_long(&mut self, value: i64) -> MessageResult<()> {
        self.write_value(value)
    }

    pub fn write_float(&mut self, value: f32) -> MessageResult<()> {
        self.write_value(value)
    }

    pub fn write_double(&mut self, value: f64) -> MessageResult<()> {
        self.write_value(value)
    }

    pub fn write_string(&mut self, value: &str) -> MessageResult<()> {
        self.write_value(value)
    }

    /// Next element converted to `T`.
    ///
    /// The cursor advances only when the conversion succeeds, so a failed
    /// read can be retried with another type.
    pub fn read_as<T: FromValue>(&mut self) -> MessageResult<T> {
        self.message.fail_if_write_only_body()?;
        let position = self.position;
        let list = self.load()?;
        let len = list.len();
        let value = list
            .get(position)
            .ok_or(MessageError::EndOfBody { position, len })?;
        let converted = T::from_value(value)?;
        self.position += 1;
        Ok(converted)
    }

    /// Next element without conversion.
    pub fn read_value(&mut self) -> MessageResult<Value> {
        self.message.fail_if_write_only_body()?;
        let position = self.position;
        let list = self.load()?;
        let len = list.len();
        let value = list
            .get(position)
            .cloned()
            .ok_or(MessageError::EndOfBody { position, len })?;
        self.position += 1;
        Ok(value)
    }

    pub fn read_boolean(&mut self) -> MessageResult<bool> {
        self.read_as()
    }

    pub fn read_byte(&mut self) -> MessageResult<u8> {
        self.read_as()
    }

    pub fn read_bytes(&mut self) -> MessageResult<Vec<u8>> {
        self.read_as()
    }

    pub fn read_char(&mut self) -> MessageResult<u16> {
        self.read_as()
    }

    pub fn read_short(&mut self) -> MessageResult<i16> {
        self.read_as()
    }

    pub fn read_int(&mut self) -> MessageResult<i32> {
        self.read_as()
    }

    pub fn read_long(&mut self) -> MessageResult<i64> {
        self.read_as()
    }

    pub fn read_float(&mut self) -> MessageResult<f32> {
        self.read_as()
    }

    pub fn read_double(&mut self) -> MessageResult<f64> {
        self.read_as()
    }

    pub fn read_string(&mut self) -> MessageResult<String> {
        self.read_as()
    }

    /// Make the body read-only and rewind the cursor.
    pub fn reset(&mut self) {
        self.message.set_read_only_body(true);
        self.position = 0;
    }

    pub fn clear_body(&mut self) {
        self.message.clear_body();
        self.list = Some(ValueList::new());
        self.position = 0;
    }

    /// Encode properties and the list body into the message content.
    ///
    /// An empty list leaves the content empty.
    pub fn before_marshal(&mut self) -> MessageResult<()> {
        self.message.before_marshal()?;
        let Some(list) = self.list.as_ref() else {
            return Ok(());
        };
        let content = if list.is_empty() {
            Vec::new()
        } else {
            self.message.codec().encode_list(Some(list))?
        };
        trace!(elements = list.len(), bytes = content.len(), "encoded stream message body");
        self.message.set_content(content);
        self.message.set_compressed(false);
        Ok(())
    }

    /// Decode properties; the body is decoded again on next access.
    pub fn after_unmarshal(&mut self) -> MessageResult<()> {
        self.message.after_unmarshal()?;
        self.list = None;
        self.position = 0;
        Ok(())
    }
}

//! Map message body
//!
//! Named values stored as a primitive map in the message content. The map
//! is decoded lazily on first access and encoded back by `before_marshal`.

use crate::error::MessageResult;
use crate::message::Message;
use openwire_types::{FromValue, Value, ValueMap};
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct MapMessage {
    message: Message,
    map: Option<ValueMap>,
}

impl MapMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_message(message: Message) -> Self {
        Self { message, map: None }
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }

    /// Decoded body, loading it from content on first use.
    pub fn map(&mut self) -> MessageResult<&ValueMap> {
        Ok(self.load()?)
    }

    fn load(&mut self) -> MessageResult<&mut ValueMap> {
        let map = match self.map.take() {
            Some(map) => map,
            None => {
                let map = self.message.codec().decode_map(self.message.content())?;
                trace!(entries = map.len(), "decoded map message body");
                map
            }
        };
        Ok(self.map.insert(map))
    }

    pub fn map_names(&mut self) -> MessageResult<Vec<String>> {
        Ok(self.load()?.keys().map(str::to_owned).collect())
    }

    pub fn item_exists(&mut self, name: &str) -> MessageResult<bool> {
        Ok(self.load()?.contains_key(name))
    }

    pub fn get_value(&mut self, name: &str) -> MessageResult<Option<Value>> {
        Ok(self.load()?.get(name).cloned())
    }

    /// Entry converted with the CMS rules. A missing name is a `NotFound` error.
    pub fn get_as<T: FromValue>(&mut self, name: &str) -> MessageResult<T> {
        Ok(self.load()?.get_as(name)?)
    }

    pub fn get_boolean(&mut self, name: &str) -> MessageResult<bool> {
        self.get_as(name)
    }

    pub fn get_byte(&mut self, name: &str) -> MessageResult<u8> {
        self.get_as(name)
    }

    pub fn get_bytes(&mut self, name: &str) -> MessageResult<Vec<u8>> {
        self.get_as(name)
    }

    pub fn get_char(&mut self, name: &str) -> MessageResult<u16> {
        self.get_as(name)
    }

    pub fn get_short(&mut self, name: &str) -> MessageResult<i16> {
        self.get_as(name)
    }

    pub fn get_int(&mut self, name: &str) -> MessageResult<i32> {
        self.get_as(name)
    }

    pub fn get_long(&mut self, name: &str) -> MessageResult<i64> {
        self.get_as(name)
    }

    pub fn get_float(&mut self, name: &str) -> MessageResult<f32> {
        self.get_as(name)
    }

    pub fn get_double(&mut self, name: &str) -> MessageResult<f64> {
        self.get_as(name)
    }

    pub fn get_string(&mut self, name: &str) -> MessageResult<String> {
        self.get_as(name)
    }

    /// Insert or replace an entry. Fails on a read-only body.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<Value>) -> MessageResult<()> {
        self.message.fail_if_read_only_body()?;
        self.load()?.insert(name, value);
        Ok(())
    }

    pub fn set_boolean(&mut self, name: impl Into<String>, value: bool) -> MessageResult<()> {
        self.set_value(name, value)
    }

    pub fn set_byte(&mut self, name: impl Into<String>, value: u8) -> MessageResult<()> {
        self.set_value(name, value)
    }

    pub fn set_bytes(&mut self, name: impl Into<String>, value: &[u8]) -> MessageResult<()> {
        self.set_value(name, value)
    }

    pub fn set_char(&mut self, name: impl Into<String>, value: u16) -> MessageResult<()> {
        self.set_value(name, Value::Char(value))
    }

    pub fn set_short(&mut self, name: impl Into<String>, value: i16) -> MessageResult<()> {
        self.set_value(name, value)
    }

    pub fn set_int(&mut self, name: impl Into<String>, value: i32) -> MessageResult<()> {
        self.set_value(name, value)
    }

    pub fn set_long(&mut self, name: impl Into<String>, value: i64) -> MessageResult<()> {
        self.set_value(name, value)
    }

    pub fn set_float(&mut self, name: impl Into<String>, value: f32) -> MessageResult<()> {
        self.set_value(name, value)
    }

    pub fn set_double(&mut self, name: impl Into<String>, value: f64) -> MessageResult<()> {
        self.set_value(name, value)
    }

    pub fn set_string(&mut self, name: impl Into<String>, value: &str) -> MessageResult<()> {
        self.set_value(name, value)
    }

    pub fn clear_body(&mut self) {
        self.message.clear_body();
        self.map = Some(ValueMap::new());
    }

    /// Mark the body read-only, as on delivery.
    pub fn reset(&mut self) {
        self.message.set_read_only_body(true);
    }

    /// Encode properties and the map body into the message content.
    ///
    /// An empty map leaves the content empty.
    pub fn before_marshal(&mut self) -> MessageResult<()> {
        self.message.before_marshal()?;
        let Some(map) = self.map.as_ref() else {
            return Ok(());
        };
        let content = if map.is_empty() {
            Vec::new()
        } else {
            self.message.codec().encode_map(Some(map))?
        };
        trace!(entries = map.len(), bytes = content.len(), "encoded map message body");
        self.message.set_content(content);
        self.message.set_compressed(false);
        Ok(())
    }

    /// Decode properties; the body is decoded again on next access.
    pub fn after_unmarshal(&mut self) -> MessageResult<()> {
        self.message.after_unmarshal()?;
        self.map = None;
        Ok(())
    }
}

//! # Message Template
//!
//! State shared by every message type: persisted body content, the
//! compressed flag, read-only flags for body and properties, and the
//! application property map.
//!
//! Body types ([`BytesMessage`](crate::BytesMessage),
//! [`MapMessage`](crate::MapMessage), [`StreamMessage`](crate::StreamMessage))
//! own a `Message` and ask it for mode checks before touching their body.
//!
//! ## Body Modes
//!
//! A fresh message is write-only. `set_read_only_body(true)` (usually via a
//! body type's `reset()`, or on delivery) flips it to read-only;
//! [`Message::clear_body`] flips it back.
//!
//! ## Properties on the Wire
//!
//! [`Message::before_marshal`] encodes the property map into
//! `marshalled_properties`; [`Message::after_unmarshal`] decodes it back.

use crate::error::{MessageError, MessageResult};
use bytes::Bytes;
use openwire_codec::{CompressionPolicy, PrimitiveCodec};
use openwire_types::{FromValue, Value, ValueMap};
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct Message {
    content: Bytes,
    compressed: bool,
    read_only_body: bool,
    read_only_properties: bool,
    properties: ValueMap,
    marshalled_properties: Bytes,
    compression: CompressionPolicy,
    codec: PrimitiveCodec,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Message whose bodies follow `compression` and decode with `codec` limits.
    pub fn with_settings(compression: CompressionPolicy, codec: PrimitiveCodec) -> Self {
        Self {
            compression,
            codec,
            ..Self::default()
        }
    }

    pub fn compression_policy(&self) -> CompressionPolicy {
        self.compression
    }

    pub fn codec(&self) -> &PrimitiveCodec {
        &self.codec
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<Bytes>) {
        self.content = content.into();
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    pub fn set_compressed(&mut self, compressed: bool) {
        self.compressed = compressed;
    }

    pub fn is_read_only_body(&self) -> bool {
        self.read_only_body
    }

    pub fn set_read_only_body(&mut self, read_only: bool) {
        self.read_only_body = read_only;
    }

    pub fn is_read_only_properties(&self) -> bool {
        self.read_only_properties
    }

    pub fn set_read_only_properties(&mut self, read_only: bool) {
        self.read_only_properties = read_only;
    }

    pub fn fail_if_read_only_body(&self) -> MessageResult<()> {
        if self.read_only_body {
            return Err(MessageError::body_read_only());
        }
        Ok(())
    }

    pub fn fail_if_write_only_body(&self) -> MessageResult<()> {
        if !self.read_only_body {
            return Err(MessageError::NotReadable);
        }
        Ok(())
    }

    pub fn fail_if_read_only_properties(&self) -> MessageResult<()> {
        if self.read_only_properties {
            return Err(MessageError::properties_read_only());
        }
        Ok(())
    }

    /// Drop the persisted body and make it writable again.
    pub fn clear_body(&mut self) {
        self.content = Bytes::new();
        self.compressed = false;
        self.read_only_body = false;
    }

    pub fn properties(&self) -> &ValueMap {
        &self.properties
    }

    pub fn property_names(&self) -> Vec<String> {
        self.properties.keys().map(str::to_owned).collect()
    }

    pub fn property_exists(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn get_property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Property converted with the CMS rules.
    pub fn get_property_as<T: FromValue>(&self, name: &str) -> MessageResult<T> {
        Ok(self.properties.get_as(name)?)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Value>) -> MessageResult<()> {
        self.fail_if_read_only_properties()?;
        self.properties.insert(name, value);
        Ok(())
    }

    /// Remove every property and make the set writable again.
    pub fn clear_properties(&mut self) {
        self.properties.clear();
        self.marshalled_properties = Bytes::new();
        self.read_only_properties = false;
    }

    pub fn marshalled_properties(&self) -> &Bytes {
        &self.marshalled_properties
    }

    pub fn set_marshalled_properties(&mut self, bytes: impl Into<Bytes>) {
        self.marshalled_properties = bytes.into();
    }

    /// Encode properties ahead of wire marshalling. An empty map encodes as no bytes.
    pub fn before_marshal(&mut self) -> MessageResult<()> {
        self.marshalled_properties = if self.properties.is_empty() {
            Bytes::new()
        } else {
            Bytes::from(self.codec.encode_map(Some(&self.properties))?)
        };
        trace!(
            properties = self.properties.len(),
            bytes = self.marshalled_properties.len(),
            "marshalled message properties"
        );
        Ok(())
    }

    /// Rebuild the property map from `marshalled_properties`.
    pub fn after_unmarshal(&mut self) -> MessageResult<()> {
        self.codec
            .decode_map_into(&self.marshalled_properties, &mut self.properties)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageErrorKind;

    #[test]
    fn test_fresh_message_is_write_only() {
        let message = Message::new();
        assert!(message.fail_if_read_only_body().is_ok());
        assert_eq!(
            message.fail_if_write_only_body().unwrap_err().kind(),
            MessageErrorKind::NotReadable
        );
    }

    #[test]
    fn test_clear_body_restores_write_mode() {
        let mut message = Message::new();
        message.set_content(vec![1, 2, 3]);
        message.set_compressed(true);
        message.set_read_only_body(true);
        assert!(message.fail_if_read_only_body().is_err());

        message.clear_body();
        assert!(message.content().is_empty());
        assert!(!message.is_compressed());
        assert!(message.fail_if_read_only_body().is_ok());
    }

    #[test]
    fn test_properties_round_trip_through_marshalling() {
        let mut sent = Message::new();
        sent.set_property("count", 3i32).unwrap();
        sent.set_property("label", "blue").unwrap();
        sent.before_marshal().unwrap();

        let mut received = Message::new();
        received.set_marshalled_properties(sent.marshalled_properties().clone());
        received.after_unmarshal().unwrap();
        assert_eq!(received.properties(), sent.properties());
        assert_eq!(received.get_property_as::<i64>("count").unwrap(), 3);
    }

    #[test]
    fn test_empty_properties_marshal_to_nothing() {
        let mut message = Message::new();
        message.before_marshal().unwrap();
        assert!(message.marshalled_properties().is_empty());
        message.after_unmarshal().unwrap();
        assert!(message.properties().is_empty());
    }

    #[test]
    fn test_read_only_properties() {
        let mut message = Message::new();
        message.set_read_only_properties(true);
        let err = message.set_property("k", 1i32).unwrap_err();
        assert_eq!(err.kind(), MessageErrorKind::NotWriteable);
        assert!(err.to_string().contains("properties"));

        message.clear_properties();
        assert!(message.set_property("k", 1i32).is_ok());
    }
}

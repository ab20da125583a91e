//! Message creation with connection settings applied
//!
//! Every message created through a [`MessageFactory`] carries the
//! connection's compression policy and decode limits.

use crate::bytes_message::BytesMessage;
use crate::map_message::MapMessage;
use crate::message::Message;
use crate::stream_message::StreamMessage;
use openwire_codec::{CompressionPolicy, PrimitiveCodec};
use openwire_config::ConnectionConfig;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFactory {
    compression: CompressionPolicy,
    codec: PrimitiveCodec,
}

impl MessageFactory {
    pub fn new(compression: CompressionPolicy, codec: PrimitiveCodec) -> Self {
        Self { compression, codec }
    }

    pub fn from_config(config: &ConnectionConfig) -> Self {
        let factory = Self::new(
            config.compression_policy(),
            PrimitiveCodec::new(config.decode_limits()),
        );
        debug!(?factory, "message factory configured");
        factory
    }

    pub fn compression_policy(&self) -> CompressionPolicy {
        self.compression
    }

    pub fn create_message(&self) -> Message {
        Message::with_settings(self.compression, self.codec)
    }

    pub fn create_bytes_message(&self) -> BytesMessage {
        BytesMessage::from_message(self.create_message())
    }

    pub fn create_map_message(&self) -> MapMessage {
        MapMessage::from_message(self.create_message())
    }

    pub fn create_stream_message(&self) -> StreamMessage {
        StreamMessage::from_message(self.create_message())
    }
}

impl From<&ConnectionConfig> for MessageFactory {
    fn from(config: &ConnectionConfig) -> Self {
        Self::from_config(config)
    }
}

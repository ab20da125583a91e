//! # OpenWire CMS Messages
//!
//! ## Purpose
//!
//! Message types of the OpenWire client: the shared [`Message`] template
//! and the three body flavours built on it.
//!
//! - [`BytesMessage`]: typed primitives written and read in order, optionally
//!   zlib-compressed
//! - [`MapMessage`]: named primitive values
//! - [`StreamMessage`]: ordered primitive values read back with conversion
//!
//! ## Quick Start
//!
//! ```rust
//! use openwire_message::BytesMessage;
//!
//! let mut msg = BytesMessage::new();
//! msg.write_int(42).unwrap();
//! msg.write_utf("hi").unwrap();
//! msg.reset().unwrap();
//!
//! assert_eq!(msg.read_int().unwrap(), 42);
//! assert_eq!(msg.read_utf().unwrap(), "hi");
//! ```
//!
//! ## Architecture Role
//!
//! ```text
//! openwire-config ──▶ MessageFactory ──▶ Message / BytesMessage / MapMessage / StreamMessage
//!                                               │
//!                                               ▼
//!                                        openwire-codec ──▶ openwire-types
//! ```

pub mod bytes_message;
pub mod error;
pub mod factory;
pub mod map_message;
pub mod message;
pub mod stream_message;

pub use bytes_message::{BytesMessage, MessageBodyState};
pub use error::{MessageError, MessageErrorKind, MessageResult};
pub use factory::MessageFactory;
pub use map_message::MapMessage;
pub use message::Message;
pub use stream_message::StreamMessage;

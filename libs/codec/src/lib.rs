//! # OpenWire Primitive Codec
//!
//! ## Purpose
//!
//! This crate contains the byte-level rules shared by the OpenWire client:
//! - Primitive value marshalling (maps, lists and tagged scalars)
//! - Big-endian data helpers, including Java-compatible modified UTF-8
//! - Message body stream pipelines with optional zlib compression
//! - Codec error types and wire constants
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → [codec] → libs/message
//!     ↑           ↓            ↓
//! Value Model  Wire Rules   CMS Bodies
//! ValueMap     marshal_map  BytesMessage
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Message state (read-only flags, content ownership) belongs in `openwire-message`
//! - Transport framing and connection handling
//!
//! ## Quick Start
//!
//! ```rust
//! use openwire_codec::{decode_map, encode_map};
//! use openwire_types::ValueMap;
//!
//! let mut map = ValueMap::new();
//! map.insert("flag", true);
//! let bytes = encode_map(Some(&map)).unwrap();
//! assert_eq!(bytes, [0, 0, 0, 1, 0, 4, b'f', b'l', b'a', b'g', 1, 1]);
//! assert_eq!(decode_map(&bytes).unwrap(), map);
//! ```

pub mod constants;
pub mod data;
pub mod error;
pub mod marshal;
pub mod stream;

pub use constants::*;
pub use error::{CodecError, CodecResult, ErrorKind};
pub use marshal::{
    decode_list, decode_list_into, decode_map, decode_map_into, encode_list, encode_map,
    marshal_list, marshal_map, marshal_value, unmarshal_list, unmarshal_map, unmarshal_value,
    DecodeLimits, PrimitiveCodec,
};
pub use stream::{
    compression_from_level, CompressionPolicy, CountingWriter, FinishedBody, ReadPipeline,
    WritePipeline,
};

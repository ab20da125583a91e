//! # Primitive Types Marshaller
//!
//! ## Purpose
//!
//! Binary encoding of [`Value`], [`ValueMap`] and [`ValueList`] used for
//! message properties and for map/stream message bodies.
//!
//! ## Wire Layout (big-endian)
//!
//! ```text
//! map    := count:i32 { key:utf value }*        (count -1 = absent map)
//! list   := count:i32 { value }*                (count -1 = absent list)
//! value  := tag:u8 payload
//!
//! tag  payload
//!  0   -                         null
//!  1   u8 (0/1)                  boolean
//!  2   u8                        byte
//!  3   u16                       char
//!  4   i16                       short
//!  5   i32                       int
//!  6   i64                       long
//!  7   f64 bits                  double
//!  8   f32 bits                  float
//!  9   len:u16 utf8-bytes        string, len <= 8191
//! 10   len:i32 bytes             byte array
//! 11   map                       nested map
//! 12   list                      nested list
//! 13   len:i32 utf8-bytes        string, len > 8191
//! ```
//!
//! Map keys use the 2-byte-length modified UTF-8 form
//! ([`write_utf`](crate::data::write_utf)). String values are raw UTF-8.
//!
//! ## Decoding Rules
//!
//! - Decoding into an existing container clears it first.
//! - An empty input buffer is accepted and leaves the destination untouched.
//! - A count of zero or below yields an empty container.
//! - Unknown tags, negative payload lengths and nesting deeper than
//!   [`DecodeLimits::max_depth`] are format errors.
//! - A failure part way through may leave the destination partly filled.

use crate::constants::{DEFAULT_MAX_NESTING_DEPTH, MAX_SHORT_STRING_LEN, NULL_CONTAINER_SENTINEL};
use crate::data::{read_exact_vec, read_length, read_utf, write_length, write_utf};
use crate::error::{CodecError, CodecResult, IoContext};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use openwire_types::{Value, ValueList, ValueMap, ValueType};
use std::io::{Cursor, Read, Write};
use tracing::{debug, trace};

/// Bounds applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Deepest allowed list/map nesting below the top-level container.
    pub max_depth: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

/// Encoder/decoder for the primitive value format.
///
/// The free functions in this module use [`PrimitiveCodec::default`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveCodec {
    limits: DecodeLimits,
}

impl PrimitiveCodec {
    pub fn new(limits: DecodeLimits) -> Self {
        Self { limits }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self::new(DecodeLimits { max_depth })
    }

    pub fn limits(&self) -> DecodeLimits {
        self.limits
    }

    /// Encode a map, or the null sentinel when `map` is `None`.
    pub fn encode_map(&self, map: Option<&ValueMap>) -> CodecResult<Vec<u8>> {
        let mut out = Vec::new();
        marshal_map(&mut out, map)?;
        trace!(bytes = out.len(), "encoded primitive map");
        Ok(out)
    }

    /// Encode a list, or the null sentinel when `list` is `None`.
    pub fn encode_list(&self, list: Option<&ValueList>) -> CodecResult<Vec<u8>> {
        let mut out = Vec::new();
        marshal_list(&mut out, list)?;
        trace!(bytes = out.len(), "encoded primitive list");
        Ok(out)
    }

    pub fn decode_map(&self, bytes: &[u8]) -> CodecResult<ValueMap> {
        let mut map = ValueMap::new();
        self.decode_map_into(bytes, &mut map)?;
        Ok(map)
    }

    /// Replace the contents of `map` with the decoded entries.
    pub fn decode_map_into(&self, bytes: &[u8], map: &mut ValueMap) -> CodecResult<()> {
        if bytes.is_empty() {
            debug!("empty buffer, leaving destination map untouched");
            return Ok(());
        }
        let mut input = Cursor::new(bytes);
        map.clear();
        self.read_map_entries(&mut input, map, 0)
    }

    pub fn decode_list(&self, bytes: &[u8]) -> CodecResult<ValueList> {
        let mut list = ValueList::new();
        self.decode_list_into(bytes, &mut list)?;
        Ok(list)
    }

    /// Replace the contents of `list` with the decoded elements.
    pub fn decode_list_into(&self, bytes: &[u8], list: &mut ValueList) -> CodecResult<()> {
        if bytes.is_empty() {
            debug!("empty buffer, leaving destination list untouched");
            return Ok(());
        }
        let mut input = Cursor::new(bytes);
        list.clear();
        self.read_list_elements(&mut input, list, 0)
    }

    /// Read one map from a stream. The null sentinel reads as an empty map.
    pub fn unmarshal_map<R: Read>(&self, input: &mut R) -> CodecResult<ValueMap> {
        let mut map = ValueMap::new();
        self.read_map_entries(input, &mut map, 0)?;
        Ok(map)
    }

    /// Read one list from a stream. The null sentinel reads as an empty list.
    pub fn unmarshal_list<R: Read>(&self, input: &mut R) -> CodecResult<ValueList> {
        let mut list = ValueList::new();
        self.read_list_elements(input, &mut list, 0)?;
        Ok(list)
    }

    /// Read one tagged value from a stream.
    pub fn unmarshal_value<R: Read>(&self, input: &mut R) -> CodecResult<Value> {
        self.read_value(input, 0)
    }

    fn enter(&self, depth: usize) -> CodecResult<usize> {
        let next = depth + 1;
        if next > self.limits.max_depth {
            return Err(CodecError::DepthExceeded {
                max_depth: self.limits.max_depth,
            });
        }
        Ok(next)
    }

    fn read_count<R: Read>(input: &mut R, context: &str) -> CodecResult<usize> {
        let count = input.read_i32::<BigEndian>().context(context)?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn read_map_entries<R: Read>(
        &self,
        input: &mut R,
        map: &mut ValueMap,
        depth: usize,
    ) -> CodecResult<()> {
        let count = Self::read_count(input, "map entry count")?;
        for _ in 0..count {
            let key = read_utf(input)?;
            let value = self.read_value(input, depth)?;
            map.insert(key, value);
        }
        Ok(())
    }

    fn read_list_elements<R: Read>(
        &self,
        input: &mut R,
        list: &mut ValueList,
        depth: usize,
    ) -> CodecResult<()> {
        let count = Self::read_count(input, "list element count")?;
        for _ in 0..count {
            list.push(self.read_value(input, depth)?);
        }
        Ok(())
    }

    fn read_value<R: Read>(&self, input: &mut R, depth: usize) -> CodecResult<Value> {
        let tag = input.read_u8().context("value type tag")?;
        let value_type = ValueType::try_from(tag).map_err(|_| {
            debug!(tag, "unknown primitive type tag");
            CodecError::UnknownTag { tag }
        })?;

        let value = match value_type {
            ValueType::Null => Value::Null,
            ValueType::Boolean => Value::Boolean(input.read_u8().context("boolean value")? != 0),
            ValueType::Byte => Value::Byte(input.read_u8().context("byte value")?),
            ValueType::Char => Value::Char(input.read_u16::<BigEndian>().context("char value")?),
            ValueType::Short => Value::Short(input.read_i16::<BigEndian>().context("short value")?),
            ValueType::Integer => Value::Int(input.read_i32::<BigEndian>().context("int value")?),
            ValueType::Long => Value::Long(input.read_i64::<BigEndian>().context("long value")?),
            ValueType::Float => Value::Float(input.read_f32::<BigEndian>().context("float value")?),
            ValueType::Double => {
                Value::Double(input.read_f64::<BigEndian>().context("double value")?)
            }
            ValueType::ByteArray => {
                let len = read_length(input, "byte array length")?;
                Value::ByteArray(read_exact_vec(input, len, "byte array payload")?)
            }
            ValueType::String => {
                let len = input.read_u16::<BigEndian>().context("string length")?;
                Value::String(read_string(input, usize::from(len))?)
            }
            ValueType::BigString => {
                let len = read_length(input, "big string length")?;
                Value::String(read_string(input, len)?)
            }
            ValueType::List => {
                let depth = self.enter(depth)?;
                let mut list = ValueList::new();
                self.read_list_elements(input, &mut list, depth)?;
                Value::List(list)
            }
            ValueType::Map => {
                let depth = self.enter(depth)?;
                let mut map = ValueMap::new();
                self.read_map_entries(input, &mut map, depth)?;
                Value::Map(map)
            }
        };
        Ok(value)
    }
}

fn read_string<R: Read>(input: &mut R, len: usize) -> CodecResult<String> {
    let bytes = read_exact_vec(input, len, "string payload")?;
    String::from_utf8(bytes).map_err(|e| CodecError::invalid_utf8("string value", e))
}

/// Write a map, or the null sentinel when `map` is `None`.
pub fn marshal_map<W: Write>(out: &mut W, map: Option<&ValueMap>) -> CodecResult<()> {
    let Some(map) = map else {
        return out
            .write_i32::<BigEndian>(NULL_CONTAINER_SENTINEL)
            .context("null map sentinel");
    };
    write_length(out, map.len(), "map entry count")?;
    for (key, value) in map {
        write_utf(out, key)?;
        marshal_value(out, value)?;
    }
    Ok(())
}

/// Write a list, or the null sentinel when `list` is `None`.
pub fn marshal_list<W: Write>(out: &mut W, list: Option<&ValueList>) -> CodecResult<()> {
    let Some(list) = list else {
        return out
            .write_i32::<BigEndian>(NULL_CONTAINER_SENTINEL)
            .context("null list sentinel");
    };
    write_length(out, list.len(), "list element count")?;
    for value in list {
        marshal_value(out, value)?;
    }
    Ok(())
}

/// Write one tagged value.
pub fn marshal_value<W: Write>(out: &mut W, value: &Value) -> CodecResult<()> {
    match value {
        Value::Null => out.write_u8(ValueType::Null.tag()).context("null tag"),
        Value::Boolean(v) => {
            out.write_u8(ValueType::Boolean.tag()).context("boolean tag")?;
            out.write_u8(u8::from(*v)).context("boolean value")
        }
        Value::Byte(v) => {
            out.write_u8(ValueType::Byte.tag()).context("byte tag")?;
            out.write_u8(*v).context("byte value")
        }
        Value::Char(v) => {
            out.write_u8(ValueType::Char.tag()).context("char tag")?;
            out.write_u16::<BigEndian>(*v).context("char value")
        }
        Value::Short(v) => {
            out.write_u8(ValueType::Short.tag()).context("short tag")?;
            out.write_i16::<BigEndian>(*v).context("short value")
        }
        Value::Int(v) => {
            out.write_u8(ValueType::Integer.tag()).context("int tag")?;
            out.write_i32::<BigEndian>(*v).context("int value")
        }
        Value::Long(v) => {
            out.write_u8(ValueType::Long.tag()).context("long tag")?;
            out.write_i64::<BigEndian>(*v).context("long value")
        }
        Value::Float(v) => {
            out.write_u8(ValueType::Float.tag()).context("float tag")?;
            out.write_f32::<BigEndian>(*v).context("float value")
        }
        Value::Double(v) => {
            out.write_u8(ValueType::Double.tag()).context("double tag")?;
            out.write_f64::<BigEndian>(*v).context("double value")
        }
        Value::ByteArray(v) => {
            out.write_u8(ValueType::ByteArray.tag()).context("byte array tag")?;
            write_length(out, v.len(), "byte array length")?;
            out.write_all(v).context("byte array payload")
        }
        Value::String(s) => marshal_string(out, s),
        Value::List(list) => {
            out.write_u8(ValueType::List.tag()).context("list tag")?;
            marshal_list(out, Some(list))
        }
        Value::Map(map) => {
            out.write_u8(ValueType::Map.tag()).context("map tag")?;
            marshal_map(out, Some(map))
        }
    }
}

fn marshal_string<W: Write>(out: &mut W, s: &str) -> CodecResult<()> {
    let bytes = s.as_bytes();
    if bytes.len() > MAX_SHORT_STRING_LEN {
        out.write_u8(ValueType::BigString.tag()).context("big string tag")?;
        write_length(out, bytes.len(), "big string length")?;
    } else {
        out.write_u8(ValueType::String.tag()).context("string tag")?;
        out.write_u16::<BigEndian>(bytes.len() as u16)
            .context("string length")?;
    }
    out.write_all(bytes).context("string payload")
}

/// Encode a map with default limits.
pub fn encode_map(map: Option<&ValueMap>) -> CodecResult<Vec<u8>> {
    PrimitiveCodec::default().encode_map(map)
}

/// Encode a list with default limits.
pub fn encode_list(list: Option<&ValueList>) -> CodecResult<Vec<u8>> {
    PrimitiveCodec::default().encode_list(list)
}

pub fn decode_map(bytes: &[u8]) -> CodecResult<ValueMap> {
    PrimitiveCodec::default().decode_map(bytes)
}

pub fn decode_map_into(bytes: &[u8], map: &mut ValueMap) -> CodecResult<()> {
    PrimitiveCodec::default().decode_map_into(bytes, map)
}

pub fn decode_list(bytes: &[u8]) -> CodecResult<ValueList> {
    PrimitiveCodec::default().decode_list(bytes)
}

pub fn decode_list_into(bytes: &[u8], list: &mut ValueList) -> CodecResult<()> {
    PrimitiveCodec::default().decode_list_into(bytes, list)
}

pub fn unmarshal_map<R: Read>(input: &mut R) -> CodecResult<ValueMap> {
    PrimitiveCodec::default().unmarshal_map(input)
}

pub fn unmarshal_list<R: Read>(input: &mut R) -> CodecResult<ValueList> {
    PrimitiveCodec::default().unmarshal_list(input)
}

pub fn unmarshal_value<R: Read>(input: &mut R) -> CodecResult<Value> {
    PrimitiveCodec::default().unmarshal_value(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_single_boolean_entry_trace() {
        let mut map = ValueMap::new();
        map.insert("flag", true);
        let bytes = encode_map(Some(&map)).unwrap();
        assert_eq!(bytes, hex!("00000001 0004 666c6167 01 01"));
    }

    #[test]
    fn test_null_containers_write_sentinel() {
        assert_eq!(encode_map(None).unwrap(), hex!("ffffffff"));
        assert_eq!(encode_list(None).unwrap(), hex!("ffffffff"));
    }

    #[test]
    fn test_sentinel_decodes_to_empty() {
        assert!(decode_map(&hex!("ffffffff")).unwrap().is_empty());
        assert!(decode_list(&hex!("ffffffff")).unwrap().is_empty());
    }

    #[test_log::test]
    fn test_empty_buffer_leaves_destination() {
        let mut map = ValueMap::new();
        map.insert("keep", 1i32);
        decode_map_into(&[], &mut map).unwrap();
        assert_eq!(map.get_int("keep").unwrap(), 1);

        let mut list: ValueList = [1i32, 2].into_iter().collect();
        decode_list_into(&[], &mut list).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_decode_into_clears_existing() {
        let mut map = ValueMap::new();
        map.insert("stale", 1i32);
        let mut fresh = ValueMap::new();
        fresh.insert("new", 2i32);
        decode_map_into(&encode_map(Some(&fresh)).unwrap(), &mut map).unwrap();
        assert_eq!(map, fresh);
    }

    #[test]
    fn test_empty_string_keeps_short_form() {
        let mut out = Vec::new();
        marshal_value(&mut out, &Value::from("")).unwrap();
        assert_eq!(out, hex!("09 0000"));
        assert_eq!(unmarshal_value(&mut Cursor::new(out)).unwrap(), Value::from(""));
    }

    #[test]
    fn test_string_threshold() {
        let mut short = Vec::new();
        marshal_value(&mut short, &Value::String("a".repeat(8191))).unwrap();
        assert_eq!(&short[..3], &hex!("09 1fff"));
        assert_eq!(short.len(), 3 + 8191);

        let mut big = Vec::new();
        marshal_value(&mut big, &Value::String("a".repeat(8192))).unwrap();
        assert_eq!(&big[..5], &hex!("0d 00002000"));
        assert_eq!(big.len(), 5 + 8192);
        assert_eq!(
            unmarshal_value(&mut Cursor::new(big)).unwrap(),
            Value::String("a".repeat(8192))
        );
    }

    #[test_log::test]
    fn test_unknown_tag_is_format_error() {
        let err = unmarshal_value(&mut Cursor::new(hex!("0e"))).unwrap_err();
        assert!(matches!(err, CodecError::UnknownTag { tag: 14 }));
        assert_eq!(err.kind(), crate::ErrorKind::Format);
    }

    #[test]
    fn test_truncated_payload_is_eof() {
        let err = unmarshal_value(&mut Cursor::new(hex!("05 0000"))).unwrap_err();
        assert!(err.is_eof());
        let err = decode_map(&hex!("00000002 0001 61 01 01")).unwrap_err();
        assert!(err.is_eof());
    }

    #[test]
    fn test_negative_count_is_empty() {
        assert!(decode_list(&hex!("fffffff0")).unwrap().is_empty());
    }

    #[test]
    fn test_negative_byte_array_length_rejected() {
        let err = unmarshal_value(&mut Cursor::new(hex!("0a ffffffff"))).unwrap_err();
        assert!(matches!(err, CodecError::NegativeLength { length: -1, .. }));
    }

    #[test]
    fn test_depth_limit() {
        let mut value = Value::Int(1);
        for _ in 0..4 {
            value = Value::List(vec![value].into());
        }
        let mut out = Vec::new();
        marshal_value(&mut out, &value).unwrap();

        let strict = PrimitiveCodec::with_max_depth(3);
        assert!(matches!(
            strict.unmarshal_value(&mut Cursor::new(&out)).unwrap_err(),
            CodecError::DepthExceeded { max_depth: 3 }
        ));
        let relaxed = PrimitiveCodec::with_max_depth(4);
        assert_eq!(relaxed.unmarshal_value(&mut Cursor::new(&out)).unwrap(), value);
    }

    #[test]
    fn test_null_value_round_trip() {
        let mut list = ValueList::new();
        list.push(Value::Null);
        let bytes = encode_list(Some(&list)).unwrap();
        assert_eq!(bytes, hex!("00000001 00"));
        assert_eq!(decode_list(&bytes).unwrap(), list);
    }
}

//! Wire-level tests for primitive map/list marshalling
//!
//! Pins exact byte layouts so any change to tags, prefixes or byte order
//! shows up as a test failure rather than as a broker interop problem.

use hex_literal::hex;
use openwire_codec::{
    decode_list, decode_map, encode_list, encode_map, marshal_map, unmarshal_list,
    unmarshal_map, CodecError, ErrorKind,
};
use openwire_types::{Value, ValueList, ValueMap, ValueType};
use std::io::Cursor;

fn sample_map() -> ValueMap {
    let mut inner = ValueMap::new();
    inner.insert("depth", 2i32);
    inner.insert("bytes", vec![0xCAu8, 0xFE]);

    let mut list = ValueList::new();
    list.push(Value::Null);
    list.push(Value::Char(u16::from(b'z')));
    list.push(Value::Map(inner.clone()));

    let mut map = ValueMap::new();
    map.insert("bool", false);
    map.insert("byte", 0x7Fu8);
    map.insert("short", -2i16);
    map.insert("int", i32::MIN);
    map.insert("long", i64::MAX);
    map.insert("float", 1.25f32);
    map.insert("double", -0.5f64);
    map.insert("string", "héllo wörld");
    map.insert("list", list);
    map.insert("map", inner);
    map
}

#[test]
fn test_every_tag_round_trips() {
    let map = sample_map();
    let bytes = encode_map(Some(&map)).unwrap();
    let decoded = decode_map(&bytes).unwrap();
    assert_eq!(decoded, map);
    assert_eq!(decoded.get("list").unwrap().value_type(), ValueType::List);
}

#[test]
fn test_encoding_is_deterministic() {
    let a = encode_map(Some(&sample_map())).unwrap();
    let b = encode_map(Some(&sample_map())).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_scalar_layouts() {
    let mut list = ValueList::new();
    list.push(true);
    list.push(0x12u8);
    list.push(Value::Char(0x0041));
    list.push(0x0102i16);
    list.push(0x01020304i32);
    list.push(0x0102030405060708i64);
    list.push(1.0f64);
    list.push(1.0f32);
    list.push(vec![9u8]);

    let bytes = encode_list(Some(&list)).unwrap();
    let expected = hex!(
        "00000009
         01 01
         02 12
         03 0041
         04 0102
         05 01020304
         06 0102030405060708
         07 3ff0000000000000
         08 3f800000
         0a 00000001 09"
    );
    assert_eq!(bytes, expected);
    assert_eq!(decode_list(&bytes).unwrap(), list);
}

#[test]
fn test_nested_containers_use_container_tags() {
    let mut inner = ValueList::new();
    inner.push(1i32);
    let mut map = ValueMap::new();
    map.insert("l", inner);

    let bytes = encode_map(Some(&map)).unwrap();
    assert_eq!(bytes, hex!("00000001 0001 6c 0c 00000001 05 00000001"));
}

#[test]
fn test_stream_functions_share_source() {
    let map = sample_map();
    let mut list = ValueList::new();
    list.push("after");

    let mut out = Vec::new();
    marshal_map(&mut out, Some(&map)).unwrap();
    openwire_codec::marshal_list(&mut out, Some(&list)).unwrap();

    let mut input = Cursor::new(out);
    assert_eq!(unmarshal_map(&mut input).unwrap(), map);
    assert_eq!(unmarshal_list(&mut input).unwrap(), list);
}

#[test]
fn test_non_ascii_keys_use_modified_utf8() {
    let mut map = ValueMap::new();
    map.insert("\0k", 1u8);
    let bytes = encode_map(Some(&map)).unwrap();
    assert_eq!(bytes, hex!("00000001 0003 c080 6b 02 01"));
    assert_eq!(decode_map(&bytes).unwrap(), map);
}

#[test]
fn test_invalid_utf8_string_value() {
    let err = decode_list(&hex!("00000001 09 0002 c328")).unwrap_err();
    assert!(matches!(err, CodecError::InvalidUtf8 { .. }));
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_unknown_tag_inside_map() {
    let err = decode_map(&hex!("00000001 0001 61 63")).unwrap_err();
    assert!(matches!(err, CodecError::UnknownTag { tag: 0x63 }));
}

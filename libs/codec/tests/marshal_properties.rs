//! Property-based round-trip tests for the primitive marshaller

use openwire_codec::{decode_list, decode_map, encode_list, encode_map};
use openwire_types::{Value, ValueList, ValueMap};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Boolean),
        any::<u8>().prop_map(Value::Byte),
        any::<u16>().prop_map(Value::Char),
        any::<i16>().prop_map(Value::Short),
        any::<i32>().prop_map(Value::Int),
        any::<i64>().prop_map(Value::Long),
        any::<f32>().prop_map(Value::Float),
        any::<f64>().prop_map(Value::Double),
        ".{0,40}".prop_map(Value::String),
        prop::collection::vec(any::<u8>(), 0..64).prop_map(Value::ByteArray),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8)
                .prop_map(|items| Value::List(ValueList::from(items))),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..8)
                .prop_map(|entries| Value::Map(entries.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn map_round_trip(entries in prop::collection::btree_map(".{0,12}", value(), 0..16)) {
        let map: ValueMap = entries.into_iter().collect();
        let bytes = encode_map(Some(&map)).unwrap();
        prop_assert_eq!(decode_map(&bytes).unwrap(), map);
    }

    #[test]
    fn list_round_trip(items in prop::collection::vec(value(), 0..16)) {
        let list = ValueList::from(items);
        let bytes = encode_list(Some(&list)).unwrap();
        prop_assert_eq!(decode_list(&bytes).unwrap(), list);
    }

    #[test]
    fn long_strings_cross_threshold(len in 8000usize..8400) {
        let mut list = ValueList::new();
        list.push("x".repeat(len));
        let bytes = encode_list(Some(&list)).unwrap();
        let expected_tag = if len > 8191 { 13 } else { 9 };
        prop_assert_eq!(bytes[4], expected_tag);
        prop_assert_eq!(decode_list(&bytes).unwrap(), list);
    }

    #[test]
    fn truncation_never_panics(items in prop::collection::vec(value(), 1..6), cut in 1usize..64) {
        let list = ValueList::from(items);
        let bytes = encode_list(Some(&list)).unwrap();
        let end = bytes.len().saturating_sub(cut).max(1);
        let _ = decode_list(&bytes[..end]);
    }
}

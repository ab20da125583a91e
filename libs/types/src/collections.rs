//! # Value Containers
//!
//! [`ValueList`] and [`ValueMap`] are the payloads of `Value::List` and
//! `Value::Map`, and also the top-level bodies of stream and map messages.
//!
//! `ValueMap` keeps its keys sorted, so encoding the same map twice yields
//! the same bytes and one iteration visits every key exactly once.
//!
//! Typed getters (`get_int`, `get_string`, ...) apply the
//! [`FromValue`] conversion table; a missing key or index is reported as
//! [`ValueError::NoSuchKey`] / [`ValueError::IndexOutOfBounds`].

use crate::{FromValue, Value, ValueError, ValueResult};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// Ordered, index-addressable sequence of values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueList {
    items: Vec<Value>,
}

impl ValueList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    /// Replace the value at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> ValueResult<Value> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(ValueError::IndexOutOfBounds { index, len })?;
        Ok(std::mem::replace(slot, value.into()))
    }

    pub fn remove(&mut self, index: usize) -> ValueResult<Value> {
        if index >= self.items.len() {
            return Err(ValueError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// Value at `index`, converted with the CMS table.
    pub fn get_as<T: FromValue>(&self, index: usize) -> ValueResult<T> {
        let value = self.items.get(index).ok_or(ValueError::IndexOutOfBounds {
            index,
            len: self.items.len(),
        })?;
        T::from_value(value)
    }

    pub fn get_bool(&self, index: usize) -> ValueResult<bool> {
        self.get_as(index)
    }

    pub fn get_byte(&self, index: usize) -> ValueResult<u8> {
        self.get_as(index)
    }

    pub fn get_char(&self, index: usize) -> ValueResult<u16> {
        self.get_as(index)
    }

    pub fn get_short(&self, index: usize) -> ValueResult<i16> {
        self.get_as(index)
    }

    pub fn get_int(&self, index: usize) -> ValueResult<i32> {
        self.get_as(index)
    }

    pub fn get_long(&self, index: usize) -> ValueResult<i64> {
        self.get_as(index)
    }

    pub fn get_float(&self, index: usize) -> ValueResult<f32> {
        self.get_as(index)
    }

    pub fn get_double(&self, index: usize) -> ValueResult<f64> {
        self.get_as(index)
    }

    pub fn get_string(&self, index: usize) -> ValueResult<String> {
        self.get_as(index)
    }

    pub fn get_bytes(&self, index: usize) -> ValueResult<Vec<u8>> {
        self.get_as(index)
    }
}

impl From<Vec<Value>> for ValueList {
    fn from(items: Vec<Value>) -> Self {
        Self { items }
    }
}

impl<V: Into<Value>> FromIterator<V> for ValueList {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<V: Into<Value>> Extend<V> for ValueList {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        self.items.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for ValueList {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for ValueList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

/// String-keyed values with unique, sorted keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueMap {
    entries: BTreeMap<String, Value>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Insert or replace, returning the previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// Value for `key`, converted with the CMS table.
    pub fn get_as<T: FromValue>(&self, key: &str) -> ValueResult<T> {
        let value = self.entries.get(key).ok_or_else(|| ValueError::NoSuchKey {
            key: key.to_owned(),
        })?;
        T::from_value(value)
    }

    pub fn get_bool(&self, key: &str) -> ValueResult<bool> {
        self.get_as(key)
    }

    pub fn get_byte(&self, key: &str) -> ValueResult<u8> {
        self.get_as(key)
    }

    pub fn get_char(&self, key: &str) -> ValueResult<u16> {
        self.get_as(key)
    }

    pub fn get_short(&self, key: &str) -> ValueResult<i16> {
        self.get_as(key)
    }

    pub fn get_int(&self, key: &str) -> ValueResult<i32> {
        self.get_as(key)
    }

    pub fn get_long(&self, key: &str) -> ValueResult<i64> {
        self.get_as(key)
    }

    pub fn get_float(&self, key: &str) -> ValueResult<f32> {
        self.get_as(key)
    }

    pub fn get_double(&self, key: &str) -> ValueResult<f64> {
        self.get_as(key)
    }

    pub fn get_string(&self, key: &str) -> ValueResult<String> {
        self.get_as(key)
    }

    pub fn get_bytes(&self, key: &str) -> ValueResult<Vec<u8>> {
        self.get_as(key)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for ValueMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for ValueMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_typed_getters_convert() {
        let list: ValueList = vec![Value::Byte(5), Value::from("17"), Value::Double(0.5)].into();
        assert_eq!(list.get_long(0).unwrap(), 5);
        assert_eq!(list.get_int(1).unwrap(), 17);
        assert_eq!(list.get_string(2).unwrap(), "0.5");
        assert!(list.get_float(2).is_err());
    }

    #[test]
    fn test_list_index_out_of_bounds() {
        let mut list = ValueList::new();
        list.push(1i32);
        let err = list.get_int(3).unwrap_err();
        assert_eq!(err, ValueError::IndexOutOfBounds { index: 3, len: 1 });
        assert!(err.is_missing());
        assert!(list.set(1, 2i32).is_err());
        assert_eq!(list.set(0, 9i32).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_map_keys_unique_and_sorted() {
        let mut map = ValueMap::new();
        map.insert("zeta", 1i32);
        map.insert("alpha", 2i32);
        assert_eq!(map.insert("zeta", 3i32), Some(Value::Int(1)));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_map_missing_key() {
        let map = ValueMap::new();
        assert_eq!(
            map.get_bool("absent").unwrap_err(),
            ValueError::NoSuchKey {
                key: "absent".to_string()
            }
        );
    }

    #[test]
    fn test_collect_into_containers() {
        let map: ValueMap = [("a", 1i64), ("b", 2i64)].into_iter().collect();
        assert_eq!(map.get_long("b").unwrap(), 2);
        let list: ValueList = ["x", "y"].into_iter().collect();
        assert_eq!(list.to_string(), "[x, y]");
    }
}

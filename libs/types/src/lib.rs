//! # OpenWire Primitive Types
//!
//! Tagged value model carried by OpenWire property maps and by CMS map and
//! stream message bodies.
//!
//! ## Design Philosophy
//!
//! - **Closed Variant Set**: [`Value`] holds exactly one primitive, string,
//!   byte array, list or map; the tag and payload can never disagree
//! - **Owned Payloads**: containers own their children, clone is deep
//! - **Strict vs Converting Access**: `Value::as_*` never coerces, while
//!   [`FromValue`] implements the CMS conversion table
//!
//! ## Quick Start
//!
//! ```rust
//! use openwire_types::{Value, ValueList, ValueMap, ValueType};
//!
//! let mut props = ValueMap::new();
//! props.insert("priority", 4i32);
//! props.insert("tags", ["a", "b"].into_iter().collect::<ValueList>());
//!
//! assert_eq!(props.get_long("priority").unwrap(), 4);
//! assert_eq!(props.get("tags").unwrap().value_type(), ValueType::List);
//! assert!(Value::Int(4).as_long().is_err());
//! ```
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → libs/codec → libs/message
//!     ↑            ↓             ↓
//!  Value Model  Wire Bytes   CMS Bodies
//! ```
//!
//! This crate has no I/O. Binary encoding lives in `openwire-codec`.

pub mod collections;
pub mod convert;
pub mod error;
pub mod value;
pub mod value_type;

pub use collections::{ValueList, ValueMap};
pub use convert::FromValue;
pub use error::{ValueError, ValueResult};
pub use value::Value;
pub use value_type::ValueType;

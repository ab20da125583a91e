//! # OpenWire Client Configuration
//!
//! Connection-level settings for the OpenWire client, loaded from TOML
//! with environment overrides.
//!
//! ## Features
//!
//! - **Compression Policy**: whether message bodies are deflated, and at which level
//! - **Codec Limits**: nesting bound applied when decoding maps and lists
//! - **Defaults**: constants used when a setting is absent
//!
//! ## Usage
//!
//! ```rust
//! use openwire_config::ConnectionConfig;
//!
//! let config = ConnectionConfig::from_toml_str("[compression]\nuse_compression = true\n").unwrap();
//! let policy = config.compression_policy();
//! assert!(policy.use_compression);
//! ```

pub mod connection_config;
pub mod defaults;

pub use connection_config::{CodecConfig, CompressionConfig, ConnectionConfig};

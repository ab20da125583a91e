//! Default configuration values
//!
//! Values applied when a field is missing from the TOML file and no
//! `OPENWIRE_*` environment override is set.

/// Body compression defaults
pub mod compression {
    /// Bodies are sent uncompressed unless the connection asks otherwise
    pub const USE_COMPRESSION: bool = false;

    /// zlib default level
    pub const LEVEL: i32 = openwire_codec::DEFAULT_COMPRESSION_LEVEL;

    /// Accepted level range; -1 selects the zlib default
    pub const MIN_LEVEL: i32 = -1;
    pub const MAX_LEVEL: i32 = 9;
}

/// Primitive codec defaults
pub mod codec {
    /// Nested list/map depth accepted when decoding
    pub const MAX_NESTING_DEPTH: usize = openwire_codec::DEFAULT_MAX_NESTING_DEPTH;
}

/// Environment variable prefix for overrides (`OPENWIRE_COMPRESSION__USE_COMPRESSION=true`)
pub const ENV_PREFIX: &str = "OPENWIRE";

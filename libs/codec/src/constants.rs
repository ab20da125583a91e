//! # Wire Constants
//!
//! Fixed values of the OpenWire primitive encoding. Changing any of these
//! breaks compatibility with brokers and other clients.

/// Longest string (in UTF-8 bytes) written with a 2-byte length prefix.
/// Anything longer is written as `BIG_STRING` with a 4-byte prefix.
pub const MAX_SHORT_STRING_LEN: usize = (i16::MAX / 4) as usize;

/// Count written in place of an absent map or list.
pub const NULL_CONTAINER_SENTINEL: i32 = -1;

/// Largest encoded form accepted by `write_utf` (unsigned 16-bit prefix).
pub const MAX_UTF_ENCODED_LEN: usize = u16::MAX as usize;

/// Size of the original-length header in front of a compressed body.
pub const COMPRESSED_LENGTH_PREFIX: usize = 4;

/// Default bound on nested list/map decoding.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Compression level meaning "library default".
pub const DEFAULT_COMPRESSION_LEVEL: i32 = -1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_string_threshold() {
        assert_eq!(MAX_SHORT_STRING_LEN, 8191);
    }
}

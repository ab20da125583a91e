//! # Data Stream Helpers
//!
//! Big-endian field helpers shared by the primitive marshaller and the
//! message body streams: length-checked byte reads, the 16-bit-length
//! modified UTF-8 string (`write_utf`/`read_utf`) and raw UTF-16 char
//! output (`write_chars`).
//!
//! Modified UTF-8 encodes each UTF-16 code unit on its own: `U+0000` becomes
//! `C0 80` and supplementary characters become two 3-byte surrogate
//! sequences. The encoded form must fit in 65535 bytes.

use crate::constants::MAX_UTF_ENCODED_LEN;
use crate::error::{CodecError, CodecResult, IoContext};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Encoded length of `s` in modified UTF-8.
pub fn modified_utf8_len(s: &str) -> usize {
    s.encode_utf16()
        .map(|unit| match unit {
            0x0001..=0x007F => 1,
            0x0000 | 0x0080..=0x07FF => 2,
            _ => 3,
        })
        .sum()
}

pub fn encode_modified_utf8(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(modified_utf8_len(s));
    for unit in s.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                out.push(0xC0 | ((unit >> 6) & 0x1F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | ((unit >> 12) & 0x0F) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    out
}

pub fn decode_modified_utf8(bytes: &[u8]) -> CodecResult<String> {
    let length = bytes.len();
    let continuation = |offset: usize| -> CodecResult<u16> {
        match bytes.get(offset) {
            Some(b) if b & 0xC0 == 0x80 => Ok(u16::from(b & 0x3F)),
            Some(_) => Err(CodecError::malformed_utf(offset, length, "expected continuation byte")),
            None => Err(CodecError::malformed_utf(offset, length, "partial character at end of input")),
        }
    };

    let mut units = Vec::with_capacity(length);
    let mut i = 0;
    while let Some(&b) = bytes.get(i) {
        match b >> 4 {
            0x0..=0x7 => {
                units.push(u16::from(b));
                i += 1;
            }
            0xC | 0xD => {
                units.push((u16::from(b & 0x1F) << 6) | continuation(i + 1)?);
                i += 2;
            }
            0xE => {
                units.push(
                    (u16::from(b & 0x0F) << 12) | (continuation(i + 1)? << 6) | continuation(i + 2)?,
                );
                i += 3;
            }
            _ => {
                return Err(CodecError::malformed_utf(
                    i,
                    length,
                    format!("invalid lead byte {b:#04x}"),
                ))
            }
        }
    }

    String::from_utf16(&units).map_err(|e| CodecError::invalid_utf8("modified UTF-8 string", e))
}

/// Write `s` as a 2-byte length followed by its modified UTF-8 bytes.
pub fn write_utf<W: Write>(out: &mut W, s: &str) -> CodecResult<()> {
    let encoded = encode_modified_utf8(s);
    if encoded.len() > MAX_UTF_ENCODED_LEN {
        return Err(CodecError::too_large(
            encoded.len(),
            MAX_UTF_ENCODED_LEN,
            "modified UTF-8 string",
        ));
    }
    out.write_u16::<BigEndian>(encoded.len() as u16)
        .context("UTF string length")?;
    out.write_all(&encoded).context("UTF string bytes")
}

pub fn read_utf<R: Read>(input: &mut R) -> CodecResult<String> {
    let len = input.read_u16::<BigEndian>().context("UTF string length")?;
    let bytes = read_exact_vec(input, usize::from(len), "UTF string bytes")?;
    decode_modified_utf8(&bytes)
}

/// Write every UTF-16 code unit of `s` as a big-endian `u16`, no length prefix.
pub fn write_chars<W: Write>(out: &mut W, s: &str) -> CodecResult<()> {
    for unit in s.encode_utf16() {
        out.write_u16::<BigEndian>(unit).context("char data")?;
    }
    Ok(())
}

/// Read exactly `len` bytes without trusting `len` for the allocation size.
pub fn read_exact_vec<R: Read>(input: &mut R, len: usize, context: &str) -> CodecResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(len.min(64 * 1024));
    input
        .take(len as u64)
        .read_to_end(&mut buf)
        .context(context)?;
    if buf.len() < len {
        return Err(CodecError::unexpected_eof(context));
    }
    Ok(buf)
}

/// Read a signed 32-bit length, rejecting negatives.
pub fn read_length<R: Read>(input: &mut R, context: &str) -> CodecResult<usize> {
    let len = input.read_i32::<BigEndian>().context(context)?;
    usize::try_from(len).map_err(|_| CodecError::negative_length(i64::from(len), context))
}

/// Write a collection or payload length as a signed 32-bit prefix.
pub fn write_length<W: Write>(out: &mut W, len: usize, context: &str) -> CodecResult<()> {
    let prefix = i32::try_from(len)
        .map_err(|_| CodecError::too_large(len, i32::MAX as usize, context))?;
    out.write_i32::<BigEndian>(prefix).context(context)
}

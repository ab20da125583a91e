//! # Body Stream Pipelines
//!
//! ## Purpose
//!
//! Write and read sides of a message body, with optional zlib compression
//! and a byte counter that remembers the uncompressed size.
//!
//! ## Composition
//!
//! ```text
//! write:  typed writes → CountingWriter → [ZlibEncoder] → Vec<u8>
//! store:  [original_len:i32 BE] ++ accumulated bytes
//! read:   content → [skip 4-byte header → ZlibDecoder] → typed reads
//! ```
//!
//! The order is fixed by the constructors: [`WritePipeline::plain`] and
//! [`WritePipeline::compressed`] are the only ways to build a write side,
//! so the counter always sees pre-compression bytes. [`WritePipeline::finish`]
//! consumes the pipeline and closes every stage exactly once.

use crate::constants::{COMPRESSED_LENGTH_PREFIX, DEFAULT_COMPRESSION_LEVEL};
use crate::error::{CodecError, CodecResult, IoContext};
use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use bytes::Bytes;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{self, Cursor, Read, Write};
use tracing::{debug, warn};

/// Pass-through writer that counts accepted bytes.
#[derive(Debug)]
pub struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W: Write> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }

    /// Bytes accepted by the inner writer so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.count += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Map a configured level onto flate2. `-1` and out-of-range values use the default.
pub fn compression_from_level(level: i32) -> Compression {
    match u32::try_from(level) {
        Ok(level @ 0..=9) => Compression::new(level),
        _ => {
            if level != -1 {
                warn!(level, "compression level outside 0-9, using default");
            }
            Compression::default()
        }
    }
}

/// Whether new message bodies are compressed, and at which level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionPolicy {
    pub use_compression: bool,
    /// zlib level 0-9, or -1 for the library default.
    pub level: i32,
}

impl CompressionPolicy {
    pub const fn disabled() -> Self {
        Self {
            use_compression: false,
            level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    pub const fn enabled(level: i32) -> Self {
        Self {
            use_compression: true,
            level,
        }
    }
}

impl Default for CompressionPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

enum Sink {
    Plain(CountingWriter<Vec<u8>>),
    Compressed(CountingWriter<ZlibEncoder<Vec<u8>>>),
}

/// Write side of a message body.
pub struct WritePipeline {
    sink: Sink,
}

impl WritePipeline {
    pub fn plain() -> Self {
        Self {
            sink: Sink::Plain(CountingWriter::new(Vec::new())),
        }
    }

    pub fn compressed(level: i32) -> Self {
        let encoder = ZlibEncoder::new(Vec::new(), compression_from_level(level));
        Self {
            sink: Sink::Compressed(CountingWriter::new(encoder)),
        }
    }

    /// Build the write side a policy asks for.
    pub fn for_policy(policy: CompressionPolicy) -> Self {
        if policy.use_compression {
            Self::compressed(policy.level)
        } else {
            Self::plain()
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self.sink, Sink::Compressed(_))
    }

    /// Uncompressed bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        match &self.sink {
            Sink::Plain(w) => w.count(),
            Sink::Compressed(w) => w.count(),
        }
    }

    /// Close every stage and return the accumulated body.
    pub fn finish(self) -> CodecResult<FinishedBody> {
        match self.sink {
            Sink::Plain(writer) => {
                let original_len = writer.count();
                Ok(FinishedBody {
                    bytes: writer.into_inner(),
                    original_len,
                    compressed: false,
                })
            }
            Sink::Compressed(writer) => {
                let original_len = writer.count();
                let bytes = writer
                    .into_inner()
                    .finish()
                    .context("finishing compressed body")?;
                debug!(original_len, compressed_len = bytes.len(), "compressed message body");
                Ok(FinishedBody {
                    bytes,
                    original_len,
                    compressed: true,
                })
            }
        }
    }
}

impl Write for WritePipeline {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.sink {
            Sink::Plain(w) => w.write(buf),
            Sink::Compressed(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Plain(w) => w.flush(),
            Sink::Compressed(w) => w.flush(),
        }
    }
}

impl std::fmt::Debug for WritePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WritePipeline")
            .field("compressed", &self.is_compressed())
            .field("bytes_written", &self.bytes_written())
            .finish()
    }
}

/// Output of [`WritePipeline::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedBody {
    /// Accumulated bytes, zlib-compressed when `compressed` is set.
    pub bytes: Vec<u8>,
    /// Bytes written before compression.
    pub original_len: u64,
    pub compressed: bool,
}

impl FinishedBody {
    /// Bytes to persist as message content.
    ///
    /// Compressed bodies get the 4-byte big-endian original length in front.
    pub fn into_content(self) -> CodecResult<Vec<u8>> {
        if !self.compressed {
            return Ok(self.bytes);
        }
        let original_len = usize::try_from(self.original_len).unwrap_or(usize::MAX);
        let header = i32::try_from(self.original_len)
            .map_err(|_| CodecError::too_large(original_len, i32::MAX as usize, "compressed body"))?;
        let mut content = Vec::with_capacity(COMPRESSED_LENGTH_PREFIX + self.bytes.len());
        content
            .write_i32::<BigEndian>(header)
            .context("compressed length header")?;
        content.extend_from_slice(&self.bytes);
        Ok(content)
    }
}

enum Source {
    Plain(Cursor<Bytes>),
    Compressed(ZlibDecoder<Cursor<Bytes>>),
}

/// Read side of a message body.
pub struct ReadPipeline {
    source: Source,
    logical_len: u64,
}

impl ReadPipeline {
    pub fn plain(content: Bytes) -> Self {
        let logical_len = content.len() as u64;
        Self {
            source: Source::Plain(Cursor::new(content)),
            logical_len,
        }
    }

    /// Wrap framed compressed content: 4-byte original length, then zlib data.
    pub fn compressed(content: Bytes) -> CodecResult<Self> {
        if content.len() < COMPRESSED_LENGTH_PREFIX {
            return Err(CodecError::unexpected_eof("compressed length header"));
        }
        let header = BigEndian::read_i32(&content[..COMPRESSED_LENGTH_PREFIX]);
        let logical_len = u64::try_from(header)
            .map_err(|_| CodecError::negative_length(i64::from(header), "compressed body"))?;
        let body = content.slice(COMPRESSED_LENGTH_PREFIX..);
        debug!(logical_len, compressed_len = body.len(), "inflating message body");
        Ok(Self {
            source: Source::Compressed(ZlibDecoder::new(Cursor::new(body))),
            logical_len,
        })
    }

    /// Choose plain or compressed framing from the message's flag.
    pub fn open(content: Bytes, compressed: bool) -> CodecResult<Self> {
        if compressed {
            Self::compressed(content)
        } else {
            Ok(Self::plain(content))
        }
    }

    /// Uncompressed body length.
    pub fn logical_len(&self) -> u64 {
        self.logical_len
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self.source, Source::Compressed(_))
    }
}

impl Read for ReadPipeline {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.source {
            Source::Plain(r) => r.read(buf),
            Source::Compressed(r) => r.read(buf),
        }
    }
}

impl std::fmt::Debug for ReadPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadPipeline")
            .field("compressed", &self.is_compressed())
            .field("logical_len", &self.logical_len)
            .finish()
    }
}

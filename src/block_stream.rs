//! Length-prefixed LZ4 block stream.
//!
//! A lighter container than the frame format, used for trace capture: input
//! is cut into fixed-size chunks (64 KiB by default), each chunk is
//! compressed as an independent LZ4 block, and each block is written as one
//! record:
//!
//! ```text
//! [u32 LE compressed length][compressed block]
//! ```
//!
//! There is no header, no checksum and no end mark; a stream ends where the
//! underlying file ends.  The reader needs to know the chunk size used by the
//! writer to bound each record.
//!
//! # Public API
//! - [`BlockStreamWriter`]: buffers input, emits one record per full chunk,
//!   optionally flushing a partial chunk; [`last_block`](BlockStreamWriter::last_block)
//!   exposes the most recent compressed block
//! - [`BlockStreamReader`]: reads records back one decoded chunk at a time
//! - [`codec_error`]: recover the [`Lz4Error`] carried by an `io::Error`

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::block::compress::{compress_bound, compress_with_index};
use crate::block::decompress::decompress_safe;
use crate::block::match_finder::HashIndex;
use crate::block::types::LZ4_MAX_INPUT_SIZE;
use crate::config::{ACCELERATION_DEFAULT, BLOCK_STREAM_CHUNK_SIZE};
use crate::error::Lz4Error;

/// Size of the record length prefix.
pub const RECORD_HEADER_SIZE: usize = 4;

fn codec_io_error(e: Lz4Error) -> io::Error {
    let kind = match e {
        Lz4Error::InvalidParameter => io::ErrorKind::InvalidInput,
        Lz4Error::CorruptInput | Lz4Error::DestinationTooSmall => io::ErrorKind::InvalidData,
    };
    io::Error::new(kind, e)
}

/// The codec error wrapped in an `io::Error` returned by this module, if any.
pub fn codec_error(e: &io::Error) -> Option<Lz4Error> {
    e.get_ref()
        .and_then(|inner| inner.downcast_ref::<Lz4Error>())
        .copied()
}

fn check_block_size(block_size: usize) -> Result<(), Lz4Error> {
    if block_size == 0 || block_size > LZ4_MAX_INPUT_SIZE {
        Err(Lz4Error::InvalidParameter)
    } else {
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BlockStreamWriter<W>
// ─────────────────────────────────────────────────────────────────────────────

/// Chunking block compressor writing `[length][block]` records.
///
/// Dropping the writer compresses and writes any buffered remainder; errors
/// at that point are ignored, so call [`finish`](Self::finish) to observe
/// them.
pub struct BlockStreamWriter<W: Write> {
    inner: Option<W>,
    block_size: usize,
    acceleration: i32,
    /// Hash index reused for every block.
    index: HashIndex,
    /// Buffered input, always shorter than `block_size` between calls.
    src_buf: Vec<u8>,
    /// Most recent compressed block (`dst_len` valid bytes).
    dst_buf: Vec<u8>,
    dst_len: usize,
    blocks_written: u64,
}

impl BlockStreamWriter<BufWriter<File>> {
    /// Open `path` for writing, appending to existing content when `append`
    /// is set and truncating it otherwise.
    pub fn create(path: impl AsRef<Path>, append: bool) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> BlockStreamWriter<W> {
    pub fn new(writer: W) -> Self {
        BlockStreamWriter {
            inner: Some(writer),
            block_size: BLOCK_STREAM_CHUNK_SIZE,
            acceleration: ACCELERATION_DEFAULT,
            index: HashIndex::new(),
            src_buf: Vec::with_capacity(BLOCK_STREAM_CHUNK_SIZE),
            dst_buf: vec![0u8; compress_bound(BLOCK_STREAM_CHUNK_SIZE)],
            dst_len: 0,
            blocks_written: 0,
        }
    }

    /// Use chunks of `block_size` bytes instead of 64 KiB.
    ///
    /// Must be called before any data is written.
    pub fn with_block_size(mut self, block_size: usize) -> Result<Self, Lz4Error> {
        check_block_size(block_size)?;
        if !self.src_buf.is_empty() {
            return Err(Lz4Error::InvalidParameter);
        }
        self.block_size = block_size;
        self.src_buf = Vec::with_capacity(block_size);
        self.dst_buf = vec![0u8; compress_bound(block_size)];
        Ok(self)
    }

    pub fn with_acceleration(mut self, acceleration: i32) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of records written so far.
    pub fn blocks_written(&self) -> u64 {
        self.blocks_written
    }

    /// Bytes accepted but not yet compressed.
    pub fn buffered(&self) -> usize {
        self.src_buf.len()
    }

    /// The most recently compressed block (without its length prefix), or an
    /// empty slice if nothing has been compressed yet.
    pub fn last_block(&self) -> &[u8] {
        &self.dst_buf[..self.dst_len]
    }

    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    /// Append `data`.  Every chunk that fills up is compressed and written;
    /// with `flush` set, a partial chunk left at the end is written too.
    pub fn write(&mut self, data: &[u8], flush: bool) -> io::Result<()> {
        let mut rest = data;
        while !rest.is_empty() {
            let take = (self.block_size - self.src_buf.len()).min(rest.len());
            self.src_buf.extend_from_slice(&rest[..take]);
            rest = &rest[take..];
            if self.src_buf.len() == self.block_size {
                self.compress_buffered()?;
            }
        }
        if flush {
            self.compress_buffered()?;
        }
        Ok(())
    }

    /// Compress the buffered input (if any) as one record.
    fn compress_buffered(&mut self) -> io::Result<()> {
        if self.src_buf.is_empty() {
            return Ok(());
        }
        let n = compress_with_index(
            &mut self.index,
            &self.src_buf,
            0,
            &mut self.dst_buf,
            self.acceleration,
        )
        .map_err(codec_io_error)?;
        self.src_buf.clear();
        self.dst_len = n;

        let inner = self
            .inner
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "block stream closed"))?;
        inner.write_all(&(n as u32).to_le_bytes())?;
        inner.write_all(&self.dst_buf[..n])?;
        self.blocks_written += 1;
        Ok(())
    }

    /// Write any buffered remainder, flush, and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.compress_buffered()?;
        let mut inner = self
            .inner
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "block stream closed"))?;
        inner.flush()?;
        Ok(inner)
    }
}

impl<W: Write> Drop for BlockStreamWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_none() {
            return;
        }
        let _ = self.compress_buffered();
        if let Some(w) = self.inner.as_mut() {
            let _ = w.flush();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BlockStreamReader<R>
// ─────────────────────────────────────────────────────────────────────────────

/// Reader for streams produced by [`BlockStreamWriter`].
///
/// A record whose length is zero or exceeds the compress bound of the chunk
/// size, whose payload is truncated, or whose block decodes to more than one
/// chunk is reported as [`Lz4Error::CorruptInput`].
pub struct BlockStreamReader<R: Read> {
    inner: R,
    block_size: usize,
    src_buf: Vec<u8>,
}

impl<R: Read> BlockStreamReader<R> {
    pub fn new(reader: R) -> Self {
        BlockStreamReader {
            inner: reader,
            block_size: BLOCK_STREAM_CHUNK_SIZE,
            src_buf: Vec::new(),
        }
    }

    /// Expect chunks of `block_size` bytes (must match the writer).
    pub fn with_block_size(mut self, block_size: usize) -> Result<Self, Lz4Error> {
        check_block_size(block_size)?;
        self.block_size = block_size;
        Ok(self)
    }

    /// Read and decode the next record.  Returns `Ok(None)` at a clean end of
    /// stream.
    pub fn next_block(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut len = [0u8; RECORD_HEADER_SIZE];
        let mut filled = 0;
        while filled < len.len() {
            match self.inner.read(&mut len[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => return Err(codec_io_error(Lz4Error::CorruptInput)),
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }

        let len = u32::from_le_bytes(len) as usize;
        if len == 0 || len > compress_bound(self.block_size) {
            return Err(codec_io_error(Lz4Error::CorruptInput));
        }
        self.src_buf.resize(len, 0);
        self.inner.read_exact(&mut self.src_buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                codec_io_error(Lz4Error::CorruptInput)
            } else {
                e
            }
        })?;

        let mut out = vec![0u8; self.block_size];
        let n = decompress_safe(&self.src_buf, &mut out)
            .map_err(|_| codec_io_error(Lz4Error::CorruptInput))?;
        out.truncate(n);
        Ok(Some(out))
    }

    /// Decode every remaining record and concatenate the chunks.
    pub fn read_to_end(&mut self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(chunk) = self.next_block()? {
            out.extend_from_slice(&chunk);
        }
        Ok(out)
    }
}

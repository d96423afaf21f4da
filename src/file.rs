//! LZ4 frame streaming I/O over `std::io`.
//!
//! # Public API
//! - [`Lz4WriteFile`]: streaming compressor, implements [`Write`]
//! - [`Lz4ReadFile`]: streaming decompressor, implements [`Read`]
//! - [`lz4_write_frame`]: compress a buffer as one complete frame
//! - [`lz4_read_frame`]: decompress every frame of a stream into a writer
//!
//! Both sides work one block at a time: the writer buffers up to one block of
//! input, the reader holds one decoded block plus the linked-history window.

use std::io::{self, Read, Write};

use crate::frame::compress::FrameCompressor;
use crate::frame::decompress::FrameDecoder;
use crate::frame::header::{decode_header, header_size, is_skippable_magic, read_le32};
use crate::frame::types::{
    FrameInfo, Lz4FError, Preferences, BH_SIZE, MAX_FH_SIZE, MIN_HEADER_PROBE,
};

// ─────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ─────────────────────────────────────────────────────────────────────────────

fn invalid_data(e: Lz4FError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

/// Recover the frame error carried by an `io::Error` produced by this module,
/// or classify a plain I/O failure as `fallback`.
fn frame_error(e: &io::Error, fallback: Lz4FError) -> Lz4FError {
    e.get_ref()
        .and_then(|inner| inner.downcast_ref::<Lz4FError>())
        .copied()
        .unwrap_or(fallback)
}

/// Fill `buf` completely.  Returns `Ok(false)` if the reader was already at
/// end-of-stream; a stream ending part-way through `buf` is an error.
fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

// ─────────────────────────────────────────────────────────────────────────────
// Lz4ReadFile<R>
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming LZ4 frame decompressor backed by any `R: Read`.
///
/// Concatenated frames are decoded back to back; skippable frames are
/// skipped.  [`read`](Read::read) returns 0 once the underlying stream ends
/// cleanly between frames.
pub struct Lz4ReadFile<R: Read> {
    inner: R,
    /// Decoder for the frame in progress; `None` between frames.
    dctx: Option<FrameDecoder>,
    /// Compressed bytes of the block being decoded.
    src_buf: Vec<u8>,
    /// Decoded bytes not yet handed to the caller.
    out_buf: Vec<u8>,
    out_next: usize,
}

impl<R: Read> Lz4ReadFile<R> {
    /// Open a streaming reader.
    ///
    /// The first frame header is read and validated immediately, so a stream
    /// that is empty or not LZ4 fails here rather than on the first read.
    pub fn open(reader: R) -> Result<Self, Lz4FError> {
        let mut lz4r = Lz4ReadFile {
            inner: reader,
            dctx: None,
            src_buf: Vec::new(),
            out_buf: Vec::new(),
            out_next: 0,
        };
        match lz4r.start_frame() {
            Ok(true) => Ok(lz4r),
            Ok(false) => Err(Lz4FError::IoRead),
            Err(e) => Err(frame_error(&e, Lz4FError::IoRead)),
        }
    }

    /// Descriptor of the frame currently being decoded.
    pub fn frame_info(&self) -> Option<&FrameInfo> {
        self.dctx.as_ref().map(FrameDecoder::frame_info)
    }

    /// Read the next standard frame header, skipping skippable frames.
    /// Returns `Ok(false)` at a clean end of stream.
    fn start_frame(&mut self) -> io::Result<bool> {
        let mut header = [0u8; MAX_FH_SIZE];
        loop {
            if !read_exact_or_eof(&mut self.inner, &mut header[..4])? {
                return Ok(false);
            }
            if is_skippable_magic(read_le32(&header, 0)) {
                let mut size = [0u8; 4];
                self.inner.read_exact(&mut size)?;
                let size = u32::from_le_bytes(size) as u64;
                let skipped = io::copy(&mut (&mut self.inner).take(size), &mut io::sink())?;
                if skipped != size {
                    return Err(io::ErrorKind::UnexpectedEof.into());
                }
                continue;
            }

            self.inner.read_exact(&mut header[4..MIN_HEADER_PROBE])?;
            let len = header_size(&header[..MIN_HEADER_PROBE]).map_err(invalid_data)?;
            self.inner.read_exact(&mut header[MIN_HEADER_PROBE..len])?;
            let (info, _) = decode_header(&header[..len]).map_err(invalid_data)?;
            self.dctx = Some(FrameDecoder::new(info));
            return Ok(true);
        }
    }

    /// Decode the next block into `out_buf`.  Returns `Ok(false)` at the end
    /// of the stream.
    fn fill(&mut self) -> io::Result<bool> {
        loop {
            let Some(dctx) = self.dctx.as_mut() else {
                if !self.start_frame()? {
                    return Ok(false);
                }
                continue;
            };

            let mut bh = [0u8; BH_SIZE];
            self.inner.read_exact(&mut bh)?;
            let block_header = u32::from_le_bytes(bh);

            if block_header == 0 {
                let mut suffix = [0u8; 4];
                let suffix = &mut suffix[..dctx.suffix_len()];
                self.inner.read_exact(suffix)?;
                dctx.finish(suffix).map_err(invalid_data)?;
                self.dctx = None;
                continue;
            }

            let len = dctx.block_data_len(block_header).map_err(invalid_data)?;
            self.src_buf.resize(len, 0);
            self.inner.read_exact(&mut self.src_buf)?;
            self.out_buf.clear();
            self.out_next = 0;
            dctx.decode_block(block_header, &self.src_buf, &mut self.out_buf, usize::MAX)
                .map_err(invalid_data)?;
            return Ok(true);
        }
    }
}

impl<R: Read> Read for Lz4ReadFile<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.out_next == self.out_buf.len() {
            if !self.fill()? {
                return Ok(0);
            }
        }
        let n = buf.len().min(self.out_buf.len() - self.out_next);
        buf[..n].copy_from_slice(&self.out_buf[self.out_next..self.out_next + n]);
        self.out_next += n;
        Ok(n)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lz4WriteFile<W>
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming LZ4 frame compressor backed by any `W: Write`.
///
/// # Usage
/// ```no_run
/// use tracy_lz4::file::Lz4WriteFile;
/// use std::io::Write;
///
/// let mut lz4w = Lz4WriteFile::open(std::io::sink(), None).unwrap();
/// lz4w.write_all(b"hello").unwrap();
/// lz4w.finish().unwrap();
/// ```
pub struct Lz4WriteFile<W: Write> {
    cctx: FrameCompressor,
    /// Underlying writer; wrapped in `Option` so `finish()` can take ownership.
    inner: Option<W>,
    /// Input not yet compressed (less than one block).
    src_buf: Vec<u8>,
    dst_buf: Vec<u8>,
    /// Sticky error flag: once `true`, `Drop` and `finish()` skip the end mark.
    errored: bool,
}

impl<W: Write> Lz4WriteFile<W> {
    /// Open a streaming writer and write the frame header immediately.
    ///
    /// `None` uses default preferences (64 KiB linked blocks, no checksums).
    pub fn open(mut writer: W, prefs: Option<&Preferences>) -> Result<Self, Lz4FError> {
        let mut cctx = FrameCompressor::new(prefs.copied().unwrap_or_default());
        let mut dst_buf = Vec::new();
        cctx.begin(&mut dst_buf)?;
        writer.write_all(&dst_buf).map_err(|_| Lz4FError::IoWrite)?;
        dst_buf.clear();

        Ok(Lz4WriteFile {
            src_buf: Vec::with_capacity(cctx.block_size()),
            cctx,
            inner: Some(writer),
            dst_buf,
            errored: false,
        })
    }

    /// Compress `src_buf` as one block and write it out.
    fn flush_block(&mut self) -> Result<(), Lz4FError> {
        if self.src_buf.is_empty() {
            return Ok(());
        }
        self.dst_buf.clear();
        let result = self
            .cctx
            .compress_block(&self.src_buf, &mut self.dst_buf)
            .and_then(|_| match self.inner.as_mut() {
                Some(w) => w.write_all(&self.dst_buf).map_err(|_| Lz4FError::IoWrite),
                None => Err(Lz4FError::IoWrite),
            });
        self.src_buf.clear();
        if result.is_err() {
            self.errored = true;
        }
        result
    }

    fn write_end(&mut self) -> Result<(), Lz4FError> {
        self.flush_block()?;
        self.dst_buf.clear();
        self.cctx.end(&mut self.dst_buf)?;
        match self.inner.as_mut() {
            Some(w) => {
                w.write_all(&self.dst_buf).map_err(|_| Lz4FError::IoWrite)?;
                w.flush().map_err(|_| Lz4FError::IoWrite)
            }
            None => Err(Lz4FError::IoWrite),
        }
    }

    /// Compress any buffered input, write the end mark (+ optional content
    /// checksum), and return the underlying writer.
    ///
    /// If the writer is dropped instead, finalization errors are discarded.
    pub fn finish(mut self) -> Result<W, Lz4FError> {
        if self.errored {
            return Err(Lz4FError::IoWrite);
        }
        let end = self.write_end();
        self.errored = true;
        end?;
        self.inner.take().ok_or(Lz4FError::IoWrite)
    }
}

impl<W: Write> Write for Lz4WriteFile<W> {
    /// Buffer `buf`, compressing and writing every full block.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.errored {
            return Err(io::Error::new(io::ErrorKind::Other, Lz4FError::IoWrite));
        }
        let block_size = self.cctx.block_size();
        let mut rest = buf;
        while !rest.is_empty() {
            let take = (block_size - self.src_buf.len()).min(rest.len());
            self.src_buf.extend_from_slice(&rest[..take]);
            rest = &rest[take..];
            if self.src_buf.len() == block_size {
                self.flush_block()
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            }
        }
        Ok(buf.len())
    }

    /// Flushes the underlying writer.  Buffered input stays buffered so block
    /// boundaries do not depend on flush calls.
    fn flush(&mut self) -> io::Result<()> {
        match self.inner.as_mut() {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

impl<W: Write> Drop for Lz4WriteFile<W> {
    /// Attempt to finalize the frame; errors are ignored.
    fn drop(&mut self) {
        if self.inner.is_none() || self.errored {
            return;
        }
        let _ = self.write_end();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Convenience functions
// ─────────────────────────────────────────────────────────────────────────────

/// Compress `data` as a complete LZ4 frame and write it to `writer`.
///
/// Returns the inner writer on success.
pub fn lz4_write_frame<W: Write>(data: &[u8], writer: W) -> Result<W, Lz4FError> {
    let mut lz4w = Lz4WriteFile::open(writer, None)?;
    lz4w.write_all(data)
        .map_err(|e| frame_error(&e, Lz4FError::IoWrite))?;
    lz4w.finish()
}

/// Decompress every frame from `reader` and write the raw bytes to `writer`.
pub fn lz4_read_frame<R: Read>(reader: R, writer: &mut impl Write) -> Result<(), Lz4FError> {
    let mut lz4r = Lz4ReadFile::open(reader)?;
    let mut tmp = vec![0u8; 64 * 1024];
    loop {
        let n = lz4r
            .read(&mut tmp)
            .map_err(|e| frame_error(&e, Lz4FError::IoRead))?;
        if n == 0 {
            break;
        }
        writer
            .write_all(&tmp[..n])
            .map_err(|_| Lz4FError::IoWrite)?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::compress::compress_frame_to_vec;
    use crate::frame::types::{BlockChecksum, BlockMode, ContentChecksum};
    use std::io::Cursor;

    fn read_all(compressed: &[u8]) -> Vec<u8> {
        let mut recovered = Vec::new();
        lz4_read_frame(Cursor::new(compressed), &mut recovered).unwrap();
        recovered
    }

    #[test]
    fn round_trip_small() {
        let original = b"Hello, LZ4 world! This is a test of the streaming frame API.";
        let compressed = lz4_write_frame(original, Vec::new()).unwrap();
        assert_eq!(read_all(&compressed), original);
    }

    #[test]
    fn round_trip_multi_block() {
        let original: Vec<u8> = (0u8..=255).cycle().take(200 * 1024).collect();
        let compressed = lz4_write_frame(&original, Vec::new()).unwrap();
        assert_eq!(read_all(&compressed), original);
    }

    #[test]
    fn small_writes_with_checksums() {
        let original: Vec<u8> = b"streaming test data "
            .iter()
            .cycle()
            .take(150_000)
            .cloned()
            .collect();
        let prefs = Preferences {
            frame_info: FrameInfo {
                block_mode: BlockMode::Independent,
                block_checksum_flag: BlockChecksum::Enabled,
                content_checksum_flag: ContentChecksum::Enabled,
                ..FrameInfo::default()
            },
            ..Preferences::default()
        };
        let mut lz4w = Lz4WriteFile::open(Vec::new(), Some(&prefs)).unwrap();
        for chunk in original.chunks(777) {
            lz4w.write_all(chunk).unwrap();
        }
        let compressed = lz4w.finish().unwrap();

        let mut lz4r = Lz4ReadFile::open(Cursor::new(&compressed)).unwrap();
        let mut recovered = Vec::new();
        let mut tmp = [0u8; 513];
        loop {
            let n = lz4r.read(&mut tmp).unwrap();
            if n == 0 {
                break;
            }
            recovered.extend_from_slice(&tmp[..n]);
        }
        assert_eq!(recovered, original);
    }

    #[test]
    fn round_trip_empty_and_one_byte() {
        assert_eq!(read_all(&lz4_write_frame(b"", Vec::new()).unwrap()), b"");
        assert_eq!(read_all(&lz4_write_frame(b"x", Vec::new()).unwrap()), b"x");
    }

    #[test]
    fn drop_finalizes_frame() {
        let mut sink = Vec::new();
        {
            let mut lz4w = Lz4WriteFile::open(&mut sink, None).unwrap();
            lz4w.write_all(b"finalized by drop").unwrap();
        }
        assert_eq!(read_all(&sink), b"finalized by drop");
    }

    #[test]
    fn reads_concatenated_and_skippable_frames() {
        let mut stream = compress_frame_to_vec(b"one,").unwrap();
        stream.extend_from_slice(&0x184D_2A5Au32.to_le_bytes());
        stream.extend_from_slice(&2u32.to_le_bytes());
        stream.extend_from_slice(b"??");
        stream.extend_from_slice(&compress_frame_to_vec(b"two").unwrap());
        assert_eq!(read_all(&stream), b"one,two");
    }

    #[test]
    fn open_rejects_empty_and_foreign_streams() {
        assert_eq!(Lz4ReadFile::open(Cursor::new(Vec::new())).err(), Some(Lz4FError::IoRead));
        assert_eq!(
            Lz4ReadFile::open(Cursor::new(b"GIF89a-not-lz4".to_vec())).err(),
            Some(Lz4FError::FrameTypeUnknown)
        );
    }

    #[test]
    fn truncated_stream_is_an_error() {
        let compressed = lz4_write_frame(&[5u8; 10_000], Vec::new()).unwrap();
        let cut = &compressed[..compressed.len() - 2];
        let mut out = Vec::new();
        assert_eq!(lz4_read_frame(Cursor::new(cut), &mut out), Err(Lz4FError::IoRead));
    }
}

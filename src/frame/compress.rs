//! LZ4 Frame compression.
//!
//! # Coverage
//! - Streaming: [`FrameCompressor`] with [`begin`](FrameCompressor::begin),
//!   [`compress_block`](FrameCompressor::compress_block) and
//!   [`end`](FrameCompressor::end)
//! - One-shot: [`compress_frame`], [`compress_frame_to_vec`]
//!
//! Each block is first compressed into a scratch buffer one byte smaller than
//! the input; if that does not fit, the block is stored raw with
//! [`LZ4F_BLOCKUNCOMPRESSED_FLAG`] set.  Output therefore never grows by more
//! than the fixed per-block overhead.
//!
//! In linked mode the compressor keeps the last 64 KiB of input and passes it
//! as a prefix to the block encoder, so matches may cross block boundaries.

use crate::block::compress::compress_with_index;
use crate::block::match_finder::HashIndex;
use crate::block::types::LZ4_DISTANCE_MAX;
use crate::error::Lz4Error;
use crate::frame::header::{block_size, compress_frame_bound, encode_header, optimal_block_size_id};
use crate::frame::types::{
    BlockChecksum, BlockMode, ContentChecksum, Lz4FError, Preferences, LZ4F_BLOCKUNCOMPRESSED_FLAG,
};
use crate::xxhash::{content_hasher, xxh32_oneshot, Xxh32State};

/// History window kept between linked blocks (64 KiB).
const KB64: usize = 64 * 1024;

// ─────────────────────────────────────────────────────────────────────────────
// FrameCompressor
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming frame compressor.
///
/// The descriptor is taken from `prefs` at construction and written by
/// [`begin`](Self::begin); it cannot change until [`end`](Self::end).
/// Output is appended to caller-owned `Vec<u8>`s.
pub struct FrameCompressor {
    prefs: Preferences,
    block_size: usize,
    index: HashIndex,
    /// Linked mode: last 64 KiB of input followed by the block being compressed.
    window: Vec<u8>,
    scratch: Vec<u8>,
    xxh: Option<Xxh32State>,
    total_in: u64,
    started: bool,
}

impl FrameCompressor {
    pub fn new(prefs: Preferences) -> Self {
        FrameCompressor {
            block_size: block_size(prefs.frame_info.block_size_id),
            prefs,
            index: HashIndex::new(),
            window: Vec::new(),
            scratch: Vec::new(),
            xxh: None,
            total_in: 0,
            started: false,
        }
    }

    /// Maximum number of input bytes accepted per [`compress_block`](Self::compress_block) call.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Write the frame header and start a new frame.  Returns the header length.
    pub fn begin(&mut self, dst: &mut Vec<u8>) -> Result<usize, Lz4FError> {
        let header = encode_header(&self.prefs.frame_info);
        dst.extend_from_slice(&header);

        self.window.clear();
        self.total_in = 0;
        self.xxh = match self.prefs.frame_info.content_checksum_flag {
            ContentChecksum::Enabled => Some(content_hasher()),
            ContentChecksum::Disabled => None,
        };
        self.started = true;
        Ok(header.len())
    }

    /// Compress one block of at most [`block_size`](Self::block_size) bytes
    /// and append it to `dst`.  An empty block writes nothing.
    ///
    /// Returns the number of bytes appended.
    pub fn compress_block(&mut self, block: &[u8], dst: &mut Vec<u8>) -> Result<usize, Lz4FError> {
        if !self.started {
            return Err(Lz4FError::CompressionStateUninitialized);
        }
        if block.len() > self.block_size {
            return Err(Lz4FError::SrcSizeTooLarge);
        }
        if block.is_empty() {
            return Ok(0);
        }

        if let Some(xxh) = self.xxh.as_mut() {
            xxh.update(block);
        }
        self.total_in += block.len() as u64;

        let linked = self.prefs.frame_info.block_mode == BlockMode::Linked;
        let (src, prefix_len) = if linked {
            self.window.extend_from_slice(block);
            (&self.window[..], self.window.len() - block.len())
        } else {
            (block, 0)
        };

        self.scratch.resize(block.len() - 1, 0);
        let compressed = match compress_with_index(
            &mut self.index,
            src,
            prefix_len,
            &mut self.scratch,
            self.prefs.acceleration,
        ) {
            Ok(n) => Some(n),
            Err(Lz4Error::DestinationTooSmall) => None,
            Err(e) => return Err(e.into()),
        };

        let start = dst.len();
        let payload: &[u8] = match compressed {
            Some(n) => {
                dst.extend_from_slice(&(n as u32).to_le_bytes());
                &self.scratch[..n]
            }
            None => {
                let header = block.len() as u32 | LZ4F_BLOCKUNCOMPRESSED_FLAG;
                dst.extend_from_slice(&header.to_le_bytes());
                block
            }
        };
        dst.extend_from_slice(payload);
        if self.prefs.frame_info.block_checksum_flag == BlockChecksum::Enabled {
            dst.extend_from_slice(&xxh32_oneshot(payload, 0).to_le_bytes());
        }

        if linked && self.window.len() > KB64 {
            let excess = self.window.len() - KB64;
            self.window.drain(..excess);
        }
        debug_assert!(self.window.len() <= LZ4_DISTANCE_MAX + 1);

        Ok(dst.len() - start)
    }

    /// Write the end mark and optional content checksum, closing the frame.
    ///
    /// Fails with `FrameSizeWrong` when the descriptor declared a content
    /// size that differs from what was compressed.
    pub fn end(&mut self, dst: &mut Vec<u8>) -> Result<usize, Lz4FError> {
        if !self.started {
            return Err(Lz4FError::CompressionStateUninitialized);
        }
        self.started = false;

        if let Some(declared) = self.prefs.frame_info.content_size {
            if declared != self.total_in {
                return Err(Lz4FError::FrameSizeWrong);
            }
        }

        let start = dst.len();
        dst.extend_from_slice(&0u32.to_le_bytes());
        if let Some(xxh) = self.xxh.take() {
            dst.extend_from_slice(&xxh.digest().to_le_bytes());
        }
        self.window.clear();
        Ok(dst.len() - start)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// One-shot
// ─────────────────────────────────────────────────────────────────────────────

/// Compress `src` into one complete frame.
///
/// The block size id is shrunk to the smallest that holds `src` in one block
/// (never above the requested one).  If `prefs.frame_info.content_size` is
/// `Some`, the actual length of `src` is declared in the header.
pub fn compress_frame(src: &[u8], prefs: &Preferences) -> Result<Vec<u8>, Lz4FError> {
    let mut prefs = *prefs;
    prefs.frame_info.block_size_id =
        optimal_block_size_id(prefs.frame_info.block_size_id, src.len());
    if prefs.frame_info.content_size.is_some() {
        prefs.frame_info.content_size = Some(src.len() as u64);
    }

    let mut out = Vec::with_capacity(compress_frame_bound(src.len(), &prefs));
    let mut cctx = FrameCompressor::new(prefs);
    cctx.begin(&mut out)?;
    for chunk in src.chunks(cctx.block_size()) {
        cctx.compress_block(chunk, &mut out)?;
    }
    cctx.end(&mut out)?;
    Ok(out)
}

/// Compress `src` into one frame with default preferences and a declared
/// content size.
pub fn compress_frame_to_vec(src: &[u8]) -> Result<Vec<u8>, Lz4FError> {
    let mut prefs = Preferences::default();
    prefs.frame_info.content_size = Some(0);
    compress_frame(src, &prefs)
}

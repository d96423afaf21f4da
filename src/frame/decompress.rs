//! LZ4 Frame decompression.
//!
//! [`FrameDecoder`] holds the per-frame state (descriptor, running content
//! checksum, linked-history window) and decodes one block at a time; it does
//! no I/O of its own, so both the slice API below and the streaming reader in
//! [`crate::file`] drive it.
//!
//! Validation order for each block: size field against the frame block size,
//! then the block checksum (before any decoding), then the token stream.
//! After the end mark the declared content size and the content checksum are
//! checked.

use crate::block::decompress::decompress_with_prefix;
use crate::frame::header::{
    block_size, decode_header, decode_skippable_header, is_skippable_magic, read_le32,
};
use crate::frame::types::{
    BlockChecksum, BlockMode, ContentChecksum, FrameInfo, FrameType, Lz4FError, BF_SIZE, BH_SIZE,
    LZ4F_BLOCKUNCOMPRESSED_FLAG, SKIPPABLE_HEADER_SIZE,
};
use crate::xxhash::{content_hasher, xxh32_oneshot, Xxh32State};

/// History kept between linked blocks.
const MAX_DICT_SIZE: usize = 64 * 1024;

/// Upper bound on speculative pre-allocation from a declared content size.
const MAX_PREALLOC: usize = 64 * 1024 * 1024;

// ─────────────────────────────────────────────────────────────────────────────
// FrameDecoder
// ─────────────────────────────────────────────────────────────────────────────

/// Per-frame decoding state.
pub struct FrameDecoder {
    info: FrameInfo,
    block_max: usize,
    /// Linked mode: up to 64 KiB of previous output, then scratch space for
    /// the block being decoded.
    window: Vec<u8>,
    xxh: Option<Xxh32State>,
    produced: u64,
}

impl FrameDecoder {
    pub fn new(info: FrameInfo) -> Self {
        FrameDecoder {
            block_max: block_size(info.block_size_id),
            xxh: match info.content_checksum_flag {
                ContentChecksum::Enabled => Some(content_hasher()),
                ContentChecksum::Disabled => None,
            },
            info,
            window: Vec::new(),
            produced: 0,
        }
    }

    pub fn frame_info(&self) -> &FrameInfo {
        &self.info
    }

    /// Maximum decoded size of one block.
    pub fn block_max(&self) -> usize {
        self.block_max
    }

    /// Bytes decoded so far in this frame.
    pub fn produced(&self) -> u64 {
        self.produced
    }

    /// Number of bytes (payload plus optional checksum) following a non-zero
    /// block header.
    pub fn block_data_len(&self, block_header: u32) -> Result<usize, Lz4FError> {
        let size = (block_header & !LZ4F_BLOCKUNCOMPRESSED_FLAG) as usize;
        if size > self.block_max {
            return Err(Lz4FError::DecompressionFailed);
        }
        Ok(size + self.block_checksum_len())
    }

    fn block_checksum_len(&self) -> usize {
        match self.info.block_checksum_flag {
            BlockChecksum::Enabled => BF_SIZE,
            BlockChecksum::Disabled => 0,
        }
    }

    /// Number of bytes following the end mark (content checksum).
    pub fn suffix_len(&self) -> usize {
        match self.info.content_checksum_flag {
            ContentChecksum::Enabled => BF_SIZE,
            ContentChecksum::Disabled => 0,
        }
    }

    /// Decode one block and append its content to `out`.
    ///
    /// `data` is exactly [`block_data_len`](Self::block_data_len) bytes.
    /// `out` may not grow beyond `limit` bytes in total; on any error `out`
    /// is left as it was.  Returns the number of bytes appended.
    pub fn decode_block(
        &mut self,
        block_header: u32,
        data: &[u8],
        out: &mut Vec<u8>,
        limit: usize,
    ) -> Result<usize, Lz4FError> {
        if data.len() != self.block_data_len(block_header)? {
            return Err(Lz4FError::FrameSizeWrong);
        }
        let stored = block_header & LZ4F_BLOCKUNCOMPRESSED_FLAG != 0;
        let size = data.len() - self.block_checksum_len();
        let payload = &data[..size];

        if self.info.block_checksum_flag == BlockChecksum::Enabled
            && xxh32_oneshot(payload, 0) != read_le32(data, size)
        {
            return Err(Lz4FError::BlockChecksumInvalid);
        }

        let start = out.len();
        let room = limit.saturating_sub(start);
        let linked = self.info.block_mode == BlockMode::Linked;

        if stored {
            if size > room {
                return Err(Lz4FError::DstMaxSizeTooSmall);
            }
            out.extend_from_slice(payload);
            if linked {
                self.window.extend_from_slice(payload);
            }
        } else if linked {
            let hist = self.window.len();
            self.window.resize(hist + self.block_max, 0);
            let n = match decompress_with_prefix(payload, &mut self.window, hist, 0) {
                Ok(n) => n,
                Err(_) => {
                    self.window.truncate(hist);
                    return Err(Lz4FError::DecompressionFailed);
                }
            };
            self.window.truncate(hist + n);
            if n > room {
                self.window.truncate(hist);
                return Err(Lz4FError::DstMaxSizeTooSmall);
            }
            out.extend_from_slice(&self.window[hist..]);
        } else {
            out.resize(start + self.block_max, 0);
            let n = match decompress_with_prefix(payload, out, start, start) {
                Ok(n) => n,
                Err(_) => {
                    out.truncate(start);
                    return Err(Lz4FError::DecompressionFailed);
                }
            };
            out.truncate(start + n);
            if n > room {
                out.truncate(start);
                return Err(Lz4FError::DstMaxSizeTooSmall);
            }
        }

        if linked && self.window.len() > MAX_DICT_SIZE {
            let excess = self.window.len() - MAX_DICT_SIZE;
            self.window.drain(..excess);
        }
        if let Some(xxh) = self.xxh.as_mut() {
            xxh.update(&out[start..]);
        }
        let n = out.len() - start;
        self.produced += n as u64;
        Ok(n)
    }

    /// Verify the frame trailer.  `suffix` is exactly
    /// [`suffix_len`](Self::suffix_len) bytes.
    pub fn finish(&mut self, suffix: &[u8]) -> Result<(), Lz4FError> {
        if suffix.len() != self.suffix_len() {
            return Err(Lz4FError::FrameSizeWrong);
        }
        if let Some(declared) = self.info.content_size {
            if declared != self.produced {
                return Err(Lz4FError::FrameSizeWrong);
            }
        }
        if let Some(xxh) = self.xxh.take() {
            if xxh.digest() != read_le32(suffix, 0) {
                return Err(Lz4FError::ContentChecksumInvalid);
            }
        }
        self.window.clear();
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Slice API
// ─────────────────────────────────────────────────────────────────────────────

/// Describe the frame at the start of `src`.  Returns the descriptor and the
/// header length.
///
/// For a skippable frame, `frame_type` is `SkippableFrame` and
/// `content_size` holds the length of its user data.
pub fn get_frame_info(src: &[u8]) -> Result<(FrameInfo, usize), Lz4FError> {
    if src.len() >= 4 && is_skippable_magic(read_le32(src, 0)) {
        let size = decode_skippable_header(src)?;
        let info = FrameInfo {
            frame_type: FrameType::SkippableFrame,
            content_size: Some(size as u64),
            ..FrameInfo::default()
        };
        return Ok((info, SKIPPABLE_HEADER_SIZE));
    }
    decode_header(src)
}

/// Decode the standard frame at the start of `src`, appending to `out`
/// without letting it exceed `limit`.  Returns the bytes of `src` consumed.
fn decompress_frame_into(src: &[u8], out: &mut Vec<u8>, limit: usize) -> Result<usize, Lz4FError> {
    let (info, mut pos) = decode_header(src)?;

    if let Some(declared) = info.content_size {
        let room = limit.saturating_sub(out.len());
        if declared > room as u64 {
            return Err(Lz4FError::DstMaxSizeTooSmall);
        }
        out.reserve((declared as usize).min(MAX_PREALLOC));
    }

    let mut dctx = FrameDecoder::new(info);
    loop {
        if src.len() - pos < BH_SIZE {
            return Err(Lz4FError::FrameSizeWrong);
        }
        let block_header = read_le32(src, pos);
        pos += BH_SIZE;
        if block_header == 0 {
            break;
        }
        let len = dctx.block_data_len(block_header)?;
        if src.len() - pos < len {
            return Err(Lz4FError::FrameSizeWrong);
        }
        dctx.decode_block(block_header, &src[pos..pos + len], out, limit)?;
        pos += len;
    }

    let suffix = dctx.suffix_len();
    if src.len() - pos < suffix {
        return Err(Lz4FError::FrameSizeWrong);
    }
    dctx.finish(&src[pos..pos + suffix])?;
    Ok(pos + suffix)
}

/// Decode exactly one standard frame from the start of `src`.
///
/// Returns the content and the number of bytes of `src` consumed; trailing
/// bytes are left for the caller.
pub fn decompress_frame(src: &[u8], max_output: usize) -> Result<(Vec<u8>, usize), Lz4FError> {
    let mut out = Vec::new();
    let consumed = decompress_frame_into(src, &mut out, max_output)?;
    Ok((out, consumed))
}

/// Decode every frame in `src` (standard frames concatenated, skippable
/// frames skipped) into one buffer of at most `max_output` bytes.
///
/// Nothing is returned on error.
pub fn decompress(src: &[u8], max_output: usize) -> Result<Vec<u8>, Lz4FError> {
    if src.is_empty() {
        return Err(Lz4FError::FrameHeaderIncomplete);
    }
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < src.len() {
        let rest = &src[pos..];
        if rest.len() >= 4 && is_skippable_magic(read_le32(rest, 0)) {
            let size = decode_skippable_header(rest)?;
            let total = SKIPPABLE_HEADER_SIZE
                .checked_add(size)
                .filter(|&t| t <= rest.len())
                .ok_or(Lz4FError::FrameSizeWrong)?;
            pos += total;
            continue;
        }
        pos += decompress_frame_into(rest, &mut out, max_output)?;
    }
    Ok(out)
}

/// Decode every frame in `src` with no output limit.
pub fn decompress_frame_to_vec(src: &[u8]) -> Result<Vec<u8>, Lz4FError> {
    decompress(src, usize::MAX)
}

//! Frame header encoding/decoding, byte-order helpers, block-size utilities
//! and compress-bound functions.
//!
//! Header layout (all integers little-endian):
//!
//! | Field        | Bytes | Notes                                            |
//! |--------------|-------|--------------------------------------------------|
//! | magic        | 4     | `0x184D2204`                                     |
//! | FLG          | 1     | version(7-6)=01, B.Indep(5), B.Checksum(4), C.Size(3), C.Checksum(2), reserved(1), DictID(0) |
//! | BD           | 1     | block size id in bits 6-4, other bits reserved   |
//! | content size | 0 / 8 | present when C.Size is set                       |
//! | dict id      | 0 / 4 | present when DictID is set                       |
//! | HC           | 1     | `(XXH32(FLG..last descriptor byte, 0) >> 8) & 0xFF` |

use crate::frame::types::{
    BlockChecksum, BlockMode, BlockSizeId, ContentChecksum, FrameInfo, FrameType, Lz4FError,
    Preferences, BF_SIZE, BH_SIZE, LZ4F_MAGICNUMBER, LZ4F_MAGIC_SKIPPABLE_START,
    LZ4F_SKIPPABLE_MASK, MAX_FH_SIZE, MIN_FH_SIZE, MIN_HEADER_PROBE, SKIPPABLE_HEADER_SIZE,
};
use crate::xxhash::xxh32_oneshot;

// FLG bits.
const FLG_VERSION_SHIFT: u8 = 6;
const FLG_VERSION: u8 = 1;
const FLG_BLOCK_INDEPENDENCE: u8 = 1 << 5;
const FLG_BLOCK_CHECKSUM: u8 = 1 << 4;
const FLG_CONTENT_SIZE: u8 = 1 << 3;
const FLG_CONTENT_CHECKSUM: u8 = 1 << 2;
const FLG_RESERVED: u8 = 1 << 1;
const FLG_DICT_ID: u8 = 1;

// BD bits.
const BD_BLOCK_SIZE_SHIFT: u8 = 4;
const BD_RESERVED: u8 = 0x8F;

// ─────────────────────────────────────────────────────────────────────────────
// Byte-order I/O helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Read a little-endian `u32` from `src` at byte `offset`.
#[inline]
pub fn read_le32(src: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        src[offset],
        src[offset + 1],
        src[offset + 2],
        src[offset + 3],
    ])
}

/// Write a little-endian `u32` into `dst` at byte `offset`.
#[inline]
pub fn write_le32(dst: &mut [u8], offset: usize, value: u32) {
    dst[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Read a little-endian `u64` from `src` at byte `offset`.
#[inline]
pub fn read_le64(src: &[u8], offset: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&src[offset..offset + 8]);
    u64::from_le_bytes(word)
}

/// Write a little-endian `u64` into `dst` at byte `offset`.
#[inline]
pub fn write_le64(dst: &mut [u8], offset: usize, value: u64) {
    dst[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}

// ─────────────────────────────────────────────────────────────────────────────
// Block size utilities
// ─────────────────────────────────────────────────────────────────────────────

/// Maximum block size in bytes for a block size id (`Default` → 64 KiB).
pub fn block_size(block_size_id: BlockSizeId) -> usize {
    match block_size_id {
        BlockSizeId::Default | BlockSizeId::Max64Kb => 64 * 1024,
        BlockSizeId::Max256Kb => 256 * 1024,
        BlockSizeId::Max1Mb => 1024 * 1024,
        BlockSizeId::Max4Mb => 4 * 1024 * 1024,
    }
}

/// Smallest block size id able to hold `src_size` bytes in one block,
/// capped at `requested`.
pub fn optimal_block_size_id(requested: BlockSizeId, src_size: usize) -> BlockSizeId {
    let requested_id = requested.id();
    let mut proposed = BlockSizeId::Max64Kb;
    while proposed.id() < requested_id {
        if src_size <= block_size(proposed) {
            return proposed;
        }
        proposed = match BlockSizeId::from_id(proposed.id() + 1) {
            Some(next) => next,
            None => break,
        };
    }
    requested
}

// ─────────────────────────────────────────────────────────────────────────────
// Header checksum
// ─────────────────────────────────────────────────────────────────────────────

/// Single-byte frame header checksum: `(XXH32(descriptor, 0) >> 8) & 0xFF`.
///
/// `descriptor` runs from FLG up to (not including) the checksum byte.
#[inline]
pub fn header_checksum(descriptor: &[u8]) -> u8 {
    ((xxh32_oneshot(descriptor, 0) >> 8) & 0xFF) as u8
}

// ─────────────────────────────────────────────────────────────────────────────
// Compress bound
// ─────────────────────────────────────────────────────────────────────────────

/// Worst-case size of a complete frame holding `src_size` bytes.
///
/// Every block may fall back to stored form, so the bound is the raw size
/// plus the header, a block header (and optional checksum) per block, the
/// end mark and the optional content checksum.
pub fn compress_frame_bound(src_size: usize, prefs: &Preferences) -> usize {
    let info = &prefs.frame_info;
    let block = block_size(info.block_size_id);

    let nb_full_blocks = src_size / block;
    let last_block_size = src_size % block;
    let nb_blocks = nb_full_blocks + usize::from(last_block_size > 0);

    let block_crc_size = if info.block_checksum_flag == BlockChecksum::Enabled {
        BF_SIZE
    } else {
        0
    };
    let frame_end = BH_SIZE
        + if info.content_checksum_flag == ContentChecksum::Enabled {
            BF_SIZE
        } else {
            0
        };

    MAX_FH_SIZE + (BH_SIZE + block_crc_size) * nb_blocks + src_size + frame_end
}

// ─────────────────────────────────────────────────────────────────────────────
// Header encode / decode
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
pub(crate) fn is_skippable_magic(magic: u32) -> bool {
    magic & LZ4F_SKIPPABLE_MASK == LZ4F_MAGIC_SKIPPABLE_START
}

/// Serialize a frame header for `info`.
pub fn encode_header(info: &FrameInfo) -> Vec<u8> {
    let mut header = [0u8; MAX_FH_SIZE];
    write_le32(&mut header, 0, LZ4F_MAGICNUMBER);

    let mut flg = FLG_VERSION << FLG_VERSION_SHIFT;
    if info.block_mode == BlockMode::Independent {
        flg |= FLG_BLOCK_INDEPENDENCE;
    }
    if info.block_checksum_flag == BlockChecksum::Enabled {
        flg |= FLG_BLOCK_CHECKSUM;
    }
    if info.content_size.is_some() {
        flg |= FLG_CONTENT_SIZE;
    }
    if info.content_checksum_flag == ContentChecksum::Enabled {
        flg |= FLG_CONTENT_CHECKSUM;
    }
    if info.dict_id.is_some() {
        flg |= FLG_DICT_ID;
    }
    header[4] = flg;
    header[5] = info.block_size_id.id() << BD_BLOCK_SIZE_SHIFT;

    let mut pos = 6;
    if let Some(size) = info.content_size {
        write_le64(&mut header, pos, size);
        pos += 8;
    }
    if let Some(id) = info.dict_id {
        write_le32(&mut header, pos, id);
        pos += 4;
    }
    header[pos] = header_checksum(&header[4..pos]);
    header[..pos + 1].to_vec()
}

/// Total header length implied by the first bytes of a frame.
///
/// Needs at least [`MIN_HEADER_PROBE`] bytes (magic + FLG).  Skippable
/// frames report their fixed 8-byte header.
pub fn header_size(src: &[u8]) -> Result<usize, Lz4FError> {
    if src.len() < MIN_HEADER_PROBE {
        return Err(Lz4FError::FrameHeaderIncomplete);
    }
    let magic = read_le32(src, 0);
    if is_skippable_magic(magic) {
        return Ok(SKIPPABLE_HEADER_SIZE);
    }
    if magic != LZ4F_MAGICNUMBER {
        return Err(Lz4FError::FrameTypeUnknown);
    }
    let flg = src[4];
    Ok(MIN_FH_SIZE
        + if flg & FLG_CONTENT_SIZE != 0 { 8 } else { 0 }
        + if flg & FLG_DICT_ID != 0 { 4 } else { 0 })
}

/// Parse a standard frame header.  Returns the descriptor and header length.
///
/// The checksum byte is verified before any field is interpreted, so a
/// damaged header is reported as `HeaderChecksumInvalid`; an intact header
/// with an unsupported version, a reserved bit or a reserved block size id
/// is reported as a parameter error.
pub fn decode_header(src: &[u8]) -> Result<(FrameInfo, usize), Lz4FError> {
    let len = header_size(src)?;
    if is_skippable_magic(read_le32(src, 0)) {
        return Err(Lz4FError::FrameTypeUnknown);
    }
    if src.len() < len {
        return Err(Lz4FError::FrameHeaderIncomplete);
    }
    if header_checksum(&src[4..len - 1]) != src[len - 1] {
        return Err(Lz4FError::HeaderChecksumInvalid);
    }

    let flg = src[4];
    let bd = src[5];
    if flg >> FLG_VERSION_SHIFT != FLG_VERSION {
        return Err(Lz4FError::HeaderVersionWrong);
    }
    if flg & FLG_RESERVED != 0 || bd & BD_RESERVED != 0 {
        return Err(Lz4FError::ReservedFlagSet);
    }
    let block_size_id = BlockSizeId::from_id(bd >> BD_BLOCK_SIZE_SHIFT)
        .ok_or(Lz4FError::MaxBlockSizeInvalid)?;

    let mut pos = 6;
    let content_size = if flg & FLG_CONTENT_SIZE != 0 {
        let size = read_le64(src, pos);
        pos += 8;
        Some(size)
    } else {
        None
    };
    let dict_id = if flg & FLG_DICT_ID != 0 {
        Some(read_le32(src, pos))
    } else {
        None
    };

    let info = FrameInfo {
        block_size_id,
        block_mode: if flg & FLG_BLOCK_INDEPENDENCE != 0 {
            BlockMode::Independent
        } else {
            BlockMode::Linked
        },
        content_checksum_flag: if flg & FLG_CONTENT_CHECKSUM != 0 {
            ContentChecksum::Enabled
        } else {
            ContentChecksum::Disabled
        },
        frame_type: FrameType::Frame,
        content_size,
        dict_id,
        block_checksum_flag: if flg & FLG_BLOCK_CHECKSUM != 0 {
            BlockChecksum::Enabled
        } else {
            BlockChecksum::Disabled
        },
    };
    Ok((info, len))
}

/// Parse a skippable frame header.  Returns the user-data length.
pub(crate) fn decode_skippable_header(src: &[u8]) -> Result<usize, Lz4FError> {
    if src.len() < SKIPPABLE_HEADER_SIZE {
        return Err(Lz4FError::FrameHeaderIncomplete);
    }
    Ok(read_le32(src, 4) as usize)
}

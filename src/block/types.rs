//! LZ4 block constants and the small byte-level helpers shared by the
//! encoder, decoder and match finder.
//!
//! Constants follow the LZ4 block format document:
//!   - `MINMATCH`, `LASTLITERALS`, `MFLIMIT`: parsing restrictions
//!   - `ML_BITS` / `ML_MASK` / `RUN_MASK`: token nibble layout
//!   - `LZ4_DISTANCE_MAX`: largest encodable back-reference
//!
//! See <https://github.com/lz4/lz4/blob/dev/doc/lz4_Block_format.md>.

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum match length encoded in an LZ4 block.
pub const MINMATCH: usize = 4;

/// Last N bytes of a block are always emitted as literals.
/// See doc/lz4_Block_format.md#parsing-restrictions.
pub const LASTLITERALS: usize = 5;

/// The last match must start at least this many bytes before the end of the
/// block.  See doc/lz4_Block_format.md#parsing-restrictions.
pub const MFLIMIT: usize = 12;

/// Blocks shorter than this are emitted as a single literal run.
pub const LZ4_MIN_LENGTH: usize = MFLIMIT + 1;

/// Largest back-reference distance an offset field can carry.
pub const LZ4_DISTANCE_MAX: usize = 65_535;

/// Bits of the token used by the match-length nibble.
pub const ML_BITS: u32 = 4;
/// Mask for the match-length nibble (15).
pub const ML_MASK: u32 = (1u32 << ML_BITS) - 1;
/// Bits of the token used by the literal-length nibble.
pub const RUN_BITS: u32 = 8 - ML_BITS;
/// Mask for the literal-length nibble (15).
pub const RUN_MASK: u32 = (1u32 << RUN_BITS) - 1;

/// Maximum input size accepted by the block encoder (2 113 929 216 bytes).
pub const LZ4_MAX_INPUT_SIZE: usize = 0x7E00_0000;

// ─────────────────────────────────────────────────────────────────────────────
// Byte helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Read the little-endian 4-byte window starting at `pos`.
///
/// Caller guarantees `pos + 4 <= src.len()`.
#[inline(always)]
pub fn read_u32_le(src: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([src[pos], src[pos + 1], src[pos + 2], src[pos + 3]])
}

#[inline(always)]
fn read_u64_le(src: &[u8], pos: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&src[pos..pos + 8]);
    u64::from_le_bytes(word)
}

/// Read a little-endian `u16` offset field starting at `pos`.
#[inline(always)]
pub fn read_le16(src: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([src[pos], src[pos + 1]])
}

/// Count how many bytes starting at `a` and `b` agree, never reading at or
/// beyond `limit` on the `b` side.  Requires `a < b`.
#[inline]
pub fn count(src: &[u8], mut a: usize, mut b: usize, limit: usize) -> usize {
    let start = b;
    // Eight bytes at a time while both windows stay inside `limit`.
    while b + 8 <= limit {
        let diff = read_u64_le(src, a) ^ read_u64_le(src, b);
        if diff != 0 {
            return b - start + (diff.trailing_zeros() as usize >> 3);
        }
        a += 8;
        b += 8;
    }
    while b < limit && src[a] == src[b] {
        a += 1;
        b += 1;
    }
    b - start
}

/// Number of bytes needed to encode the extension of a length whose nibble
/// saturated (`len >= 15`).  Returns 0 for `len < 15`.
#[inline]
pub fn length_extension_size(len: usize) -> usize {
    if len < RUN_MASK as usize {
        0
    } else {
        (len - RUN_MASK as usize) / 255 + 1
    }
}

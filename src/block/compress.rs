//! LZ4 block compression.
//!
//! Implements the LZ4 block-format encoder:
//!
//! | Rust function              | Purpose                                         |
//! |----------------------------|-------------------------------------------------|
//! | [`compress_bound`]         | worst-case output size for an input size        |
//! | [`compress_fast`]          | one block into a caller buffer, with acceleration |
//! | [`compress_default`]       | `compress_fast` with acceleration 1             |
//! | [`compress_with_prefix`]   | one block that may reference a preceding prefix |
//! | [`compress_to_vec`]        | one block into a freshly allocated buffer       |
//!
//! The encoder walks the input greedily: at each position the
//! [`HashIndex`] is asked for the best backward reference; a hit emits one
//! sequence (pending literal run + match), a miss extends the literal run by
//! one byte.  The final sequence is a bare literal run with no offset.
//!
//! Capacity-exceeded conditions are signalled as
//! [`Err(Lz4Error::DestinationTooSmall)`](Lz4Error::DestinationTooSmall)
//! rather than returning 0, which makes error handling unambiguous at call
//! sites.
//!
//! See the [LZ4 block format specification] for the on-disk layout.
//!
//! [LZ4 block format specification]: https://github.com/lz4/lz4/blob/dev/doc/lz4_Block_format.md

use super::match_finder::{search_depth, HashIndex, Match};
use super::types::{
    length_extension_size, LASTLITERALS, LZ4_DISTANCE_MAX, LZ4_MAX_INPUT_SIZE, LZ4_MIN_LENGTH,
    MFLIMIT, MINMATCH, ML_BITS, ML_MASK, RUN_MASK,
};
use crate::error::Lz4Error;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Default acceleration factor (1, full search depth).
pub const LZ4_ACCELERATION_DEFAULT: i32 = 1;

/// Maximum allowed acceleration factor.
pub const LZ4_ACCELERATION_MAX: i32 = 65_537;

// ─────────────────────────────────────────────────────────────────────────────
// Utility
// ─────────────────────────────────────────────────────────────────────────────

/// Worst-case compressed size for a given input size.
///
/// Returns 0 if `input_size` exceeds [`LZ4_MAX_INPUT_SIZE`].
#[inline]
pub fn compress_bound(input_size: usize) -> usize {
    if input_size > LZ4_MAX_INPUT_SIZE {
        0
    } else {
        input_size + (input_size / 255) + 16
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sequence emission
// ─────────────────────────────────────────────────────────────────────────────

/// Append the extension bytes of a saturated length nibble.
///
/// `rest` is the length minus 15: each 255 is written as one `0xFF` byte and
/// the final byte (0..=254) holds the remainder.
#[inline]
fn write_length_extension(dst: &mut [u8], op: &mut usize, mut rest: usize) {
    while rest >= 255 {
        dst[*op] = 255;
        *op += 1;
        rest -= 255;
    }
    dst[*op] = rest as u8;
    *op += 1;
}

/// Emit one sequence: token, literal-length extension, literals and, when
/// `matched` is `Some`, the little-endian offset and match-length extension.
///
/// The space check is done up-front so `dst` is never partially written past
/// its end.
fn emit_sequence(
    dst: &mut [u8],
    op: &mut usize,
    literals: &[u8],
    matched: Option<Match>,
) -> Result<(), Lz4Error> {
    let lit_len = literals.len();
    let ml_code = matched.map(|m| m.length - MINMATCH);

    let needed = 1
        + length_extension_size(lit_len)
        + lit_len
        + ml_code.map_or(0, |code| 2 + length_extension_size(code));
    if *op + needed > dst.len() {
        return Err(Lz4Error::DestinationTooSmall);
    }

    let token_pos = *op;
    *op += 1;

    let mut token: u8 = if lit_len >= RUN_MASK as usize {
        write_length_extension(dst, op, lit_len - RUN_MASK as usize);
        (RUN_MASK << ML_BITS) as u8
    } else {
        (lit_len << ML_BITS) as u8
    };

    dst[*op..*op + lit_len].copy_from_slice(literals);
    *op += lit_len;

    if let (Some(m), Some(code)) = (matched, ml_code) {
        debug_assert!(m.offset >= 1 && m.offset <= LZ4_DISTANCE_MAX);
        dst[*op..*op + 2].copy_from_slice(&(m.offset as u16).to_le_bytes());
        *op += 2;
        if code >= ML_MASK as usize {
            token |= ML_MASK as u8;
            write_length_extension(dst, op, code - ML_MASK as usize);
        } else {
            token |= code as u8;
        }
    }

    dst[token_pos] = token;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Core compression loop
// ─────────────────────────────────────────────────────────────────────────────

/// Compress `src[prefix_len..]` into `dst` using `index` for match lookups.
///
/// Matches may reach back into the last 64 KiB of `src[..prefix_len]`.
/// `index` is reset first, then seeded with the in-window prefix positions.
///
/// Parsing restrictions of the block format are honoured: blocks shorter than
/// [`LZ4_MIN_LENGTH`] are a single literal run, no match starts within the
/// last [`MFLIMIT`] bytes, and every match ends at least [`LASTLITERALS`]
/// bytes before the end of the block.
pub(crate) fn compress_with_index(
    index: &mut HashIndex,
    src: &[u8],
    prefix_len: usize,
    dst: &mut [u8],
    acceleration: i32,
) -> Result<usize, Lz4Error> {
    if prefix_len > src.len() {
        return Err(Lz4Error::InvalidParameter);
    }
    let end = src.len();
    let block_len = end - prefix_len;
    if block_len > LZ4_MAX_INPUT_SIZE {
        return Err(Lz4Error::InvalidParameter);
    }

    let window_floor = prefix_len.saturating_sub(LZ4_DISTANCE_MAX);
    let mut op = 0usize;
    let mut anchor = prefix_len;

    if block_len >= LZ4_MIN_LENGTH {
        index.reset();
        index.insert_range(src, window_floor, prefix_len);

        let depth = search_depth(acceleration);
        let match_limit = end - LASTLITERALS;
        let last_match_start = end - MFLIMIT;
        let mut pos = prefix_len;

        while pos <= last_match_start {
            let Some(mut m) = index.find(src, pos, match_limit, window_floor, depth) else {
                index.insert(src, pos);
                pos += 1;
                continue;
            };

            // Catch up: grow the match backwards over pending literals.
            let mut start = pos;
            while start > anchor
                && start - m.offset > window_floor
                && src[start - 1] == src[start - 1 - m.offset]
            {
                start -= 1;
                m.length += 1;
            }

            emit_sequence(dst, &mut op, &src[anchor..start], Some(m))?;

            let next = start + m.length;
            index.insert_range(src, pos, next);
            pos = next;
            anchor = next;
        }
    }

    emit_sequence(dst, &mut op, &src[anchor..end], None)?;
    Ok(op)
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Compress `src[prefix_len..]` as one block, allowing back-references into
/// the preceding `prefix_len` bytes (only the last 64 KiB are reachable).
///
/// Used for linked frame blocks; a decoder must be given the same prefix.
pub fn compress_with_prefix(
    src: &[u8],
    prefix_len: usize,
    dst: &mut [u8],
    acceleration: i32,
) -> Result<usize, Lz4Error> {
    let mut index = HashIndex::new();
    compress_with_index(&mut index, src, prefix_len, dst, acceleration)
}

/// Compress `src` into `dst` with the given acceleration factor.
///
/// `acceleration` values below [`LZ4_ACCELERATION_DEFAULT`] are treated as
/// the default; values above [`LZ4_ACCELERATION_MAX`] are clamped.
///
/// Returns the number of bytes written, or
/// `Err(Lz4Error::DestinationTooSmall)` when `dst` cannot hold the result.
/// A `dst` of at least [`compress_bound`]`(src.len())` bytes never fails.
pub fn compress_fast(src: &[u8], dst: &mut [u8], acceleration: i32) -> Result<usize, Lz4Error> {
    compress_with_prefix(src, 0, dst, acceleration)
}

/// Compress `src` into `dst` with default acceleration.
pub fn compress_default(src: &[u8], dst: &mut [u8]) -> Result<usize, Lz4Error> {
    compress_fast(src, dst, LZ4_ACCELERATION_DEFAULT)
}

/// Compress `src` into a newly allocated buffer sized by [`compress_bound`].
///
/// Only fails with `InvalidParameter` for inputs above [`LZ4_MAX_INPUT_SIZE`].
pub fn compress_to_vec(src: &[u8], acceleration: i32) -> Result<Vec<u8>, Lz4Error> {
    if src.len() > LZ4_MAX_INPUT_SIZE {
        return Err(Lz4Error::InvalidParameter);
    }
    let mut dst = vec![0u8; compress_bound(src.len())];
    let written = compress_fast(src, &mut dst, acceleration)?;
    dst.truncate(written);
    Ok(dst)
}

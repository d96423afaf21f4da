//! LZ4 block decompression.
//!
//! A single linear pass over the token stream.  Every read is checked against
//! the end of `src` and every write against the end of the output buffer, so
//! malformed input can never cause an out-of-bounds access:
//!
//! | Condition                                   | Result                |
//! |---------------------------------------------|-----------------------|
//! | empty block, truncated literal/offset/length | `CorruptInput`        |
//! | offset 0 or reaching before the window floor | `CorruptInput`        |
//! | output would exceed the buffer              | `DestinationTooSmall` |
//!
//! Overlapping match copies (`offset < length`) replicate the bytes as they
//! are produced, which is how run-length patterns are encoded.

use super::types::{read_le16, MINMATCH, ML_BITS, ML_MASK, RUN_MASK};
use crate::error::Lz4Error;

/// Read the extension bytes following a saturated nibble and add them to
/// `len`.  Each `0xFF` adds 255 and continues; the first other byte ends the
/// chain.
#[inline]
fn read_length_extension(src: &[u8], ip: &mut usize, mut len: usize) -> Result<usize, Lz4Error> {
    loop {
        let b = *src.get(*ip).ok_or(Lz4Error::CorruptInput)?;
        *ip += 1;
        len = len.checked_add(b as usize).ok_or(Lz4Error::CorruptInput)?;
        if b != 255 {
            return Ok(len);
        }
    }
}

/// Decode one block into `buf[prefix_len..]`.
///
/// `buf[..prefix_len]` holds previously decoded history; match offsets may
/// reach back into it as far as `window_floor` (pass `prefix_len` to forbid
/// references outside the block).  The writable capacity is `buf.len()`.
///
/// Returns the number of bytes produced by this block.
pub fn decompress_with_prefix(
    src: &[u8],
    buf: &mut [u8],
    prefix_len: usize,
    window_floor: usize,
) -> Result<usize, Lz4Error> {
    if src.is_empty() {
        return Err(Lz4Error::CorruptInput);
    }
    if prefix_len > buf.len() || window_floor > prefix_len {
        return Err(Lz4Error::InvalidParameter);
    }

    let mut ip = 0usize;
    let mut op = prefix_len;

    loop {
        let token = *src.get(ip).ok_or(Lz4Error::CorruptInput)?;
        ip += 1;

        // Literals.
        let mut lit_len = (token >> ML_BITS) as usize;
        if lit_len == RUN_MASK as usize {
            lit_len = read_length_extension(src, &mut ip, lit_len)?;
        }
        let lit_end = ip.checked_add(lit_len).ok_or(Lz4Error::CorruptInput)?;
        if lit_end > src.len() {
            return Err(Lz4Error::CorruptInput);
        }
        if lit_len > buf.len() - op {
            return Err(Lz4Error::DestinationTooSmall);
        }
        buf[op..op + lit_len].copy_from_slice(&src[ip..lit_end]);
        ip = lit_end;
        op += lit_len;

        // The last sequence carries literals only.
        if ip == src.len() {
            return Ok(op - prefix_len);
        }

        // Match.
        if ip + 2 > src.len() {
            return Err(Lz4Error::CorruptInput);
        }
        let offset = read_le16(src, ip) as usize;
        ip += 2;
        if offset == 0 || offset > op - window_floor {
            return Err(Lz4Error::CorruptInput);
        }

        let mut match_len = (token as u32 & ML_MASK) as usize;
        if match_len == ML_MASK as usize {
            match_len = read_length_extension(src, &mut ip, match_len)?;
        }
        match_len += MINMATCH;
        if match_len > buf.len() - op {
            return Err(Lz4Error::DestinationTooSmall);
        }

        let from = op - offset;
        if offset >= match_len {
            buf.copy_within(from..from + match_len, op);
        } else {
            for i in 0..match_len {
                buf[op + i] = buf[from + i];
            }
        }
        op += match_len;
    }
}

/// Decode a standalone block into `dst`, returning the decoded length.
pub fn decompress_safe(src: &[u8], dst: &mut [u8]) -> Result<usize, Lz4Error> {
    decompress_with_prefix(src, dst, 0, 0)
}

/// Decode a standalone block into a new buffer of at most `max_output` bytes.
///
/// The buffer is sized to what `src` can actually produce, so an oversized
/// `max_output` costs nothing.
pub fn decompress_to_vec(src: &[u8], max_output: usize) -> Result<Vec<u8>, Lz4Error> {
    // One input byte never expands to more than 255 output bytes.
    let reachable = src.len().saturating_mul(255).saturating_add(64);
    let mut out = vec![0u8; max_output.min(reachable)];
    let n = decompress_safe(src, &mut out)?;
    out.truncate(n);
    Ok(out)
}

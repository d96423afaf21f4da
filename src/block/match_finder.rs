//! Hash-chain match finder for the LZ4 block encoder.
//!
//! The index maps a hash of every 4-byte window to the most recent position
//! it was seen at (`head`), and remembers for each position the distance to
//! the previous position with the same hash (`chain`).  The chain table is
//! indexed by `pos & CHAIN_MASK`; since no candidate may be more than
//! [`LZ4_DISTANCE_MAX`] bytes behind the current position, an entry can never
//! be overwritten while it is still reachable.
//!
//! A [`HashIndex`] is owned by exactly one compression call (or one streaming
//! encoder) and is never shared.
//!
//! | Operation               | Purpose                                          |
//! |-------------------------|--------------------------------------------------|
//! | [`HashIndex::insert`]   | record `pos` as the newest occurrence of its hash |
//! | [`HashIndex::find`]     | best `(offset, length)` for `pos`, or `None`     |
//! | [`search_depth`]        | acceleration → maximum candidates per lookup     |

use super::compress::{LZ4_ACCELERATION_DEFAULT, LZ4_ACCELERATION_MAX};
use super::types::{count, read_u32_le, LZ4_DISTANCE_MAX, MINMATCH};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// log2 of the number of hash buckets.
pub const HASH_LOG: u32 = 16;
const HASH_SIZE: usize = 1 << HASH_LOG;

const CHAIN_SIZE: usize = 1 << 16;
const CHAIN_MASK: usize = CHAIN_SIZE - 1;

/// Candidates examined per lookup at the default acceleration.
pub const MAX_SEARCH_DEPTH: usize = 16;

// ─────────────────────────────────────────────────────────────────────────────
// Match
// ─────────────────────────────────────────────────────────────────────────────

/// A backward reference: copy `length` bytes from `offset` bytes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Distance back from the current position, `1..=65535`.
    pub offset: usize,
    /// Number of bytes covered, at least [`MINMATCH`].
    pub length: usize,
}

/// Maximum number of chain candidates examined per lookup.
///
/// `acceleration` is clamped to `LZ4_ACCELERATION_DEFAULT..=LZ4_ACCELERATION_MAX`;
/// higher values search less.  The result is never below 1.
#[inline]
pub fn search_depth(acceleration: i32) -> usize {
    let accel = acceleration.clamp(LZ4_ACCELERATION_DEFAULT, LZ4_ACCELERATION_MAX) as usize;
    (MAX_SEARCH_DEPTH / accel).max(1)
}

// ─────────────────────────────────────────────────────────────────────────────
// HashIndex
// ─────────────────────────────────────────────────────────────────────────────

/// Call-scoped hash-chain index over 4-byte sequences.
pub struct HashIndex {
    /// `position + 1` of the newest occurrence per bucket; 0 = empty.
    head: Vec<u32>,
    /// Distance to the previous occurrence with the same hash; 0 = none.
    chain: Vec<u16>,
}

impl HashIndex {
    pub fn new() -> Self {
        HashIndex {
            head: vec![0; HASH_SIZE],
            chain: vec![0; CHAIN_SIZE],
        }
    }

    /// Forget every recorded position.
    pub fn reset(&mut self) {
        self.head.fill(0);
        self.chain.fill(0);
    }

    /// Knuth multiplicative hash of a 4-byte sequence.
    #[inline(always)]
    pub fn hash(sequence: u32) -> usize {
        (sequence.wrapping_mul(2_654_435_761) >> (32 - HASH_LOG)) as usize
    }

    /// Record `pos` as the newest occurrence of the sequence starting there.
    ///
    /// Positions must be inserted in increasing order.  Positions with fewer
    /// than four bytes after them are ignored.
    #[inline]
    pub fn insert(&mut self, src: &[u8], pos: usize) {
        if pos + MINMATCH > src.len() {
            return;
        }
        let h = Self::hash(read_u32_le(src, pos));
        let prev = self.head[h] as usize;
        if prev > pos {
            // Already recorded (prev == pos + 1).
            return;
        }
        let delta = if prev == 0 { 0 } else { pos + 1 - prev };
        self.chain[pos & CHAIN_MASK] = if delta > LZ4_DISTANCE_MAX { 0 } else { delta as u16 };
        self.head[h] = (pos + 1) as u32;
    }

    /// Insert every position in `start..end`.
    pub fn insert_range(&mut self, src: &[u8], start: usize, end: usize) {
        for pos in start..end {
            self.insert(src, pos);
        }
    }

    /// Find the longest match for the sequence at `pos`.
    ///
    /// - Candidates at or beyond `pos`, further than [`LZ4_DISTANCE_MAX`], or
    ///   below `window_floor` are rejected.
    /// - The match never extends to or past `match_limit`.
    /// - At most `depth` in-window candidates are compared; among equally long
    ///   matches the most recent one (smallest offset) wins.
    ///
    /// Returns `None` when no candidate reaches [`MINMATCH`] bytes.
    pub fn find(
        &self,
        src: &[u8],
        pos: usize,
        match_limit: usize,
        window_floor: usize,
        depth: usize,
    ) -> Option<Match> {
        if pos + MINMATCH > match_limit {
            return None;
        }
        let sequence = read_u32_le(src, pos);
        let mut best = Match { offset: 0, length: 0 };
        let mut next = self.head[Self::hash(sequence)] as usize;
        let mut remaining = depth;

        while next != 0 && remaining > 0 {
            let candidate = next - 1;
            if candidate >= pos || candidate < window_floor {
                break;
            }
            let offset = pos - candidate;
            if offset > LZ4_DISTANCE_MAX {
                break;
            }
            remaining -= 1;

            if read_u32_le(src, candidate) == sequence {
                let length = MINMATCH
                    + count(src, candidate + MINMATCH, pos + MINMATCH, match_limit);
                if length > best.length {
                    best = Match { offset, length };
                    if pos + length == match_limit {
                        break;
                    }
                }
            }

            let delta = self.chain[candidate & CHAIN_MASK] as usize;
            if delta == 0 || delta > candidate {
                break;
            }
            next = candidate - delta + 1;
        }

        (best.length >= MINMATCH).then_some(best)
    }
}

impl Default for HashIndex {
    fn default() -> Self {
        Self::new()
    }
}

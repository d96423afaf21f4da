//! XXH32 helpers over the `xxhash-rust` crate.
//!
//! The frame layer uses XXH32 (seed 0) for three things: the header checksum
//! byte, per-block checksums and the running content checksum.

pub use xxhash_rust::xxh32::Xxh32 as Xxh32State;

/// One-shot XXH32 of `data` with `seed`.
///
/// # Parity vectors
/// * `xxh32_oneshot(b"", 0)` == `0x02CC5D05`
#[inline]
pub fn xxh32_oneshot(data: &[u8], seed: u32) -> u32 {
    xxhash_rust::xxh32::xxh32(data, seed)
}

/// Fresh streaming state for a content checksum.
#[inline]
pub fn content_hasher() -> Xxh32State {
    Xxh32State::new(0)
}

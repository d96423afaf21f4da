// Integration tests for src/block/compress.rs: LZ4 block encoder
//
// Covers:
//   - `compress_bound` formula and the oversized-input sentinel
//   - exact token layout for the short-input parsing restrictions
//   - round trips through `decompress_safe` at several accelerations
//   - `DestinationTooSmall` when the caller buffer is short
//   - prefix-linked compression (`compress_with_prefix`)

use tracy_lz4::block::{
    compress_bound, compress_default, compress_fast, compress_to_vec, compress_with_prefix,
    decompress_safe, decompress_with_prefix, LZ4_MAX_INPUT_SIZE,
};
use tracy_lz4::Lz4Error;

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Deterministic pseudo-random bytes (xorshift32).
fn noise(len: usize, mut seed: u32) -> Vec<u8> {
    (0..len)
        .map(|_| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed as u8
        })
        .collect()
}

fn text(len: usize) -> Vec<u8> {
    b"The quick brown fox jumps over the lazy dog; pack my box with five dozen liquor jugs. "
        .iter()
        .cycle()
        .take(len)
        .copied()
        .collect()
}

fn round_trip(src: &[u8], acceleration: i32) {
    let mut dst = vec![0u8; compress_bound(src.len())];
    let n = compress_fast(src, &mut dst, acceleration).unwrap();
    let mut out = vec![0u8; src.len()];
    let m = decompress_safe(&dst[..n], &mut out).unwrap();
    assert_eq!(m, src.len());
    assert_eq!(out, src);
}

// ─────────────────────────────────────────────────────────────────────────────
// compress_bound
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn bound_formula() {
    assert_eq!(compress_bound(0), 16);
    assert_eq!(compress_bound(254), 254 + 16);
    assert_eq!(compress_bound(255), 255 + 1 + 16);
    assert_eq!(compress_bound(65_536), 65_536 + 257 + 16);
    assert_eq!(compress_bound(LZ4_MAX_INPUT_SIZE + 1), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Token layout
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn ten_repeated_bytes_stay_literal() {
    // Below 13 bytes no match may be emitted.
    let out = compress_to_vec(b"aaaaaaaaaa", 1).unwrap();
    let mut expected = vec![0xA0];
    expected.extend_from_slice(b"aaaaaaaaaa");
    assert_eq!(out, expected);
}

#[test]
fn fifteen_literals_need_an_extension_byte() {
    let src = b"0123456789abcde";
    let out = compress_to_vec(src, 1).unwrap();
    assert_eq!(out[0], 0xF0);
    assert_eq!(out[1], 0x00);
    assert_eq!(&out[2..], src);
}

#[test]
fn long_run_uses_offset_one() {
    let src = vec![b'z'; 64];
    let out = compress_to_vec(&src, 1).unwrap();
    // literal 'z', offset 1, match up to 5 bytes before the end, 5 literals.
    assert_eq!(out[0] >> 4, 1);
    assert_eq!(out[1], b'z');
    assert_eq!(&out[2..4], &[1, 0]);
    assert!(out.len() < 16);
    let mut back = vec![0u8; 64];
    assert_eq!(decompress_safe(&out, &mut back).unwrap(), 64);
    assert_eq!(back, src);
}

#[test]
fn last_five_bytes_are_literals() {
    let src = text(4096);
    let out = compress_to_vec(&src, 1).unwrap();
    // The final token carries at least LASTLITERALS bytes and no match.
    let tail = &out[out.len() - 5..];
    assert_eq!(tail, &src[src.len() - 5..]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Round trips
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn round_trip_shapes() {
    for src in [
        Vec::new(),
        vec![7u8],
        text(12),
        text(13),
        text(1000),
        vec![0u8; 100_000],
        noise(10_000, 0x1234_5678),
        text(200_000),
    ] {
        round_trip(&src, 1);
    }
}

#[test]
fn round_trip_accelerations() {
    let src = text(50_000);
    for accel in [-5, 0, 1, 2, 8, 1000, i32::MAX] {
        round_trip(&src, accel);
    }
}

#[test]
fn incompressible_input_stays_within_bound() {
    let src = noise(65_536, 7);
    let out = compress_to_vec(&src, 1).unwrap();
    assert!(out.len() <= compress_bound(src.len()));
}

#[test]
fn matches_never_reach_past_64k() {
    // A repeat 70 000 bytes back is out of reach; the block must still decode.
    let head = noise(1_000, 3);
    let mut src = head.clone();
    src.extend_from_slice(&noise(69_000, 4));
    src.extend_from_slice(&head);
    round_trip(&src, 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn short_destination() {
    let src = noise(200, 11);
    let mut dst = vec![0u8; 50];
    assert_eq!(compress_default(&src, &mut dst), Err(Lz4Error::DestinationTooSmall));
    let mut empty: [u8; 0] = [];
    assert_eq!(compress_default(b"", &mut empty), Err(Lz4Error::DestinationTooSmall));
}

// ─────────────────────────────────────────────────────────────────────────────
// Prefix-linked blocks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn prefix_references_shrink_the_block() {
    let prefix = text(4_000);
    let block = text(4_000);
    let mut joined = prefix.clone();
    joined.extend_from_slice(&block);

    let mut linked = vec![0u8; compress_bound(block.len())];
    let n = compress_with_prefix(&joined, prefix.len(), &mut linked, 1).unwrap();
    let alone = compress_to_vec(&block, 1).unwrap();
    assert!(n <= alone.len());

    let mut buf = prefix.clone();
    buf.resize(prefix.len() + block.len(), 0);
    let m = decompress_with_prefix(&linked[..n], &mut buf, prefix.len(), 0).unwrap();
    assert_eq!(m, block.len());
    assert_eq!(&buf[prefix.len()..], &block[..]);
}

#[test]
fn prefix_longer_than_input_is_invalid() {
    let mut dst = vec![0u8; 32];
    assert_eq!(
        compress_with_prefix(b"abc", 4, &mut dst, 1),
        Err(Lz4Error::InvalidParameter)
    );
}

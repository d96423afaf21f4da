// e2e/error_handling.rs: damaged input through the binding boundary
//
// Corruption must surface as one of the three error kinds, never as a panic,
// an out-of-bounds access or silently wrong output.

use tracy_lz4::binding::{compress, compress_with, decompress, decompress_block};
use tracy_lz4::frame::{decode_header, BlockChecksum, ContentChecksum, Preferences};
use tracy_lz4::Lz4Error;

fn payload(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| b"error handling payload "[i % 23] ^ ((i / 500) as u8 & 0x07))
        .collect()
}

fn checked_prefs() -> Preferences {
    let mut p = Preferences::default();
    p.frame_info.block_checksum_flag = BlockChecksum::Enabled;
    p.frame_info.content_checksum_flag = ContentChecksum::Enabled;
    p
}

// ─────────────────────────────────────────────────────────────────────────────
// Bit flips
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn any_bit_flip_with_checksums_is_detected() {
    let data = payload(20_000);
    let frame = compress_with(&data, &checked_prefs()).unwrap();
    for pos in 0..frame.len() {
        for bit in [0x01u8, 0x80] {
            let mut damaged = frame.clone();
            damaged[pos] ^= bit;
            match decompress(&damaged, data.len() as i64) {
                Ok(out) => panic!("flip at {pos}/{bit:#x} decoded {} bytes", out.len()),
                Err(e) => assert!(
                    matches!(e, Lz4Error::CorruptInput | Lz4Error::InvalidParameter),
                    "flip at {pos}: {e}"
                ),
            }
        }
    }
}

#[test]
fn payload_flip_is_corrupt_input() {
    let data = payload(5_000);
    let mut frame = compress_with(&data, &checked_prefs()).unwrap();
    let (_, hlen) = decode_header(&frame).unwrap();
    frame[hlen + 4 + 3] ^= 0x10;
    assert_eq!(decompress(&frame, data.len() as i64), Err(Lz4Error::CorruptInput));
}

#[test]
fn flips_without_checksums_never_panic() {
    let data = payload(8_000);
    let frame = compress(&data, None).unwrap();
    for pos in 0..frame.len() {
        let mut damaged = frame.clone();
        damaged[pos] = damaged[pos].wrapping_add(0x55);
        // Either an error or some output within the limit.
        if let Ok(out) = decompress(&damaged, data.len() as i64) {
            assert!(out.len() <= data.len());
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw blocks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn offset_past_output_start_is_corrupt() {
    // Two literals, then a match 40 000 bytes back.
    let offset = 40_000u16.to_le_bytes();
    let block = [0x20, b'h', b'i', offset[0], offset[1], 0x00];
    assert_eq!(decompress_block(&block, 1_000), Err(Lz4Error::CorruptInput));
}

#[test]
fn truncated_block_never_reproduces_the_input() {
    let data = payload(3_000);
    let block = tracy_lz4::binding::compress_block(&data).unwrap();
    assert_eq!(decompress_block(&block[..0], 3_000), Err(Lz4Error::CorruptInput));
    for cut in 1..block.len() {
        // A cut right after a literal run parses as a shorter valid block.
        match decompress_block(&block[..cut], data.len() as i64) {
            Ok(out) => assert!(out.len() < data.len(), "cut at {cut}"),
            Err(e) => assert_eq!(e, Lz4Error::CorruptInput, "cut at {cut}"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parameters and limits
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn negative_expected_size_is_checked_first() {
    assert_eq!(decompress(b"garbage", -7), Err(Lz4Error::InvalidParameter));
    assert_eq!(decompress_block(b"", i64::MIN), Err(Lz4Error::InvalidParameter));
}

#[test]
fn too_small_expected_size_is_retryable() {
    let data = payload(10_000);
    let frame = compress(&data, None).unwrap();
    let mut guess = 1_000i64;
    let out = loop {
        match decompress(&frame, guess) {
            Ok(out) => break out,
            Err(Lz4Error::DestinationTooSmall) => guess *= 2,
            Err(e) => panic!("unexpected {e}"),
        }
    };
    assert_eq!(out, data);
}

#[test]
fn garbage_frames_are_corrupt() {
    for junk in [
        &b""[..],
        b"\x04\x22\x4D",
        b"\x04\x22\x4D\x18",
        b"\x00\x00\x00\x00\x00\x00\x00\x00",
        b"\x50\x2A\x4D\x18\xFF\x00\x00\x00abc",
    ] {
        assert_eq!(decompress(junk, 100), Err(Lz4Error::CorruptInput), "{junk:?}");
    }
}

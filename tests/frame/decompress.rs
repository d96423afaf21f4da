// Integration tests for src/frame/decompress.rs: frame decoder
//
//   - every combination of block mode and checksum flags round-trips
//   - concatenated and skippable frames
//   - truncation, checksum and size-limit failures

use tracy_lz4::frame::{
    compress_frame, decompress, decompress_frame, decompress_frame_to_vec, get_frame_info,
    BlockChecksum, BlockMode, BlockSizeId, ContentChecksum, FrameInfo, FrameType, Lz4FError,
    Preferences,
};

fn sample(len: usize) -> Vec<u8> {
    let mut seed = 0x2545_F491u32;
    (0..len)
        .map(|i| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            // Mostly text-like with some noise so both block kinds appear.
            if i % 97 < 80 {
                b"lorem ipsum dolor sit amet "[i % 27]
            } else {
                seed as u8
            }
        })
        .collect()
}

fn all_prefs() -> Vec<Preferences> {
    let mut out = Vec::new();
    for mode in [BlockMode::Linked, BlockMode::Independent] {
        for block_crc in [BlockChecksum::Disabled, BlockChecksum::Enabled] {
            for content_crc in [ContentChecksum::Disabled, ContentChecksum::Enabled] {
                for content_size in [None, Some(0)] {
                    out.push(Preferences {
                        frame_info: FrameInfo {
                            block_size_id: BlockSizeId::Max64Kb,
                            block_mode: mode,
                            block_checksum_flag: block_crc,
                            content_checksum_flag: content_crc,
                            content_size,
                            ..FrameInfo::default()
                        },
                        ..Preferences::default()
                    });
                }
            }
        }
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Round trips
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn every_configuration_round_trips() {
    for len in [0usize, 1, 13, 5_000, 200_000] {
        let data = sample(len);
        for p in all_prefs() {
            let frame = compress_frame(&data, &p).unwrap();
            assert_eq!(decompress_frame_to_vec(&frame).unwrap(), data, "len {len} {p:?}");
        }
    }
}

#[test]
fn concatenated_frames_are_joined() {
    let a = sample(70_000);
    let b = b"second frame".to_vec();
    let mut joined = compress_frame(&a, &Preferences::default()).unwrap();
    joined.extend(compress_frame(&b, &Preferences::default()).unwrap());
    let mut expected = a.clone();
    expected.extend_from_slice(&b);
    assert_eq!(decompress(&joined, expected.len()).unwrap(), expected);
}

#[test]
fn skippable_frames_are_skipped() {
    let mut stream = vec![0x50, 0x2A, 0x4D, 0x18, 3, 0, 0, 0, b'x', b'y', b'z'];
    stream.extend(compress_frame(b"payload", &Preferences::default()).unwrap());
    assert_eq!(decompress(&stream, 100).unwrap(), b"payload");

    let (info, hlen) = get_frame_info(&stream).unwrap();
    assert_eq!(info.frame_type, FrameType::SkippableFrame);
    assert_eq!(info.content_size, Some(3));
    assert_eq!(hlen, 8);
}

#[test]
fn single_frame_reports_consumed_bytes() {
    let frame = compress_frame(b"one", &Preferences::default()).unwrap();
    let mut stream = frame.clone();
    stream.extend_from_slice(b"trailing");
    let (content, consumed) = decompress_frame(&stream, 10).unwrap();
    assert_eq!(content, b"one");
    assert_eq!(consumed, frame.len());
}

// ─────────────────────────────────────────────────────────────────────────────
// Failures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_input() {
    assert_eq!(decompress(&[], 10), Err(Lz4FError::FrameHeaderIncomplete));
}

#[test]
fn truncation_anywhere_fails() {
    let data = sample(10_000);
    let mut p = Preferences::default();
    p.frame_info.content_checksum_flag = ContentChecksum::Enabled;
    let frame = compress_frame(&data, &p).unwrap();
    for cut in 1..frame.len() {
        assert!(decompress(&frame[..cut], data.len()).is_err(), "cut at {cut}");
    }
}

#[test]
fn truncated_block_is_frame_size_wrong() {
    let frame = compress_frame(&sample(1_000), &Preferences::default()).unwrap();
    assert_eq!(
        decompress(&frame[..frame.len() - 6], 1_000),
        Err(Lz4FError::FrameSizeWrong)
    );
}

#[test]
fn block_checksum_catches_payload_flip() {
    let mut p = Preferences::default();
    p.frame_info.block_checksum_flag = BlockChecksum::Enabled;
    let mut frame = compress_frame(&sample(3_000), &p).unwrap();
    // First payload byte sits right after the 7-byte header and 4-byte block header.
    frame[11] ^= 0x40;
    assert_eq!(decompress(&frame, 3_000), Err(Lz4FError::BlockChecksumInvalid));
}

#[test]
fn content_checksum_catches_stored_flip() {
    let mut p = Preferences::default();
    p.frame_info.content_checksum_flag = ContentChecksum::Enabled;
    let data: Vec<u8> = (0..200u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8).collect();
    let mut frame = compress_frame(&data, &p).unwrap();
    let last = frame.len() - 1;
    frame[last] ^= 0xFF;
    assert_eq!(decompress(&frame, 200), Err(Lz4FError::ContentChecksumInvalid));
}

#[test]
fn oversized_block_header_is_rejected() {
    let mut frame = compress_frame(b"abc", &Preferences::default()).unwrap();
    // Replace the block header with a length above the 64 KiB block size.
    frame[7..11].copy_from_slice(&(0x0002_0000u32).to_le_bytes());
    assert_eq!(decompress(&frame, 100), Err(Lz4FError::DecompressionFailed));
}

#[test]
fn limit_is_enforced() {
    let data = sample(5_000);
    let frame = compress_frame(&data, &Preferences::default()).unwrap();
    assert_eq!(decompress(&frame, 4_999), Err(Lz4FError::DstMaxSizeTooSmall));
    assert_eq!(decompress(&frame, 5_000).unwrap(), data);
}

#[test]
fn declared_size_larger_than_limit_fails_early() {
    let mut p = Preferences::default();
    p.frame_info.content_size = Some(0);
    let frame = compress_frame(&sample(5_000), &p).unwrap();
    assert_eq!(decompress(&frame, 100), Err(Lz4FError::DstMaxSizeTooSmall));
}

// Integration tests for src/frame/header.rs: frame descriptor encode/decode
//
// Byte-level checks against the published LZ4 frame layout, plus every
// header rejection path.

use tracy_lz4::frame::header::{block_size, header_checksum, optimal_block_size_id};
use tracy_lz4::frame::types::{MAX_FH_SIZE, MIN_FH_SIZE};
use tracy_lz4::frame::{
    compress_frame_bound, decode_header, encode_header, header_size, BlockChecksum, BlockMode,
    BlockSizeId, ContentChecksum, FrameInfo, Lz4FError, Preferences,
};

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Rewrite FLG/BD in `header` and recompute the checksum byte.
fn patch(header: &[u8], flg: u8, bd: u8) -> Vec<u8> {
    let mut h = header.to_vec();
    h[4] = flg;
    h[5] = bd;
    let last = h.len() - 1;
    h[last] = header_checksum(&h[4..last]);
    h
}

fn lz4_cli_default() -> FrameInfo {
    FrameInfo {
        block_mode: BlockMode::Independent,
        content_checksum_flag: ContentChecksum::Enabled,
        ..FrameInfo::default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Encoding
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn reference_header_bytes() {
    // Independent 64 KiB blocks with a content checksum: the header every
    // stock `lz4` file starts with.
    assert_eq!(
        encode_header(&lz4_cli_default()),
        vec![0x04, 0x22, 0x4D, 0x18, 0x64, 0x40, 0xA7]
    );
}

#[test]
fn header_lengths() {
    assert_eq!(encode_header(&FrameInfo::default()).len(), MIN_FH_SIZE);
    let full = FrameInfo {
        content_size: Some(1),
        dict_id: Some(7),
        ..FrameInfo::default()
    };
    assert_eq!(encode_header(&full).len(), MAX_FH_SIZE);
}

#[test]
fn decode_round_trips_every_field() {
    let info = FrameInfo {
        block_size_id: BlockSizeId::Max1Mb,
        block_mode: BlockMode::Independent,
        content_checksum_flag: ContentChecksum::Enabled,
        block_checksum_flag: BlockChecksum::Enabled,
        content_size: Some(123_456_789),
        dict_id: Some(0xCAFE_BABE),
        ..FrameInfo::default()
    };
    let header = encode_header(&info);
    assert_eq!(header_size(&header).unwrap(), header.len());
    let (decoded, len) = decode_header(&header).unwrap();
    assert_eq!(len, header.len());
    assert_eq!(decoded, info);
}

#[test]
fn default_block_size_id_decodes_as_64k() {
    let (decoded, _) = decode_header(&encode_header(&FrameInfo::default())).unwrap();
    assert_eq!(decoded.block_size_id, BlockSizeId::Max64Kb);
}

// ─────────────────────────────────────────────────────────────────────────────
// Rejections
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn short_probe_is_incomplete() {
    assert_eq!(header_size(&[0x04, 0x22, 0x4D, 0x18]), Err(Lz4FError::FrameHeaderIncomplete));
    let header = encode_header(&FrameInfo::default());
    assert_eq!(
        decode_header(&header[..header.len() - 1]),
        Err(Lz4FError::FrameHeaderIncomplete)
    );
}

#[test]
fn foreign_magic() {
    assert_eq!(header_size(b"PK\x03\x04\x14\x00"), Err(Lz4FError::FrameTypeUnknown));
}

#[test]
fn skippable_magic_is_not_a_standard_header() {
    let skippable = [0x5A, 0x2A, 0x4D, 0x18, 0x00, 0x00, 0x00, 0x00];
    assert_eq!(header_size(&skippable).unwrap(), 8);
    assert_eq!(decode_header(&skippable), Err(Lz4FError::FrameTypeUnknown));
}

#[test]
fn damaged_checksum_byte() {
    let mut header = encode_header(&lz4_cli_default());
    header[6] ^= 0x01;
    assert_eq!(decode_header(&header), Err(Lz4FError::HeaderChecksumInvalid));
}

#[test]
fn wrong_version_with_valid_checksum() {
    let header = patch(&encode_header(&FrameInfo::default()), 0x80, 0x40);
    assert_eq!(decode_header(&header), Err(Lz4FError::HeaderVersionWrong));
}

#[test]
fn reserved_bits_with_valid_checksum() {
    let base = encode_header(&FrameInfo::default());
    assert_eq!(decode_header(&patch(&base, 0x42, 0x40)), Err(Lz4FError::ReservedFlagSet));
    assert_eq!(decode_header(&patch(&base, 0x40, 0x41)), Err(Lz4FError::ReservedFlagSet));
    assert_eq!(decode_header(&patch(&base, 0x40, 0xC0)), Err(Lz4FError::ReservedFlagSet));
}

#[test]
fn reserved_block_size_id() {
    let base = encode_header(&FrameInfo::default());
    assert_eq!(decode_header(&patch(&base, 0x40, 0x30)), Err(Lz4FError::MaxBlockSizeInvalid));
}

// ─────────────────────────────────────────────────────────────────────────────
// Block sizes and bounds
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn block_sizes() {
    assert_eq!(block_size(BlockSizeId::Default), 64 * 1024);
    assert_eq!(block_size(BlockSizeId::Max256Kb), 256 * 1024);
    assert_eq!(block_size(BlockSizeId::Max4Mb), 4 * 1024 * 1024);
}

#[test]
fn small_inputs_get_small_blocks() {
    assert_eq!(optimal_block_size_id(BlockSizeId::Max4Mb, 1000), BlockSizeId::Max64Kb);
    assert_eq!(optimal_block_size_id(BlockSizeId::Max64Kb, 10_000_000), BlockSizeId::Max64Kb);
}

#[test]
fn frame_bound_covers_stored_blocks() {
    let prefs = Preferences::default();
    // header + one block header + data + end mark
    assert_eq!(compress_frame_bound(100, &prefs), MAX_FH_SIZE + 4 + 100 + 4);
    let mut checked = Preferences::default();
    checked.frame_info.block_checksum_flag = BlockChecksum::Enabled;
    checked.frame_info.content_checksum_flag = ContentChecksum::Enabled;
    assert_eq!(
        compress_frame_bound(2 * 65_536, &checked),
        MAX_FH_SIZE + 2 * (4 + 4) + 2 * 65_536 + 4 + 4
    );
}

// Integration tests for src/frame/compress.rs: frame encoder
//
//   - `FrameCompressor` lifecycle: begin → compress_block* → end
//   - stored-block fallback for incompressible data
//   - one-shot `compress_frame` / `compress_frame_to_vec`

use tracy_lz4::frame::types::LZ4F_BLOCKUNCOMPRESSED_FLAG;
use tracy_lz4::frame::{
    compress_frame, compress_frame_bound, compress_frame_to_vec, decode_header, decompress,
    BlockChecksum, BlockMode, BlockSizeId, ContentChecksum, FrameCompressor, FrameInfo, Lz4FError,
    Preferences,
};

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

fn prefs(mode: BlockMode, block_crc: bool, content_crc: bool) -> Preferences {
    Preferences {
        frame_info: FrameInfo {
            block_mode: mode,
            block_checksum_flag: if block_crc {
                BlockChecksum::Enabled
            } else {
                BlockChecksum::Disabled
            },
            content_checksum_flag: if content_crc {
                ContentChecksum::Enabled
            } else {
                ContentChecksum::Disabled
            },
            ..FrameInfo::default()
        },
        ..Preferences::default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Streaming lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn block_before_begin_is_rejected() {
    let mut cctx = FrameCompressor::new(Preferences::default());
    let mut out = Vec::new();
    assert_eq!(
        cctx.compress_block(b"data", &mut out),
        Err(Lz4FError::CompressionStateUninitialized)
    );
    assert_eq!(cctx.end(&mut out), Err(Lz4FError::CompressionStateUninitialized));
}

#[test]
fn oversized_block_is_rejected() {
    let mut cctx = FrameCompressor::new(Preferences::default());
    let mut out = Vec::new();
    cctx.begin(&mut out).unwrap();
    let big = vec![0u8; cctx.block_size() + 1];
    assert_eq!(cctx.compress_block(&big, &mut out), Err(Lz4FError::SrcSizeTooLarge));
}

#[test]
fn streamed_frame_decodes() {
    let p = prefs(BlockMode::Linked, true, true);
    let mut cctx = FrameCompressor::new(p);
    let mut out = Vec::new();
    let header_len = cctx.begin(&mut out).unwrap();
    assert_eq!(header_len, out.len());

    let mut original = Vec::new();
    for i in 0..5u8 {
        let chunk: Vec<u8> = std::iter::repeat(b"streamed block ".as_slice())
            .take(1000)
            .flatten()
            .map(|b| b.wrapping_add(i))
            .collect();
        let chunk = &chunk[..cctx.block_size().min(chunk.len())];
        cctx.compress_block(chunk, &mut out).unwrap();
        original.extend_from_slice(chunk);
    }
    let trailer = cctx.end(&mut out).unwrap();
    assert_eq!(trailer, 8);
    assert_eq!(decompress(&out, original.len()).unwrap(), original);
}

#[test]
fn empty_block_writes_nothing() {
    let mut cctx = FrameCompressor::new(Preferences::default());
    let mut out = Vec::new();
    cctx.begin(&mut out).unwrap();
    let before = out.len();
    assert_eq!(cctx.compress_block(&[], &mut out).unwrap(), 0);
    assert_eq!(out.len(), before);
}

#[test]
fn declared_size_mismatch_fails_at_end() {
    let mut p = Preferences::default();
    p.frame_info.content_size = Some(10);
    let mut cctx = FrameCompressor::new(p);
    let mut out = Vec::new();
    cctx.begin(&mut out).unwrap();
    cctx.compress_block(b"only five", &mut out).unwrap();
    assert_eq!(cctx.end(&mut out), Err(Lz4FError::FrameSizeWrong));
}

// ─────────────────────────────────────────────────────────────────────────────
// Block encoding
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn incompressible_data_is_stored() {
    let data = noise(1000, 42);
    let frame = compress_frame(&data, &prefs(BlockMode::Independent, false, false)).unwrap();
    let (_, hlen) = decode_header(&frame).unwrap();
    let bh = u32::from_le_bytes(frame[hlen..hlen + 4].try_into().unwrap());
    assert_eq!(bh, LZ4F_BLOCKUNCOMPRESSED_FLAG | 1000);
    assert_eq!(&frame[hlen + 4..hlen + 1004], &data[..]);
    assert_eq!(frame.len(), hlen + 4 + 1000 + 4);
}

#[test]
fn compressible_data_is_compressed() {
    let data = vec![b'c'; 10_000];
    let frame = compress_frame(&data, &Preferences::default()).unwrap();
    let (_, hlen) = decode_header(&frame).unwrap();
    let bh = u32::from_le_bytes(frame[hlen..hlen + 4].try_into().unwrap());
    assert_eq!(bh & LZ4F_BLOCKUNCOMPRESSED_FLAG, 0);
    assert!(frame.len() < 100);
}

// ─────────────────────────────────────────────────────────────────────────────
// One-shot
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn one_shot_stays_within_bound() {
    for len in [0usize, 1, 100, 65_536, 65_537, 300_000] {
        let data = noise(len, len as u32 + 1);
        for p in [
            prefs(BlockMode::Linked, false, false),
            prefs(BlockMode::Independent, true, true),
        ] {
            let frame = compress_frame(&data, &p).unwrap();
            assert!(frame.len() <= compress_frame_bound(len, &p), "len {len}");
        }
    }
}

#[test]
fn block_size_id_shrinks_for_small_input() {
    let mut p = Preferences::default();
    p.frame_info.block_size_id = BlockSizeId::Max4Mb;
    let frame = compress_frame(b"tiny", &p).unwrap();
    let (info, _) = decode_header(&frame).unwrap();
    assert_eq!(info.block_size_id, BlockSizeId::Max64Kb);
}

#[test]
fn to_vec_declares_content_size() {
    let data = b"declared content size".repeat(10);
    let frame = compress_frame_to_vec(&data).unwrap();
    let (info, _) = decode_header(&frame).unwrap();
    assert_eq!(info.content_size, Some(data.len() as u64));
    assert_eq!(decompress(&frame, data.len()).unwrap(), data);
}

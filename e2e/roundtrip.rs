// e2e/roundtrip.rs: end-to-end round trips through the binding boundary
//
// Every input shape the codec is expected to see, through `compress` /
// `decompress`, the frame API with all descriptor options, and the raw block
// helpers.

use tracy_lz4::binding;
use tracy_lz4::frame::{
    compress_frame, decompress, BlockChecksum, BlockMode, BlockSizeId, ContentChecksum, FrameInfo,
    Preferences,
};

// ─────────────────────────────────────────────────────────────────────────────
// Inputs
// ─────────────────────────────────────────────────────────────────────────────

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

fn prose(len: usize) -> Vec<u8> {
    const WORDS: [&str; 12] = [
        "trace", "zone", "frame", "lock", "plot", "message", "gpu", "callstack", "memory",
        "context", "switch", "sample",
    ];
    let mut out = Vec::with_capacity(len + 16);
    let mut i = 0usize;
    while out.len() < len {
        out.extend_from_slice(WORDS[(i * 7 + i / 13) % WORDS.len()].as_bytes());
        out.push(if i % 11 == 10 { b'\n' } else { b' ' });
        i += 1;
    }
    out.truncate(len);
    out
}

fn inputs() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("empty", Vec::new()),
        ("single byte", vec![0x5A]),
        ("ten a", b"aaaaaaaaaa".to_vec()),
        ("thirteen a", vec![b'a'; 13]),
        ("zeros 1 MiB", vec![0; 1 << 20]),
        ("prose 300 KiB", prose(300 * 1024)),
        ("noise 200 KiB", noise(200 * 1024, 0xDEAD_BEEF)),
        ("mixed", {
            let mut v = prose(100_000);
            v.extend(noise(50_000, 17));
            v.extend(prose(100_000));
            v
        }),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Binding boundary
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn binding_round_trip_all_inputs() {
    for (name, data) in inputs() {
        let frame = binding::compress(&data, None).unwrap();
        assert!(frame.len() <= data.len() + data.len() / 255 + 16, "{name}: bound exceeded");
        let back = binding::decompress(&frame, data.len() as i64).unwrap();
        assert_eq!(back, data, "{name}");
    }
}

#[test]
fn binding_block_helpers_all_inputs() {
    for (name, data) in inputs() {
        let block = binding::compress_block(&data).unwrap();
        let back = binding::decompress_block(&block, data.len() as i64).unwrap();
        assert_eq!(back, data, "{name}");
    }
}

#[test]
fn random_input_costs_only_fixed_overhead() {
    let data = noise(256 * 1024, 99);
    let frame = binding::compress(&data, None).unwrap();
    // Four stored 64 KiB blocks: header + 4 block headers + end mark.
    assert_eq!(frame.len(), data.len() + 7 + 4 * 4 + 4);
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame options
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn frame_round_trip_every_descriptor() {
    let mut data = prose(200_000);
    data.extend(noise(50_000, 3));
    data.extend(vec![0u8; 300_000]);
    for block_size_id in [
        BlockSizeId::Max64Kb,
        BlockSizeId::Max256Kb,
        BlockSizeId::Max1Mb,
        BlockSizeId::Max4Mb,
    ] {
        for block_mode in [BlockMode::Linked, BlockMode::Independent] {
            for (block_checksum_flag, content_checksum_flag) in [
                (BlockChecksum::Disabled, ContentChecksum::Disabled),
                (BlockChecksum::Enabled, ContentChecksum::Enabled),
            ] {
                let prefs = Preferences {
                    frame_info: FrameInfo {
                        block_size_id,
                        block_mode,
                        block_checksum_flag,
                        content_checksum_flag,
                        content_size: Some(0),
                        ..FrameInfo::default()
                    },
                    acceleration: 2,
                };
                let frame = compress_frame(&data, &prefs).unwrap();
                assert_eq!(decompress(&frame, data.len()).unwrap(), data, "{prefs:?}");
            }
        }
    }
}

#[test]
fn linked_blocks_beat_independent_on_repetitive_data() {
    let unit = noise(40_000, 5);
    let data: Vec<u8> = unit.iter().cycle().take(400_000).copied().collect();
    let mut linked = Preferences::default();
    linked.frame_info.block_mode = BlockMode::Linked;
    let mut independent = Preferences::default();
    independent.frame_info.block_mode = BlockMode::Independent;
    let a = compress_frame(&data, &linked).unwrap();
    let b = compress_frame(&data, &independent).unwrap();
    assert!(a.len() < b.len());
    assert_eq!(decompress(&a, data.len()).unwrap(), data);
}

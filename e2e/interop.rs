// e2e/interop.rs: byte compatibility with the standard LZ4 frame format
//
// Hand-assembled frames pin the wire format independently of our encoder.
// When a system `lz4` binary is available (or named by `LZ4_BIN`), frames
// are also exchanged with it; otherwise those tests print a skip message and
// return without failing.

use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;
use tracy_lz4::frame::header::header_checksum;
use tracy_lz4::frame::{
    compress_frame, decompress, BlockMode, ContentChecksum, FrameInfo, Lz4FError, Preferences,
};
use tracy_lz4::xxhash::xxh32_oneshot;

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the path to the system `lz4` binary, or `None` if not found.
fn system_lz4() -> Option<String> {
    if let Ok(p) = std::env::var("LZ4_BIN") {
        if std::path::Path::new(&p).exists() {
            return Some(p);
        }
    }
    let out = Command::new("which").arg("lz4").output().ok()?;
    if out.status.success() {
        let path = String::from_utf8_lossy(&out.stdout).trim().to_string();
        if !path.is_empty() {
            return Some(path);
        }
    }
    None
}

fn write_tmp(data: &[u8]) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(data).unwrap();
    f.flush().unwrap();
    f
}

/// Magic + FLG + BD + computed HC.
fn header(flg: u8, bd: u8) -> Vec<u8> {
    let mut h = vec![0x04, 0x22, 0x4D, 0x18, flg, bd];
    h.push(header_checksum(&h[4..6]));
    h
}

fn corpus() -> Vec<u8> {
    "Tracy is a real time, nanosecond resolution frame profiler.\n"
        .repeat(3_000)
        .into_bytes()
}

// ─────────────────────────────────────────────────────────────────────────────
// Hand-assembled frames
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn stock_empty_frame() {
    // What `lz4` writes for an empty file.
    let stock = [
        0x04, 0x22, 0x4D, 0x18, 0x64, 0x40, 0xA7, 0x00, 0x00, 0x00, 0x00, 0x05, 0x5D, 0xCC, 0x02,
    ];
    assert_eq!(decompress(&stock, 0).unwrap(), b"");

    let prefs = Preferences {
        frame_info: FrameInfo {
            block_mode: BlockMode::Independent,
            content_checksum_flag: ContentChecksum::Enabled,
            ..FrameInfo::default()
        },
        ..Preferences::default()
    };
    assert_eq!(compress_frame(b"", &prefs).unwrap(), stock);
}

#[test]
fn stored_block_with_content_checksum() {
    let mut frame = header(0x64, 0x40);
    frame.extend_from_slice(&(0x8000_0005u32).to_le_bytes());
    frame.extend_from_slice(b"hello");
    frame.extend_from_slice(&[0, 0, 0, 0]);
    frame.extend_from_slice(&xxh32_oneshot(b"hello", 0).to_le_bytes());
    assert_eq!(decompress(&frame, 5).unwrap(), b"hello");
}

#[test]
fn linked_block_reaches_into_previous_block() {
    let second_block = [0x04, 0x08, 0x00, 0x00];
    let build = |flg: u8| {
        let mut frame = header(flg, 0x40);
        frame.extend_from_slice(&(0x8000_0008u32).to_le_bytes());
        frame.extend_from_slice(b"abcdefgh");
        frame.extend_from_slice(&(second_block.len() as u32).to_le_bytes());
        frame.extend_from_slice(&second_block);
        frame.extend_from_slice(&[0, 0, 0, 0]);
        frame
    };
    assert_eq!(decompress(&build(0x40), 64).unwrap(), b"abcdefghabcdefgh");
    // The same bytes are illegal when blocks are independent.
    assert_eq!(decompress(&build(0x60), 64), Err(Lz4FError::DecompressionFailed));
}

#[test]
fn declared_content_size_and_dict_id_are_parsed() {
    let mut frame = vec![0x04, 0x22, 0x4D, 0x18, 0x69, 0x40];
    frame.extend_from_slice(&3u64.to_le_bytes());
    frame.extend_from_slice(&0x1234_5678u32.to_le_bytes());
    frame.push(header_checksum(&frame[4..]));
    frame.extend_from_slice(&(0x8000_0003u32).to_le_bytes());
    frame.extend_from_slice(b"xyz");
    frame.extend_from_slice(&[0, 0, 0, 0]);
    assert_eq!(decompress(&frame, 3).unwrap(), b"xyz");

    let (info, hlen) = tracy_lz4::frame::get_frame_info(&frame).unwrap();
    assert_eq!(hlen, 19);
    assert_eq!(info.content_size, Some(3));
    assert_eq!(info.dict_id, Some(0x1234_5678));
}

// ─────────────────────────────────────────────────────────────────────────────
// System lz4
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn our_frame_decodes_with_system_lz4() {
    let Some(lz4) = system_lz4() else {
        println!("SKIP our_frame_decodes_with_system_lz4: system lz4 binary not found");
        return;
    };
    let original = corpus();
    for mode in [BlockMode::Linked, BlockMode::Independent] {
        let mut prefs = Preferences::default();
        prefs.frame_info.block_mode = mode;
        prefs.frame_info.content_checksum_flag = ContentChecksum::Enabled;
        let compressed = write_tmp(&compress_frame(&original, &prefs).unwrap());
        let out = Command::new(&lz4)
            .args(["-d", "-c"])
            .arg(compressed.path())
            .output()
            .unwrap();
        assert!(out.status.success(), "lz4 -d failed: {}", String::from_utf8_lossy(&out.stderr));
        assert_eq!(out.stdout, original);
    }
}

#[test]
fn system_lz4_frame_decodes_with_ours() {
    let Some(lz4) = system_lz4() else {
        println!("SKIP system_lz4_frame_decodes_with_ours: system lz4 binary not found");
        return;
    };
    let original = corpus();
    let input = write_tmp(&original);
    for flags in [&["-c"][..], &["-c", "-BD", "--content-size"][..], &["-c", "-9", "-BX"][..]] {
        let out = Command::new(&lz4).args(flags).arg(input.path()).output().unwrap();
        assert!(out.status.success());
        assert_eq!(decompress(&out.stdout, original.len()).unwrap(), original, "{flags:?}");
    }
}

#[test]
fn binding_output_decodes_with_system_lz4() {
    let Some(lz4) = system_lz4() else {
        println!("SKIP binding_output_decodes_with_system_lz4: system lz4 binary not found");
        return;
    };
    let original = corpus();
    let compressed = write_tmp(&tracy_lz4::binding::compress(&original, Some(3)).unwrap());
    let out = Command::new(&lz4)
        .args(["-d", "-c"])
        .arg(compressed.path())
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(out.stdout, original);
}

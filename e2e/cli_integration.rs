// e2e/cli_integration.rs: the `tracy-lz4` binary as a black box
//
// Covers compress / decompress / info / stream dispatch, output naming,
// overwrite protection and exit codes.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tracy-lz4"))
}

/// A TempDir holding `input.txt` with ~40 KB of text.
fn make_temp_input() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.txt");
    fs::write(&input, "zone begin; zone end; plot value 42\n".repeat(1_100)).unwrap();
    (dir, input)
}

// ── 1. Compress / decompress ──────────────────────────────────────────────────

#[test]
fn compress_then_decompress_restores_the_file() {
    let (dir, input) = make_temp_input();
    let packed = dir.path().join("packed.lz4");
    let restored = dir.path().join("restored.txt");

    let status = Command::new(bin())
        .args(["-q", "compress", "--block-checksum"])
        .arg(&input)
        .arg(&packed)
        .status()
        .unwrap();
    assert!(status.success());
    assert!(fs::metadata(&packed).unwrap().len() < fs::metadata(&input).unwrap().len());

    let status = Command::new(bin())
        .args(["-q", "decompress"])
        .arg(&packed)
        .arg(&restored)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(fs::read(&restored).unwrap(), fs::read(&input).unwrap());
}

#[test]
fn default_output_names() {
    let (dir, input) = make_temp_input();
    let status = Command::new(bin()).args(["-q", "compress"]).arg(&input).status().unwrap();
    assert!(status.success());
    let packed = dir.path().join("input.txt.lz4");
    assert!(packed.exists());

    let original = fs::read(&input).unwrap();
    fs::remove_file(&input).unwrap();
    let status = Command::new(bin()).args(["-q", "decompress"]).arg(&packed).status().unwrap();
    assert!(status.success());
    assert_eq!(fs::read(&input).unwrap(), original);
}

#[test]
fn refuses_to_overwrite_without_force() {
    let (dir, input) = make_temp_input();
    let out = dir.path().join("exists.lz4");
    fs::write(&out, b"keep me").unwrap();

    let status = Command::new(bin())
        .args(["-q", "compress"])
        .arg(&input)
        .arg(&out)
        .status()
        .unwrap();
    assert!(!status.success());
    assert_eq!(fs::read(&out).unwrap(), b"keep me");

    let status = Command::new(bin())
        .args(["-q", "compress", "-f"])
        .arg(&input)
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());
}

#[test]
fn stdin_to_stdout() {
    let mut child = Command::new(bin())
        .args(["-q", "compress", "-", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"piped through stdio").unwrap();
    let packed = child.wait_with_output().unwrap();
    assert!(packed.status.success());
    assert_eq!(
        tracy_lz4::frame::decompress_frame_to_vec(&packed.stdout).unwrap(),
        b"piped through stdio"
    );
}

// ── 2. Errors ─────────────────────────────────────────────────────────────────

#[test]
fn decompressing_garbage_fails() {
    let (dir, input) = make_temp_input();
    let out = dir.path().join("garbage.out");
    let output = Command::new(bin()).args(["decompress"]).arg(&input).arg(&out).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not an LZ4 file"));
}

#[test]
fn missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let status = Command::new(bin())
        .args(["-q", "compress"])
        .arg(dir.path().join("absent"))
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let status = Command::new(bin()).arg("explode").stderr(Stdio::null()).status().unwrap();
    assert_eq!(status.code(), Some(2));
}

#[test]
fn version_flag() {
    let output = Command::new(bin()).arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

// ── 3. Info ───────────────────────────────────────────────────────────────────

#[test]
fn info_lists_frames() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("two.lz4");
    let mut bytes = tracy_lz4::frame::compress_frame_to_vec(b"first frame").unwrap();
    bytes.extend_from_slice(&[0x51, 0x2A, 0x4D, 0x18, 1, 0, 0, 0, 0xAA]);
    bytes.extend(tracy_lz4::frame::compress_frame_to_vec(b"second").unwrap());
    fs::write(&path, bytes).unwrap();

    let output = Command::new(bin()).arg("info").arg(&path).output().unwrap();
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("frame 1:"));
    assert!(text.contains("frame 2: skippable, 1 bytes"));
    assert!(text.contains("frame 3:"));
    assert!(text.contains("-> 6 bytes"));
}

// ── 4. Block stream ───────────────────────────────────────────────────────────

#[test]
fn stream_encode_decode() {
    let (dir, input) = make_temp_input();
    let records = dir.path().join("input.lz4s");
    let restored = dir.path().join("restored.txt");

    let status = Command::new(bin())
        .args(["-q", "stream", "--chunk-size", "4096"])
        .arg(&input)
        .arg(&records)
        .status()
        .unwrap();
    assert!(status.success());

    let status = Command::new(bin())
        .args(["-q", "stream", "--decode", "--chunk-size", "4096"])
        .arg(&records)
        .arg(&restored)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(fs::read(&restored).unwrap(), fs::read(&input).unwrap());
}

#[test]
fn stream_appends_across_runs_until_overwrite() {
    let (dir, input) = make_temp_input();
    let records = dir.path().join("trace.lz4s");
    let restored = dir.path().join("restored.txt");
    let encode = |extra: &[&str]| {
        let status = Command::new(bin())
            .args(["-q", "stream"])
            .args(extra)
            .arg(&input)
            .arg(&records)
            .status()
            .unwrap();
        assert!(status.success());
    };
    let decode = || {
        let status = Command::new(bin())
            .args(["-q", "stream", "--decode"])
            .arg(&records)
            .arg(&restored)
            .status()
            .unwrap();
        assert!(status.success());
        fs::read(&restored).unwrap()
    };
    let original = fs::read(&input).unwrap();

    encode(&[]);
    encode(&[]);
    let mut twice = original.clone();
    twice.extend_from_slice(&original);
    assert_eq!(decode(), twice);

    encode(&["--overwrite"]);
    assert_eq!(decode(), original);
}

#[test]
fn environment_acceleration_is_accepted() {
    let (dir, input) = make_temp_input();
    let out = dir.path().join("env.lz4");
    let output = Command::new(bin())
        .env("TRACY_LZ4_ACCELERATION", "not-a-number")
        .args(["compress"])
        .arg(&input)
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("TRACY_LZ4_ACCELERATION"));
}

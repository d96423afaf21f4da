// e2e/block_stream.rs: block stream files on disk
//
// Writes trace-like data through `BlockStreamWriter::create`, appends to an
// existing file, and reads everything back.

use std::fs::{self, File};
use std::io::BufReader;

use tempfile::TempDir;
use tracy_lz4::block_stream::{BlockStreamReader, BlockStreamWriter};

fn trace_events(n: usize, tag: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(n * 16);
    for i in 0..n as u64 {
        out.push(tag);
        out.extend_from_slice(&(i * 1_000 + 17).to_le_bytes());
        out.extend_from_slice(&((i % 5) as u32).to_le_bytes());
        out.extend_from_slice(&[0, 0, 0]);
    }
    out
}

fn read_all(path: &std::path::Path) -> Vec<u8> {
    let file = File::open(path).unwrap();
    BlockStreamReader::new(BufReader::new(file)).read_to_end().unwrap()
}

#[test]
fn create_write_read() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trace.lz4s");
    let data = trace_events(20_000, b'Z');

    let mut w = BlockStreamWriter::create(&path, false).unwrap();
    for piece in data.chunks(4_096) {
        w.write(piece, false).unwrap();
    }
    assert_eq!(w.blocks_written(), (data.len() / (64 * 1024)) as u64);
    w.finish().unwrap();

    assert!(fs::metadata(&path).unwrap().len() < data.len() as u64);
    assert_eq!(read_all(&path), data);
}

#[test]
fn append_extends_the_stream() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("append.lz4s");
    let first = trace_events(1_000, b'A');
    let second = trace_events(1_000, b'B');

    let mut w = BlockStreamWriter::create(&path, false).unwrap();
    w.write(&first, true).unwrap();
    w.finish().unwrap();

    let mut w = BlockStreamWriter::create(&path, true).unwrap();
    w.write(&second, true).unwrap();
    w.finish().unwrap();

    let mut expected = first.clone();
    expected.extend_from_slice(&second);
    assert_eq!(read_all(&path), expected);
}

#[test]
fn create_without_append_truncates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("truncate.lz4s");
    fs::write(&path, b"stale bytes that are not records").unwrap();

    let mut w = BlockStreamWriter::create(&path, false).unwrap();
    w.write(b"fresh", true).unwrap();
    w.finish().unwrap();
    assert_eq!(read_all(&path), b"fresh");
}

#[test]
fn dropped_writer_leaves_a_readable_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dropped.lz4s");
    let data = trace_events(5_000, b'D');
    {
        let mut w = BlockStreamWriter::create(&path, false).unwrap();
        w.write(&data, false).unwrap();
    }
    assert_eq!(read_all(&path), data);
}

#[test]
fn create_in_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no/such/dir/trace.lz4s");
    assert!(BlockStreamWriter::create(&path, false).is_err());
}

#![no_main]
use libfuzzer_sys::fuzz_target;
use std::io::Read;
use tracy_lz4::file::Lz4ReadFile;
use tracy_lz4::frame::{decompress, get_frame_info};

fuzz_target!(|data: &[u8]| {
    // Errors are expected; panics are not.
    let _ = get_frame_info(data);
    if let Ok(out) = decompress(data, 1 << 20) {
        assert!(out.len() <= 1 << 20);
    }
    let _ = tracy_lz4::decompress(data, 1 << 20);

    // The streaming reader takes input in whatever pieces the source yields.
    if let Ok(mut r) = Lz4ReadFile::open(data) {
        let mut sink = Vec::new();
        let _ = r.by_ref().take(1 << 20).read_to_end(&mut sink);
    }
});

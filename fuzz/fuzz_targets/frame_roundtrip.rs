#![no_main]
use libfuzzer_sys::fuzz_target;
use tracy_lz4::frame::{
    compress_frame, decompress, BlockChecksum, BlockMode, ContentChecksum, Preferences,
};

fuzz_target!(|data: &[u8]| {
    // First byte selects the frame options.
    let sel = data.first().copied().unwrap_or(0);
    let mut prefs = Preferences::default();
    if sel & 1 != 0 {
        prefs.frame_info.block_mode = BlockMode::Independent;
    }
    if sel & 2 != 0 {
        prefs.frame_info.block_checksum_flag = BlockChecksum::Enabled;
    }
    if sel & 4 != 0 {
        prefs.frame_info.content_checksum_flag = ContentChecksum::Enabled;
    }
    if sel & 8 != 0 {
        prefs.frame_info.content_size = Some(0);
    }

    let frame = compress_frame(data, &prefs).expect("fuzz input is far below the size limit");
    let back = decompress(&frame, data.len()).expect("own frame must decode");
    assert_eq!(back, data, "frame round-trip mismatch with {prefs:?}");

    let packed = tracy_lz4::compress(data, Some(i32::from(sel >> 4) + 1))
        .expect("fuzz input is far below the size limit");
    assert_eq!(tracy_lz4::decompress(&packed, data.len() as i64).unwrap(), data);
});

#![no_main]
use libfuzzer_sys::fuzz_target;
use tracy_lz4::block::{compress_to_vec, decompress_to_vec};
use tracy_lz4::block_stream::{BlockStreamReader, BlockStreamWriter};

fuzz_target!(|data: &[u8]| {
    // First byte picks the acceleration so the fuzzer explores the skip schedule.
    let accel = data.first().map_or(1, |&b| i32::from(b % 32) + 1);

    let block = compress_to_vec(data, accel).expect("fuzz input is far below the size limit");
    let back = decompress_to_vec(&block, data.len()).expect("own block must decode");
    assert_eq!(back, data, "block round-trip mismatch at acceleration {accel}");

    // The same bytes through the block-stream container, split at 1 KiB flushes.
    let mut w = BlockStreamWriter::new(Vec::new()).with_acceleration(accel);
    for part in data.chunks(1024) {
        w.write(part, true).expect("writing to a Vec cannot fail");
    }
    let encoded = w.finish().expect("writing to a Vec cannot fail");
    let decoded = BlockStreamReader::new(encoded.as_slice())
        .read_to_end()
        .expect("own block stream must decode");
    assert_eq!(decoded, data);
});

#![no_main]
use libfuzzer_sys::fuzz_target;
use tracy_lz4::block::{decompress_safe, decompress_with_prefix};
use tracy_lz4::block_stream::BlockStreamReader;

fuzz_target!(|data: &[u8]| {
    // Errors are expected; panics and out-of-bounds writes are not.
    for cap in [0usize, 16, 4096, data.len().saturating_mul(255).min(1 << 20)] {
        let mut dst = vec![0u8; cap];
        if let Ok(n) = decompress_safe(data, &mut dst) {
            assert!(n <= cap);
        }
    }

    // Treat the first half as history for the second half.
    let split = data.len() / 2;
    let mut buf = data[..split].to_vec();
    buf.resize(split + 4096, 0);
    let _ = decompress_with_prefix(&data[split..], &mut buf, split, 0);

    let _ = tracy_lz4::binding::decompress_block(data, 1 << 16);
    let _ = BlockStreamReader::new(data).read_to_end();
});

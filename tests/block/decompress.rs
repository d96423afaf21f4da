// Integration tests for src/block/decompress.rs: LZ4 block decoder
//
// Hand-built blocks exercise every rejection path; none of them may panic or
// write outside the destination.

use tracy_lz4::block::{compress_to_vec, decompress_safe, decompress_to_vec, decompress_with_prefix};
use tracy_lz4::Lz4Error;

#[test]
fn overlapping_match_replicates_bytes() {
    // 'x', then offset 1 / match 8, then an empty final literal run.
    let src = [0x14, b'x', 0x01, 0x00, 0x00];
    assert_eq!(decompress_to_vec(&src, 64).unwrap(), vec![b'x'; 9]);
}

#[test]
fn repeating_pattern_with_offset_three() {
    // "abc" + match(offset 3, len 9) + "tail!"
    let src = [0x35, b'a', b'b', b'c', 0x03, 0x00, 0x50, b't', b'a', b'i', b'l', b'!'];
    assert_eq!(decompress_to_vec(&src, 64).unwrap(), b"abcabcabcabctail!");
}

#[test]
fn literal_length_extension_chain() {
    // 15 + 255 + 30 = 300 literals.
    let mut src = vec![0xF0, 0xFF, 30];
    src.extend(std::iter::repeat(b'q').take(300));
    assert_eq!(decompress_to_vec(&src, 300).unwrap(), vec![b'q'; 300]);
}

#[test]
fn unbounded_limit_decodes_without_reserving_it() {
    assert_eq!(decompress_to_vec(&[0x10, b'a'], usize::MAX).unwrap(), b"a");
    let block = compress_to_vec(&vec![9u8; 50_000], 1).unwrap();
    assert_eq!(decompress_to_vec(&block, usize::MAX).unwrap(), vec![9u8; 50_000]);
}

#[test]
fn empty_block_is_corrupt() {
    let mut dst = [0u8; 8];
    assert_eq!(decompress_safe(&[], &mut dst), Err(Lz4Error::CorruptInput));
}

#[test]
fn zero_offset_is_corrupt() {
    assert_eq!(
        decompress_to_vec(&[0x10, b'a', 0x00, 0x00], 64),
        Err(Lz4Error::CorruptInput)
    );
}

#[test]
fn offset_before_output_start_is_corrupt() {
    assert_eq!(
        decompress_to_vec(&[0x10, b'a', 0x05, 0x00, 0x00], 64),
        Err(Lz4Error::CorruptInput)
    );
}

#[test]
fn truncated_literals_are_corrupt() {
    assert_eq!(decompress_to_vec(&[0x50, b'a', b'b'], 64), Err(Lz4Error::CorruptInput));
}

#[test]
fn truncated_offset_is_corrupt() {
    assert_eq!(decompress_to_vec(&[0x14, b'x', 0x01], 64), Err(Lz4Error::CorruptInput));
}

#[test]
fn missing_final_token_is_corrupt() {
    assert_eq!(decompress_to_vec(&[0x14, b'x', 0x01, 0x00], 64), Err(Lz4Error::CorruptInput));
}

#[test]
fn unterminated_length_extension_is_corrupt() {
    assert_eq!(decompress_to_vec(&[0xF0, 0xFF, 0xFF], 1000), Err(Lz4Error::CorruptInput));
}

#[test]
fn destination_too_small_for_literals() {
    let mut dst = [0u8; 2];
    assert_eq!(
        decompress_safe(&[0x30, b'a', b'b', b'c'], &mut dst),
        Err(Lz4Error::DestinationTooSmall)
    );
}

#[test]
fn destination_too_small_for_match() {
    let block = compress_to_vec(&vec![5u8; 4096], 1).unwrap();
    assert_eq!(decompress_to_vec(&block, 4095), Err(Lz4Error::DestinationTooSmall));
    assert_eq!(decompress_to_vec(&block, 4096).unwrap().len(), 4096);
}

#[test]
fn window_floor_blocks_references_into_history() {
    // History "abcd", block = match(offset 4, len 4) + empty run.
    let src = [0x00, 0x04, 0x00, 0x00];
    let mut buf = b"abcd\0\0\0\0".to_vec();
    assert_eq!(decompress_with_prefix(&src, &mut buf, 4, 0).unwrap(), 4);
    assert_eq!(&buf, b"abcdabcd");

    let mut buf = b"abcd\0\0\0\0".to_vec();
    assert_eq!(
        decompress_with_prefix(&src, &mut buf, 4, 4),
        Err(Lz4Error::CorruptInput)
    );
}

#[test]
fn bad_prefix_arguments_are_invalid() {
    let mut buf = [0u8; 4];
    assert_eq!(
        decompress_with_prefix(&[0x00], &mut buf, 5, 0),
        Err(Lz4Error::InvalidParameter)
    );
    assert_eq!(
        decompress_with_prefix(&[0x00], &mut buf, 2, 3),
        Err(Lz4Error::InvalidParameter)
    );
}

#[test]
fn garbage_never_panics() {
    let mut seed = 0x9E37_79B9u32;
    for len in 1..200usize {
        let src: Vec<u8> = (0..len)
            .map(|_| {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                seed as u8
            })
            .collect();
        let mut dst = vec![0u8; 512];
        if let Ok(n) = decompress_safe(&src, &mut dst) {
            assert!(n <= dst.len());
        }
    }
}

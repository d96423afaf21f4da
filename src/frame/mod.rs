//! LZ4 Frame format: header, blocks, checksums and end mark around the block
//! codec.

pub mod compress;
pub mod decompress;
pub mod header;
pub mod types;

// Re-export key public API items at the module level.
pub use compress::{compress_frame, compress_frame_to_vec, FrameCompressor};
pub use decompress::{
    decompress, decompress_frame, decompress_frame_to_vec, get_frame_info, FrameDecoder,
};
pub use header::{compress_frame_bound, decode_header, encode_header, header_size};
pub use types::{
    BlockChecksum, BlockMode, BlockSizeId, ContentChecksum, FrameInfo, FrameType, Lz4FError,
    Preferences,
};

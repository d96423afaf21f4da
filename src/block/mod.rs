//! LZ4 block compression and decompression.
//!
//! The block layer knows nothing about frames: it turns one contiguous input
//! into one token stream and back.

pub mod compress;
pub mod decompress;
pub mod match_finder;
pub mod types;

// Re-export the most important public API items at the module level.
pub use compress::{
    compress_bound, compress_default, compress_fast, compress_to_vec, compress_with_prefix,
    LZ4_ACCELERATION_DEFAULT, LZ4_ACCELERATION_MAX,
};
pub use decompress::{decompress_safe, decompress_to_vec, decompress_with_prefix};
pub use match_finder::{HashIndex, Match};
pub use types::{LZ4_DISTANCE_MAX, LZ4_MAX_INPUT_SIZE};

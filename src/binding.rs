//! Host-facing binding boundary.
//!
//! The entry points a host runtime calls: byte slices in, owned byte vectors
//! out, and exactly three error kinds ([`Lz4Error`]).  This is the only place
//! the detailed frame errors are collapsed; the C ABI in [`crate::abi`] and
//! any other host adapter build on these functions.
//!
//! | Function             | Container                | Failure modes                          |
//! |----------------------|--------------------------|----------------------------------------|
//! | [`compress`]         | LZ4 frame (defaults)     | `InvalidParameter` for oversized input |
//! | [`compress_with`]    | LZ4 frame (caller prefs) | as above                               |
//! | [`decompress`]       | LZ4 frame(s)             | all three                              |
//! | [`compress_block`]   | raw LZ4 block            | `InvalidParameter` for oversized input |
//! | [`decompress_block`] | raw LZ4 block            | all three                              |

use crate::block::compress::compress_to_vec;
use crate::block::decompress::decompress_to_vec;
use crate::block::types::LZ4_MAX_INPUT_SIZE;
use crate::config::ACCELERATION_DEFAULT;
use crate::error::Lz4Error;
use crate::frame::compress::compress_frame;
use crate::frame::decompress::decompress as decompress_frames;
use crate::frame::types::{BlockMode, BlockSizeId, FrameInfo, Lz4FError, Preferences};

impl From<Lz4FError> for Lz4Error {
    fn from(e: Lz4FError) -> Self {
        e.kind()
    }
}

/// Frame preferences used by [`compress`]: 64 KiB independent blocks, no
/// checksums, no declared content size.
///
/// With these settings a frame is never larger than
/// `len + len / 255 + 16` bytes.
pub fn default_preferences(acceleration: i32) -> Preferences {
    Preferences {
        frame_info: FrameInfo {
            block_size_id: BlockSizeId::Max64Kb,
            block_mode: BlockMode::Independent,
            ..FrameInfo::default()
        },
        acceleration,
    }
}

/// Compress `input` into one LZ4 frame.
///
/// `acceleration` defaults to 1; out-of-range values are clamped by the
/// encoder.
pub fn compress(input: &[u8], acceleration: Option<i32>) -> Result<Vec<u8>, Lz4Error> {
    compress_with(
        input,
        &default_preferences(acceleration.unwrap_or(ACCELERATION_DEFAULT)),
    )
}

/// Compress `input` into one LZ4 frame described by `prefs`.
pub fn compress_with(input: &[u8], prefs: &Preferences) -> Result<Vec<u8>, Lz4Error> {
    if input.len() > LZ4_MAX_INPUT_SIZE {
        return Err(Lz4Error::InvalidParameter);
    }
    Ok(compress_frame(input, prefs)?)
}

/// Decompress every frame in `input`.
///
/// `expected_size` is the largest acceptable output; the result may be
/// shorter.  A negative value is `InvalidParameter`; output that would
/// exceed it is `DestinationTooSmall`.
pub fn decompress(input: &[u8], expected_size: i64) -> Result<Vec<u8>, Lz4Error> {
    let limit = usize::try_from(expected_size).map_err(|_| Lz4Error::InvalidParameter)?;
    Ok(decompress_frames(input, limit)?)
}

/// Compress `input` as a single raw LZ4 block (no frame).
pub fn compress_block(input: &[u8]) -> Result<Vec<u8>, Lz4Error> {
    compress_to_vec(input, ACCELERATION_DEFAULT)
}

/// Decode a single raw LZ4 block of at most `expected_size` bytes.
pub fn decompress_block(input: &[u8], expected_size: i64) -> Result<Vec<u8>, Lz4Error> {
    let limit = usize::try_from(expected_size).map_err(|_| Lz4Error::InvalidParameter)?;
    decompress_to_vec(input, limit)
}

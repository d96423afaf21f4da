// config.rs: Compile-time configuration constants.
//
// Runtime overrides are applied only by the command-line front end
// (see `cli::args`); the library itself never reads the environment.

// Default encoder acceleration (1 = full match search).
// Can be overridden by the TRACY_LZ4_ACCELERATION environment variable,
// or by the -a/--acceleration command-line flag.
pub const ACCELERATION_DEFAULT: i32 = crate::block::LZ4_ACCELERATION_DEFAULT;

// Name of the environment variable read by the CLI for the acceleration.
pub const ENV_ACCELERATION: &str = "TRACY_LZ4_ACCELERATION";

// Default frame block size ID (4 = 64 KiB blocks).
// Can be overridden at runtime using the -B# command-line flag.
pub const BLOCKSIZEID_DEFAULT: u8 = 4;

// Chunk size of the block stream writer: input is cut into pieces of this
// size and each piece becomes one `[u32 length][block]` record.
pub const BLOCK_STREAM_CHUNK_SIZE: usize = 64 * 1024;

// Match candidates examined per position at acceleration 1.
pub const SEARCH_DEPTH_DEFAULT: usize = crate::block::match_finder::MAX_SEARCH_DEPTH;

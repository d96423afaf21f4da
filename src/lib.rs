// tracy-lz4: LZ4 block/frame codec with a host binding boundary

pub mod config;
pub mod error;
pub mod block;
pub mod frame;
pub mod xxhash;
pub mod file;
pub mod block_stream;
pub mod binding;
pub mod cli;
#[cfg(feature = "c-abi")]
pub mod abi;

// ── Version constants ─────────────────────────────────────────────────────────
pub const TRACY_LZ4_VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// Returns the crate version string.
pub fn version_string() -> &'static str {
    TRACY_LZ4_VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use binding::{compress, decompress};
pub use block::compress::compress_bound;
pub use error::Lz4Error;

// cli/constants.rs: program identity and the display level
//
// The display level is the only process-wide state in the crate; the codec
// never reads it.

use std::sync::atomic::{AtomicU32, Ordering};

// ── String / identity constants ───────────────────────────────────────────────
pub const COMPRESSOR_NAME: &str = "tracy-lz4";
pub const LZ4_EXTENSION: &str = ".lz4";
pub const BLOCK_STREAM_EXTENSION: &str = ".lz4s";

// ── Display level ─────────────────────────────────────────────────────────────
//
// 0 silent, 1 errors, 2 results and warnings (default), 3 progress, 4 debug
pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

/// Current display level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Replace the display level; `-v` / `-q` end up here via [`level_from_flags`].
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Display level after applying `-v` / `-q` counts to the default of 2.
pub fn level_from_flags(verbose: u8, quiet: u8) -> u32 {
    (2 + verbose as i64 - quiet as i64).clamp(0, 4) as u32
}

// ── Display helpers ───────────────────────────────────────────────────────────
//
//   displayout!(...)      → print to stdout
//   display!(...)         → print to stderr
//   displaylevel!(l, ...) → print to stderr if display_level() >= l

/// Print to stdout.
#[macro_export]
macro_rules! displayout {
    ($($arg:tt)*) => { print!($($arg)*) };
}

/// Print to stderr.
#[macro_export]
macro_rules! display {
    ($($arg:tt)*) => { eprint!($($arg)*) };
}

/// Conditionally print to stderr at or above `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}

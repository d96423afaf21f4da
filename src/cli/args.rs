//! Command-line argument definitions for the `tracy-lz4` binary.
//!
//! Parsing is done by `clap`'s derive API; [`Cli::parse_from`] is usable
//! from tests without touching `std::env::args`.  The only environment input,
//! `TRACY_LZ4_ACCELERATION`, is read through [`init_acceleration`] so that a
//! flag on the command line always wins.
//!
//! The special filename `-` means stdin (as input) or stdout (as output).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::block::compress::LZ4_ACCELERATION_MAX;
use crate::cli::constants::display_level;
use crate::config::{ACCELERATION_DEFAULT, BLOCKSIZEID_DEFAULT, ENV_ACCELERATION};
use crate::frame::types::{
    BlockChecksum, BlockMode, BlockSizeId, ContentChecksum, FrameInfo, Preferences,
};

/// Filename standing for stdin / stdout.
pub const STDIO_MARK: &str = "-";

#[derive(Debug, Parser)]
#[command(name = "tracy-lz4", version, about = "LZ4 frame and block stream tool")]
pub struct Cli {
    /// Increase verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compress a file into an LZ4 frame
    Compress(CompressArgs),
    /// Decompress an LZ4 frame file (concatenated frames allowed)
    Decompress(DecompressArgs),
    /// Print the frame descriptors found in LZ4 files
    Info(InfoArgs),
    /// Write or read a length-prefixed block stream
    Stream(StreamArgs),
}

#[derive(Debug, Args)]
pub struct CompressArgs {
    /// Input file (`-` for stdin)
    pub input: PathBuf,
    /// Output file (`-` for stdout); defaults to INPUT.lz4
    pub output: Option<PathBuf>,
    /// Acceleration factor (1 = best ratio); overrides TRACY_LZ4_ACCELERATION
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..=LZ4_ACCELERATION_MAX as i64))]
    pub acceleration: Option<i32>,
    /// Block size id: 4 = 64 KiB, 5 = 256 KiB, 6 = 1 MiB, 7 = 4 MiB
    #[arg(short = 'B', long = "block-size", default_value_t = BLOCKSIZEID_DEFAULT,
          value_parser = clap::value_parser!(u8).range(4..=7))]
    pub block_size_id: u8,
    /// Compress blocks independently (no shared history)
    #[arg(long)]
    pub independent: bool,
    /// Append an XXH32 checksum after each block
    #[arg(long)]
    pub block_checksum: bool,
    /// Omit the XXH32 checksum of the whole content
    #[arg(long)]
    pub no_content_checksum: bool,
    /// Record the original size in the frame header (files only)
    #[arg(long)]
    pub content_size: bool,
    /// Overwrite an existing output file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct DecompressArgs {
    /// Input file (`-` for stdin)
    pub input: PathBuf,
    /// Output file (`-` for stdout); defaults to INPUT without `.lz4`
    pub output: Option<PathBuf>,
    /// Overwrite an existing output file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// LZ4 files to inspect
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct StreamArgs {
    /// Input file (`-` for stdin)
    pub input: PathBuf,
    /// Output file (`-` for stdout)
    pub output: PathBuf,
    /// Decode a block stream instead of writing one
    #[arg(short, long)]
    pub decode: bool,
    /// Truncate the output instead of appending records to it
    #[arg(long, conflicts_with = "decode")]
    pub overwrite: bool,
    /// Chunk size in bytes
    #[arg(long, default_value_t = crate::config::BLOCK_STREAM_CHUNK_SIZE)]
    pub chunk_size: usize,
    /// Acceleration factor; overrides TRACY_LZ4_ACCELERATION
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..=LZ4_ACCELERATION_MAX as i64))]
    pub acceleration: Option<i32>,
}

impl CompressArgs {
    /// Frame preferences selected by the flags.
    pub fn preferences(&self, acceleration: i32) -> Preferences {
        Preferences {
            frame_info: FrameInfo {
                block_size_id: BlockSizeId::from_id(self.block_size_id).unwrap_or_default(),
                block_mode: if self.independent {
                    BlockMode::Independent
                } else {
                    BlockMode::Linked
                },
                content_checksum_flag: if self.no_content_checksum {
                    ContentChecksum::Disabled
                } else {
                    ContentChecksum::Enabled
                },
                block_checksum_flag: if self.block_checksum {
                    BlockChecksum::Enabled
                } else {
                    BlockChecksum::Disabled
                },
                ..FrameInfo::default()
            },
            acceleration,
        }
    }
}

// ── Environment ───────────────────────────────────────────────────────────────

/// Resolve the acceleration: command-line value, else the environment, else
/// the compiled default.
pub fn init_acceleration(cli_value: Option<i32>) -> i32 {
    cli_value.unwrap_or_else(|| init_acceleration_from(std::env::var(ENV_ACCELERATION).ok().as_deref()))
}

/// Parse an acceleration taken from the environment.  Values that are not a
/// positive integer are ignored with a warning.
pub fn init_acceleration_from(env_val: Option<&str>) -> i32 {
    if let Some(env) = env_val {
        match env.trim().parse::<i32>() {
            Ok(v) if v >= 1 => return v.min(LZ4_ACCELERATION_MAX),
            _ => {
                if display_level() >= 2 {
                    eprintln!(
                        "Ignore environment variable setting {}={}: not a valid positive value ",
                        ENV_ACCELERATION, env
                    );
                }
            }
        }
    }
    ACCELERATION_DEFAULT
}

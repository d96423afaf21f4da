// Integration tests for src/cli/args.rs: clap definitions and env override

use clap::Parser;
use tracy_lz4::cli::args::{init_acceleration_from, Cli, Command};
use tracy_lz4::config::ACCELERATION_DEFAULT;
use tracy_lz4::frame::{BlockMode, BlockSizeId};

#[test]
fn decompress_takes_optional_output() {
    let cli = Cli::parse_from(["tracy-lz4", "decompress", "-f", "in.lz4"]);
    let Command::Decompress(args) = cli.command else {
        panic!("expected decompress");
    };
    assert!(args.force);
    assert!(args.output.is_none());
}

#[test]
fn info_requires_a_file() {
    assert!(Cli::try_parse_from(["tracy-lz4", "info"]).is_err());
    let cli = Cli::parse_from(["tracy-lz4", "info", "a.lz4", "b.lz4"]);
    let Command::Info(args) = cli.command else {
        panic!("expected info");
    };
    assert_eq!(args.inputs.len(), 2);
}

#[test]
fn global_verbosity_after_subcommand() {
    let cli = Cli::parse_from(["tracy-lz4", "compress", "x", "-q", "-q"]);
    assert_eq!(cli.quiet, 2);
}

#[test]
fn block_size_and_mode_flags() {
    let cli = Cli::parse_from(["tracy-lz4", "compress", "--block-size", "7", "--independent", "x"]);
    let Command::Compress(args) = cli.command else {
        panic!("expected compress");
    };
    let prefs = args.preferences(ACCELERATION_DEFAULT);
    assert_eq!(prefs.frame_info.block_size_id, BlockSizeId::Max4Mb);
    assert_eq!(prefs.frame_info.block_mode, BlockMode::Independent);
}

#[test]
fn env_parsing() {
    assert_eq!(init_acceleration_from(Some("12")), 12);
    assert_eq!(init_acceleration_from(Some("-3")), ACCELERATION_DEFAULT);
    assert_eq!(init_acceleration_from(Some("")), ACCELERATION_DEFAULT);
}

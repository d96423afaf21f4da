//! Binary entry point for the `tracy-lz4` command-line tool.
//!
//! Parses the command line with `clap`, hands it to [`tracy_lz4::cli::run`],
//! and turns an error into a one-line diagnostic on stderr plus exit status 1.

use clap::Parser;

use tracy_lz4::cli::args::Cli;
use tracy_lz4::cli::constants::COMPRESSOR_NAME;
use tracy_lz4::displaylevel;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = tracy_lz4::cli::run(cli) {
        displaylevel!(1, "{}: {:#}\n", COMPRESSOR_NAME, e);
        std::process::exit(1);
    }
}

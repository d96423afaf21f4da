//! Command-line interface for the `tracy-lz4` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity strings, size multipliers and the shared `DISPLAY_LEVEL` atomic with its display macros. |
//! | [`args`]      | `clap` definitions of the subcommands and the `TRACY_LZ4_ACCELERATION` environment override. |
//!
//! [`run`] dispatches a parsed [`Cli`](args::Cli) to the file operations
//! below.  Every failure is returned as an `anyhow::Error` carrying the file
//! name as context; `main` prints it and exits with status 1.

pub mod constants;
pub mod args;

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

use crate::block_stream::{BlockStreamReader, BlockStreamWriter};
use crate::cli::args::{
    init_acceleration, Cli, Command, CompressArgs, DecompressArgs, InfoArgs, StreamArgs, STDIO_MARK,
};
use crate::cli::constants::{level_from_flags, set_display_level, COMPRESSOR_NAME, LZ4_EXTENSION};
use crate::config::SEARCH_DEPTH_DEFAULT;
use crate::displaylevel;
use crate::displayout;
use crate::file::{Lz4ReadFile, Lz4WriteFile};
use crate::frame::decompress::{decompress_frame, get_frame_info};
use crate::frame::header::block_size;
use crate::frame::types::{BlockChecksum, BlockMode, ContentChecksum, FrameType, SKIPPABLE_HEADER_SIZE};

/// Execute the subcommand selected on the command line.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    set_display_level(level_from_flags(cli.verbose, cli.quiet));
    displaylevel!(
        3,
        "*** {} v{} {}-bit ***\n",
        COMPRESSOR_NAME,
        crate::version_string(),
        std::mem::size_of::<*const ()>() * 8
    );
    match cli.command {
        Command::Compress(args) => compress_file(&args),
        Command::Decompress(args) => decompress_file(&args),
        Command::Info(args) => info(&args),
        Command::Stream(args) => stream(&args),
    }
}

// ── File plumbing ─────────────────────────────────────────────────────────────

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO_MARK
}

fn open_input(path: &Path) -> anyhow::Result<Box<dyn Read>> {
    if is_stdio(path) {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn open_output(path: &Path, force: bool, append: bool) -> anyhow::Result<Box<dyn Write>> {
    if is_stdio(path) {
        return Ok(Box::new(io::stdout().lock()));
    }
    if !force && !append && path.exists() {
        bail!("{} already exists; use -f to overwrite", path.display());
    }
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

/// `INPUT.lz4` for compression.
fn compressed_name(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(LZ4_EXTENSION);
    PathBuf::from(name)
}

/// `INPUT` minus `.lz4` for decompression.
fn decompressed_name(input: &Path) -> anyhow::Result<PathBuf> {
    let s = input.to_string_lossy();
    match s.strip_suffix(LZ4_EXTENSION) {
        Some(stem) if !stem.is_empty() => Ok(PathBuf::from(stem)),
        _ => bail!(
            "cannot infer an output name for {} (no {} extension)",
            input.display(),
            LZ4_EXTENSION
        ),
    }
}

fn resolve_output(
    input: &Path,
    output: Option<&PathBuf>,
    derive: impl Fn(&Path) -> anyhow::Result<PathBuf>,
) -> anyhow::Result<PathBuf> {
    match output {
        Some(p) => Ok(p.clone()),
        None if is_stdio(input) => Ok(PathBuf::from(STDIO_MARK)),
        None => derive(input),
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn compress_file(args: &CompressArgs) -> anyhow::Result<()> {
    let output = resolve_output(&args.input, args.output.as_ref(), |p| Ok(compressed_name(p)))?;
    let acceleration = init_acceleration(args.acceleration);
    let mut prefs = args.preferences(acceleration);
    if args.content_size && !is_stdio(&args.input) {
        let len = std::fs::metadata(&args.input)
            .with_context(|| format!("cannot stat {}", args.input.display()))?
            .len();
        prefs.frame_info.content_size = Some(len);
    }
    displaylevel!(
        4,
        "acceleration {} (search depth {} at 1), block size {} KiB\n",
        acceleration,
        SEARCH_DEPTH_DEFAULT,
        block_size(prefs.frame_info.block_size_id) >> 10
    );

    let mut reader = open_input(&args.input)?;
    let writer = open_output(&output, args.force, false)?;
    let mut lz4w = Lz4WriteFile::open(writer, Some(&prefs)).context("cannot start frame")?;
    let read = io::copy(&mut reader, &mut lz4w)
        .with_context(|| format!("error compressing {}", args.input.display()))?;
    let mut writer = lz4w.finish().context("cannot finish frame")?;
    writer.flush()?;

    displaylevel!(2, "Compressed {} bytes into {}\n", read, output.display());
    Ok(())
}

fn decompress_file(args: &DecompressArgs) -> anyhow::Result<()> {
    let output = resolve_output(&args.input, args.output.as_ref(), decompressed_name)?;
    let reader = open_input(&args.input)?;
    let mut lz4r = Lz4ReadFile::open(reader)
        .with_context(|| format!("{} is not an LZ4 file", args.input.display()))?;
    let mut writer = open_output(&output, args.force, false)?;
    let written = io::copy(&mut lz4r, &mut writer)
        .with_context(|| format!("error decoding {}", args.input.display()))?;
    writer.flush()?;

    displaylevel!(2, "Decoded {} bytes into {}\n", written, output.display());
    Ok(())
}

fn info(args: &InfoArgs) -> anyhow::Result<()> {
    for input in &args.inputs {
        let mut data = Vec::new();
        open_input(input)?
            .read_to_end(&mut data)
            .with_context(|| format!("cannot read {}", input.display()))?;
        displayout!("{}:\n", input.display());
        let mut pos = 0usize;
        let mut index = 0usize;
        while pos < data.len() {
            let rest = &data[pos..];
            let (frame_info, _) = get_frame_info(rest)
                .with_context(|| format!("{}: bad frame at offset {}", input.display(), pos))?;
            index += 1;
            if frame_info.frame_type == FrameType::SkippableFrame {
                let size = frame_info.content_size.unwrap_or(0) as usize;
                displayout!("  frame {}: skippable, {} bytes\n", index, size);
                pos += SKIPPABLE_HEADER_SIZE + size;
                continue;
            }
            let (content, consumed) = decompress_frame(rest, usize::MAX)
                .with_context(|| format!("{}: frame {} is damaged", input.display(), index))?;
            displayout!(
                "  frame {}: {} KiB blocks, {}, block checksum {}, content checksum {}, {} -> {} bytes\n",
                index,
                block_size(frame_info.block_size_id) >> 10,
                match frame_info.block_mode {
                    BlockMode::Linked => "linked",
                    BlockMode::Independent => "independent",
                },
                on_off(frame_info.block_checksum_flag == BlockChecksum::Enabled),
                on_off(frame_info.content_checksum_flag == ContentChecksum::Enabled),
                consumed,
                content.len()
            );
            pos += consumed;
        }
    }
    Ok(())
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn stream(args: &StreamArgs) -> anyhow::Result<()> {
    let mut reader = open_input(&args.input)?;
    if args.decode {
        let mut writer = open_output(&args.output, true, false)?;
        let mut records = BlockStreamReader::new(reader)
            .with_block_size(args.chunk_size)
            .context("invalid chunk size")?;
        let mut total = 0u64;
        while let Some(chunk) = records
            .next_block()
            .with_context(|| format!("error decoding {}", args.input.display()))?
        {
            writer.write_all(&chunk)?;
            total += chunk.len() as u64;
        }
        writer.flush()?;
        displaylevel!(2, "Decoded {} bytes into {}\n", total, args.output.display());
        return Ok(());
    }

    // Records accumulate across runs, like the trace writer's default.
    let writer = open_output(&args.output, true, !args.overwrite)?;
    let mut stream = BlockStreamWriter::new(writer)
        .with_block_size(args.chunk_size)
        .context("invalid chunk size")?
        .with_acceleration(init_acceleration(args.acceleration));
    let mut buf = vec![0u8; args.chunk_size.min(1 << 20)];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        stream.write(&buf[..n], false)?;
    }
    stream.write(&[], true)?;
    let blocks = stream.blocks_written();
    stream.finish()?;
    displaylevel!(2, "Wrote {} records to {}\n", blocks, args.output.display());
    Ok(())
}

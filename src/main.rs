//! bin2ihex - encode a binary file (or standard input) as Intel Hex.
//!
//! Usage:
//!   bin2ihex firmware.bin 0x0100 > firmware.hex
//!   cat firmware.bin | bin2ihex

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::num::ParseIntError;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bin2ihex::{encode, open_input, EncoderConfig, LineEnding, DEFAULT_CHUNK_SIZE};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Encode binary data as Intel Hex records.
#[derive(Parser)]
#[command(name = "bin2ihex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file, standard input when missing or empty
    input: Option<PathBuf>,

    /// Base address to start from (decimal or 0x prefixed hex)
    #[arg(default_value = "0", value_parser = parse_address)]
    base_addr: u16,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not emit the start address record
    #[arg(long)]
    no_start_record: bool,

    /// Terminate records with CRLF instead of LF
    #[arg(long)]
    crlf: bool,

    /// Data bytes per record
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, value_parser = clap::value_parser!(u8).range(1..))]
    chunk_size: u8,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_address(value: &str) -> Result<u16, ParseIntError> {
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(digits) => u16::from_str_radix(digits, 16),
        None => value.parse(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // stdout carries the records
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set up logging")?;

    let config = EncoderConfig::new()
        .with_chunk_size(cli.chunk_size)
        .with_base_address(cli.base_addr)
        .with_start_record(!cli.no_start_record)
        .with_line_ending(if cli.crlf {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        });

    let input = open_input(cli.input.as_deref())?;

    let summary = match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Unable to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            encode(input, &mut writer, &config)?
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            let summary = encode(input, &mut writer, &config)?;
            writer.flush().context("Failed to flush stdout")?;
            summary
        }
    };

    info!(
        bytes = summary.bytes_read,
        records = summary.data_records,
        segments = summary.segment_records,
        "done"
    );

    Ok(())
}

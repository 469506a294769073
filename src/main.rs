use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;

use text_stream_sort::error::SortError;
use text_stream_sort::order::Order;
use text_stream_sort::sort::Sort;

#[derive(Parser)]
#[command(name = "text-stream-sort")]
#[command(about = "Sort lines of text under a fixed memory budget, similar to sort(1)")]
struct Args {
    /// Sort by this 1-based whitespace-delimited field instead of the whole line
    #[arg(short = 'k', long = "key")]
    key: Option<i64>,

    /// Compare keys as decimal numbers; keys that do not parse sort after numeric ones
    #[arg(short = 'n', long)]
    numeric: bool,

    /// Reverse the result of comparisons
    #[arg(short = 'r', long)]
    reverse: bool,

    /// Output only the first of records with equal keys
    #[arg(short = 'u', long)]
    unique: bool,

    /// Directory for intermediate run files
    #[arg(long)]
    tmp_dir: Option<PathBuf>,

    /// In-memory chunk budget in megabytes
    #[arg(long)]
    chunk_size_mb: Option<u64>,

    /// Log phase transitions to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Input file; standard input when omitted
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    SimpleLogger::new().with_level(level).init()?;

    let mut sort = Sort::new();
    if let Some(key) = args.key {
        if key < 1 {
            return Err(SortError::InvalidKeyField.into());
        }
        sort.with_key_field(key as usize);
    }
    sort.with_numeric(args.numeric);
    sort.with_unique(args.unique);
    if args.reverse {
        sort.with_order(Order::Desc);
    }
    if let Some(tmp_dir) = args.tmp_dir {
        sort.with_tmp_dir(tmp_dir);
    }
    if let Some(chunk_size_mb) = args.chunk_size_mb {
        sort.with_chunk_size_mb(chunk_size_mb);
    }
    if let Some(file) = args.file {
        sort.with_input(file);
    }

    sort.sort()
}

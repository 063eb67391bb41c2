#![deny(
    warnings,
    missing_debug_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
//! `localcrawl` - Crawl a local directory tree into a path to text map.

use std::num::NonZeroU64;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_cargo::style::CLAP_STYLING;
use localcrawl::types::{DEFAULT_EXCLUDE_PATTERNS, DEFAULT_ROOT};
use localcrawl::{CrawlRequest, Crawler, Result};
use log::LevelFilter;

/// CLI arguments for `localcrawl`
#[derive(Parser, Debug)]
#[command(author, version, about, styles = CLAP_STYLING)]
struct Cli {
    /// Directory to crawl
    #[arg(default_value = DEFAULT_ROOT)]
    dir:       PathBuf,
    /// Keep only files whose path matches one of these globs
    #[arg(short, long, value_name = "GLOB")]
    include:   Vec<String>,
    /// Drop files whose path matches any of these globs
    #[arg(short, long, value_name = "GLOB", default_values = DEFAULT_EXCLUDE_PATTERNS)]
    exclude:   Vec<String>,
    /// Skip files larger than this many bytes
    #[arg(short = 's', long, value_name = "BYTES")]
    max_size:  Option<NonZeroU64>,
    /// Key files by their walked path instead of relative to DIR
    #[arg(long)]
    absolute:  bool,
    /// Diagnostic verbosity, overridden by `RUST_LOG`
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

/// Log levels accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    /// Only fatal problems
    Error,
    /// Unreadable files and directories
    Warn,
    /// A summary of each crawl
    Info,
    /// Why each file was skipped
    Debug,
    /// Everything
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

/// Crawl `cli.dir` and list what was found
fn crawl(cli: Cli) -> Result<()> {
    println!("--- Crawling {} ---", cli.dir.display());

    let mut request = CrawlRequest::new(cli.dir)
        .include(cli.include)
        .exclude(cli.exclude)
        .use_relative_paths(!cli.absolute);
    request.max_file_size = cli.max_size;

    let result = Crawler::new(&request)?.run();

    println!("Found {} files:", result.len());
    for path in result.files.keys() {
        println!("  {path}");
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new().filter_level(cli.log_level.into()).parse_default_env().init();

    if let Err(e) = crawl(cli) {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

//! `localcrawl` - Crawl a local directory tree into a path to text map.

#![deny(
    warnings,
    missing_debug_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]

pub mod crawler;
pub mod error;
pub mod filter;
pub mod fs;
pub mod pattern;
pub mod types;

pub use crawler::{Crawler, crawl_local_files};
pub use error::{Error, Result};
pub use types::{CrawlRequest, CrawlResult, CrawlStats};

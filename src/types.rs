//! Common types and constants for `localcrawl`

use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroU64;
use std::path::PathBuf;

/// Directory crawled by the command line when none is given
pub const DEFAULT_ROOT: &str = "..";

/// Exclude patterns applied by the command line when none are given
pub const DEFAULT_EXCLUDE_PATTERNS: [&str; 4] = ["*.pyc", "__pycache__/*", ".git/*", "output/*"];

/// Parameters of a single crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// Directory to crawl
    pub root:               PathBuf,
    /// Globs a candidate path must match one of; empty keeps everything
    pub include:            BTreeSet<String>,
    /// Globs that drop a candidate path when any matches
    pub exclude:            BTreeSet<String>,
    /// Files larger than this many bytes are skipped
    pub max_file_size:      Option<NonZeroU64>,
    /// Key files relative to `root` instead of by their walked path
    pub use_relative_paths: bool,
}

impl CrawlRequest {
    /// Create a request for `root` with no filters and relative keys
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root:               root.into(),
            include:            BTreeSet::new(),
            exclude:            BTreeSet::new(),
            max_file_size:      None,
            use_relative_paths: true,
        }
    }

    /// Add include patterns
    #[must_use]
    pub fn include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Add exclude patterns
    #[must_use]
    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Set the size ceiling in bytes; `0` removes it
    #[must_use]
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = NonZeroU64::new(bytes);
        self
    }

    /// Choose between relative keys and walked paths
    #[must_use]
    pub fn use_relative_paths(mut self, relative: bool) -> Self {
        self.use_relative_paths = relative;
        self
    }
}

/// Files gathered by a crawl, keyed by candidate path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    /// Candidate path to file content
    pub files: BTreeMap<String, String>,
}

impl CrawlResult {
    /// Number of files gathered
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no file survived the filters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Content stored under `path`, if any
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }
}

/// Counters describing a crawl in progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Directories discovered, the root included
    pub directories:   usize,
    /// Files discovered before any filtering
    pub files_seen:    usize,
    /// Files dropped by include/exclude patterns
    pub filtered:      usize,
    /// Files dropped by the size ceiling
    pub oversized:     usize,
    /// Files skipped because they could not be read
    pub read_failures: usize,
}

const _: () = {
    assert!(!DEFAULT_ROOT.is_empty());
    assert!(!DEFAULT_EXCLUDE_PATTERNS.is_empty());
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = CrawlRequest::new("/repo");
        assert_eq!(request.root, PathBuf::from("/repo"));
        assert!(request.include.is_empty());
        assert!(request.exclude.is_empty());
        assert_eq!(request.max_file_size, None);
        assert!(request.use_relative_paths);
    }

    #[test]
    fn test_request_builder() {
        let request = CrawlRequest::new("/repo")
            .include(["*.py", "*.rs"])
            .exclude(vec![String::from("tests/*")])
            .max_file_size(1000)
            .use_relative_paths(false);

        assert_eq!(request.include.len(), 2);
        assert!(request.exclude.contains("tests/*"));
        assert_eq!(request.max_file_size.map(NonZeroU64::get), Some(1000));
        assert!(!request.use_relative_paths);
    }

    #[test]
    fn test_zero_size_means_unlimited() {
        let request = CrawlRequest::new(".").max_file_size(1000).max_file_size(0);
        assert_eq!(request.max_file_size, None);
    }

    #[test]
    fn test_patterns_are_a_set() {
        let request = CrawlRequest::new(".").include(["*.py", "*.py"]);
        assert_eq!(request.include.len(), 1);
    }
}

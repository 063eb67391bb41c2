//! Directory crawler implementation

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::filter::PathFilter;
use crate::fs::{EntryKind, FileSystem, LocalFs};
use crate::types::{CrawlRequest, CrawlResult, CrawlStats};

/// Crawl the host filesystem in one call
///
/// # Errors
/// Returns [`Error::InvalidDirectory`] if the root is missing or not a
/// directory. Unreadable files and directories are logged and skipped.
pub fn crawl_local_files(request: &CrawlRequest) -> Result<CrawlResult> {
    let mut crawler = Crawler::new(request)?;
    Ok(crawler.run())
}

/// Directory crawler gathering text files that pass the filters
#[derive(Debug)]
pub struct Crawler<F = LocalFs> {
    /// Filesystem being walked
    fs:       F,
    /// Crawl root as given
    root:     PathBuf,
    /// Compiled patterns and size ceiling
    filter:   PathFilter,
    /// Key by path relative to `root`
    relative: bool,
    /// Directories still to list
    queue:    Vec<PathBuf>,
    /// Running counters
    stats:    CrawlStats,
}

impl Crawler<LocalFs> {
    /// Create a crawler over the host filesystem
    ///
    /// # Errors
    /// See [`Crawler::with_fs`].
    pub fn new(request: &CrawlRequest) -> Result<Self> {
        Self::with_fs(LocalFs, request)
    }
}

impl<F: FileSystem> Crawler<F> {
    /// Create a crawler over `fs`
    ///
    /// # Errors
    /// Returns [`Error::InvalidDirectory`] if the root is missing or not a
    /// directory.
    pub fn with_fs(fs: F, request: &CrawlRequest) -> Result<Self> {
        if !fs.is_dir(&request.root) {
            return Err(Error::InvalidDirectory(request.root.clone()));
        }

        let filter = PathFilter::new(
            request.include.iter().map(String::as_str),
            request.exclude.iter().map(String::as_str),
            request.max_file_size,
        );

        Ok(Self {
            fs,
            root: request.root.clone(),
            filter,
            relative: request.use_relative_paths,
            queue: vec![request.root.clone()],
            stats: CrawlStats { directories: 1, ..CrawlStats::default() },
        })
    }

    /// Get the current progress of the crawl
    #[must_use = "Progress information should be used for monitoring"]
    pub const fn progress(&self) -> CrawlStats {
        self.stats
    }

    /// Process the next directory in the queue
    ///
    /// Returns the files of that directory that passed every filter and could
    /// be read, or `None` once the queue is exhausted. Subdirectories are
    /// queued unconditionally.
    pub fn process_next(&mut self) -> Option<Vec<(String, String)>> {
        let dir = self.queue.pop()?;

        let entries = match self.fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) => {
                warn!("{}", Error::DirectoryRead { path: dir, source });
                return Some(Vec::new());
            },
        };

        let mut files = Vec::new();

        for entry in entries {
            match entry.kind {
                EntryKind::Dir => {
                    self.queue.push(entry.path);
                    self.stats.directories += 1;
                },
                EntryKind::File => {
                    if let Some(file) = self.visit_file(&entry.path) {
                        files.push(file);
                    }
                },
                EntryKind::Other => {
                    debug!("Skipping {}: not a regular file", entry.path.display());
                },
            }
        }

        Some(files)
    }

    /// Drain the queue into a result
    pub fn run(&mut self) -> CrawlResult {
        let mut files = BTreeMap::new();

        while let Some(batch) = self.process_next() {
            files.extend(batch);
        }

        let stats = self.stats;
        info!(
            "Crawled {}: {} files kept, {} seen in {} directories ({} filtered, {} oversized, {} \
             unreadable)",
            self.root.display(),
            files.len(),
            stats.files_seen,
            stats.directories,
            stats.filtered,
            stats.oversized,
            stats.read_failures
        );

        CrawlResult { files }
    }

    /// Filter and read a single file
    fn visit_file(&mut self, path: &Path) -> Option<(String, String)> {
        self.stats.files_seen += 1;

        let candidate = self.candidate_path(path);
        if !self.filter.admits(&candidate) {
            debug!("Skipping {candidate}: filtered by pattern");
            self.stats.filtered += 1;
            return None;
        }

        match self.read_file(path) {
            Ok(Some(content)) => Some((candidate, content)),
            Ok(None) => {
                debug!("Skipping {candidate}: larger than the size limit");
                self.stats.oversized += 1;
                None
            },
            Err(e) => {
                warn!("{e}");
                self.stats.read_failures += 1;
                None
            },
        }
    }

    /// Read `path`, `Ok(None)` when it is over the size ceiling
    fn read_file(&self, path: &Path) -> Result<Option<String>> {
        let read_error = |source| Error::FileRead { path: path.to_path_buf(), source };

        if self.filter.max_file_size().is_some() {
            let size = self.fs.file_size(path).map_err(read_error)?;
            if self.filter.exceeds_size(size) {
                return Ok(None);
            }
        }

        self.fs.read_to_string(path).map(Some).map_err(read_error)
    }

    /// Path string used both for matching and as the result key
    fn candidate_path(&self, path: &Path) -> String {
        let path = if self.relative { path.strip_prefix(&self.root).unwrap_or(path) } else { path };
        path.to_string_lossy().into_owned()
    }
}

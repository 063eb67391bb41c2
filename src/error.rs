//! Error types for `localcrawl`

use std::io;
use std::path::PathBuf;

use arrayvec::ArrayString;
use thiserror::Error;

/// Maximum length of user-facing error messages
pub const MAX_ERROR_LENGTH: usize = 256;

/// Custom result type for `localcrawl` operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for `localcrawl`
///
/// Only [`Error::InvalidDirectory`] ever leaves a crawl. The read variants
/// are produced per entry, logged as warnings and absorbed by the crawler.
#[derive(Debug, Error)]
pub enum Error {
    /// Crawl root is missing or not a directory
    #[error("Error: Directory does not exist: {}", .0.display())]
    InvalidDirectory(PathBuf),

    /// A candidate file could not be sized, opened or decoded
    #[error("Could not read file {}: {source}", .path.display())]
    FileRead {
        /// Path of the file as walked
        path:   PathBuf,
        /// Underlying failure
        #[source]
        source: io::Error,
    },

    /// A directory could not be listed
    #[error("Could not read directory {}: {source}", .path.display())]
    DirectoryRead {
        /// Path of the directory as walked
        path:   PathBuf,
        /// Underlying failure
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Whether the error aborts a crawl rather than skipping a single entry
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidDirectory(_))
    }

    /// Get a user-friendly error message with action items
    #[must_use]
    pub fn user_message(&self) -> ArrayString<MAX_ERROR_LENGTH> {
        let mut msg = ArrayString::new();
        match self {
            Self::InvalidDirectory(_) => {
                push_truncated(&mut msg, &self.to_string());
                push_truncated(&mut msg, "\nTip: Pass an existing directory to crawl");
            },
            Self::FileRead { .. } | Self::DirectoryRead { .. } => {
                push_truncated(&mut msg, "Error: ");
                push_truncated(&mut msg, &self.to_string());
                push_truncated(&mut msg, "\nTip: Check file permissions and try again");
            },
        }
        msg
    }
}

/// Append as much of `s` as fits, cutting on a char boundary
fn push_truncated(buf: &mut ArrayString<MAX_ERROR_LENGTH>, s: &str) {
    let mut end = s.len().min(buf.remaining_capacity());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    buf.push_str(&s[..end]);
}

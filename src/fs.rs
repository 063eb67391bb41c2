//! Filesystem access used by the crawler
//!
//! The crawler only talks to the [`FileSystem`] trait, so tests can swap the
//! host filesystem for an in-memory tree.

use std::collections::BTreeMap;
use std::fs::{self, FileType};
use std::io;
use std::path::{Path, PathBuf};

use log::warn;

/// What a directory entry is, as far as crawling cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Something to read, including symlinks that do not point at a directory
    File,
    /// A real directory to descend into
    Dir,
    /// Symlinked directories and special files, never crawled
    Other,
}

/// A single entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Directory path joined with the entry name
    pub path: PathBuf,
    /// Entry classification
    pub kind: EntryKind,
}

/// Traversal interface over a filesystem
pub trait FileSystem {
    /// Whether `path` exists and is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// List the immediate children of `dir`
    ///
    /// # Errors
    /// Returns error if the directory cannot be listed.
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<Entry>>;

    /// Size of the file at `path` in bytes
    ///
    /// # Errors
    /// Returns error if the file metadata cannot be read.
    fn file_size(&self, path: &Path) -> io::Result<u64>;

    /// Full content of the file at `path` as UTF-8
    ///
    /// # Errors
    /// Returns error if the file cannot be opened, read or decoded.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Classify a host entry from its unfollowed file type
///
/// An entry whose type cannot be read is treated as a file, so the failure
/// is reported when it is read.
fn classify(path: &Path, file_type: io::Result<FileType>) -> EntryKind {
    let Ok(file_type) = file_type else {
        return EntryKind::File;
    };

    if file_type.is_dir() {
        EntryKind::Dir
    } else if file_type.is_file() {
        EntryKind::File
    } else if file_type.is_symlink() {
        // Broken links stay files so the read failure gets reported
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => EntryKind::Other,
            _ => EntryKind::File,
        }
    } else {
        EntryKind::Other
    }
}

/// The host filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {e}", dir.display());
                    continue;
                },
            };
            let path = entry.path();
            let kind = classify(&path, entry.file_type());
            entries.push(Entry { path, kind });
        }

        Ok(entries)
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// Node of an in-memory tree
#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Dir,
    File(Vec<u8>),
    Unreadable(u64),
}

/// In-memory filesystem for tests and fixtures
///
/// Parent directories are created implicitly.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    nodes: BTreeMap<PathBuf, Node>,
}

impl MemoryFs {
    /// Create an empty filesystem
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory
    #[must_use]
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.nodes.insert(path, Node::Dir);
        self
    }

    /// Add a file holding `content`
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.nodes.insert(path, Node::File(content.into()));
        self
    }

    /// Add a file of `size` bytes that fails to open with permission denied
    #[must_use]
    pub fn with_unreadable(mut self, path: impl Into<PathBuf>, size: u64) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.nodes.insert(path, Node::Unreadable(size));
        self
    }

    fn add_parents(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
        }
    }

    fn node(&self, path: &Path) -> io::Result<&Node> {
        self.nodes.get(path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
        })
    }
}

impl FileSystem for MemoryFs {
    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.nodes.get(path), Some(Node::Dir))
    }

    fn read_dir(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        if !self.is_dir(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", dir.display()),
            ));
        }

        Ok(self
            .nodes
            .iter()
            .filter(|(path, _)| path.parent() == Some(dir))
            .map(|(path, node)| Entry {
                path: path.clone(),
                kind: if matches!(node, Node::Dir) { EntryKind::Dir } else { EntryKind::File },
            })
            .collect())
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        match self.node(path)? {
            Node::File(content) => Ok(content.len() as u64),
            Node::Unreadable(size) => Ok(*size),
            Node::Dir => Err(io::Error::other(format!("{} is a directory", path.display()))),
        }
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        match self.node(path)? {
            Node::File(content) => String::from_utf8(content.clone())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Node::Unreadable(_) => {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
            },
            Node::Dir => Err(io::Error::other(format!("{} is a directory", path.display()))),
        }
    }
}

//! Scanner module for directory traversal and window fingerprinting.
//!
//! This module provides functionality for:
//! - Iterative, depth-first directory walking
//! - Sampled-window fingerprinting
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`fingerprint`]: 1 KiB window sampling and the FNV-1 fold
//!
//! # Example
//!
//! ```no_run
//! use scrunge::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     skip_hidden: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod fingerprint;
pub mod walker;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

// Re-export main types
pub use fingerprint::{
    fingerprint, fingerprint_window, sample, Fingerprint, Sample, EMPTY_FILE_HASH, SAMPLE_SIZE,
};
pub use walker::Walker;

/// A file discovered during a scan.
///
/// Identity is the absolute path; two records with the same path are the
/// same file even if their recorded sizes disagree. The creation time is
/// not stored and is only read when a tie-break needs it.
#[derive(Debug, Clone, Eq)]
pub struct FileRecord {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl PartialEq for FileRecord {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl std::hash::Hash for FileRecord {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl FileRecord {
    /// Create a new FileRecord.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }

    /// Build a record for a path known only by name (e.g. from a persisted index).
    ///
    /// The size is read from the filesystem; an unreadable file gets size 0.
    #[must_use]
    pub fn from_path(path: PathBuf) -> Self {
        let size = match fs::metadata(&path) {
            Ok(m) => m.len(),
            Err(e) => {
                log::debug!("Cannot stat {}: {}", path.display(), e);
                0
            }
        };
        Self { path, size }
    }

    /// Read the creation timestamp of the file.
    ///
    /// # Errors
    ///
    /// Fails if the file is gone or the platform does not record birth time.
    pub fn created(&self) -> io::Result<SystemTime> {
        fs::metadata(&self.path)?.created()
    }
}

/// Configuration for directory walking.
///
/// Controls filtering, symlink handling, and other walk behavior.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    /// Directory cycles are detected and skipped.
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Glob patterns to ignore (gitignore-style).
    /// These are applied in addition to any .gitignore file in the root.
    pub ignore_patterns: Vec<String>,

    /// Exact paths never yielded (the persisted index, generated playlists).
    pub exclude: Vec<PathBuf>,
}

impl WalkerConfig {
    /// Create a new configuration.
    ///
    /// # Arguments
    ///
    /// * `follow_symlinks` - Whether to follow symbolic links
    /// * `skip_hidden` - Whether to skip hidden files
    /// * `ignore_patterns` - Glob patterns to ignore
    #[must_use]
    pub fn new(follow_symlinks: bool, skip_hidden: bool, ignore_patterns: Vec<String>) -> Self {
        Self {
            follow_symlinks,
            skip_hidden,
            ignore_patterns,
            exclude: Vec::new(),
        }
    }

    /// Add a path that the walker must never yield.
    #[must_use]
    pub fn with_excluded(mut self, path: PathBuf) -> Self {
        self.exclude.push(path);
        self
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    pub(crate) fn from_io(path: &Path, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: e,
            },
        }
    }
}

/// Errors that can occur while sampling a window.
///
/// These never abort a scan; the fingerprint is still produced.
#[derive(thiserror::Error, Debug)]
pub enum FingerprintError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl FingerprintError {
    pub(crate) fn from_io(path: &Path, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: e,
            },
        }
    }
}

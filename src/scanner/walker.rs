//! Directory walker built on `walkdir`.
//!
//! # Overview
//!
//! [`Walker`] traverses a directory tree depth-first. `walkdir` keeps its
//! pending directories on a heap stack, so deep trees never grow the call
//! stack. Entries of each directory are sorted with files before
//! subdirectories and then by name, so the files of a directory are yielded
//! before any of its subdirectories are entered.
//!
//! Traversal order matters downstream: the first file seen under a given
//! fingerprint becomes the canonical copy.
//!
//! # Features
//!
//! - Configurable symlink following with cycle detection
//! - Gitignore-style pattern matching via the `ignore` crate
//! - Hidden file filtering
//! - Explicit path exclusions
//!
//! # Example
//!
//! ```no_run
//! use scrunge::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Videos"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use walkdir::{DirEntry, WalkDir};

use super::{FileRecord, ScanError, WalkerConfig};

/// Directory walker for sequential file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Root directory of this walker.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Gitignore matcher from the root `.gitignore` plus configured patterns.
    fn build_gitignore(&self) -> Option<Gitignore> {
        let mut builder = GitignoreBuilder::new(&self.root);

        let gitignore_path = self.root.join(".gitignore");
        if gitignore_path.exists() {
            match builder.add(&gitignore_path) {
                Some(e) => log::warn!("Skipping {}: {}", gitignore_path.display(), e),
                None => log::debug!("Using ignore rules from {}", gitignore_path.display()),
            }
        }

        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        builder
            .build()
            .map_err(|e| log::warn!("Ignore patterns disabled: {}", e))
            .ok()
            .filter(|gitignore| !gitignore.is_empty())
    }

    /// Walk the directory tree, yielding file records.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. Zero-length files are yielded like any other file.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        let gitignore = self.build_gitignore();
        let mut visited = HashSet::new();

        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by(files_then_dirs)
            .into_iter()
            .filter_entry(move |entry| self.admit(entry, gitignore.as_ref(), &mut visited))
            .filter_map(move |entry| match entry {
                Ok(entry) => self.to_record(&entry),
                Err(e) => self.to_scan_error(e).map(Err),
            })
    }

    /// Decide whether an entry is yielded and, for directories, entered.
    fn admit(
        &self,
        entry: &DirEntry,
        gitignore: Option<&Gitignore>,
        visited: &mut HashSet<PathBuf>,
    ) -> bool {
        let path = entry.path();
        let is_dir = entry.file_type().is_dir();

        if entry.depth() == 0 {
            if is_dir && self.config.follow_symlinks {
                if let Ok(canonical) = fs::canonicalize(path) {
                    visited.insert(canonical);
                }
            }
            return true;
        }

        if self.config.skip_hidden && entry.file_name().to_string_lossy().starts_with('.') {
            log::trace!("Skipping hidden entry: {}", path.display());
            return false;
        }
        if self.should_ignore(path, is_dir, gitignore) {
            log::trace!("Ignoring: {}", path.display());
            return false;
        }
        if self.config.exclude.iter().any(|p| p == path) {
            log::trace!("Skipping excluded file: {}", path.display());
            return false;
        }
        // Two links to one directory would otherwise list its files twice.
        if is_dir && self.config.follow_symlinks {
            if let Ok(canonical) = fs::canonicalize(path) {
                if !visited.insert(canonical) {
                    log::debug!("Skipping already visited directory: {}", path.display());
                    return false;
                }
            }
        }
        true
    }

    fn to_record(&self, entry: &DirEntry) -> Option<Result<FileRecord, ScanError>> {
        // Unfollowed symlinks, sockets and the like report neither type.
        if !entry.file_type().is_file() {
            if entry.path_is_symlink() && !self.config.follow_symlinks {
                log::trace!("Skipping symlink: {}", entry.path().display());
            }
            return None;
        }
        Some(
            entry
                .metadata()
                .map(|metadata| FileRecord::new(entry.path().to_path_buf(), metadata.len()))
                .map_err(|e| self.to_scan_error(e).unwrap_or_else(|| self.unknown(entry.path()))),
        )
    }

    /// Convert a walk error; directory loops are skipped silently.
    fn to_scan_error(&self, error: walkdir::Error) -> Option<ScanError> {
        if let Some(ancestor) = error.loop_ancestor() {
            log::debug!(
                "Skipping directory loop back to {}",
                ancestor.display()
            );
            return None;
        }

        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        let scan_error = match error.into_io_error() {
            Some(io_error) => ScanError::from_io(&path, io_error),
            None => self.unknown(&path),
        };
        log::warn!("{}", scan_error);
        Some(scan_error)
    }

    fn unknown(&self, path: &Path) -> ScanError {
        ScanError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("unreadable directory entry"),
        }
    }

    fn should_ignore(&self, path: &Path, is_dir: bool, gitignore: Option<&Gitignore>) -> bool {
        let Some(gi) = gitignore else {
            return false;
        };

        // Matching works on root-relative paths with forward slashes.
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let relative = relative.to_string_lossy().replace('\\', "/");
        gi.matched(relative, is_dir).is_ignore()
    }
}

/// Files first, then directories; each group by name.
fn files_then_dirs(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

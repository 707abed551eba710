//! Scan pipeline: Discover → Pass 1 → Pass 2.
//!
//! # Overview
//!
//! [`DuplicateFinder`] drives one run:
//! 1. **Discover** - the [`Walker`] yields files in traversal order
//! 2. **Pass 1** - each file's header is fingerprinted and classified by
//!    the [`DuplicateIndex`]; empties are flagged, header matches become
//!    candidate pairs
//! 3. **Pass 2** - after discovery completes, every candidate is verified
//!    at its midpoint and kept as a duplicate or demoted to a suspect
//!
//! All run state lives in a [`ScanContext`] that is created per run and
//! handed back inside the [`ScanOutcome`].
//!
//! # Example
//!
//! ```no_run
//! use scrunge::duplicates::{DuplicateFinder, DuplicateIndex, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let outcome = finder.scan(Path::new("/media"), DuplicateIndex::new()).unwrap();
//!
//! println!("{} duplicates, {} suspects, {} empty",
//!     outcome.duplicates.len(), outcome.suspects.len(), outcome.empties.len());
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::index::DuplicateIndex;
use super::pairs::{Classification, ClassifiedPair};
use super::verify::second_pass;
use crate::progress::ProgressCallback;
use crate::scanner::{FileRecord, FingerprintError, ScanError, Walker, WalkerConfig};

/// Configuration for a scan.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Directory walker configuration.
    pub walker_config: WalkerConfig,
    /// Optional progress callback.
    pub progress_callback: Option<Rc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Rc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Mutable state of one run.
///
/// Nothing here outlives the run unless the caller keeps the index
/// (e.g. to persist it).
#[derive(Debug, Default)]
pub struct ScanContext {
    /// First-seen index, possibly preloaded
    pub index: DuplicateIndex,
    /// Header matches awaiting verification, in discovery order
    pub candidates: Vec<ClassifiedPair>,
    /// Zero-content files, in discovery order
    pub empties: Vec<ClassifiedPair>,
    /// Empty findings whose header could not be read
    pub unread_empties: HashSet<PathBuf>,
    /// Number of files fed through pass 1
    pub files_processed: usize,
    /// Traversal errors
    pub scan_errors: Vec<ScanError>,
    /// Sampling errors
    pub read_errors: Vec<FingerprintError>,
}

impl ScanContext {
    /// Start a run on top of an existing index.
    #[must_use]
    pub fn new(index: DuplicateIndex) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    /// Pass 1 for one discovered file.
    pub fn observe(&mut self, record: FileRecord) {
        self.files_processed += 1;

        let observation = self.index.observe_detailed(record);
        let unread = observation.error.is_some();
        if let Some(e) = observation.error {
            log::warn!("{}", e);
            self.read_errors.push(e);
        }

        match observation.finding {
            Some(pair) if pair.class == Classification::Empty => {
                if unread {
                    self.unread_empties.insert(pair.first.path.clone());
                }
                self.empties.push(pair);
            }
            Some(pair) => self.candidates.push(pair),
            None => {}
        }
    }

    /// Record a traversal error.
    pub fn record_scan_error(&mut self, error: ScanError) {
        log::warn!("{}", error);
        self.scan_errors.push(error);
    }
}

/// Summary statistics from a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Number of files processed
    pub files_processed: usize,
    /// Entries held by the index before the run
    pub preloaded_entries: usize,
    /// Entries held by the index after the run
    pub indexed_entries: usize,
    /// Traversal errors encountered
    pub scan_errors: usize,
    /// Sampling errors encountered (both passes)
    pub read_errors: usize,
    /// Duration of discovery plus both passes
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Whether any non-fatal error occurred.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.scan_errors > 0 || self.read_errors > 0
    }
}

/// Everything a run produces.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Verified duplicate pairs
    pub duplicates: Vec<ClassifiedPair>,
    /// Header matches whose middles diverged
    pub suspects: Vec<ClassifiedPair>,
    /// Zero-content files
    pub empties: Vec<ClassifiedPair>,
    /// Empty findings whose header could not be read
    pub unread_empties: HashSet<PathBuf>,
    /// Index after the run, ready to persist
    pub index: DuplicateIndex,
    /// Run statistics
    pub summary: ScanSummary,
}

impl ScanOutcome {
    /// Pairs of the given class.
    #[must_use]
    pub fn pairs(&self, class: Classification) -> &[ClassifiedPair] {
        match class {
            Classification::Duplicate => &self.duplicates,
            Classification::Suspect => &self.suspects,
            Classification::Empty => &self.empties,
        }
    }

    /// Empty findings whose content was actually read as zeros.
    ///
    /// A file that could not be read also fingerprints as empty; those are
    /// reported but never offered for deletion.
    #[must_use]
    pub fn deletable_empties(&self) -> Vec<ClassifiedPair> {
        self.empties
            .iter()
            .filter(|pair| {
                let unread = self.unread_empties.contains(&pair.first.path);
                if unread {
                    log::warn!("Keeping unreadable file [{}]", pair.first.path.display());
                }
                !unread
            })
            .cloned()
            .collect()
    }

    /// Whether the run found nothing in any class.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.suspects.is_empty() && self.empties.is_empty()
    }
}

/// Errors that abort a scan before it starts.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root path could not be made absolute.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Runs the sampling pipeline over a directory tree.
#[derive(Debug, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Scan `root`, starting from `index` (empty, or preloaded from disk).
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if the root does not exist or is not a
    /// directory. Per-file errors never abort the scan; they are counted in
    /// the summary.
    pub fn scan(&self, root: &Path, index: DuplicateIndex) -> Result<ScanOutcome, FinderError> {
        if !root.exists() {
            return Err(FinderError::PathNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(FinderError::NotADirectory(root.to_path_buf()));
        }
        let root = std::path::absolute(root).map_err(|source| FinderError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        log::info!("Scanning {}", root.display());
        let walker = Walker::new(&root, self.config.walker_config.clone());
        Ok(self.scan_records(walker.walk(), index))
    }

    /// Run both passes over an already ordered stream of discovered files.
    ///
    /// The order of `records` decides which file of a collision becomes
    /// canonical.
    pub fn scan_records<I>(&self, records: I, index: DuplicateIndex) -> ScanOutcome
    where
        I: IntoIterator<Item = Result<FileRecord, ScanError>>,
    {
        let start = Instant::now();
        let progress = self.config.progress_callback.as_deref();
        let preloaded_entries = index.len();
        let mut ctx = ScanContext::new(index);

        if let Some(cb) = progress {
            cb.on_phase_start("discover", 0);
        }
        for entry in records {
            match entry {
                Ok(record) => {
                    if let Some(cb) = progress {
                        cb.on_progress(ctx.files_processed + 1, &record.path.to_string_lossy());
                    }
                    ctx.observe(record);
                }
                Err(e) => ctx.record_scan_error(e),
            }
        }
        if let Some(cb) = progress {
            cb.on_phase_end("discover");
        }
        log::debug!(
            "Pass 1: {} files, {} candidates, {} empty",
            ctx.files_processed,
            ctx.candidates.len(),
            ctx.empties.len()
        );

        let candidates = std::mem::take(&mut ctx.candidates);
        let verified = second_pass(candidates, progress);
        ctx.read_errors.extend(verified.errors);

        let summary = ScanSummary {
            files_processed: ctx.files_processed,
            preloaded_entries,
            indexed_entries: ctx.index.len(),
            scan_errors: ctx.scan_errors.len(),
            read_errors: ctx.read_errors.len(),
            scan_duration: start.elapsed(),
        };

        ScanOutcome {
            duplicates: verified.duplicates,
            suspects: verified.suspects,
            empties: ctx.empties,
            unread_empties: ctx.unread_empties,
            index: ctx.index,
            summary,
        }
    }
}

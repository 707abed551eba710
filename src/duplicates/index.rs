//! First-seen fingerprint index and header classification (pass 1).
//!
//! # Overview
//!
//! [`DuplicateIndex`] maps the header fingerprint of each file to the first
//! file observed with it. Files are fed in traversal order through
//! [`DuplicateIndex::observe`]:
//!
//! - an all-zero header yields an [`Classification::Empty`] finding;
//! - an unseen fingerprint is recorded and yields nothing;
//! - a fingerprint already held by the *same* path (an index preloaded from
//!   an earlier run) yields nothing;
//! - a fingerprint held by another path yields a candidate duplicate pair
//!   `(canonical, new)`.
//!
//! Entries are never overwritten or evicted during a run.
//!
//! # Example
//!
//! ```no_run
//! use scrunge::duplicates::DuplicateIndex;
//! use scrunge::scanner::FileRecord;
//! use std::path::PathBuf;
//!
//! let mut index = DuplicateIndex::new();
//! index.observe(FileRecord::from_path(PathBuf::from("/media/a.mkv")));
//! if let Some(pair) = index.observe(FileRecord::from_path(PathBuf::from("/media/b.mkv"))) {
//!     println!("{:?}: {} / {}", pair.class, pair.first.path.display(), pair.second.path.display());
//! }
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::pairs::ClassifiedPair;
use crate::scanner::{sample, FileRecord, Fingerprint, FingerprintError, EMPTY_FILE_HASH};

/// Mapping from header fingerprint to canonical file.
#[derive(Debug, Default, Clone)]
pub struct DuplicateIndex {
    entries: HashMap<Fingerprint, FileRecord>,
}

/// Outcome of observing one file.
#[derive(Debug)]
pub struct Observation {
    /// Finding produced by the file, if any.
    pub finding: Option<ClassifiedPair>,
    /// Non-fatal read error hit while fingerprinting.
    pub error: Option<FingerprintError>,
}

impl DuplicateIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from previously persisted entries.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (Fingerprint, FileRecord)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Number of fingerprints held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical file for a fingerprint.
    #[must_use]
    pub fn get(&self, fingerprint: Fingerprint) -> Option<&FileRecord> {
        self.entries.get(&fingerprint)
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &FileRecord)> {
        self.entries.iter()
    }

    /// Drop entries whose file no longer exists (e.g. after deletions).
    ///
    /// Returns the number of entries removed.
    pub fn prune_missing(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, record| record.path.exists());
        before - self.entries.len()
    }

    /// Fingerprint the header of `record` and classify it against the index.
    ///
    /// Read failures are logged; the file is still classified using the
    /// fingerprint of whatever could be read.
    pub fn observe(&mut self, record: FileRecord) -> Option<ClassifiedPair> {
        let observation = self.observe_detailed(record);
        if let Some(e) = &observation.error {
            log::warn!("{}", e);
        }
        observation.finding
    }

    /// Like [`observe`](Self::observe) but hands the read error back to the
    /// caller instead of logging it.
    pub fn observe_detailed(&mut self, record: FileRecord) -> Observation {
        let header = sample(&record.path, 0);
        Observation {
            finding: self.classify(header.fingerprint, record),
            error: header.error,
        }
    }

    /// Classify a record whose header fingerprint is already known.
    pub fn classify(&mut self, fingerprint: Fingerprint, record: FileRecord) -> Option<ClassifiedPair> {
        if fingerprint == EMPTY_FILE_HASH {
            log::debug!("Zero-content header: {}", record.path.display());
            return Some(ClassifiedPair::empty(record));
        }

        match self.entries.entry(fingerprint) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                None
            }
            Entry::Occupied(slot) if *slot.get() == record => {
                log::trace!("Already indexed: {}", record.path.display());
                None
            }
            Entry::Occupied(slot) => {
                log::debug!(
                    "Header match {}: {} -> {}",
                    fingerprint,
                    slot.get().path.display(),
                    record.path.display()
                );
                Some(ClassifiedPair::duplicate(slot.get().clone(), record))
            }
        }
    }
}

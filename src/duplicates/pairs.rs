//! Classified file pairs.
//!
//! Every finding of a scan is a pair of [`FileRecord`]s tagged with a
//! [`Classification`]. The first slot is always the canonical (first-seen)
//! file; for [`Classification::Empty`] both slots hold the same file.

use serde::Serialize;

use crate::scanner::FileRecord;

/// Class of a scan finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Header and middle windows both match.
    Duplicate,
    /// Header windows match but middle windows differ.
    Suspect,
    /// Header window is all zeros.
    Empty,
}

impl Classification {
    /// Upper-case label used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Duplicate => "DUPE",
            Self::Suspect => "SUSPECT",
            Self::Empty => "EMPTY",
        }
    }

    /// Base name of the playlist written for this class, if it has one.
    #[must_use]
    pub fn playlist_name(self) -> Option<&'static str> {
        match self {
            Self::Duplicate => Some("dupes"),
            Self::Suspect => Some("suspects"),
            Self::Empty => None,
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A pair of files and the class they were put in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPair {
    /// Current classification
    pub class: Classification,
    /// Canonical (first-seen) file
    pub first: FileRecord,
    /// Later arrival
    pub second: FileRecord,
}

impl ClassifiedPair {
    /// Candidate duplicate pair, pending verification.
    #[must_use]
    pub fn duplicate(first: FileRecord, second: FileRecord) -> Self {
        Self {
            class: Classification::Duplicate,
            first,
            second,
        }
    }

    /// Empty finding; the record is paired with itself.
    #[must_use]
    pub fn empty(record: FileRecord) -> Self {
        Self {
            class: Classification::Empty,
            first: record.clone(),
            second: record,
        }
    }

    /// Whether both slots hold the same file.
    #[must_use]
    pub fn is_self_pair(&self) -> bool {
        self.first == self.second
    }

    /// Both files of the pair, in order. Self-pairs yield the file once.
    pub fn files(&self) -> impl Iterator<Item = &FileRecord> {
        let second = (!self.is_self_pair()).then_some(&self.second);
        std::iter::once(&self.first).chain(second)
    }
}

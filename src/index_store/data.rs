//! Data structures for the persisted index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::duplicates::DuplicateIndex;
use crate::scanner::{FileRecord, Fingerprint};

/// Current version of the index file format.
pub const INDEX_VERSION: u32 = 1;

/// A saved duplicate index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedIndex {
    /// Format version.
    pub version: u32,
    /// When the index was written.
    pub created_at: DateTime<Utc>,
    /// Root directory of the scan that produced the index.
    pub root: PathBuf,
    /// Entries sorted by fingerprint.
    pub entries: Vec<IndexEntry>,
}

/// One fingerprint and the file it was first seen on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub fingerprint: Fingerprint,
    pub path: PathBuf,
}

impl PersistedIndex {
    /// Snapshot `index` with the current timestamp and version.
    #[must_use]
    pub fn from_index(index: &DuplicateIndex, root: &Path) -> Self {
        let mut entries: Vec<IndexEntry> = index
            .iter()
            .map(|(fingerprint, record)| IndexEntry {
                fingerprint: *fingerprint,
                path: record.path.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.fingerprint.cmp(&b.fingerprint).then_with(|| a.path.cmp(&b.path)));

        Self {
            version: INDEX_VERSION,
            created_at: Utc::now(),
            root: root.to_path_buf(),
            entries,
        }
    }

    /// Rebuild a [`DuplicateIndex`] from the saved entries.
    ///
    /// Sizes are re-read from the filesystem. Entries whose file has
    /// disappeared keep a size of 0.
    #[must_use]
    pub fn into_index(self) -> DuplicateIndex {
        DuplicateIndex::from_entries(
            self.entries
                .into_iter()
                .map(|entry| (entry.fingerprint, FileRecord::from_path(entry.path))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_sorted_by_fingerprint() {
        let index = DuplicateIndex::from_entries([
            (Fingerprint(30), FileRecord::new(PathBuf::from("/r/c"), 1)),
            (Fingerprint(10), FileRecord::new(PathBuf::from("/r/a"), 1)),
            (Fingerprint(20), FileRecord::new(PathBuf::from("/r/b"), 1)),
        ]);
        let persisted = PersistedIndex::from_index(&index, Path::new("/r"));

        let order: Vec<u64> = persisted.entries.iter().map(|e| e.fingerprint.0).collect();
        assert_eq!(order, vec![10, 20, 30]);
        assert_eq!(persisted.version, INDEX_VERSION);
        assert_eq!(persisted.root, PathBuf::from("/r"));
    }

    #[test]
    fn test_into_index_keeps_paths() {
        let persisted = PersistedIndex {
            version: INDEX_VERSION,
            created_at: Utc::now(),
            root: PathBuf::from("/r"),
            entries: vec![IndexEntry {
                fingerprint: Fingerprint(7),
                path: PathBuf::from("/r/gone.bin"),
            }],
        };
        let index = persisted.into_index();

        let record = index.get(Fingerprint(7)).unwrap();
        assert_eq!(record.path, PathBuf::from("/r/gone.bin"));
        assert_eq!(record.size, 0);
    }

    #[test]
    fn test_fingerprint_serialized_as_hex() {
        let entry = IndexEntry {
            fingerprint: Fingerprint(0xdead_beef),
            path: PathBuf::from("/r/x"),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"00000000deadbeef\""));
    }
}

//! Choosing which file of a pair to remove.
//!
//! The earlier-created file is presumed to be the original, so the file
//! with the strictly later creation time is selected. When the timestamps
//! are equal, or either one cannot be read, the first file of the pair is
//! selected. For empty findings both slots hold the same file, which is
//! therefore always the one selected.
//!
//! Resolution only ever runs on explicit request.

use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::time::SystemTime;

use super::delete::{permanent_delete, BatchDeleteResult};
use crate::duplicates::ClassifiedPair;
use crate::scanner::FileRecord;

/// Select the file of `pair` to delete, using on-disk creation times.
#[must_use]
pub fn resolve(pair: &ClassifiedPair) -> &FileRecord {
    resolve_by(pair, FileRecord::created)
}

/// Select the file of `pair` to delete, reading creation times through `created`.
pub fn resolve_by<F>(pair: &ClassifiedPair, created: F) -> &FileRecord
where
    F: Fn(&FileRecord) -> io::Result<SystemTime>,
{
    if pair.is_self_pair() {
        return &pair.first;
    }

    match (created(&pair.first), created(&pair.second)) {
        (Ok(a), Ok(b)) if b > a => &pair.second,
        (Ok(a), Ok(b)) if a > b => &pair.first,
        (Ok(_), Ok(_)) => {
            log::debug!(
                "Equal creation times, selecting first: {}",
                pair.first.path.display()
            );
            &pair.first
        }
        (a, b) => {
            for err in [a.err(), b.err()].into_iter().flatten() {
                log::warn!("Cannot read creation time: {}", err);
            }
            &pair.first
        }
    }
}

/// Resolve and delete one file per pair.
///
/// A file already removed earlier in the batch is not attempted again.
/// Failures are recorded and do not stop the remaining pairs.
pub fn delete_resolved(pairs: &[ClassifiedPair]) -> BatchDeleteResult {
    delete_resolved_by(pairs, FileRecord::created)
}

/// [`delete_resolved`] with a custom creation-time source.
pub fn delete_resolved_by<F>(pairs: &[ClassifiedPair], created: F) -> BatchDeleteResult
where
    F: Fn(&FileRecord) -> io::Result<SystemTime>,
{
    let mut batch = BatchDeleteResult::default();
    let mut removed: HashSet<PathBuf> = HashSet::new();

    for pair in pairs {
        let target = resolve_by(pair, &created);
        if removed.contains(&target.path) {
            log::debug!("Already deleted: {}", target.path.display());
            continue;
        }

        log::info!("Deleting newest [{}]", target.path.display());
        let outcome = permanent_delete(&target.path);
        if outcome.is_ok() {
            removed.insert(target.path.clone());
        }
        batch.record(outcome);
    }

    log::info!("{}", batch.summary());
    batch
}

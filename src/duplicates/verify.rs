//! Mid-file verification of candidate pairs (pass 2).
//!
//! # Overview
//!
//! Header matches are cheap but weak: media containers often share their
//! first kilobyte. Each candidate pair is re-sampled at the midpoint of the
//! *first* file, `floor(len / 2)`, and that same offset is used for both
//! files even when their sizes differ. Matching middles keep the pair a
//! duplicate; diverging middles demote it to a suspect.
//!
//! Verification runs only after discovery has finished.

use super::pairs::{Classification, ClassifiedPair};
use crate::progress::ProgressCallback;
use crate::scanner::{sample, FingerprintError};

/// Offset of the second sampling window for a pair.
#[must_use]
pub fn midpoint(pair: &ClassifiedPair) -> u64 {
    pair.first.size / 2
}

/// Re-fingerprint both files at the shared midpoint and classify the pair.
///
/// Returns [`Classification::Duplicate`] or [`Classification::Suspect`].
/// Read errors are logged and the fingerprints of whatever was read are
/// compared anyway.
#[must_use]
pub fn verify(pair: &ClassifiedPair) -> Classification {
    verify_detailed(pair).0
}

/// Like [`verify`], also returning any read errors hit.
#[must_use]
pub fn verify_detailed(pair: &ClassifiedPair) -> (Classification, Vec<FingerprintError>) {
    let offset = midpoint(pair);
    let a = sample(&pair.first.path, offset);
    let b = sample(&pair.second.path, offset);

    let errors: Vec<_> = [a.error, b.error].into_iter().flatten().collect();
    for e in &errors {
        log::warn!("{}", e);
    }

    let class = if a.fingerprint == b.fingerprint {
        Classification::Duplicate
    } else {
        log::debug!(
            "Middle mismatch at offset {}: {} vs {}",
            offset,
            pair.first.path.display(),
            pair.second.path.display()
        );
        Classification::Suspect
    };
    (class, errors)
}

/// Result of the second pass over all candidates.
#[derive(Debug, Default)]
pub struct SecondPass {
    /// Pairs confirmed as duplicates, in candidate order
    pub duplicates: Vec<ClassifiedPair>,
    /// Pairs demoted to suspects, in candidate order
    pub suspects: Vec<ClassifiedPair>,
    /// Read errors hit while verifying
    pub errors: Vec<FingerprintError>,
}

/// Verify every candidate pair, splitting them into duplicates and suspects.
#[must_use]
pub fn second_pass(
    candidates: Vec<ClassifiedPair>,
    progress: Option<&dyn ProgressCallback>,
) -> SecondPass {
    let mut result = SecondPass::default();

    if let Some(cb) = progress {
        cb.on_phase_start("verify", candidates.len());
    }

    for (i, mut pair) in candidates.into_iter().enumerate() {
        if let Some(cb) = progress {
            cb.on_progress(i + 1, &pair.second.path.to_string_lossy());
        }

        let (class, errors) = verify_detailed(&pair);
        result.errors.extend(errors);
        pair.class = class;
        match class {
            Classification::Suspect => result.suspects.push(pair),
            _ => result.duplicates.push(pair),
        }
    }

    if let Some(cb) = progress {
        cb.on_phase_end("verify");
    }

    log::debug!(
        "Second pass: {} duplicates, {} suspects",
        result.duplicates.len(),
        result.suspects.len()
    );
    result
}

//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Header fingerprint indexing and classification (pass 1)
//! - Mid-file verification of candidate pairs (pass 2)
//! - Orchestration of a full scan run

pub mod finder;
pub mod index;
pub mod pairs;
pub mod verify;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanContext, ScanOutcome, ScanSummary};
pub use index::{DuplicateIndex, Observation};
pub use pairs::{Classification, ClassifiedPair};
pub use verify::{midpoint, second_pass, verify, SecondPass};

//! JSON output formatter for scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [ { "first": "/a.mkv", "second": "/b.mkv", "size": 1024 } ],
//!   "suspects": [],
//!   "empty": [ { "first": "/z.bin", "second": "/z.bin", "size": 0 } ],
//!   "totals": [ { "class": "duplicate", "count": 1, "total_bytes": 1024 } ],
//!   "summary": {
//!     "files_processed": 100,
//!     "preloaded_entries": 0,
//!     "indexed_entries": 97,
//!     "scan_errors": 0,
//!     "read_errors": 0,
//!     "scan_duration_ms": 1234,
//!     "exit_code": 0,
//!     "exit_code_name": "SC000"
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use super::report::{summarize, ClassSummary};
use crate::duplicates::{Classification, ClassifiedPair, ScanOutcome, ScanSummary};
use crate::error::ExitCode;

/// A single pair in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonPair {
    /// Canonical file
    pub first: String,
    /// Later arrival
    pub second: String,
    /// Size of the second file in bytes
    pub size: u64,
}

impl From<&ClassifiedPair> for JsonPair {
    fn from(pair: &ClassifiedPair) -> Self {
        Self {
            first: pair.first.path.to_string_lossy().into_owned(),
            second: pair.second.path.to_string_lossy().into_owned(),
            size: pair.second.size,
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Number of files processed
    pub files_processed: usize,
    /// Entries in the index before the run
    pub preloaded_entries: usize,
    /// Entries in the index after the run
    pub indexed_entries: usize,
    /// Traversal errors
    pub scan_errors: usize,
    /// Sampling errors
    pub read_errors: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "SC000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            files_processed: summary.files_processed,
            preloaded_entries: summary.preloaded_entries,
            indexed_entries: summary.indexed_entries,
            scan_errors: summary.scan_errors,
            read_errors: summary.read_errors,
            scan_duration_ms: summary.scan_duration.as_millis() as u64,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Verified duplicate pairs
    pub duplicates: Vec<JsonPair>,
    /// Suspect pairs
    pub suspects: Vec<JsonPair>,
    /// Empty files
    pub empty: Vec<JsonPair>,
    /// Per-class totals
    pub totals: Vec<ClassSummary>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create a new JSON output from a scan outcome and exit code.
    #[must_use]
    pub fn new(outcome: &ScanOutcome, exit_code: ExitCode) -> Self {
        let convert =
            |pairs: &[ClassifiedPair]| -> Vec<JsonPair> { pairs.iter().map(JsonPair::from).collect() };
        Self {
            duplicates: convert(&outcome.duplicates),
            suspects: convert(&outcome.suspects),
            empty: convert(&outcome.empties),
            totals: [
                Classification::Duplicate,
                Classification::Suspect,
                Classification::Empty,
            ]
            .into_iter()
            .map(|c| summarize(c, outcome.pairs(c)))
            .collect(),
            summary: JsonSummary::from_scan_summary(&outcome.summary, exit_code),
        }
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}

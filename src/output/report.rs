//! Per-class totals and the text report.
//!
//! # Overview
//!
//! [`summarize`] counts the pairs of a class and adds up the size of the
//! *second* file of each pair (the copy that would go). Totals are shown in
//! gigabytes with a binary divisor (1024³) and two decimals; an empty class
//! is reported as "none found" instead of a zero total.
//!
//! [`TextReport`] renders the run summary, the per-class details that were
//! asked for, and the class totals.

use std::io::{self, Write};

use serde::Serialize;
use yansi::Paint;

use crate::duplicates::{Classification, ClassifiedPair, ScanOutcome, ScanSummary};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Count and byte total of one classification list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassSummary {
    /// Class summarized
    pub class: Classification,
    /// Number of pairs in the list
    pub count: usize,
    /// Sum of the second file's size over all pairs
    pub total_bytes: u64,
}

impl ClassSummary {
    /// Total size in binary gigabytes.
    #[must_use]
    pub fn gigabytes(&self) -> f64 {
        self.total_bytes as f64 / GIB
    }

    /// One-line total, or the "none found" line for an empty list.
    #[must_use]
    pub fn message(&self) -> String {
        if self.count == 0 {
            format!("No {} files were found.", self.class.label())
        } else {
            format!(
                "Found {} files in {} list adding up to {:.2} GB.",
                self.count,
                self.class.label(),
                self.gigabytes()
            )
        }
    }
}

/// Summarize one classification list.
#[must_use]
pub fn summarize(class: Classification, pairs: &[ClassifiedPair]) -> ClassSummary {
    ClassSummary {
        class,
        count: pairs.len(),
        total_bytes: pairs.iter().map(|p| p.second.size).sum(),
    }
}

/// Which class lists get their individual pairs printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailSelection {
    /// Print every duplicate pair
    pub duplicates: bool,
    /// Print every suspect pair
    pub suspects: bool,
    /// Print every empty file
    pub empties: bool,
}

impl Default for DetailSelection {
    fn default() -> Self {
        Self {
            duplicates: true,
            suspects: false,
            empties: false,
        }
    }
}

impl DetailSelection {
    fn includes(&self, class: Classification) -> bool {
        match class {
            Classification::Duplicate => self.duplicates,
            Classification::Suspect => self.suspects,
            Classification::Empty => self.empties,
        }
    }
}

/// Text formatter for a finished scan.
pub struct TextReport<'a> {
    outcome: &'a ScanOutcome,
    details: DetailSelection,
}

impl<'a> TextReport<'a> {
    /// Create a report with the default detail selection.
    #[must_use]
    pub fn new(outcome: &'a ScanOutcome) -> Self {
        Self {
            outcome,
            details: DetailSelection::default(),
        }
    }

    /// Choose which lists are printed pair by pair.
    #[must_use]
    pub fn with_details(mut self, details: DetailSelection) -> Self {
        self.details = details;
        self
    }

    /// Write the full report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_run_summary(writer, &self.outcome.summary)?;
        for class in [
            Classification::Duplicate,
            Classification::Suspect,
            Classification::Empty,
        ] {
            write_class(
                writer,
                class,
                self.outcome.pairs(class),
                self.details.includes(class),
            )?;
        }
        writeln!(writer, "{}", banner("DONE"))
    }
}

fn banner(title: &str) -> String {
    format!("------------------- {title} ------------------- ")
}

/// Write the run header: files processed and elapsed time.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_run_summary<W: Write>(writer: &mut W, summary: &ScanSummary) -> io::Result<()> {
    writeln!(writer, "{}", banner("SUMMARY").bold())?;
    writeln!(
        writer,
        "Processed {} files in {}ms.",
        summary.files_processed,
        summary.scan_duration.as_millis()
    )?;
    if summary.preloaded_entries > 0 {
        writeln!(
            writer,
            "Compared against {} previously indexed files.",
            summary.preloaded_entries
        )?;
    }
    if summary.has_errors() {
        writeln!(
            writer,
            "{}",
            format!(
                "{} files could not be fully read.",
                summary.scan_errors + summary.read_errors
            )
            .yellow()
        )?;
    }
    Ok(())
}

/// Write one class: optional pair details, then its total.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_class<W: Write>(
    writer: &mut W,
    class: Classification,
    pairs: &[ClassifiedPair],
    details: bool,
) -> io::Result<()> {
    if details {
        writeln!(writer, "{}", banner(&format!("{} DETAILS", class.label())).bold())?;
        for pair in pairs {
            if pair.is_self_pair() {
                writeln!(writer, "  [{}]", pair.first.path.display())?;
            } else {
                writeln!(
                    writer,
                    "  [{}] --> [{}]",
                    pair.first.path.display(),
                    pair.second.path.display()
                )?;
            }
        }
    }

    let summary = summarize(class, pairs);
    if summary.count > 0 {
        writeln!(writer, "{}", banner(&format!("{} SUMMARY", class.label())).bold())?;
        writeln!(writer, "{}", summary.message().green())
    } else {
        writeln!(writer, "{}", summary.message())
    }
}

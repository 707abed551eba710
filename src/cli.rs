//! Command-line interface definitions for Scrunge.
//!
//! All arguments and options use the clap derive API. Every yes/no question
//! of a run has a flag; anything not enabled on the command line (or in the
//! configuration) is answered "no", or asked on the terminal with
//! `--interactive`.
//!
//! # Example
//!
//! ```bash
//! # Scan and report only
//! scrunge ~/Videos
//!
//! # Reuse the index of the previous run and keep it up to date
//! scrunge --preload-index --persist-index ~/Videos
//!
//! # Keep the index somewhere else
//! scrunge --persist-index ~/Videos ~/.local/state/scrunge
//!
//! # Ask for every decision
//! scrunge --interactive ~/Videos
//! ```

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::Decision;

/// Sampling duplicate file finder.
///
/// Scrunge fingerprints a 1 KiB window at the start of every file to find
/// candidate duplicates, then compares a second window from the middle of
/// each candidate pair to confirm them.
#[derive(Debug, Parser)]
#[command(name = "scrunge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan. Without it, usage is printed and nothing is scanned.
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Directory holding the persisted index (default: ROOT)
    #[arg(value_name = "INDEX_DIR")]
    pub index_dir: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON objects on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Configuration file (default: platform config dir, scrunge/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format for the scan report
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Ask on the terminal for every decision not enabled by a flag
    #[arg(short, long)]
    pub interactive: bool,

    /// Load the persisted index before scanning
    #[arg(long)]
    pub preload_index: bool,

    /// Delete the later-created file of every duplicate pair
    #[arg(long)]
    pub delete_duplicates: bool,

    /// Write dupes.xspf for review (only when duplicates are not deleted)
    #[arg(long)]
    pub write_duplicate_playlist: bool,

    /// List suspect pairs
    #[arg(long)]
    pub show_suspects: bool,

    /// Write suspects.xspf for review
    #[arg(long)]
    pub write_suspect_playlist: bool,

    /// List empty files
    #[arg(long)]
    pub show_empty: bool,

    /// Delete empty files
    #[arg(long)]
    pub delete_empty: bool,

    /// Save the index for the next run
    #[arg(long)]
    pub persist_index: bool,

    /// Glob patterns to ignore (can be specified multiple times)
    ///
    /// These patterns are added to any .gitignore patterns found.
    #[arg(long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Follow symbolic links during scan
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl Cli {
    /// Decisions switched on by flags.
    #[must_use]
    pub fn decisions(&self) -> Vec<Decision> {
        [
            (self.preload_index, Decision::PreloadIndex),
            (self.delete_duplicates, Decision::DeleteDuplicates),
            (self.write_duplicate_playlist, Decision::WriteDuplicatePlaylist),
            (self.show_suspects, Decision::ShowSuspects),
            (self.write_suspect_playlist, Decision::WriteSuspectPlaylist),
            (self.show_empty, Decision::ShowEmpty),
            (self.delete_empty, Decision::DeleteEmpty),
            (self.persist_index, Decision::PersistIndex),
        ]
        .into_iter()
        .filter_map(|(set, decision)| set.then_some(decision))
        .collect()
    }

    /// Location of the persisted index for `root`.
    #[must_use]
    pub fn index_path(&self, root: &Path, file_name: &str) -> PathBuf {
        self.index_dir.as_deref().unwrap_or(root).join(file_name)
    }
}

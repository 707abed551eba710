//! Output formatters for scan results.
//!
//! This module provides different output formats for scan results:
//! - Text report with per-class totals
//! - JSON for automation and scripting
//! - XSPF playlists for manual review in a media player
//!
//! # Example
//!
//! ```no_run
//! use scrunge::duplicates::{DuplicateFinder, DuplicateIndex};
//! use scrunge::output::report::TextReport;
//! use std::path::Path;
//!
//! let outcome = DuplicateFinder::with_defaults()
//!     .scan(Path::new("."), DuplicateIndex::new())
//!     .unwrap();
//! TextReport::new(&outcome).write_to(&mut std::io::stdout()).unwrap();
//! ```

pub mod json;
pub mod playlist;
pub mod report;

// Re-export main types
pub use json::JsonOutput;
pub use playlist::{playlist_path, write_playlist, PlaylistError, PlaylistOutput, PlaylistTrack};
pub use report::{summarize, ClassSummary, DetailSelection, TextReport};

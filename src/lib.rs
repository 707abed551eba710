//! Scrunge - Sampling Duplicate File Finder
//!
//! Finds duplicate files in a directory tree by fingerprinting a 1 KiB
//! window at the start of each file, then confirming every header match
//! with a second window taken from the middle. Header matches whose middles
//! differ are reported as suspects, and all-zero samples as empty files.

pub mod actions;
pub mod app;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod index_store;
pub mod logging;
pub mod output;
pub mod progress;
pub mod prompt;
pub mod scanner;

pub use app::{execute, run_app, RunOptions};

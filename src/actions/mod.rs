//! File actions module.
//!
//! This module provides functionality for:
//! - Choosing which file of a classified pair to remove
//! - Removing files, one remove call per file
//!
//! ```no_run
//! use scrunge::actions::resolve::delete_resolved;
//! use scrunge::duplicates::{DuplicateFinder, DuplicateIndex};
//! use std::path::Path;
//!
//! let outcome = DuplicateFinder::with_defaults()
//!     .scan(Path::new("/media"), DuplicateIndex::new())
//!     .unwrap();
//! let batch = delete_resolved(&outcome.duplicates);
//! println!("{}", batch.summary());
//! ```

pub mod delete;
pub mod resolve;

pub use delete::{permanent_delete, BatchDeleteResult, DeleteError, DeleteResult};
pub use resolve::{delete_resolved, delete_resolved_by, resolve, resolve_by};

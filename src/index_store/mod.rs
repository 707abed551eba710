//! Persisted duplicate index.
//!
//! Saves the fingerprint → file mapping of a finished scan so that the next
//! run can preload it, and loads it back.
//!
//! # Features
//!
//! * **Integrity**: Each index file is wrapped in an envelope with a SHA256 checksum.
//! * **Versioning**: Every file carries its format version; unknown versions are refused.
//! * **Self-describing**: Human-readable JSON with hex fingerprints and the scanned root.
//!
//! # Architecture
//!
//! * [`data`]: Serializable model of the persisted index.
//! * [`io`]: Saving, loading and verifying index files.

pub mod data;
pub mod io;

pub use data::{IndexEntry, PersistedIndex, INDEX_VERSION};
pub use io::{load, save, IndexStoreError};

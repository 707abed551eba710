//! I/O operations for the persisted index.

use crate::duplicates::DuplicateIndex;
use crate::index_store::data::{PersistedIndex, INDEX_VERSION};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Envelope for index files to include integrity checks.
#[derive(Debug, Serialize, Deserialize)]
struct IndexEnvelope {
    /// SHA256 checksum of the compact serialized index.
    checksum: String,
    /// The actual index data.
    index: PersistedIndex,
}

/// Errors reading or writing the persisted index.
#[derive(thiserror::Error, Debug)]
pub enum IndexStoreError {
    /// Reading or writing the file failed.
    #[error("I/O error on index file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not a valid index envelope.
    #[error("Failed to parse index file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The stored checksum does not match the contents.
    #[error("Index integrity check failed for {0}: checksum mismatch")]
    ChecksumMismatch(PathBuf),

    /// The file was written by an incompatible format version.
    #[error("Unsupported index version: {found}. Current version is {expected}.")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// Serializing the index failed.
    #[error("Failed to serialize index: {0}")]
    Serialize(#[source] serde_json::Error),
}

fn checksum(index: &PersistedIndex) -> Result<String, IndexStoreError> {
    // Compact form, must match between save and load
    let compact = serde_json::to_string(index).map_err(IndexStoreError::Serialize)?;
    let mut hasher = Sha256::new();
    hasher.update(compact.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

impl PersistedIndex {
    /// Serializes the index to a JSON string with an integrity checksum.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, IndexStoreError> {
        let envelope = IndexEnvelope {
            checksum: checksum(self)?,
            index: self.clone(),
        };
        serde_json::to_string_pretty(&envelope).map_err(IndexStoreError::Serialize)
    }

    /// Parses and verifies an index from its JSON envelope.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON, checksum mismatch or an
    /// unsupported version.
    pub fn from_json(path: &Path, content: &str) -> Result<Self, IndexStoreError> {
        let envelope: IndexEnvelope =
            serde_json::from_str(content).map_err(|source| IndexStoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if checksum(&envelope.index)? != envelope.checksum {
            return Err(IndexStoreError::ChecksumMismatch(path.to_path_buf()));
        }

        let index = envelope.index;
        if index.version != INDEX_VERSION {
            return Err(IndexStoreError::UnsupportedVersion {
                found: index.version,
                expected: INDEX_VERSION,
            });
        }

        Ok(index)
    }
}

/// Save `index` to `path`, replacing any previous contents.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save(path: &Path, index: &DuplicateIndex, root: &Path) -> Result<(), IndexStoreError> {
    let io_error = |source| IndexStoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let json = PersistedIndex::from_index(index, root).to_json()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    let mut file = File::create(path).map_err(io_error)?;
    file.write_all(json.as_bytes()).map_err(io_error)?;

    log::info!("Saved {} index entries to {}", index.len(), path.display());
    Ok(())
}

/// Load the index stored at `path`.
///
/// Returns `Ok(None)` when no index file exists.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or verified.
pub fn load(path: &Path) -> Result<Option<DuplicateIndex>, IndexStoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("No persisted index at {}", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(IndexStoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let persisted = PersistedIndex::from_json(path, &content)?;
    for entry in &persisted.entries {
        if !entry.path.exists() {
            log::debug!(
                "File referenced in index no longer exists: {}",
                entry.path.display()
            );
        }
    }

    let index = persisted.into_index();
    log::info!("Loaded {} index entries from {}", index.len(), path.display());
    Ok(Some(index))
}

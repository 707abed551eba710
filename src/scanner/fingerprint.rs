//! Sampled-window fingerprinting.
//!
//! # Overview
//!
//! A fingerprint is a 64-bit digest of a fixed [`SAMPLE_SIZE`]-byte window
//! read from a file at a given offset. It is a cheap equality proxy, not a
//! content guarantee: windows shorter than [`SAMPLE_SIZE`] are padded with
//! zeros, so two short files that differ only past their end hash the same.
//!
//! The window is folded with FNV-1 (`hash = (hash ^ byte) * prime`) and then
//! passed through a shift/add/xor finalizer to spread the bits.
//!
//! # Example
//!
//! ```no_run
//! use scrunge::scanner::fingerprint::{fingerprint, EMPTY_FILE_HASH};
//! use std::path::Path;
//!
//! let fp = fingerprint(Path::new("movie.mkv"), 0);
//! if fp == EMPTY_FILE_HASH {
//!     println!("movie.mkv starts with a zero-filled window");
//! }
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::FingerprintError;

/// Size of the sampled window in bytes.
pub const SAMPLE_SIZE: usize = 1024;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Fingerprint of an all-zero window.
///
/// Any file whose offset-0 fingerprint equals this value is classified as
/// empty, whatever its real length.
pub const EMPTY_FILE_HASH: Fingerprint = Fingerprint(fold(&[0u8; SAMPLE_SIZE]));

/// 64-bit digest of a sampled window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    /// Raw 64-bit value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    /// Whether this is the zero-content sentinel.
    #[must_use]
    pub fn is_empty_sentinel(self) -> bool {
        self == EMPTY_FILE_HASH
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u64::from_str_radix(s.trim_start_matches("0x"), 16).map(Fingerprint)
    }
}

// Hex strings keep the persisted index readable and avoid JSON number precision issues.
impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Result of sampling one window: the fingerprint plus any I/O failure hit
/// while reading it.
///
/// The fingerprint is always present; on failure it covers whatever was
/// read before the error (the zero buffer if nothing was read).
#[derive(Debug)]
pub struct Sample {
    /// Fingerprint of the window.
    pub fingerprint: Fingerprint,
    /// Number of bytes actually read into the window.
    pub bytes_read: usize,
    /// Non-fatal error encountered while reading.
    pub error: Option<FingerprintError>,
}

/// Fold a window into a fingerprint.
const fn fold(window: &[u8; SAMPLE_SIZE]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < SAMPLE_SIZE {
        hash = (hash ^ window[i] as u64).wrapping_mul(FNV_PRIME);
        i += 1;
    }

    hash = hash.wrapping_add(hash << 13);
    hash ^= hash >> 7;
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 17;
    hash = hash.wrapping_add(hash << 5);
    hash
}

/// Fingerprint an in-memory window.
///
/// Pure function of the window bytes.
#[must_use]
pub fn fingerprint_window(window: &[u8; SAMPLE_SIZE]) -> Fingerprint {
    Fingerprint(fold(window))
}

/// Sample the window of `path` starting at `offset`.
///
/// Never fails: any error is carried in [`Sample::error`] and the
/// fingerprint covers the bytes obtained so far.
#[must_use]
pub fn sample(path: &Path, offset: u64) -> Sample {
    let mut window = [0u8; SAMPLE_SIZE];
    let (bytes_read, error) = match read_window(path, offset, &mut window) {
        Ok(n) => (n, None),
        Err((n, e)) => (n, Some(e)),
    };

    Sample {
        fingerprint: fingerprint_window(&window),
        bytes_read,
        error,
    }
}

/// Fingerprint the window of `path` starting at `offset`.
///
/// Read failures are logged and otherwise ignored.
#[must_use]
pub fn fingerprint(path: &Path, offset: u64) -> Fingerprint {
    let sample = sample(path, offset);
    if let Some(e) = &sample.error {
        log::warn!("{}", e);
    }
    sample.fingerprint
}

/// Fill `window` from `path` at `offset`, returning how many bytes landed.
///
/// On error, also reports how many bytes were read before it.
fn read_window(
    path: &Path,
    offset: u64,
    window: &mut [u8; SAMPLE_SIZE],
) -> Result<usize, (usize, FingerprintError)> {
    let mut file = File::open(path).map_err(|e| (0, FingerprintError::from_io(path, e)))?;

    if offset != 0 {
        // Seeking past EOF is allowed and simply yields no bytes.
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| (0, FingerprintError::from_io(path, e)))?;
    }

    let mut filled = 0;
    while filled < SAMPLE_SIZE {
        match file.read(&mut window[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err((filled, FingerprintError::from_io(path, e))),
        }
    }

    log::trace!(
        "Sampled {} bytes of {} at offset {}",
        filled,
        path.display(),
        offset
    );
    Ok(filled)
}

//! XSPF playlist export for manual review.
//!
//! Writes every file of a classification list as a `<track>` of an XSPF
//! playlist, so that a media player (VLC) can step through the pairs
//! before anything is deleted. Track ids come from one counter shared by
//! the whole list, starting at 0.
//!
//! # Example
//!
//! ```no_run
//! use scrunge::duplicates::{DuplicateFinder, DuplicateIndex};
//! use scrunge::output::playlist::write_playlist;
//! use std::path::Path;
//!
//! let root = Path::new("/media");
//! let outcome = DuplicateFinder::with_defaults().scan(root, DuplicateIndex::new()).unwrap();
//! let written = write_playlist(root, "dupes", &outcome.duplicates).unwrap();
//! println!("Playlist written to {}", written.display());
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use askama::Template;
use url::Url;

use crate::duplicates::ClassifiedPair;

/// Path of the playlist for `label` under `root`.
#[must_use]
pub fn playlist_path(root: &Path, label: &str) -> PathBuf {
    root.join(format!("{label}.xspf"))
}

/// XSPF document for a list of pairs, rendered from `templates/playlist.xspf`.
#[derive(Template)]
#[template(path = "playlist.xspf", escape = "html")]
pub struct PlaylistOutput {
    /// Tracks in list order
    pub tracks: Vec<PlaylistTrack>,
}

/// One `<track>` of the playlist.
pub struct PlaylistTrack {
    /// `file:///` URI of the file
    pub location: String,
    /// Position in the whole list, starting at 0
    pub id: usize,
}

impl PlaylistOutput {
    /// Build the track list for `pairs`.
    ///
    /// A pair holding one file twice contributes a single track.
    #[must_use]
    pub fn new(pairs: &[ClassifiedPair]) -> Self {
        let tracks = pairs
            .iter()
            .flat_map(|pair| pair.files())
            .enumerate()
            .map(|(id, file)| PlaylistTrack {
                location: file_uri(&file.path),
                id,
            })
            .collect();
        Self { tracks }
    }

    /// Render the document.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn to_xspf(&self) -> Result<String, askama::Error> {
        self.render()
    }

    /// Write the document to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), PlaylistError> {
        let xspf = self.to_xspf()?;
        writer.write_all(xspf.as_bytes())?;
        Ok(())
    }
}

/// Write `<root>/<label>.xspf` for `pairs`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created, rendered or written.
pub fn write_playlist(
    root: &Path,
    label: &str,
    pairs: &[ClassifiedPair],
) -> Result<PathBuf, PlaylistError> {
    let path = playlist_path(root, label);
    log::info!("Creating the playlist as {}", path.display());

    let mut writer = BufWriter::new(File::create(&path)?);
    PlaylistOutput::new(pairs).write_to(&mut writer)?;
    writer.flush()?;
    Ok(path)
}

/// `file:///` URI for an absolute path.
///
/// Relative paths, which `Url` refuses, fall back to a plain prefix.
fn file_uri(path: &Path) -> String {
    match Url::from_file_path(path) {
        Ok(url) => url.to_string(),
        Err(()) => format!("file:///{}", path.to_string_lossy().replace('\\', "/")),
    }
}

/// Errors that can occur while exporting a playlist.
#[derive(thiserror::Error, Debug)]
pub enum PlaylistError {
    /// Template rendering error
    #[error("Playlist template error: {0}")]
    Template(#[from] askama::Error),

    /// I/O error while writing the playlist
    #[error("I/O error while writing playlist: {0}")]
    Io(#[from] std::io::Error),
}

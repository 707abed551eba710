//! Application configuration management.
//!
//! Settings are layered, later layers overriding earlier ones:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. TOML file (`scrunge/config.toml` in the platform config directory, or `--config <FILE>`)
//! 3. Environment variables prefixed `SCRUNGE_` (nested keys split on `__`)
//! 4. Command-line flags ([`Config::with_cli_overrides`])
//!
//! # Example
//!
//! ```toml
//! follow_symlinks = false
//! ignore_patterns = ["*.tmp"]
//!
//! [decisions]
//! preload_index = true
//! persist_index = true
//! ```

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Default file name of the persisted index.
pub const DEFAULT_INDEX_FILE_NAME: &str = "persist.scrunge";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SCRUNGE_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Answers to the run's yes/no questions.
    pub decisions: Decisions,
    /// Ask on the terminal for every decision not enabled above.
    pub interactive: bool,
    /// Follow symbolic links during traversal.
    pub follow_symlinks: bool,
    /// Skip hidden files and directories.
    pub skip_hidden: bool,
    /// Gitignore-style patterns to exclude from the scan.
    pub ignore_patterns: Vec<String>,
    /// File name of the persisted index inside the index directory.
    pub index_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decisions: Decisions::default(),
            interactive: false,
            follow_symlinks: false,
            skip_hidden: false,
            ignore_patterns: Vec::new(),
            index_file_name: DEFAULT_INDEX_FILE_NAME.to_string(),
        }
    }
}

/// The yes/no decisions of a run. All default to "no".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Decisions {
    /// Seed the run with the index persisted by an earlier run.
    pub preload_index: bool,
    /// Delete one file of every verified duplicate pair.
    pub delete_duplicates: bool,
    /// Write `dupes.xspf` when duplicates are kept.
    pub write_duplicate_playlist: bool,
    /// List suspect pairs in the report.
    pub show_suspects: bool,
    /// Write `suspects.xspf`.
    pub write_suspect_playlist: bool,
    /// List empty files in the report.
    pub show_empty: bool,
    /// Delete files whose header read back as all zeros.
    pub delete_empty: bool,
    /// Save the index for the next run.
    pub persist_index: bool,
}

/// Names one field of [`Decisions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// [`Decisions::preload_index`]
    PreloadIndex,
    /// [`Decisions::delete_duplicates`]
    DeleteDuplicates,
    /// [`Decisions::write_duplicate_playlist`]
    WriteDuplicatePlaylist,
    /// [`Decisions::show_suspects`]
    ShowSuspects,
    /// [`Decisions::write_suspect_playlist`]
    WriteSuspectPlaylist,
    /// [`Decisions::show_empty`]
    ShowEmpty,
    /// [`Decisions::delete_empty`]
    DeleteEmpty,
    /// [`Decisions::persist_index`]
    PersistIndex,
}

impl Decision {
    /// Question asked when the decision is made interactively.
    #[must_use]
    pub fn question(self) -> &'static str {
        match self {
            Self::PreloadIndex => "Preload the persisted index?",
            Self::DeleteDuplicates => "Delete dupes?",
            Self::WriteDuplicatePlaylist => "Write Dupe Playlist?",
            Self::ShowSuspects => "Show suspects?",
            Self::WriteSuspectPlaylist => "Write Suspect Playlist?",
            Self::ShowEmpty => "Show empty files?",
            Self::DeleteEmpty => "Delete empty files?",
            Self::PersistIndex => "Persist the index?",
        }
    }
}

impl Decisions {
    /// Value of `decision`.
    #[must_use]
    pub fn get(&self, decision: Decision) -> bool {
        match decision {
            Decision::PreloadIndex => self.preload_index,
            Decision::DeleteDuplicates => self.delete_duplicates,
            Decision::WriteDuplicatePlaylist => self.write_duplicate_playlist,
            Decision::ShowSuspects => self.show_suspects,
            Decision::WriteSuspectPlaylist => self.write_suspect_playlist,
            Decision::ShowEmpty => self.show_empty,
            Decision::DeleteEmpty => self.delete_empty,
            Decision::PersistIndex => self.persist_index,
        }
    }

    /// Enable `decision`.
    pub fn enable(&mut self, decision: Decision) {
        let field = match decision {
            Decision::PreloadIndex => &mut self.preload_index,
            Decision::DeleteDuplicates => &mut self.delete_duplicates,
            Decision::WriteDuplicatePlaylist => &mut self.write_duplicate_playlist,
            Decision::ShowSuspects => &mut self.show_suspects,
            Decision::WriteSuspectPlaylist => &mut self.write_suspect_playlist,
            Decision::ShowEmpty => &mut self.show_empty,
            Decision::DeleteEmpty => &mut self.delete_empty,
            Decision::PersistIndex => &mut self.persist_index,
        };
        *field = true;
    }
}

impl Config {
    /// Load the configuration from defaults, the config file and the
    /// environment.
    ///
    /// `path` replaces the platform config file when given and must exist.
    /// A missing default config file is fine; a malformed one is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer cannot be parsed into a [`Config`].
    pub fn load(path: Option<&Path>) -> Result<Self, Box<figment::Error>> {
        if let Some(file) = path.filter(|p| !p.is_file()) {
            return Err(Box::new(figment::Error::from(format!(
                "configuration file not found: {}",
                file.display()
            ))));
        }
        Self::figment(path).extract().map_err(Box::new)
    }

    /// The layered provider stack used by [`Config::load`].
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        match path.map(Path::to_path_buf).or_else(Self::config_path) {
            Some(file) => {
                log::debug!("Reading configuration from {}", file.display());
                figment = figment.merge(Toml::file(file));
            }
            None => log::debug!("No configuration directory available"),
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Apply command-line flags on top of the loaded configuration.
    ///
    /// Flags only ever switch settings on.
    #[must_use]
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        for decision in cli.decisions() {
            self.decisions.enable(decision);
        }
        self.interactive |= cli.interactive;
        self.follow_symlinks |= cli.follow_symlinks;
        self.skip_hidden |= cli.skip_hidden;
        self.ignore_patterns.extend(cli.ignore_patterns.iter().cloned());
        self
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "scrunge").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .extract()
            .unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.index_file_name, "persist.scrunge");
        assert_eq!(config.decisions, Decisions::default());
    }

    #[test]
    fn test_toml_layer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
skip_hidden = true
ignore_patterns = ["*.part"]
index_file_name = "state.json"

[decisions]
persist_index = true
"#,
        )
        .unwrap();

        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(&path))
            .extract()
            .unwrap();

        assert!(config.skip_hidden);
        assert!(!config.follow_symlinks);
        assert_eq!(config.ignore_patterns, vec!["*.part".to_string()]);
        assert_eq!(config.index_file_name, "state.json");
        assert!(config.decisions.persist_index);
        assert!(!config.decisions.preload_index);
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "skip_hidden = \"perhaps\"").unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("configuration file not found"));
    }

    #[test]
    fn test_decision_get_and_enable() {
        let mut decisions = Decisions::default();
        decisions.enable(Decision::WriteSuspectPlaylist);

        assert!(decisions.get(Decision::WriteSuspectPlaylist));
        assert!(decisions.write_suspect_playlist);
        assert!(!decisions.get(Decision::WriteDuplicatePlaylist));
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "scrunge",
            "--delete-duplicates",
            "--skip-hidden",
            "--ignore",
            "*.nfo",
            "/media",
        ]);
        let base = Config {
            ignore_patterns: vec!["*.tmp".to_string()],
            ..Config::default()
        };
        let config = base.with_cli_overrides(&cli);

        assert!(config.decisions.delete_duplicates);
        assert!(!config.decisions.persist_index);
        assert!(config.skip_hidden);
        assert_eq!(config.ignore_patterns, vec!["*.tmp", "*.nfo"]);
    }
}

//! One run of the tool: configuration, scan, report and follow-up actions.
//!
//! [`run_app`] is what the binary calls. [`execute`] is the same pipeline
//! over caller-supplied streams and decisions, so that it can be driven
//! from tests.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::CommandFactory;

use crate::actions::{delete_resolved, BatchDeleteResult};
use crate::cli::{Cli, OutputFormat};
use crate::config::{Config, Decision};
use crate::duplicates::{
    Classification, ClassifiedPair, DuplicateFinder, DuplicateIndex, FinderConfig,
};
use crate::error::ExitCode;
use crate::index_store;
use crate::logging;
use crate::output::report::write_class;
use crate::output::{playlist_path, write_playlist, JsonOutput, TextReport};
use crate::progress::Progress;
use crate::prompt::{Decider, Prompter};
use crate::scanner::WalkerConfig;

/// Settings of one run after configuration layering.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory to scan
    pub root: PathBuf,
    /// Location of the persisted index
    pub index_path: PathBuf,
    /// Effective configuration
    pub config: Config,
    /// Report format
    pub output: OutputFormat,
    /// Draw progress bars on stderr
    pub show_progress: bool,
}

impl RunOptions {
    /// Options for scanning `root` with the index stored next to it.
    #[must_use]
    pub fn new(root: PathBuf, config: Config) -> Self {
        let index_path = root.join(&config.index_file_name);
        Self {
            root,
            index_path,
            config,
            output: OutputFormat::Text,
            show_progress: false,
        }
    }

    /// Store the index at `path` instead.
    #[must_use]
    pub fn with_index_path(mut self, path: PathBuf) -> Self {
        self.index_path = path;
        self
    }

    /// Set the report format.
    #[must_use]
    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }
}

/// Run the command line.
///
/// # Errors
///
/// Returns an error when the run terminates early: unreadable
/// configuration, a missing or invalid root, or a failed report, playlist
/// or index write.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    configure_color(cli.no_color);

    let Some(root) = cli.root.clone() else {
        Cli::command()
            .print_help()
            .context("Failed to print usage")?;
        return Ok(ExitCode::Success);
    };

    let config = Config::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_cli_overrides(&cli);
    log::debug!("Effective configuration: {config:?}");

    let index_path = cli.index_path(&root, &config.index_file_name);
    let interactive = config.interactive;
    let decisions = config.decisions;
    let mut options = RunOptions::new(root, config)
        .with_index_path(index_path)
        .with_output(cli.output);
    options.show_progress = !cli.quiet && cli.output == OutputFormat::Text;

    let mut decider = if interactive {
        Decider::interactive(
            decisions,
            Prompter::terminal(cli.output == OutputFormat::Json),
        )
    } else {
        Decider::non_interactive(decisions)
    };

    let code = execute(&options, &mut decider, &mut io::stdout())?;
    if cli.output == OutputFormat::Text && !cli.quiet {
        println!("ALL DONE!");
    }
    Ok(code)
}

/// Style output only when stdout is a colour-capable terminal.
fn configure_color(no_color: bool) {
    if no_color {
        yansi::disable();
    } else {
        yansi::whenever(yansi::Condition::TTY_AND_COLOR);
    }
}

/// Scan, report and act on the findings.
///
/// Follow-up decisions are only asked when they apply: duplicates are
/// either deleted or exported, suspect and empty lists only when non-empty,
/// and persisting the index comes last.
///
/// # Errors
///
/// Returns an error when the root cannot be scanned or an output file
/// cannot be written. Per-file read and delete failures are not errors;
/// they turn the exit code into [`ExitCode::PartialSuccess`].
pub fn execute<R, W, O>(
    options: &RunOptions,
    decider: &mut Decider<R, W>,
    out: &mut O,
) -> Result<ExitCode>
where
    R: BufRead,
    W: Write,
    O: Write,
{
    let root = std::path::absolute(&options.root)
        .with_context(|| format!("Failed to resolve {}", options.root.display()))?;
    let index_path = std::path::absolute(&options.index_path)
        .with_context(|| format!("Failed to resolve {}", options.index_path.display()))?;

    let index = if decider.decide(Decision::PreloadIndex)? {
        preload(&index_path)
    } else {
        DuplicateIndex::new()
    };

    let config = &options.config;
    let mut walker_config = WalkerConfig::new(
        config.follow_symlinks,
        config.skip_hidden,
        config.ignore_patterns.clone(),
    )
    .with_excluded(index_path.clone());
    for name in [Classification::Duplicate, Classification::Suspect]
        .into_iter()
        .filter_map(Classification::playlist_name)
    {
        walker_config = walker_config.with_excluded(playlist_path(&root, name));
    }

    let mut finder_config = FinderConfig::default().with_walker_config(walker_config);
    if options.show_progress {
        finder_config = finder_config.with_progress_callback(Rc::new(Progress::new(false)));
    }
    let outcome = DuplicateFinder::new(finder_config)
        .scan(&root, index)
        .with_context(|| format!("Failed to scan {}", root.display()))?;

    let exit_code = ExitCode::for_run(outcome.summary.has_errors(), !outcome.duplicates.is_empty());
    match options.output {
        OutputFormat::Text => TextReport::new(&outcome)
            .write_to(out)
            .context("Failed to write report")?,
        OutputFormat::Json => JsonOutput::new(&outcome, exit_code).write_to(out)?,
    }

    let mut delete_failures = 0;
    let mut deleted_any = false;

    if !outcome.duplicates.is_empty() {
        if decider.decide(Decision::DeleteDuplicates)? {
            let batch = delete_resolved(&outcome.duplicates);
            report_batch(out, options.output, &batch)?;
            delete_failures += batch.failure_count();
            deleted_any |= batch.success_count() > 0;
        } else if decider.decide(Decision::WriteDuplicatePlaylist)? {
            export(&root, Classification::Duplicate, &outcome.duplicates)?;
        }
    }

    if !outcome.suspects.is_empty() {
        if decider.decide(Decision::ShowSuspects)? {
            show(out, options.output, Classification::Suspect, &outcome.suspects)?;
        }
        if decider.decide(Decision::WriteSuspectPlaylist)? {
            export(&root, Classification::Suspect, &outcome.suspects)?;
        }
    }

    if !outcome.empties.is_empty() {
        if decider.decide(Decision::ShowEmpty)? {
            show(out, options.output, Classification::Empty, &outcome.empties)?;
        }
        if decider.decide(Decision::DeleteEmpty)? {
            let batch = delete_resolved(&outcome.deletable_empties());
            report_batch(out, options.output, &batch)?;
            delete_failures += batch.failure_count();
        }
    }

    if decider.decide(Decision::PersistIndex)? {
        let mut index = outcome.index;
        if deleted_any {
            let pruned = index.prune_missing();
            log::debug!("Dropped {pruned} deleted files from the index");
        }
        index_store::save(&index_path, &index, &root)
            .with_context(|| format!("Failed to persist index to {}", index_path.display()))?;
    }

    if delete_failures > 0 {
        log::warn!("{delete_failures} files could not be deleted");
        return Ok(ExitCode::PartialSuccess);
    }
    Ok(exit_code)
}

/// Load the persisted index, falling back to an empty one.
fn preload(path: &Path) -> DuplicateIndex {
    match index_store::load(path) {
        Ok(Some(index)) => index,
        Ok(None) => {
            log::info!(
                "Can't find the index file [{}], skipping preload",
                path.display()
            );
            DuplicateIndex::new()
        }
        Err(e) => {
            log::warn!("Discarding unusable index: {e}");
            DuplicateIndex::new()
        }
    }
}

fn show<O: Write>(
    out: &mut O,
    format: OutputFormat,
    class: Classification,
    pairs: &[ClassifiedPair],
) -> Result<()> {
    match format {
        OutputFormat::Text => write_class(out, class, pairs, true).context("Failed to write report"),
        OutputFormat::Json => {
            log::debug!("{} list already part of the JSON report", class.label());
            Ok(())
        }
    }
}

fn export(root: &Path, class: Classification, pairs: &[ClassifiedPair]) -> Result<()> {
    let name = class
        .playlist_name()
        .with_context(|| format!("No playlist for the {} list", class.label()))?;
    write_playlist(root, name, pairs)
        .with_context(|| format!("Failed to write {} playlist", class.label()))?;
    Ok(())
}

fn report_batch<O: Write>(out: &mut O, format: OutputFormat, batch: &BatchDeleteResult) -> Result<()> {
    for (path, error) in &batch.failures {
        log::warn!("Could not delete {}: {}", path.display(), error);
    }
    match format {
        OutputFormat::Text => writeln!(out, "{}", batch.summary()).context("Failed to write report"),
        OutputFormat::Json => {
            log::info!("{}", batch.summary());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Decisions;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    type TestDecider = Decider<Cursor<Vec<u8>>, Vec<u8>>;

    fn run(dir: &TempDir, decisions: Decisions) -> (ExitCode, String) {
        yansi::disable();
        let options = RunOptions::new(dir.path().to_path_buf(), Config::default());
        let mut decider: TestDecider = Decider::non_interactive(decisions);
        let mut out = Vec::new();
        let code = execute(&options, &mut decider, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_no_color_disables_styling() {
        configure_color(true);
        assert!(!yansi::is_enabled());
    }

    #[test]
    fn test_nothing_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("only.bin"), b"unique").unwrap();

        let (code, text) = run(&dir, Decisions::default());
        assert_eq!(code, ExitCode::NoDuplicates);
        assert!(text.contains("Processed 1 files"));
        assert!(text.contains("No DUPE files were found."));
    }

    #[test]
    fn test_delete_duplicates_keeps_one_copy() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.bin"), vec![0xFF; 1500]).unwrap();
        fs::write(dir.path().join("b.bin"), vec![0xFF; 1500]).unwrap();

        let decisions = Decisions {
            delete_duplicates: true,
            ..Decisions::default()
        };
        let (code, text) = run(&dir, decisions);

        assert_eq!(code, ExitCode::Success);
        assert!(text.contains("Deleted 1 file(s)"));
        let left = [dir.path().join("a.bin"), dir.path().join("b.bin")]
            .iter()
            .filter(|p| p.exists())
            .count();
        assert_eq!(left, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_delete_empty_keeps_unreadable_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let zeros = dir.path().join("zeros.bin");
        let locked = dir.path().join("locked.bin");
        fs::write(&zeros, vec![0u8; 2048]).unwrap();
        fs::write(&locked, vec![0x42; 4096]).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read(&locked).is_ok() {
            // Privileged users read through mode 000.
            return;
        }

        let decisions = Decisions {
            delete_empty: true,
            ..Decisions::default()
        };
        let (code, text) = run(&dir, decisions);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        assert_eq!(code, ExitCode::PartialSuccess);
        assert!(text.contains("Found 2 files in EMPTY list"));
        assert!(text.contains("Deleted 1 file(s)"));
        assert!(!zeros.exists());
        assert_eq!(fs::read(&locked).unwrap(), vec![0x42; 4096]);
    }

    #[test]
    fn test_playlist_only_when_not_deleting() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.bin"), vec![7u8; 3000]).unwrap();
        fs::write(dir.path().join("b.bin"), vec![7u8; 3000]).unwrap();

        let decisions = Decisions {
            write_duplicate_playlist: true,
            ..Decisions::default()
        };
        run(&dir, decisions);
        assert!(dir.path().join("dupes.xspf").exists());

        fs::remove_file(dir.path().join("dupes.xspf")).unwrap();
        let decisions = Decisions {
            delete_duplicates: true,
            write_duplicate_playlist: true,
            ..Decisions::default()
        };
        run(&dir, decisions);
        assert!(!dir.path().join("dupes.xspf").exists());
    }

    #[test]
    fn test_persist_and_preload() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("one.bin"), vec![3u8; 2048]).unwrap();

        let persist = Decisions {
            persist_index: true,
            ..Decisions::default()
        };
        run(&dir, persist);
        assert!(dir.path().join("persist.scrunge").exists());

        // Rescanning with the preloaded index: the index file itself is not
        // scanned and the same path does not pair with itself.
        let preload = Decisions {
            preload_index: true,
            ..Decisions::default()
        };
        let (code, text) = run(&dir, preload);
        assert_eq!(code, ExitCode::NoDuplicates);
        assert!(text.contains("Processed 1 files"));
    }

    #[test]
    fn test_corrupt_index_is_discarded() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("persist.scrunge"), b"garbage").unwrap();
        fs::write(dir.path().join("one.bin"), b"data").unwrap();

        let decisions = Decisions {
            preload_index: true,
            ..Decisions::default()
        };
        let (code, _) = run(&dir, decisions);
        assert_eq!(code, ExitCode::NoDuplicates);
    }

    #[test]
    fn test_interactive_answers() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.bin"), vec![1u8; 4096]).unwrap();
        fs::write(dir.path().join("b.bin"), vec![1u8; 4096]).unwrap();
        fs::write(dir.path().join("empty.bin"), b"").unwrap();

        // preload? no; delete dupes? no; dupe playlist? yes;
        // show empty? yes; delete empty? yes; persist? no
        let answers = "no\nno\nyes\nyes\nyes\nno\n";
        let prompter = Prompter::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new());
        let mut decider = Decider::interactive(Decisions::default(), prompter);
        let options = RunOptions::new(dir.path().to_path_buf(), Config::default());

        yansi::disable();
        let mut out = Vec::new();
        let code = execute(&options, &mut decider, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(code, ExitCode::Success);
        assert!(dir.path().join("dupes.xspf").exists());
        assert!(!dir.path().join("empty.bin").exists());
        assert!(text.contains("EMPTY DETAILS"));
        assert!(!dir.path().join("persist.scrunge").exists());
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = TempDir::new().unwrap();
        let options = RunOptions::new(dir.path().join("absent"), Config::default());
        let mut decider: TestDecider = Decider::non_interactive(Decisions::default());

        let err = execute(&options, &mut decider, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("Failed to scan"));
    }

    #[test]
    fn test_json_report() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.bin"), vec![9u8; 100]).unwrap();
        fs::write(dir.path().join("b.bin"), vec![9u8; 100]).unwrap();

        let options = RunOptions::new(dir.path().to_path_buf(), Config::default())
            .with_output(OutputFormat::Json);
        let mut decider: TestDecider = Decider::non_interactive(Decisions::default());
        let mut out = Vec::new();
        execute(&options, &mut decider, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["duplicates"].as_array().unwrap().len(), 1);
    }
}

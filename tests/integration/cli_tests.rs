use clap::Parser;
use scrunge::cli::{Cli, OutputFormat};
use scrunge::config::{Config, Decision};
use std::path::{Path, PathBuf};

#[test]
fn test_usage_without_root() {
    let cli = Cli::try_parse_from(["scrunge"]).unwrap();
    assert!(cli.root.is_none());
    // run_app prints usage and exits successfully without scanning
    let code = scrunge::run_app(cli).unwrap();
    assert_eq!(code, scrunge::error::ExitCode::Success);
}

#[test]
fn test_flags_become_decisions() {
    let cli = Cli::try_parse_from([
        "scrunge",
        "--show-suspects",
        "--persist-index",
        "-o",
        "json",
        "/media",
    ])
    .unwrap();

    assert_eq!(
        cli.decisions(),
        vec![Decision::ShowSuspects, Decision::PersistIndex]
    );
    assert_eq!(cli.output, OutputFormat::Json);

    let config = Config::default().with_cli_overrides(&cli);
    assert!(config.decisions.show_suspects);
    assert!(config.decisions.persist_index);
    assert!(!config.decisions.preload_index);
}

#[test]
fn test_index_dir_argument() {
    let cli = Cli::try_parse_from(["scrunge", "/media", "/var/lib/scrunge"]).unwrap();
    assert_eq!(
        cli.index_path(Path::new("/media"), "persist.scrunge"),
        PathBuf::from("/var/lib/scrunge/persist.scrunge")
    );
}

#[test]
fn test_unknown_flag_rejected() {
    assert!(Cli::try_parse_from(["scrunge", "--paranoid", "/media"]).is_err());
}

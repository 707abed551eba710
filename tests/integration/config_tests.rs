use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use scrunge::config::{Config, Decisions};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config.decisions, Decisions::default());
    assert_eq!(config.index_file_name, "persist.scrunge");
    assert!(!config.interactive);
}

#[test]
fn test_config_load_from_env() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("SCRUNGE_SKIP_HIDDEN", "true");
        jail.set_env("SCRUNGE_DECISIONS__PERSIST_INDEX", "true");

        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("SCRUNGE_").split("__"))
            .extract()?;

        assert!(config.skip_hidden);
        assert!(config.decisions.persist_index);
        assert!(!config.decisions.delete_duplicates);
        Ok(())
    });
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
interactive = true
follow_symlinks = true

[decisions]
preload_index = true
write_suspect_playlist = true
"#,
    )
    .unwrap();

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract()
        .unwrap();

    assert!(config.interactive);
    assert!(config.follow_symlinks);
    assert!(config.decisions.preload_index);
    assert!(config.decisions.write_suspect_playlist);
    assert!(!config.decisions.show_empty);
}

#[test]
fn test_env_overrides_file() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("config.toml", "index_file_name = \"from-file.scrunge\"")?;
        jail.set_env("SCRUNGE_INDEX_FILE_NAME", "from-env.scrunge");

        let config = Config::load(Some(std::path::Path::new("config.toml")))
            .map_err(|e| *e)?;
        assert_eq!(config.index_file_name, "from-env.scrunge");
        Ok(())
    });
}

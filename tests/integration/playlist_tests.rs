use scrunge::duplicates::{DuplicateFinder, DuplicateIndex};
use scrunge::output::write_playlist;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_duplicate_playlist_from_scan() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mkv"), vec![8u8; 4000]).unwrap();
    fs::write(dir.path().join("b.mkv"), vec![8u8; 4000]).unwrap();

    let outcome = DuplicateFinder::with_defaults()
        .scan(dir.path(), DuplicateIndex::new())
        .unwrap();
    let written = write_playlist(dir.path(), "dupes", &outcome.duplicates).unwrap();

    let xml = fs::read_to_string(written).unwrap();
    assert_eq!(xml.matches("<track>").count(), 2);
    assert!(xml.contains("<vlc:id>0</vlc:id>"));
    assert!(xml.contains("<vlc:id>1</vlc:id>"));
    assert!(xml.contains("a.mkv</location>"));
    assert!(xml.contains("b.mkv</location>"));
    assert!(xml.contains("<location>file:///"));
}

#[test]
fn test_playlist_not_rescanned() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mkv"), vec![8u8; 4000]).unwrap();
    fs::write(dir.path().join("b.mkv"), vec![8u8; 4000]).unwrap();

    // A playlist left by an earlier run
    write_playlist(dir.path(), "dupes", &[]).unwrap();
    let excluded = scrunge::scanner::WalkerConfig::default()
        .with_excluded(std::path::absolute(dir.path().join("dupes.xspf")).unwrap());
    let config = scrunge::duplicates::FinderConfig::default().with_walker_config(excluded);

    let outcome = DuplicateFinder::new(config)
        .scan(dir.path(), DuplicateIndex::new())
        .unwrap();
    assert_eq!(outcome.summary.files_processed, 2);
}

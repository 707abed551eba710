use scrunge::duplicates::{Classification, DuplicateFinder, DuplicateIndex, FinderConfig};
use scrunge::scanner::WalkerConfig;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn names(pairs: &[scrunge::duplicates::ClassifiedPair]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|p| {
            (
                p.first.path.file_name().unwrap().to_string_lossy().into_owned(),
                p.second.path.file_name().unwrap().to_string_lossy().into_owned(),
            )
        })
        .collect()
}

fn scan(root: &Path) -> scrunge::duplicates::ScanOutcome {
    DuplicateFinder::with_defaults()
        .scan(root, DuplicateIndex::new())
        .unwrap()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let outcome = scan(dir.path());

    assert!(outcome.is_clean());
    assert_eq!(outcome.summary.files_processed, 0);
    assert!(outcome.index.is_empty());
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"content a").unwrap();
    fs::write(dir.path().join("b.txt"), b"content b").unwrap();
    fs::write(dir.path().join("c.txt"), b"content c").unwrap();

    let outcome = scan(dir.path());

    assert!(outcome.is_clean());
    assert_eq!(outcome.summary.files_processed, 3);
    assert_eq!(outcome.index.len(), 3);
}

#[test]
fn test_names_and_sizes_are_irrelevant() {
    let dir = tempdir().unwrap();
    // Same first window and same middle window of the first file's length
    fs::write(dir.path().join("movie.mkv"), vec![0x42u8; 4096]).unwrap();
    fs::write(dir.path().join("copy of movie.avi"), vec![0x42u8; 4096]).unwrap();

    let outcome = scan(dir.path());
    assert_eq!(outcome.duplicates.len(), 1);
}

#[test]
fn test_duplicates_across_subdirectories() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a/deep")).unwrap();
    fs::create_dir(dir.path().join("b")).unwrap();
    fs::write(dir.path().join("a/deep/x.bin"), vec![5u8; 3000]).unwrap();
    fs::write(dir.path().join("b/x.bin"), vec![5u8; 3000]).unwrap();
    fs::write(dir.path().join("top.bin"), vec![5u8; 3000]).unwrap();

    let outcome = scan(dir.path());

    // Files of a directory come before its subdirectories, so top.bin is canonical
    assert_eq!(
        names(&outcome.duplicates),
        vec![
            ("top.bin".to_string(), "x.bin".to_string()),
            ("top.bin".to_string(), "x.bin".to_string()),
        ]
    );
    assert!(outcome.duplicates[0].second.path.starts_with(dir.path().join("a")));
    assert!(outcome.duplicates[1].second.path.starts_with(dir.path().join("b")));
}

#[test]
fn test_ignore_patterns_and_hidden() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("keep.bin"), vec![1u8; 2048]).unwrap();
    fs::write(dir.path().join("skip.tmp"), vec![1u8; 2048]).unwrap();
    fs::write(dir.path().join(".hidden.bin"), vec![1u8; 2048]).unwrap();

    let config = FinderConfig::default().with_walker_config(WalkerConfig::new(
        false,
        true,
        vec!["*.tmp".to_string()],
    ));
    let outcome = DuplicateFinder::new(config)
        .scan(dir.path(), DuplicateIndex::new())
        .unwrap();

    assert_eq!(outcome.summary.files_processed, 1);
    assert!(outcome.duplicates.is_empty());
}

#[test]
fn test_rescan_reproduces_lists() {
    let dir = tempdir().unwrap();
    for (name, byte, len) in [
        ("a.bin", 1u8, 5000usize),
        ("b.bin", 1, 5000),
        ("c.bin", 2, 2000),
        ("d.bin", 2, 2000),
        ("e.bin", 0, 10),
        ("f.bin", 3, 700),
    ] {
        fs::write(dir.path().join(name), vec![byte; len]).unwrap();
    }

    let first = scan(dir.path());
    let second = scan(dir.path());

    for class in [
        Classification::Duplicate,
        Classification::Suspect,
        Classification::Empty,
    ] {
        assert_eq!(names(first.pairs(class)), names(second.pairs(class)));
    }
    assert_eq!(first.duplicates.len(), 2);
    assert_eq!(first.empties.len(), 1);
}

#[test]
fn test_unreadable_root_is_error() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, b"x").unwrap();

    assert!(DuplicateFinder::with_defaults()
        .scan(&file, DuplicateIndex::new())
        .is_err());
}

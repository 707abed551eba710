use scrunge::duplicates::{DuplicateFinder, DuplicateIndex};
use scrunge::index_store::{self, IndexStoreError};
use scrunge::scanner::fingerprint;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_scan_persist_preload_cycle() {
    let dir = tempdir().unwrap();
    let media = dir.path().join("media");
    fs::create_dir(&media).unwrap();
    fs::write(media.join("file1"), vec![0x11u8; 3000]).unwrap();

    let first = DuplicateFinder::with_defaults()
        .scan(&media, DuplicateIndex::new())
        .unwrap();
    let index_path = dir.path().join("state").join("persist.scrunge");
    index_store::save(&index_path, &first.index, &media).unwrap();

    // New copy arrives between runs
    fs::write(media.join("file2"), vec![0x11u8; 3000]).unwrap();

    let preloaded = index_store::load(&index_path).unwrap().unwrap();
    assert_eq!(preloaded.len(), 1);

    let second = DuplicateFinder::with_defaults()
        .scan(&media, preloaded)
        .unwrap();

    assert_eq!(second.summary.preloaded_entries, 1);
    assert_eq!(second.duplicates.len(), 1);
    let pair = &second.duplicates[0];
    assert!(pair.first.path.ends_with("file1"));
    assert!(pair.second.path.ends_with("file2"));
}

#[test]
fn test_fingerprints_survive_persistence() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("x.bin");
    fs::write(&file, b"some header bytes").unwrap();

    let outcome = DuplicateFinder::with_defaults()
        .scan(dir.path(), DuplicateIndex::new())
        .unwrap();
    let path = dir.path().join("persist.scrunge");
    index_store::save(&path, &outcome.index, dir.path()).unwrap();

    let loaded = index_store::load(&path).unwrap().unwrap();
    let record = loaded.get(fingerprint(&file, 0)).unwrap();
    assert!(record.path.ends_with("x.bin"));
    assert_eq!(record.size, 17);
}

#[test]
fn test_missing_index_is_no_prior_state() {
    let dir = tempdir().unwrap();
    assert!(index_store::load(&dir.path().join("nothing.scrunge"))
        .unwrap()
        .is_none());
}

#[test]
fn test_truncated_index_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("persist.scrunge");
    index_store::save(&path, &DuplicateIndex::new(), dir.path()).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    fs::write(&path, &content[..content.len() / 2]).unwrap();

    assert!(matches!(
        index_store::load(&path),
        Err(IndexStoreError::Parse { .. })
    ));
}

use scrunge::actions::{delete_resolved, delete_resolved_by, resolve, resolve_by};
use scrunge::duplicates::{ClassifiedPair, DuplicateFinder, DuplicateIndex};
use scrunge::scanner::FileRecord;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

#[test]
fn test_resolve_picks_a_member_of_the_pair() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.bin"), vec![0xFFu8; 1500]).unwrap();
    fs::write(dir.path().join("b.bin"), vec![0xFFu8; 1500]).unwrap();

    let outcome = DuplicateFinder::with_defaults()
        .scan(dir.path(), DuplicateIndex::new())
        .unwrap();
    let pair = &outcome.duplicates[0];
    let target = resolve(pair);

    assert!(target == &pair.first || target == &pair.second);
}

#[test]
fn test_later_creation_time_is_deleted() {
    let dir = tempdir().unwrap();
    let older = dir.path().join("older.bin");
    let newer = dir.path().join("newer.bin");
    fs::write(&older, b"same").unwrap();
    fs::write(&newer, b"same").unwrap();

    let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
    let times: HashMap<PathBuf, SystemTime> = [
        (older.clone(), base),
        (newer.clone(), base + Duration::from_secs(60)),
    ]
    .into_iter()
    .collect();
    let created = |r: &FileRecord| -> io::Result<SystemTime> {
        times
            .get(&r.path)
            .copied()
            .ok_or_else(|| io::Error::other("no time"))
    };

    // Canonical file is the newer one; it is still the one that goes
    let pair = ClassifiedPair::duplicate(
        FileRecord::new(newer.clone(), 4),
        FileRecord::new(older.clone(), 4),
    );
    assert_eq!(resolve_by(&pair, created).path, newer);

    let batch = delete_resolved_by(&[pair], created);
    assert_eq!(batch.success_count(), 1);
    assert!(!newer.exists());
    assert!(older.exists());
}

#[test]
fn test_chain_of_copies_keeps_one() {
    let dir = tempdir().unwrap();
    for name in ["a.bin", "b.bin", "c.bin", "d.bin"] {
        fs::write(dir.path().join(name), vec![0x33u8; 2500]).unwrap();
    }

    let outcome = DuplicateFinder::with_defaults()
        .scan(dir.path(), DuplicateIndex::new())
        .unwrap();
    assert_eq!(outcome.duplicates.len(), 3);

    let batch = delete_resolved(&outcome.duplicates);
    assert!(batch.all_succeeded());

    let remaining = fs::read_dir(dir.path()).unwrap().count();
    assert!(remaining >= 1);
    assert_eq!(remaining + batch.success_count(), 4);
}

#[test]
fn test_empty_files_are_deleted_themselves() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("empty.bin"), b"").unwrap();
    fs::write(dir.path().join("zeros.bin"), vec![0u8; 1024]).unwrap();
    fs::write(dir.path().join("data.bin"), b"data").unwrap();

    let outcome = DuplicateFinder::with_defaults()
        .scan(dir.path(), DuplicateIndex::new())
        .unwrap();
    let batch = delete_resolved(&outcome.empties);

    assert_eq!(batch.success_count(), 2);
    assert_eq!(batch.bytes_freed, 1024);
    assert!(dir.path().join("data.bin").exists());
}

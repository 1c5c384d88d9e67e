//! End-to-end export -> import -> rollback behavior against in-memory hosts.

use std::path::Path;

use favsync_lib::{
    FavSyncError, HostConnector, HostIdentity, ImportStatus, InMemoryConnector, JournalFile,
    MemorySink, export_favorites, import_favorites, rollback,
};
use tempfile::TempDir;

const SOURCE: &str = "favorites.json";

fn source_host() -> InMemoryConnector {
    InMemoryConnector::new()
        .with_favorite("Inbox", "\\\\ana@corp\\Inbox")
        .with_favorite("Clients", "\\\\ana@corp\\Inbox\\Clients")
        .with_favorite("Team", "\\\\Public Folders\\Team")
}

/// A host that can resolve every folder `source_host` exports, with no favorites.
fn empty_target() -> InMemoryConnector {
    InMemoryConnector::new()
        .with_folder("Inbox", "\\\\ana@corp\\Inbox")
        .with_folder("Clients", "\\\\ana@corp\\Inbox\\Clients")
        .with_folder("Team", "\\\\Public Folders\\Team")
}

fn identity() -> HostIdentity {
    HostIdentity::new("WS-TARGET", "ana")
}

fn journal(dir: &TempDir) -> JournalFile {
    JournalFile::new(dir.path().join(".favsync").join("rollback-journal.json"))
}

#[test]
fn clean_import_adds_everything_and_journals_it() {
    let dir = TempDir::new().unwrap();
    let journal = journal(&dir);
    let artifact =
        export_favorites(&source_host(), &HostIdentity::new("WS-SRC", "ana"), &MemorySink::new())
            .unwrap();
    let mut target = empty_target();

    let report = import_favorites(
        &artifact,
        Path::new(SOURCE),
        &mut target,
        &identity(),
        &journal,
        &MemorySink::new(),
    )
    .unwrap();

    assert_eq!(report.added_count(), 3);
    assert_eq!(report.skipped_count(), 0);
    assert_eq!(report.failed_count(), 0);
    assert!(report.journal_written);
    assert_eq!(journal.load().unwrap().added_entries.len(), 3);
    assert_eq!(
        target.favorite_paths(),
        vec![
            "\\\\ana@corp\\Inbox",
            "\\\\ana@corp\\Inbox\\Clients",
            "\\\\Public Folders\\Team"
        ]
    );
}

#[test]
fn existing_path_is_skipped_and_not_journaled() {
    let dir = TempDir::new().unwrap();
    let journal = journal(&dir);
    let artifact =
        export_favorites(&source_host(), &identity(), &MemorySink::new()).unwrap();
    let mut target = InMemoryConnector::new()
        .with_favorite("Inbox", "\\\\ana@corp\\Inbox")
        .with_folder("Clients", "\\\\ana@corp\\Inbox\\Clients")
        .with_folder("Team", "\\\\Public Folders\\Team");

    let report = import_favorites(
        &artifact,
        Path::new(SOURCE),
        &mut target,
        &identity(),
        &journal,
        &MemorySink::new(),
    )
    .unwrap();

    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.skipped()[0].path, "\\\\ana@corp\\Inbox");
    assert_eq!(report.added_count(), 2);
    let journaled: Vec<String> = journal
        .load()
        .unwrap()
        .added_entries
        .into_iter()
        .map(|e| e.path)
        .collect();
    assert!(!journaled.contains(&"\\\\ana@corp\\Inbox".to_string()));
    assert_eq!(journaled.len(), 2);
}

#[test]
fn same_path_twice_is_checked_against_pre_import_snapshot() {
    let dir = TempDir::new().unwrap();
    let journal = journal(&dir);
    let mut artifact =
        export_favorites(&source_host(), &identity(), &MemorySink::new()).unwrap();
    let mut repeat = artifact.entries[0].clone();
    repeat.name = "Inbox (again)".to_string();
    repeat.position = 4;
    artifact.entries.push(repeat);
    artifact.count = artifact.entries.len();
    let mut target = empty_target();

    let report = import_favorites(
        &artifact,
        Path::new(SOURCE),
        &mut target,
        &identity(),
        &journal,
        &MemorySink::new(),
    )
    .unwrap();

    // The second occurrence is not auto-skipped: it reaches the host, which
    // rejects a folder that is already a favorite.
    assert!(matches!(
        report.outcomes[0].status,
        ImportStatus::Added { .. }
    ));
    assert!(matches!(
        &report.outcomes[3].status,
        ImportStatus::Failed { reason } if reason.contains("already in favorites")
    ));
    assert_eq!(report.skipped_count(), 0);
    assert_eq!(report.added_count(), 3);
    assert_eq!(journal.load().unwrap().added_entries.len(), 3);
}

#[test]
fn full_rollback_restores_empty_set_and_consumes_journal() {
    let dir = TempDir::new().unwrap();
    let journal = journal(&dir);
    let artifact =
        export_favorites(&source_host(), &identity(), &MemorySink::new()).unwrap();
    let mut target = empty_target();
    import_favorites(
        &artifact,
        Path::new(SOURCE),
        &mut target,
        &identity(),
        &journal,
        &MemorySink::new(),
    )
    .unwrap();

    let report = rollback(&mut target, &journal, &MemorySink::new()).unwrap();
    assert_eq!(report.removed_count(), 3);
    assert_eq!(report.not_found_count(), 0);
    assert!(target.list_favorites().unwrap().is_empty());
    assert!(!journal.exists());
}

#[test]
fn manual_removal_before_rollback_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let journal = journal(&dir);
    let artifact =
        export_favorites(&source_host(), &identity(), &MemorySink::new()).unwrap();
    let mut target = empty_target();
    import_favorites(
        &artifact,
        Path::new(SOURCE),
        &mut target,
        &identity(),
        &journal,
        &MemorySink::new(),
    )
    .unwrap();
    assert!(target.remove_favorite("\\\\ana@corp\\Inbox\\Clients").unwrap());

    let report = rollback(&mut target, &journal, &MemorySink::new()).unwrap();
    assert_eq!(report.removed_count(), 2);
    assert_eq!(report.not_found_count(), 1);
    assert!(!journal.exists());
}

#[test]
fn rollback_without_journal_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let journal = journal(&dir);
    let mut target = source_host();
    let before = target.favorite_paths();

    let err = rollback(&mut target, &journal, &MemorySink::new()).unwrap_err();
    assert!(matches!(err, FavSyncError::NoJournal(_)));
    assert!(err.is_precondition());
    assert_eq!(target.favorite_paths(), before);
}

#[test]
fn second_import_overwrites_journal() {
    let dir = TempDir::new().unwrap();
    let journal = journal(&dir);
    let artifact =
        export_favorites(&source_host(), &identity(), &MemorySink::new()).unwrap();
    let mut target = empty_target();

    import_favorites(
        &artifact,
        Path::new(SOURCE),
        &mut target,
        &identity(),
        &journal,
        &MemorySink::new(),
    )
    .unwrap();
    // Everything is a duplicate now, so the new journal is empty.
    let report = import_favorites(
        &artifact,
        Path::new(SOURCE),
        &mut target,
        &identity(),
        &journal,
        &MemorySink::new(),
    )
    .unwrap();
    assert_eq!(report.skipped_count(), 3);
    assert!(journal.load().unwrap().added_entries.is_empty());

    let undo = rollback(&mut target, &journal, &MemorySink::new()).unwrap();
    assert_eq!(undo.removed_count(), 0);
    assert_eq!(target.favorite_paths().len(), 3);
}

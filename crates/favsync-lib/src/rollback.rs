//! Rollback engine: undo the favorites added by the most recent import.
//!
//! The journal is consumed: once every entry has been processed it is
//! deleted, whatever the individual outcomes were.

use serde::Serialize;

use crate::artifact::JournalFile;
use crate::connector::HostConnector;
use crate::error::Result;
use crate::events::EventSink;
use crate::model::JournalEntry;

/// How a journaled entry was handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RollbackStatus {
    Removed,
    /// Already gone from the favorites, e.g. removed by hand.
    NotFound,
    /// The host errored on this removal.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollbackOutcome {
    pub entry: JournalEntry,
    pub status: RollbackStatus,
}

/// Result of a rollback run. Outcomes are in journal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackReport {
    pub source_artifact_path: String,
    pub outcomes: Vec<RollbackOutcome>,
    pub journal_deleted: bool,
}

impl RollbackReport {
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.count(|s| matches!(s, RollbackStatus::Removed))
    }

    #[must_use]
    pub fn not_found_count(&self) -> usize {
        self.count(|s| matches!(s, RollbackStatus::NotFound))
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, RollbackStatus::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&RollbackStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Remove every journaled favorite that is still present, then delete the
/// journal.
///
/// # Errors
///
/// Returns `NoJournal` if there is nothing to roll back, `ArtifactCorrupt`
/// if the journal cannot be parsed, or `ConnectorUnavailable` if the host
/// cannot be read. In all three cases nothing is modified.
pub fn rollback<C>(
    connector: &mut C,
    journal: &JournalFile,
    sink: &dyn EventSink,
) -> Result<RollbackReport>
where
    C: HostConnector + ?Sized,
{
    let record = journal.load().inspect_err(|e| sink.error(&e.to_string()))?;
    sink.info(&format!(
        "Rolling back import of {} from {} ({} entries)",
        record.source_artifact_path,
        record.import_date.to_rfc3339(),
        record.added_entries.len()
    ));

    let mut outcomes = Vec::with_capacity(record.added_entries.len());
    if record.added_entries.is_empty() {
        sink.info("Journal is empty; no favorites to remove");
    } else {
        connector.list_favorites().inspect_err(|e| {
            sink.error(&format!("Cannot read current favorites: {e}"));
        })?;

        for entry in record.added_entries {
            let status = match connector.remove_favorite(&entry.path) {
                Ok(true) => {
                    sink.success(&format!("Removed: {} ({})", entry.name, entry.path));
                    RollbackStatus::Removed
                }
                Ok(false) => {
                    sink.info(&format!(
                        "Not found (already removed?): {} ({})",
                        entry.name, entry.path
                    ));
                    RollbackStatus::NotFound
                }
                Err(e) => {
                    sink.error(&format!("Failed: {} ({}): {e}", entry.name, entry.path));
                    RollbackStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            outcomes.push(RollbackOutcome { entry, status });
        }
    }

    let journal_deleted = match journal.delete() {
        Ok(()) => true,
        Err(e) => {
            sink.warn(&format!(
                "Could not delete rollback journal {}: {e}",
                journal.path().display()
            ));
            false
        }
    };

    let report = RollbackReport {
        source_artifact_path: record.source_artifact_path,
        outcomes,
        journal_deleted,
    };
    let mut summary = format!(
        "Rollback complete: {} removed, {} not found",
        report.removed_count(),
        report.not_found_count()
    );
    if report.failed_count() == 0 {
        sink.success(&summary);
    } else {
        summary.push_str(&format!(", {} failed", report.failed_count()));
        sink.warn(&summary);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::InMemoryConnector;
    use crate::error::FavSyncError;
    use crate::events::{EventLevel, MemorySink};
    use crate::model::{FolderHandle, NavEntry, RollbackJournal, SCHEMA_VERSION};
    use chrono::Utc;

    fn journal_with(dir: &std::path::Path, paths: &[&str]) -> JournalFile {
        let journal = JournalFile::new(dir.join("journal.json"));
        journal
            .save(&RollbackJournal {
                schema_version: SCHEMA_VERSION.to_string(),
                import_date: Utc::now(),
                source_artifact_path: "fav.json".to_string(),
                host_id: "WS-02".to_string(),
                added_entries: paths
                    .iter()
                    .map(|p| JournalEntry {
                        name: (*p).trim_start_matches('\\').to_string(),
                        path: (*p).to_string(),
                        imported_at: Utc::now(),
                    })
                    .collect(),
            })
            .unwrap();
        journal
    }

    #[test]
    fn empty_journal_is_a_noop_without_touching_host() {
        let dir = tempfile::tempdir().unwrap();
        let journal = journal_with(dir.path(), &[]);
        let mut host = InMemoryConnector::new();
        host.set_offline(true);

        let report = rollback(&mut host, &journal, &MemorySink::new()).unwrap();
        assert_eq!(report.removed_count(), 0);
        assert_eq!(report.not_found_count(), 0);
        assert!(report.journal_deleted);
        assert!(!journal.exists());
    }

    #[test]
    fn unreachable_host_keeps_journal() {
        let dir = tempfile::tempdir().unwrap();
        let journal = journal_with(dir.path(), &["\\\\a"]);
        let mut host = InMemoryConnector::new().with_favorite("a", "\\\\a");
        host.set_offline(true);

        let err = rollback(&mut host, &journal, &MemorySink::new()).unwrap_err();
        assert!(matches!(err, FavSyncError::ConnectorUnavailable { .. }));
        assert!(journal.exists());
    }

    #[test]
    fn only_journaled_paths_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        let journal = journal_with(dir.path(), &["\\\\b", "\\\\gone"]);
        let mut host = InMemoryConnector::new()
            .with_favorite("a", "\\\\a")
            .with_favorite("b", "\\\\b");

        let report = rollback(&mut host, &journal, &MemorySink::new()).unwrap();
        assert_eq!(report.removed_count(), 1);
        assert_eq!(report.not_found_count(), 1);
        assert_eq!(report.outcomes[1].status, RollbackStatus::NotFound);
        assert_eq!(host.favorite_paths(), vec!["\\\\a"]);
    }

    #[test]
    fn removal_error_is_recorded_and_run_continues() {
        let dir = tempfile::tempdir().unwrap();
        let journal = journal_with(dir.path(), &["\\\\a", "\\\\b", "\\\\c"]);
        let mut host = InMemoryConnector::new()
            .with_favorite("a", "\\\\a")
            .with_favorite("b", "\\\\b")
            .with_favorite("c", "\\\\c");
        host.reject_remove("\\\\b");
        let sink = MemorySink::new();

        let report = rollback(&mut host, &journal, &sink).unwrap();
        assert_eq!(report.removed_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert!(matches!(
            report.outcomes[1].status,
            RollbackStatus::Failed { .. }
        ));
        assert_eq!(host.favorite_paths(), vec!["\\\\b"]);
        assert!(report.journal_deleted);
        assert!(!journal.exists());

        let warnings = sink.messages(EventLevel::Warn);
        assert!(warnings.iter().any(|m| m.contains("1 failed")));
        assert!(
            sink.messages(EventLevel::Success)
                .iter()
                .all(|m| !m.starts_with("Rollback complete"))
        );
    }

    /// Connector that turns the journal into a directory while removing, so
    /// the journal can no longer be deleted.
    struct JournalBlockingHost {
        inner: InMemoryConnector,
        journal: std::path::PathBuf,
    }

    impl HostConnector for JournalBlockingHost {
        fn list_favorites(&self) -> Result<Vec<NavEntry>> {
            self.inner.list_favorites()
        }

        fn resolve_path(&self, path: &str) -> Result<FolderHandle> {
            self.inner.resolve_path(path)
        }

        fn add_favorite(&mut self, handle: &FolderHandle) -> Result<()> {
            self.inner.add_favorite(handle)
        }

        fn remove_favorite(&mut self, path: &str) -> Result<bool> {
            std::fs::remove_file(&self.journal)?;
            std::fs::create_dir_all(self.journal.join("occupied"))?;
            self.inner.remove_favorite(path)
        }
    }

    #[test]
    fn undeletable_journal_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let journal = journal_with(dir.path(), &["\\\\a"]);
        let mut host = JournalBlockingHost {
            inner: InMemoryConnector::new().with_favorite("a", "\\\\a"),
            journal: journal.path().to_path_buf(),
        };
        let sink = MemorySink::new();

        let report = rollback(&mut host, &journal, &sink).unwrap();
        assert_eq!(report.removed_count(), 1);
        assert!(!report.journal_deleted);
        assert!(
            sink.messages(EventLevel::Warn)
                .iter()
                .any(|m| m.contains("Could not delete rollback journal"))
        );
    }

    #[test]
    fn corrupt_journal_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let journal = JournalFile::new(dir.path().join("journal.json"));
        std::fs::write(journal.path(), "not json").unwrap();
        let mut host = InMemoryConnector::new();

        let err = rollback(&mut host, &journal, &MemorySink::new()).unwrap_err();
        assert!(matches!(err, FavSyncError::ArtifactCorrupt { .. }));
        assert!(journal.exists());
    }
}

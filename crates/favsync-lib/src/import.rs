//! Importer: merge an export artifact into the live favorites set.
//!
//! Duplicate detection uses a snapshot of the favorite paths taken once,
//! before the first entry is processed. Entries added during the run are not
//! folded back into that snapshot, so two artifact entries sharing a path
//! are both checked against the pre-import state and the second one reaches
//! the host's add operation. The host decides what happens then.
//!
//! One entry failing never stops the run. Only precondition errors (missing
//! or corrupt artifact, unreachable host) abort, and they do so before any
//! favorite is touched.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::artifact::{self, JournalFile};
use crate::connector::HostConnector;
use crate::error::{FavSyncError, Result};
use crate::events::EventSink;
use crate::model::{ExportArtifact, FavoriteEntry, JournalEntry, RollbackJournal, SCHEMA_VERSION};
use crate::util::HostIdentity;
use crate::validation::ArtifactValidator;

/// How a single artifact entry was handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportStatus {
    Added { imported_at: DateTime<Utc> },
    Skipped,
    Failed { reason: String },
}

/// One artifact entry and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub entry: FavoriteEntry,
    pub status: ImportStatus,
}

/// Result of an import run. Outcomes are in artifact order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub source: String,
    pub outcomes: Vec<ImportOutcome>,
    /// False when the journal could not be persisted.
    pub journal_written: bool,
}

impl ImportReport {
    /// Newly added favorites, as they are journaled.
    #[must_use]
    pub fn added(&self) -> Vec<JournalEntry> {
        self.outcomes
            .iter()
            .filter_map(|o| match o.status {
                ImportStatus::Added { imported_at } => Some(JournalEntry {
                    name: o.entry.name.clone(),
                    path: o.entry.path.clone(),
                    imported_at,
                }),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn skipped(&self) -> Vec<&FavoriteEntry> {
        self.outcomes
            .iter()
            .filter(|o| o.status == ImportStatus::Skipped)
            .map(|o| &o.entry)
            .collect()
    }

    /// Failed entries with the captured error detail.
    #[must_use]
    pub fn failed(&self) -> Vec<(&FavoriteEntry, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.status {
                ImportStatus::Failed { reason } => Some((&o.entry, reason.as_str())),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn added_count(&self) -> usize {
        self.count(|s| matches!(s, ImportStatus::Added { .. }))
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|s| matches!(s, ImportStatus::Skipped))
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, ImportStatus::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&ImportStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Load the artifact at `source` and import it.
///
/// # Errors
///
/// Returns `ArtifactNotFound`, `ArtifactCorrupt`, `UnsupportedSchema` or
/// `ConnectorUnavailable`. Nothing is modified when an error is returned.
pub fn import_from_path<C>(
    source: &Path,
    connector: &mut C,
    identity: &HostIdentity,
    journal: &JournalFile,
    sink: &dyn EventSink,
) -> Result<ImportReport>
where
    C: HostConnector + ?Sized,
{
    sink.info(&format!("Reading export artifact {}", source.display()));
    let artifact = artifact::load_export(source).inspect_err(|e| sink.error(&e.to_string()))?;
    import_favorites(&artifact, source, connector, identity, journal, sink)
}

/// Import `artifact` into the host and journal what was added.
///
/// The journal at `journal` is overwritten with exactly the added entries,
/// even when that list is empty. A journal write failure is reported as a
/// warning and leaves `journal_written` false; the import itself still
/// succeeds.
///
/// # Errors
///
/// Returns `ArtifactCorrupt` if the artifact fails validation, or
/// `ConnectorUnavailable` if the host cannot be read.
pub fn import_favorites<C>(
    artifact: &ExportArtifact,
    source: &Path,
    connector: &mut C,
    identity: &HostIdentity,
    journal: &JournalFile,
    sink: &dyn EventSink,
) -> Result<ImportReport>
where
    C: HostConnector + ?Sized,
{
    check_artifact(artifact, source, sink)?;
    sink.info(&format!(
        "Artifact from {} ({}), exported {}: {} entries",
        artifact.host_id,
        artifact.user_id,
        artifact.export_date.to_rfc3339(),
        artifact.entries.len()
    ));

    let snapshot = snapshot_paths(connector, sink)?;

    let mut outcomes = Vec::with_capacity(artifact.entries.len());
    for entry in &artifact.entries {
        let status = if snapshot.contains(entry.path.as_str()) {
            sink.info(&format!(
                "Skipped (already a favorite): {} ({})",
                entry.name, entry.path
            ));
            ImportStatus::Skipped
        } else {
            match add_entry(connector, entry) {
                Ok(()) => {
                    sink.success(&format!("Added: {} ({})", entry.name, entry.path));
                    ImportStatus::Added {
                        imported_at: Utc::now(),
                    }
                }
                Err(e) => {
                    sink.error(&format!("Failed: {} ({}): {e}", entry.name, entry.path));
                    ImportStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            }
        };
        outcomes.push(ImportOutcome {
            entry: entry.clone(),
            status,
        });
    }

    let mut report = ImportReport {
        source: source.display().to_string(),
        outcomes,
        journal_written: false,
    };

    let record = RollbackJournal {
        schema_version: SCHEMA_VERSION.to_string(),
        import_date: Utc::now(),
        source_artifact_path: report.source.clone(),
        host_id: identity.host_id.clone(),
        added_entries: report.added(),
    };
    match journal.save(&record) {
        Ok(()) => {
            report.journal_written = true;
            sink.info(&format!(
                "Rollback journal written to {} ({} entries)",
                journal.path().display(),
                record.added_entries.len()
            ));
        }
        Err(e) => sink.warn(&format!(
            "Could not write rollback journal {}: {e}; this import cannot be rolled back",
            journal.path().display()
        )),
    }

    let summary = format!(
        "Import complete: {} added, {} skipped, {} failed",
        report.added_count(),
        report.skipped_count(),
        report.failed_count()
    );
    if report.failed_count() == 0 {
        sink.success(&summary);
    } else {
        sink.warn(&summary);
    }

    Ok(report)
}

fn add_entry<C>(connector: &mut C, entry: &FavoriteEntry) -> Result<()>
where
    C: HostConnector + ?Sized,
{
    let handle = connector.resolve_path(&entry.path)?;
    connector.add_favorite(&handle)
}

fn check_artifact(artifact: &ExportArtifact, source: &Path, sink: &dyn EventSink) -> Result<()> {
    match ArtifactValidator::validate(artifact) {
        Ok(warnings) => {
            for warning in warnings {
                sink.warn(&format!("Artifact {}: {warning}", source.display()));
            }
            Ok(())
        }
        Err(errors) => {
            let reason = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            sink.error(&format!("Artifact {} is unusable: {reason}", source.display()));
            Err(FavSyncError::corrupt(source, reason))
        }
    }
}

fn snapshot_paths<C>(connector: &C, sink: &dyn EventSink) -> Result<HashSet<String>>
where
    C: HostConnector + ?Sized,
{
    let current = connector.list_favorites().inspect_err(|e| {
        sink.error(&format!("Cannot read current favorites: {e}"));
    })?;
    tracing::debug!("Duplicate snapshot holds {} path(s)", current.len());
    Ok(current.into_iter().map(|e| e.path).collect())
}

// ============================================================================
// Merge planning (dry run)
// ============================================================================

/// What an import would do with an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanAction {
    Add,
    Skip,
    Unresolvable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanStep {
    pub entry: FavoriteEntry,
    pub action: PlanAction,
}

/// Merge plan for an artifact against the current favorites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergePlan {
    pub steps: Vec<PlanStep>,
}

impl MergePlan {
    #[must_use]
    pub fn count(&self, action: fn(&PlanAction) -> bool) -> usize {
        self.steps.iter().filter(|s| action(&s.action)).count()
    }
}

/// Classify every entry without adding anything or touching the journal.
///
/// Uses the same snapshot rule as [`import_favorites`]. `Add` means the path
/// resolves; the host may still reject the add itself.
///
/// # Errors
///
/// Returns `ArtifactCorrupt` or `ConnectorUnavailable`.
pub fn plan_import<C>(
    artifact: &ExportArtifact,
    source: &Path,
    connector: &C,
    sink: &dyn EventSink,
) -> Result<MergePlan>
where
    C: HostConnector + ?Sized,
{
    check_artifact(artifact, source, sink)?;
    let snapshot = snapshot_paths(connector, sink)?;

    let steps = artifact
        .entries
        .iter()
        .map(|entry| {
            let action = if snapshot.contains(entry.path.as_str()) {
                PlanAction::Skip
            } else {
                match connector.resolve_path(&entry.path) {
                    Ok(_) => PlanAction::Add,
                    Err(e) => PlanAction::Unresolvable {
                        reason: e.to_string(),
                    },
                }
            };
            PlanStep {
                entry: entry.clone(),
                action,
            }
        })
        .collect();

    Ok(MergePlan { steps })
}

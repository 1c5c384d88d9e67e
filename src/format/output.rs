use favsync_lib::import::{ImportOutcome, PlanStep};
use favsync_lib::rollback::RollbackOutcome;
use favsync_lib::{ImportReport, MergePlan, PlanAction, RollbackReport};
use serde::Serialize;

/// Result of `favsync export`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutput {
    pub path: String,
    pub count: usize,
    pub fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<String>,
}

/// Import report with counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutput {
    pub source: String,
    pub added: usize,
    pub skipped: usize,
    pub failed: usize,
    pub journal: String,
    pub journal_written: bool,
    pub outcomes: Vec<ImportOutcome>,
}

impl ImportOutput {
    #[must_use]
    pub fn new(report: &ImportReport, journal: String) -> Self {
        Self {
            source: report.source.clone(),
            added: report.added_count(),
            skipped: report.skipped_count(),
            failed: report.failed_count(),
            journal,
            journal_written: report.journal_written,
            outcomes: report.outcomes.clone(),
        }
    }
}

/// Merge plan for `import --dry-run`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutput {
    pub source: String,
    pub dry_run: bool,
    pub would_add: usize,
    pub skip: usize,
    pub unresolvable: usize,
    pub steps: Vec<PlanStep>,
}

impl PlanOutput {
    #[must_use]
    pub fn new(plan: &MergePlan, source: String) -> Self {
        Self {
            source,
            dry_run: true,
            would_add: plan.count(|a| matches!(a, PlanAction::Add)),
            skip: plan.count(|a| matches!(a, PlanAction::Skip)),
            unresolvable: plan.count(|a| matches!(a, PlanAction::Unresolvable { .. })),
            steps: plan.steps.clone(),
        }
    }
}

/// Rollback report with counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackOutput {
    pub source_artifact_path: String,
    pub removed_count: usize,
    pub not_found_count: usize,
    pub failed_count: usize,
    pub journal_deleted: bool,
    pub outcomes: Vec<RollbackOutcome>,
}

impl From<&RollbackReport> for RollbackOutput {
    fn from(report: &RollbackReport) -> Self {
        Self {
            source_artifact_path: report.source_artifact_path.clone(),
            removed_count: report.removed_count(),
            not_found_count: report.not_found_count(),
            failed_count: report.failed_count(),
            journal_deleted: report.journal_deleted,
            outcomes: report.outcomes.clone(),
        }
    }
}

//! Text formatting functions for `favsync`.
//!
//! Plain text (non-ANSI) lines for terminal output:
//! - Outcome tags (`+` added, `=` skipped, `!` failed, `-` removed, `?` not found)
//! - Entry lines
//! - Run summary lines

use favsync_lib::import::{ImportOutcome, PlanStep};
use favsync_lib::rollback::RollbackOutcome;
use favsync_lib::{
    FavoriteEntry, ImportReport, ImportStatus, MergePlan, PlanAction, RollbackReport,
    RollbackStatus,
};

/// Outcome tag characters.
pub mod tags {
    pub const ADDED: &str = "+";
    pub const SKIPPED: &str = "=";
    pub const FAILED: &str = "!";
    pub const REMOVED: &str = "-";
    pub const NOT_FOUND: &str = "?";
    /// Dry run: would be added.
    pub const WOULD_ADD: &str = "~";
}

/// Format: `{position}. {name}  {path}`
#[must_use]
pub fn format_favorite_line(entry: &FavoriteEntry) -> String {
    format!("{:>3}. {}  {}", entry.position, entry.name, entry.path)
}

#[must_use]
pub fn format_import_outcome(outcome: &ImportOutcome) -> String {
    let entry = &outcome.entry;
    match &outcome.status {
        ImportStatus::Added { .. } => {
            format!("{} added    {}  {}", tags::ADDED, entry.name, entry.path)
        }
        ImportStatus::Skipped => {
            format!("{} skipped  {}  {}", tags::SKIPPED, entry.name, entry.path)
        }
        ImportStatus::Failed { reason } => format!(
            "{} failed   {}  {}: {reason}",
            tags::FAILED,
            entry.name,
            entry.path
        ),
    }
}

/// Format: `Added: N  Skipped: N  Failed: N`
#[must_use]
pub fn format_import_summary(report: &ImportReport) -> String {
    format!(
        "Added: {}  Skipped: {}  Failed: {}",
        report.added_count(),
        report.skipped_count(),
        report.failed_count()
    )
}

#[must_use]
pub fn format_plan_step(step: &PlanStep) -> String {
    let entry = &step.entry;
    match &step.action {
        PlanAction::Add => format!("{} add      {}  {}", tags::WOULD_ADD, entry.name, entry.path),
        PlanAction::Skip => format!("{} skip     {}  {}", tags::SKIPPED, entry.name, entry.path),
        PlanAction::Unresolvable { reason } => format!(
            "{} fail     {}  {}: {reason}",
            tags::FAILED,
            entry.name,
            entry.path
        ),
    }
}

#[must_use]
pub fn format_plan_summary(plan: &MergePlan) -> String {
    format!(
        "Dry run: would add {}, skip {}, fail {} (nothing was changed)",
        plan.count(|a| matches!(a, PlanAction::Add)),
        plan.count(|a| matches!(a, PlanAction::Skip)),
        plan.count(|a| matches!(a, PlanAction::Unresolvable { .. }))
    )
}

#[must_use]
pub fn format_rollback_outcome(outcome: &RollbackOutcome) -> String {
    let entry = &outcome.entry;
    match &outcome.status {
        RollbackStatus::Removed => {
            format!("{} removed    {}  {}", tags::REMOVED, entry.name, entry.path)
        }
        RollbackStatus::NotFound => {
            format!("{} not found  {}  {}", tags::NOT_FOUND, entry.name, entry.path)
        }
        RollbackStatus::Failed { reason } => format!(
            "{} failed     {}  {}: {reason}",
            tags::FAILED,
            entry.name,
            entry.path
        ),
    }
}

/// Format: `Removed: N  NotFound: N`, plus failures when there were any.
#[must_use]
pub fn format_rollback_summary(report: &RollbackReport) -> String {
    let mut line = format!(
        "Removed: {}  NotFound: {}",
        report.removed_count(),
        report.not_found_count()
    );
    if report.failed_count() > 0 {
        line.push_str(&format!("  Failed: {}", report.failed_count()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry() -> FavoriteEntry {
        FavoriteEntry {
            name: "Inbox".to_string(),
            path: "\\\\ana\\Inbox".to_string(),
            position: 2,
        }
    }

    #[test]
    fn test_favorite_line() {
        assert_eq!(format_favorite_line(&entry()), "  2. Inbox  \\\\ana\\Inbox");
    }

    #[test]
    fn test_import_outcome_lines() {
        let added = ImportOutcome {
            entry: entry(),
            status: ImportStatus::Added {
                imported_at: Utc::now(),
            },
        };
        assert!(format_import_outcome(&added).starts_with("+ added"));

        let failed = ImportOutcome {
            entry: entry(),
            status: ImportStatus::Failed {
                reason: "nope".to_string(),
            },
        };
        assert!(format_import_outcome(&failed).ends_with(": nope"));
    }

    #[test]
    fn test_import_summary() {
        let report = ImportReport {
            source: "fav.json".to_string(),
            outcomes: vec![ImportOutcome {
                entry: entry(),
                status: ImportStatus::Skipped,
            }],
            journal_written: true,
        };
        assert_eq!(
            format_import_summary(&report),
            "Added: 0  Skipped: 1  Failed: 0"
        );
    }
}

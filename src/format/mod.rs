//! Output formatting for `favsync`.
//!
//! Supports both human-readable text output and machine-parseable JSON.
//! Text output lists every entry in incoming order, then one summary line.
//!
//! # JSON Output Types
//!
//! - [`ExportOutput`] - Written artifact (export)
//! - [`ImportOutput`] - Import report with counts (import)
//! - [`PlanOutput`] - Merge plan (import --dry-run)
//! - [`RollbackOutput`] - Rollback report with counts (rollback)

mod output;
mod text;

pub use output::{ExportOutput, ImportOutput, PlanOutput, RollbackOutput};
pub use text::{
    format_favorite_line, format_import_outcome, format_import_summary, format_plan_step,
    format_plan_summary, format_rollback_outcome, format_rollback_summary,
};

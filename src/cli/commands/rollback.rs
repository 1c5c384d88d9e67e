//! Rollback command implementation.

use crate::config::Config;
use crate::error::{FavSyncError, Result};
use crate::format::{RollbackOutput, format_rollback_outcome, format_rollback_summary};
use favsync_lib::{TracingSink, rollback};

/// Execute the rollback command.
///
/// # Errors
///
/// Returns `NoJournal` if no import is pending, or an error if the journal is
/// corrupt or the host cannot be read.
pub fn execute(config: &Config, json: bool) -> Result<()> {
    let journal = config.journal_file();
    // Checked before the host is opened so a missing journal is reported as such
    if !journal.exists() {
        return Err(FavSyncError::NoJournal(journal.path().to_path_buf()));
    }

    let mut host = config.open_host()?;
    let report = rollback(&mut host, &journal, &TracingSink)?;

    if json {
        let output = RollbackOutput::from(&report);
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for outcome in &report.outcomes {
        println!("{}", format_rollback_outcome(outcome));
    }
    if !report.journal_deleted {
        eprintln!(
            "Warning: rollback journal {} could not be deleted",
            journal.path().display()
        );
    }
    println!("{}", format_rollback_summary(&report));
    Ok(())
}

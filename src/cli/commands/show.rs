//! Show command implementation.

use crate::config::Config;
use crate::error::{FavSyncError, Result};
use crate::format::format_favorite_line;
use favsync_lib::util::entries_fingerprint;
use favsync_lib::{ExportArtifact, JournalFile, RollbackJournal, artifact};
use std::path::Path;

/// Which artifact a file holds, judged by its top-level keys.
enum ArtifactKind {
    Export,
    Journal,
}

fn sniff(path: &Path) -> Result<ArtifactKind> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FavSyncError::ArtifactNotFound(path.to_path_buf())
        } else {
            FavSyncError::Io(e)
        }
    })?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| FavSyncError::corrupt(path, e.to_string()))?;
    if value.get("addedEntries").is_some() {
        Ok(ArtifactKind::Journal)
    } else if value.get("entries").is_some() {
        Ok(ArtifactKind::Export)
    } else {
        Err(FavSyncError::corrupt(
            path,
            "neither an export artifact nor a rollback journal",
        ))
    }
}

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if the file is missing or is not a valid artifact.
pub fn execute(path: &Path, json: bool) -> Result<()> {
    match sniff(path)? {
        ArtifactKind::Export => {
            let export = artifact::load_export(path)?;
            print_export(&export, json)
        }
        ArtifactKind::Journal => {
            let journal = JournalFile::new(path).load()?;
            print_journal(&journal, json)
        }
    }
}

/// Execute the journal command.
///
/// # Errors
///
/// Returns an error if the journal exists but cannot be read.
pub fn execute_journal(config: &Config, json: bool) -> Result<()> {
    let journal_file = config.journal_file();
    if !journal_file.exists() {
        if json {
            println!("null");
        } else {
            println!(
                "No pending rollback journal at {}",
                journal_file.path().display()
            );
        }
        return Ok(());
    }
    print_journal(&journal_file.load()?, json)
}

fn print_export(export: &ExportArtifact, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(export)?);
        return Ok(());
    }

    println!("Export artifact (schema {})", export.schema_version);
    println!("  Exported:    {}", export.export_date.to_rfc3339());
    println!("  Host:        {} (version {})", export.host_id, export.host_version);
    println!("  User:        {}", export.user_id);
    if export.count_matches() {
        println!("  Count:       {}", export.count);
    } else {
        println!(
            "  Count:       {} declared, {} present (mismatch)",
            export.count,
            export.entries.len()
        );
    }
    println!("  Fingerprint: {}", entries_fingerprint(&export.entries));
    for entry in &export.entries {
        println!("{}", format_favorite_line(entry));
    }
    Ok(())
}

fn print_journal(journal: &RollbackJournal, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(journal)?);
        return Ok(());
    }

    println!("Rollback journal (schema {})", journal.schema_version);
    println!("  Imported:    {}", journal.import_date.to_rfc3339());
    println!("  Source:      {}", journal.source_artifact_path);
    println!("  Host:        {}", journal.host_id);
    println!("  Added:       {}", journal.added_entries.len());
    for entry in &journal.added_entries {
        println!(
            "  + {}  {}  ({})",
            entry.name,
            entry.path,
            entry.imported_at.to_rfc3339()
        );
    }
    Ok(())
}

//! Export command implementation.

use crate::cli::ExportArgs;
use crate::config::Config;
use crate::error::Result;
use crate::format::{ExportOutput, format_favorite_line};
use crate::sync::history;
use favsync_lib::util::{default_export_name, entries_fingerprint};
use favsync_lib::{TracingSink, artifact, export_favorites};

/// Execute the export command.
///
/// A failed write is reported as a warning and the artifact is printed to
/// stdout instead, so the captured favorites are never lost.
///
/// # Errors
///
/// Returns an error if the host cannot be read or has no favorites.
pub fn execute(config: &Config, args: &ExportArgs, json: bool) -> Result<()> {
    let host = config.open_host()?;
    let artifact = export_favorites(&host, &config.identity, &TracingSink)?;

    let path = args.output.clone().unwrap_or_else(|| {
        config
            .export_dir
            .join(default_export_name(&config.identity.host_id, artifact.export_date))
    });

    let backup = history::backup_before_overwrite(&path, &config.history_dir(), &config.history)
        .unwrap_or_else(|e| {
            tracing::warn!("Could not back up {}: {e}", path.display());
            None
        });

    if let Err(e) = artifact::save_export(&path, &artifact) {
        tracing::warn!("Could not write export artifact {}: {e}", path.display());
        eprintln!(
            "Warning: could not write {}: {e}; artifact follows on stdout",
            path.display()
        );
        println!("{}", serde_json::to_string_pretty(&artifact)?);
        return Ok(());
    }

    if json {
        let output = ExportOutput {
            path: path.display().to_string(),
            count: artifact.count,
            fingerprint: entries_fingerprint(&artifact.entries),
            backup: backup.map(|b| b.display().to_string()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for entry in &artifact.entries {
        println!("{}", format_favorite_line(entry));
    }
    if let Some(backup) = backup {
        println!("Previous artifact backed up to {}", backup.display());
    }
    println!(
        "Exported {} favorite(s) to {}",
        artifact.count,
        path.display()
    );
    Ok(())
}

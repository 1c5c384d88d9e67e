use crate::cli::HistorySubcommand;
use crate::config::Config;
use crate::error::Result;
use crate::sync::history::{list_backups, prune_backups};

/// Execute the history command.
///
/// # Errors
///
/// Returns an error if the history directory cannot be read.
pub fn execute(config: &Config, command: Option<&HistorySubcommand>, json: bool) -> Result<()> {
    let history_dir = config.history_dir();
    match command {
        Some(HistorySubcommand::List) | None => {
            let backups = list_backups(&history_dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&backups)?);
                return Ok(());
            }
            if backups.is_empty() {
                println!("No export backups in {}", history_dir.display());
                return Ok(());
            }
            for backup in &backups {
                println!(
                    "{}  {}  {} bytes  {}",
                    backup.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    backup.artifact,
                    backup.size,
                    backup.path.display()
                );
            }
        }
        Some(HistorySubcommand::Prune { keep, older_than }) => {
            let deleted = prune_backups(&history_dir, *keep, *older_than)?;
            if json {
                println!("{}", serde_json::json!({ "deleted": deleted }));
            } else {
                println!("Pruned {deleted} backup(s)");
            }
        }
    }
    Ok(())
}

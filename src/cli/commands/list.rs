use crate::config::Config;
use crate::error::Result;
use crate::format::format_favorite_line;
use favsync_lib::{FavoriteEntry, HostConnector};

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if the host cannot be read.
pub fn execute(config: &Config, json: bool) -> Result<()> {
    let host = config.open_host()?;
    let entries: Vec<FavoriteEntry> = host
        .list_favorites()?
        .into_iter()
        .enumerate()
        .map(|(idx, nav)| FavoriteEntry {
            name: nav.name,
            path: nav.path,
            position: u32::try_from(idx + 1).unwrap_or(u32::MAX),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No favorites.");
        return Ok(());
    }
    for entry in &entries {
        println!("{}", format_favorite_line(entry));
    }
    println!("{} favorite(s)", entries.len());
    Ok(())
}

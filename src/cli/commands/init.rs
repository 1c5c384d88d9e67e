use crate::cli::InitArgs;
use crate::config::{CONFIG_FILE, CONFIG_TEMPLATE, Config};
use crate::error::Result;
use favsync_lib::{FileHost, HostState};
use std::fs;

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the workspace directory or its files cannot be created.
pub fn execute(config: &Config, args: &InitArgs) -> Result<()> {
    let dir = &config.workspace_dir;
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    // Write config.yaml template
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() || args.force {
        fs::write(&config_path, CONFIG_TEMPLATE)?;
    }

    // Empty host state so the file connector has something to read
    if !config.host_state.exists() {
        FileHost::create(&config.host_state, HostState::default())?;
        println!("Created empty host state at {}", config.host_state.display());
    }

    // Write .gitignore
    let gitignore_path = dir.join(".gitignore");
    if !gitignore_path.exists() {
        let gitignore = r"# Rollback journal (machine-local)
rollback-journal.json

# Export backups
history/

# Logs
*.log

# Temporary
*.tmp
";
        fs::write(gitignore_path, gitignore)?;
    }

    println!("Initialized favsync workspace in {}", dir.display());
    Ok(())
}

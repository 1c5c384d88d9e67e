//! Command-line interface for `favsync`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::config::{self, CliOverrides};
use crate::logging;

/// `favsync` - export, import and roll back navigation favorites.
#[derive(Parser, Debug)]
#[command(name = "favsync")]
#[command(
    author,
    version,
    about = "Export, import and roll back navigation favorites",
    long_about = None,
    after_help = "Only the most recent import can be rolled back."
)]
pub struct Cli {
    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Host state file backing the connector
    #[arg(long, global = true, value_name = "PATH")]
    pub host_state: Option<PathBuf>,

    /// Rollback journal location
    #[arg(long, global = true, value_name = "PATH")]
    pub journal: Option<PathBuf>,

    /// Also append logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            host_state: self.host_state.clone(),
            journal: self.journal.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a favsync workspace
    Init(InitArgs),

    /// Export the current favorites to an artifact
    Export(ExportArgs),

    /// Import favorites from an artifact
    Import(ImportArgs),

    /// Undo the favorites added by the most recent import
    Rollback,

    /// List the current favorites
    List,

    /// Show an export artifact or rollback journal
    Show(ShowArgs),

    /// Show the pending rollback journal
    Journal,

    /// Manage export backups
    History(HistoryCommand),

    /// Check configuration, host state and journal
    Doctor,

    /// Print the JSON schema of an artifact
    Schema(SchemaArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Show version information
    Version,
}

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Overwrite an existing config template
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Output file (default: <export_dir>/favorites-<host>-<timestamp>.json)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Export artifact to import
    pub file: PathBuf,

    /// Show the merge plan without changing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Export artifact or rollback journal
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct HistoryCommand {
    /// History subcommand
    #[command(subcommand)]
    pub command: Option<HistorySubcommand>,
}

#[derive(Subcommand, Debug)]
pub enum HistorySubcommand {
    /// List export backups
    List,

    /// Delete old export backups
    Prune {
        /// Number of newest backups to keep
        #[arg(long, default_value_t = 10)]
        keep: usize,

        /// Only delete backups older than this many days
        #[arg(long, value_name = "DAYS")]
        older_than: Option<u32>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaKind {
    #[default]
    Export,
    Journal,
    Host,
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Which artifact to describe
    #[arg(value_enum, default_value_t = SchemaKind::Export)]
    pub kind: SchemaKind,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let overrides = cli.overrides();

    // Commands that need no workspace configuration
    match &cli.command {
        Some(Commands::Version) => {
            commands::version::execute(cli.json)?;
            return Ok(());
        }
        Some(Commands::Completions(args)) => {
            commands::completions::execute(args.shell);
            return Ok(());
        }
        Some(Commands::Schema(args)) => {
            commands::schema::execute(args.kind)?;
            return Ok(());
        }
        None => {
            println!("favsync - favorites export/import/rollback. Use --help for usage.");
            return Ok(());
        }
        Some(_) => {}
    }

    let config = config::load_config(&overrides)?;
    logging::init_logging(
        cli.verbose,
        cli.quiet,
        config.log_file.as_deref(),
        config.log_json,
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;
    tracing::debug!(
        "Workspace {}, host state {}, journal {}",
        config.workspace_dir.display(),
        config.host_state.display(),
        config.journal.display()
    );

    if let Some(command) = &cli.command {
        tracing::debug!("Running {}", command.name());
    }

    let json = cli.json;
    match cli.command {
        Some(Commands::Init(args)) => commands::init::execute(&config, &args)?,
        Some(Commands::Export(args)) => commands::export::execute(&config, &args, json)?,
        Some(Commands::Import(args)) => commands::import::execute(&config, &args, json)?,
        Some(Commands::Rollback) => commands::rollback::execute(&config, json)?,
        Some(Commands::List) => commands::list::execute(&config, json)?,
        Some(Commands::Show(args)) => commands::show::execute(&args.file, json)?,
        Some(Commands::Journal) => commands::show::execute_journal(&config, json)?,
        Some(Commands::History(history)) => {
            commands::history::execute(&config, history.command.as_ref(), json)?;
        }
        Some(Commands::Doctor) => commands::doctor::execute(&config, json)?,
        Some(Commands::Version | Commands::Completions(_) | Commands::Schema(_)) | None => {}
    }

    Ok(())
}

impl Commands {
    /// Command name for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::Export(_) => "export",
            Self::Import(_) => "import",
            Self::Rollback => "rollback",
            Self::List => "list",
            Self::Show(_) => "show",
            Self::Journal => "journal",
            Self::History(history) => match history.command {
                Some(HistorySubcommand::List) | None => "history list",
                Some(HistorySubcommand::Prune { .. }) => "history prune",
            },
            Self::Doctor => "doctor",
            Self::Schema(_) => "schema",
            Self::Completions(_) => "completions",
            Self::Version => "version",
        }
    }
}

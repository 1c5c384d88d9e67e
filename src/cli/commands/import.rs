//! Import command implementation.

use crate::cli::ImportArgs;
use crate::config::Config;
use crate::error::Result;
use crate::format::{
    ImportOutput, PlanOutput, format_import_outcome, format_import_summary, format_plan_step,
    format_plan_summary,
};
use favsync_lib::{TracingSink, artifact, import_from_path, plan_import};

/// Execute the import command.
///
/// # Errors
///
/// Returns an error if the artifact is missing or corrupt, or the host cannot
/// be read. Individual entry failures are reported, not returned.
pub fn execute(config: &Config, args: &ImportArgs, json: bool) -> Result<()> {
    // Journal the absolute location when it can be determined
    let source = dunce::canonicalize(&args.file).unwrap_or_else(|_| args.file.clone());

    if args.dry_run {
        let artifact = artifact::load_export(&source)?;
        let host = config.open_host()?;
        let plan = plan_import(&artifact, &source, &host, &TracingSink)?;
        if json {
            let output = PlanOutput::new(&plan, source.display().to_string());
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            for step in &plan.steps {
                println!("{}", format_plan_step(step));
            }
            println!("{}", format_plan_summary(&plan));
        }
        return Ok(());
    }

    let mut host = config.open_host()?;
    let journal = config.journal_file();
    let report = import_from_path(&source, &mut host, &config.identity, &journal, &TracingSink)?;

    if json {
        let output = ImportOutput::new(&report, journal.path().display().to_string());
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for outcome in &report.outcomes {
        println!("{}", format_import_outcome(outcome));
    }
    if !report.journal_written {
        eprintln!(
            "Warning: rollback journal could not be written to {}; this import cannot be rolled back",
            journal.path().display()
        );
    }
    println!("{}", format_import_summary(&report));
    Ok(())
}

//! Doctor command implementation.

use crate::config::Config;
use crate::error::{EXIT_FAILURE, Result};
use favsync_lib::{FileHost, HostConnector, JournalFile, RollbackJournal};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Ok,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
struct DoctorReport {
    ok: bool,
    checks: Vec<CheckResult>,
}

fn push_check(
    checks: &mut Vec<CheckResult>,
    name: &str,
    status: CheckStatus,
    message: Option<String>,
    details: Option<serde_json::Value>,
) {
    checks.push(CheckResult {
        name: name.to_string(),
        status,
        message,
        details,
    });
}

fn has_error(checks: &[CheckResult]) -> bool {
    checks
        .iter()
        .any(|check| matches!(check.status, CheckStatus::Error))
}

fn print_report(report: &DoctorReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    println!("favsync doctor");
    for check in &report.checks {
        let label = match check.status {
            CheckStatus::Ok => "OK",
            CheckStatus::Warn => "WARN",
            CheckStatus::Error => "ERROR",
        };
        if let Some(message) = &check.message {
            println!("{label} {}: {}", check.name, message);
        } else {
            println!("{label} {}", check.name);
        }
    }
    Ok(())
}

fn check_workspace(config: &Config, checks: &mut Vec<CheckResult>) {
    if config.workspace_dir.is_dir() {
        push_check(
            checks,
            "workspace",
            CheckStatus::Ok,
            Some(config.workspace_dir.display().to_string()),
            None,
        );
    } else {
        push_check(
            checks,
            "workspace",
            CheckStatus::Warn,
            Some(format!(
                "{} does not exist (run `favsync init`)",
                config.workspace_dir.display()
            )),
            None,
        );
    }

    if config.export_dir.is_dir() {
        push_check(checks, "export_dir", CheckStatus::Ok, None, None);
    } else {
        push_check(
            checks,
            "export_dir",
            CheckStatus::Warn,
            Some(format!(
                "{} does not exist; it will be created on export",
                config.export_dir.display()
            )),
            None,
        );
    }
}

/// Returns the current favorite paths when the host is readable.
fn check_host(config: &Config, checks: &mut Vec<CheckResult>) -> Option<HashSet<String>> {
    let details = serde_json::json!({ "path": config.host_state.display().to_string() });
    let host = match FileHost::open(&config.host_state) {
        Ok(host) => host,
        Err(err) => {
            push_check(
                checks,
                "host.state",
                CheckStatus::Error,
                Some(err.to_string()),
                Some(details),
            );
            return None;
        }
    };

    match host.list_favorites() {
        Ok(favorites) => {
            push_check(
                checks,
                "host.state",
                CheckStatus::Ok,
                Some(format!(
                    "{} favorite(s), {} resolvable folder(s), host version {}",
                    favorites.len(),
                    host.state().folders.len(),
                    host.host_version()
                )),
                Some(details),
            );
            let unresolvable: Vec<&str> = favorites
                .iter()
                .filter(|f| host.resolve_path(&f.path).is_err())
                .map(|f| f.path.as_str())
                .collect();
            if !unresolvable.is_empty() {
                push_check(
                    checks,
                    "host.favorites",
                    CheckStatus::Warn,
                    Some(format!(
                        "{} favorite(s) point at folders the host cannot resolve",
                        unresolvable.len()
                    )),
                    Some(serde_json::json!({ "paths": unresolvable })),
                );
            }
            Some(favorites.into_iter().map(|f| f.path).collect())
        }
        Err(err) => {
            push_check(
                checks,
                "host.state",
                CheckStatus::Error,
                Some(err.to_string()),
                Some(details),
            );
            None
        }
    }
}

fn check_journal(
    journal: &JournalFile,
    current: Option<&HashSet<String>>,
    checks: &mut Vec<CheckResult>,
) {
    if !journal.exists() {
        push_check(
            checks,
            "journal",
            CheckStatus::Ok,
            Some("no pending rollback".to_string()),
            None,
        );
        return;
    }

    let record: RollbackJournal = match journal.load() {
        Ok(record) => record,
        Err(err) => {
            push_check(
                checks,
                "journal",
                CheckStatus::Error,
                Some(err.to_string()),
                Some(serde_json::json!({ "path": journal.path().display().to_string() })),
            );
            return;
        }
    };

    push_check(
        checks,
        "journal",
        CheckStatus::Ok,
        Some(format!(
            "pending rollback of {} favorite(s) imported from {}",
            record.added_entries.len(),
            record.source_artifact_path
        )),
        None,
    );

    if let Some(current) = current {
        let missing: Vec<&str> = record
            .added_entries
            .iter()
            .filter(|e| !current.contains(&e.path))
            .map(|e| e.path.as_str())
            .collect();
        if !missing.is_empty() {
            push_check(
                checks,
                "journal.drift",
                CheckStatus::Warn,
                Some(format!(
                    "{} journaled favorite(s) are no longer present and will be reported as not found",
                    missing.len()
                )),
                Some(serde_json::json!({ "paths": missing })),
            );
        }
    }
}

/// Execute the doctor command.
///
/// Exits the process with a failure code when any check is an error.
///
/// # Errors
///
/// Returns an error if the report cannot be printed.
pub fn execute(config: &Config, json: bool) -> Result<()> {
    let mut checks = Vec::new();

    check_workspace(config, &mut checks);
    let current = check_host(config, &mut checks);
    check_journal(&config.journal_file(), current.as_ref(), &mut checks);

    let report = DoctorReport {
        ok: !has_error(&checks),
        checks,
    };
    print_report(&report, json)?;

    if !report.ok {
        std::process::exit(EXIT_FAILURE);
    }

    Ok(())
}

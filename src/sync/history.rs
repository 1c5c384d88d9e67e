//! Local history backup for export artifacts.
//!
//! This module handles:
//! - Creating timestamped backups of an export file before it is overwritten
//! - Rotating backups based on count and age
//! - Listing and pruning backups

use crate::error::{FavSyncError, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use favsync_lib::util::{file_timestamp, hex_encode};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for history backups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    pub enabled: bool,
    pub max_count: usize,
    pub max_age_days: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_count: 20,
            max_age_days: 30,
        }
    }
}

/// Backup entry metadata.
#[derive(Debug, Clone, Serialize)]
pub struct BackupEntry {
    pub path: PathBuf,
    /// File stem of the artifact this backs up.
    pub artifact: String,
    pub timestamp: DateTime<Utc>,
    /// Disambiguates backups taken within the same second (`0` for the first).
    pub sequence: u32,
    pub size: u64,
}

/// Back up `target` into `history_dir` if it exists.
///
/// Returns the backup path, or `None` when history is disabled, there is
/// nothing to back up, or the latest backup already has identical content.
///
/// # Errors
///
/// Returns an error if the backup cannot be created.
pub fn backup_before_overwrite(
    target: &Path,
    history_dir: &Path,
    config: &HistoryConfig,
) -> Result<Option<PathBuf>> {
    if !config.enabled || !target.is_file() {
        return Ok(None);
    }

    let stem = artifact_stem(target)?;

    if !history_dir.exists() {
        fs::create_dir_all(history_dir)?;
    }

    // Skip if identical to the most recent backup of this artifact
    if let Some(latest) = list_backups(history_dir)?
        .into_iter()
        .find(|b| b.artifact == stem)
    {
        if file_digest(target)? == file_digest(&latest.path)? {
            tracing::debug!(
                "Skipping backup: identical to latest {}",
                latest.path.display()
            );
            return Ok(None);
        }
    }

    let backup_path = free_backup_path(history_dir, &stem, &file_timestamp(Utc::now()));
    fs::copy(target, &backup_path)?;
    tracing::debug!("Created backup: {}", backup_path.display());

    rotate_history(history_dir, &stem, config)?;

    Ok(Some(backup_path))
}

/// `<stem>.<ts>.json`, or `<stem>.<ts>-<n>.json` when that name is taken.
fn free_backup_path(history_dir: &Path, stem: &str, ts: &str) -> PathBuf {
    let first = history_dir.join(format!("{stem}.{ts}.json"));
    if !first.exists() {
        return first;
    }
    (1u32..)
        .map(|n| history_dir.join(format!("{stem}.{ts}-{n}.json")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

fn artifact_stem(target: &Path) -> Result<String> {
    target
        .file_stem()
        .and_then(|s| s.to_str())
        .map(ToString::to_string)
        .ok_or_else(|| FavSyncError::validation("path", "export path has no usable file name"))
}

/// Rotate backups of one artifact based on config limits.
fn rotate_history(history_dir: &Path, stem: &str, config: &HistoryConfig) -> Result<()> {
    let cutoff = Utc::now() - chrono::Duration::days(i64::from(config.max_age_days));

    let mut deleted_count = 0;
    let backups = list_backups(history_dir)?
        .into_iter()
        .filter(|b| b.artifact == stem);
    for (idx, entry) in backups.enumerate() {
        if entry.timestamp < cutoff || idx >= config.max_count {
            fs::remove_file(&entry.path)?;
            deleted_count += 1;
        }
    }

    if deleted_count > 0 {
        tracing::debug!("Pruned {} old backup(s) of {}", deleted_count, stem);
    }

    Ok(())
}

/// List available backups sorted by date (newest first).
///
/// File names must look like `<stem>.YYYYMMDD_HHMMSS.json`; anything else in
/// the directory is ignored.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_backups(history_dir: &Path) -> Result<Vec<BackupEntry>> {
    if !history_dir.exists() {
        return Ok(Vec::new());
    }

    let mut backups = Vec::new();

    for entry in fs::read_dir(history_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some((artifact, timestamp, sequence)) = parse_backup_name(name) else {
            continue;
        };
        if let Ok(metadata) = fs::metadata(&path) {
            backups.push(BackupEntry {
                path,
                artifact,
                timestamp,
                sequence,
                size: metadata.len(),
            });
        }
    }

    // Sort newest first
    backups.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then(b.sequence.cmp(&a.sequence))
    });

    Ok(backups)
}

fn parse_backup_name(name: &str) -> Option<(String, DateTime<Utc>, u32)> {
    let base = name.strip_suffix(".json")?;
    let (stem, ts) = base.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    let (ts, sequence) = match ts.split_once('-') {
        Some((ts, n)) => (ts, n.parse().ok()?),
        None => (ts, 0),
    };
    let dt = NaiveDateTime::parse_from_str(ts, "%Y%m%d_%H%M%S").ok()?;
    Some((stem.to_string(), Utc.from_utc_datetime(&dt), sequence))
}

fn file_digest(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(hex_encode(&Sha256::digest(&bytes)))
}

/// Prune old backups based on count and age.
///
/// The newest `keep` backups always survive. Older ones are removed when
/// `older_than_days` is unset or they are older than that many days.
///
/// # Errors
///
/// Returns an error if listing backups fails.
pub fn prune_backups(
    history_dir: &Path,
    keep: usize,
    older_than_days: Option<u32>,
) -> Result<usize> {
    let backups = list_backups(history_dir)?;
    let cutoff = older_than_days.map(|days| Utc::now() - chrono::Duration::days(i64::from(days)));

    let mut deleted_count = 0;
    for entry in backups.iter().skip(keep) {
        let expired = cutoff.is_none_or(|c| entry.timestamp < c);
        if !expired {
            continue;
        }
        if let Err(e) = fs::remove_file(&entry.path) {
            tracing::warn!("Failed to delete backup {}: {}", entry.path.display(), e);
        } else {
            deleted_count += 1;
        }
    }

    Ok(deleted_count)
}

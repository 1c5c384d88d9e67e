//! Host identity, fingerprinting and naming helpers.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::model::FavoriteEntry;

// ============================================================================
// Host identity
// ============================================================================

/// Who and where an export was captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    pub host_id: String,
    pub user_id: String,
}

impl HostIdentity {
    #[must_use]
    pub fn new(host_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            host_id: host_id.into(),
            user_id: user_id.into(),
        }
    }

    /// Identity of the current machine and user, from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let host_id = first_env(&["COMPUTERNAME", "HOSTNAME"])
            .or_else(|| {
                std::fs::read_to_string("/etc/hostname")
                    .ok()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_else(|| "unknown-host".to_string());
        let user_id =
            first_env(&["USERNAME", "USER", "LOGNAME"]).unwrap_or_else(|| "unknown".to_string());
        Self { host_id, user_id }
    }
}

fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

// ============================================================================
// Fingerprinting
// ============================================================================

/// SHA-256 over entry names, paths and positions, in order.
///
/// Two exports of an unchanged favorites set share a fingerprint even though
/// their metadata timestamps differ.
#[must_use]
pub fn entries_fingerprint(entries: &[FavoriteEntry]) -> String {
    let mut hasher = Sha256::new();
    for entry in entries {
        hasher.update(entry.position.to_le_bytes());
        hasher.update(entry.name.as_bytes());
        hasher.update([0]);
        hasher.update(entry.path.as_bytes());
        hasher.update([0]);
    }
    hex_encode(&hasher.finalize())
}

/// Lowercase hex encoding.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

// ============================================================================
// Naming
// ============================================================================

/// Timestamp suitable for file names: `YYYYMMDD_HHMMSS`.
#[must_use]
pub fn file_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// Replace characters that are awkward in file names.
#[must_use]
pub fn sanitize_file_component(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "host".to_string()
    } else {
        cleaned
    }
}

/// Default export file name: `favorites-<host>-<timestamp>.json`.
#[must_use]
pub fn default_export_name(host_id: &str, at: DateTime<Utc>) -> String {
    format!(
        "favorites-{}-{}.json",
        sanitize_file_component(host_id),
        file_timestamp(at)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(name: &str, path: &str, position: u32) -> FavoriteEntry {
        FavoriteEntry {
            name: name.to_string(),
            path: path.to_string(),
            position,
        }
    }

    #[test]
    fn fingerprint_is_order_sensitive() {
        let a = vec![entry("A", "\\\\a", 1), entry("B", "\\\\b", 2)];
        let b = vec![entry("B", "\\\\b", 1), entry("A", "\\\\a", 2)];
        assert_eq!(entries_fingerprint(&a), entries_fingerprint(&a.clone()));
        assert_ne!(entries_fingerprint(&a), entries_fingerprint(&b));
        assert_eq!(entries_fingerprint(&a).len(), 64);
    }

    #[test]
    fn export_name_is_filesystem_safe() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        assert_eq!(
            default_export_name("WS 01/corp", at),
            "favorites-WS_01_corp-20240301_090507.json"
        );
        assert_eq!(sanitize_file_component(""), "host");
    }
}

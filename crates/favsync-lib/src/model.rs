//! Core data types for favsync-lib.
//!
//! Field names serialize exactly as they appear in the persisted artifacts
//! (`exportDate`, `hostId`, `addedEntries`, ...) so files written by other
//! tooling stay interchangeable.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Schema version stamped on every artifact this crate writes.
pub const SCHEMA_VERSION: &str = "1.0.0";

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// A navigation entry as reported live by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NavEntry {
    pub name: String,
    pub path: String,
}

impl NavEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// One exported favorite.
///
/// `path` is the identity key (case-sensitive). `position` is 1-based read
/// order at export time and is provenance only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FavoriteEntry {
    pub name: String,
    pub path: String,
    pub position: u32,
}

/// Durable snapshot of a favorites set plus provenance metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportArtifact {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub export_date: DateTime<Utc>,
    pub host_id: String,
    pub user_id: String,
    pub host_version: String,
    /// Expected to equal `entries.len()`; checked on import, never trusted.
    pub count: usize,
    pub entries: Vec<FavoriteEntry>,
}

impl ExportArtifact {
    /// Whether the declared `count` matches the number of entries.
    #[must_use]
    pub fn count_matches(&self) -> bool {
        self.count == self.entries.len()
    }
}

/// One favorite added by an import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub name: String,
    pub path: String,
    pub imported_at: DateTime<Utc>,
}

/// Record of exactly which favorites the most recent import added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RollbackJournal {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub import_date: DateTime<Utc>,
    pub source_artifact_path: String,
    pub host_id: String,
    pub added_entries: Vec<JournalEntry>,
}

/// Opaque handle to a host folder, produced by `HostConnector::resolve_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderHandle {
    name: String,
    path: String,
}

impl FolderHandle {
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Display name the host uses for the folder.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_artifact_uses_camel_case_keys() {
        let artifact = ExportArtifact {
            schema_version: SCHEMA_VERSION.to_string(),
            export_date: Utc::now(),
            host_id: "WS-01".to_string(),
            user_id: "ana".to_string(),
            host_version: "16.0".to_string(),
            count: 1,
            entries: vec![FavoriteEntry {
                name: "Inbox".to_string(),
                path: "\\\\ana@example.com\\Inbox".to_string(),
                position: 1,
            }],
        };
        let value = serde_json::to_value(&artifact).unwrap();
        for key in [
            "exportDate",
            "hostId",
            "userId",
            "hostVersion",
            "count",
            "entries",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["entries"][0]["position"], 1);
    }

    #[test]
    fn schema_version_defaults_when_absent() {
        let json = r#"{
            "importDate": "2024-03-01T10:00:00.123456Z",
            "sourceArtifactPath": "fav.json",
            "hostId": "WS-01",
            "addedEntries": []
        }"#;
        let journal: RollbackJournal = serde_json::from_str(json).unwrap();
        assert_eq!(journal.schema_version, SCHEMA_VERSION);
        assert_eq!(journal.import_date.timestamp_subsec_micros(), 123_456);
    }

    #[test]
    fn count_mismatch_is_detectable() {
        let artifact = ExportArtifact {
            schema_version: SCHEMA_VERSION.to_string(),
            export_date: Utc::now(),
            host_id: String::new(),
            user_id: String::new(),
            host_version: String::new(),
            count: 3,
            entries: Vec::new(),
        };
        assert!(!artifact.count_matches());
    }
}

//! Error types for `favsync-lib`.
//!
//! Precondition errors abort a run before anything is modified. Per-entry
//! failures never surface here; they are recorded in the run's report.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for favsync-lib operations.
#[derive(Error, Debug)]
pub enum FavSyncError {
    // === Connector Errors ===
    /// The connector returned zero favorites.
    #[error("No favorites found in the navigation group")]
    EmptyFavorites,

    /// The host could not be reached or the navigation group is missing.
    #[error("Host connector unavailable: {reason}")]
    ConnectorUnavailable { reason: String },

    /// A path does not resolve to a host folder.
    #[error("Path does not resolve to a folder: {path}")]
    PathNotResolvable { path: String },

    /// The host refused to add the folder as a favorite.
    #[error("Host rejected favorite '{path}': {reason}")]
    AddRejected { path: String, reason: String },

    // === Artifact Errors ===
    /// Export artifact does not exist.
    #[error("Export artifact not found: {0}")]
    ArtifactNotFound(PathBuf),

    /// Export artifact or journal cannot be parsed or misses required fields.
    #[error("Corrupt artifact {path}: {reason}")]
    ArtifactCorrupt { path: PathBuf, reason: String },

    /// Artifact was written by an incompatible schema version.
    #[error("Unsupported artifact schema version: {found}")]
    UnsupportedSchema { found: String },

    /// No rollback journal exists at the configured location.
    #[error("No rollback journal at {0}; nothing to roll back")]
    NoJournal(PathBuf),

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {errors:?}")]
    ValidationErrors { errors: Vec<ValidationError> },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl FavSyncError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::ConnectorUnavailable {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ArtifactCorrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }

    /// Whether this error aborts a run before any favorites were touched.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::EmptyFavorites
                | Self::ConnectorUnavailable { .. }
                | Self::ArtifactNotFound(_)
                | Self::ArtifactCorrupt { .. }
                | Self::UnsupportedSchema { .. }
                | Self::NoJournal(_)
        )
    }
}

/// Result type using `FavSyncError`.
pub type Result<T> = std::result::Result<T, FavSyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_classification() {
        assert!(FavSyncError::EmptyFavorites.is_precondition());
        assert!(FavSyncError::NoJournal(PathBuf::from("j.json")).is_precondition());
        assert!(FavSyncError::unavailable("closed").is_precondition());
        assert!(
            !FavSyncError::PathNotResolvable {
                path: "\\\\x".into()
            }
            .is_precondition()
        );
        assert!(!FavSyncError::Config("bad".into()).is_precondition());
    }

    #[test]
    fn single_validation_error_is_flattened() {
        let err = FavSyncError::from_validation_errors(vec![ValidationError::new(
            "entries[0].path",
            "cannot be empty",
        )]);
        assert!(matches!(err, FavSyncError::Validation { .. }));
        assert_eq!(
            err.to_string(),
            "Validation failed: entries[0].path: cannot be empty"
        );
    }
}

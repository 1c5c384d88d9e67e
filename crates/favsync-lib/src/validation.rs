//! Validation helpers for loaded export artifacts.
//!
//! Artifacts come from other hosts and other tools, so nothing about their
//! shape is trusted. Hard errors make the artifact unusable; warnings are
//! reported and the import proceeds.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::model::ExportArtifact;

/// Validates export artifact fields and invariants.
pub struct ArtifactValidator;

impl ArtifactValidator {
    /// Validate an artifact.
    ///
    /// Returns the non-fatal warnings on success.
    ///
    /// # Errors
    ///
    /// Returns every hard error found (entries without a usable path).
    pub fn validate(artifact: &ExportArtifact) -> Result<Vec<ValidationError>, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if !artifact.count_matches() {
            warnings.push(ValidationError::new(
                "count",
                format!(
                    "declares {} entries but contains {}",
                    artifact.count,
                    artifact.entries.len()
                ),
            ));
        }

        let mut seen = HashSet::new();
        for (idx, entry) in artifact.entries.iter().enumerate() {
            let field = |name: &str| format!("entries[{idx}].{name}");

            // Path: the identity key, required.
            if entry.path.trim().is_empty() {
                errors.push(ValidationError::new(field("path"), "cannot be empty"));
                continue;
            }

            if entry.name.trim().is_empty() {
                warnings.push(ValidationError::new(field("name"), "is empty"));
            }
            if entry.position == 0 {
                warnings.push(ValidationError::new(field("position"), "must be >= 1"));
            }
            if !seen.insert(entry.path.as_str()) {
                warnings.push(ValidationError::new(
                    field("path"),
                    format!("duplicate path '{}' within artifact", entry.path),
                ));
            }
        }

        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(errors)
        }
    }
}

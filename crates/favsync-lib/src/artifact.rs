//! JSON file I/O for export artifacts and the rollback journal.
//!
//! Both files are pretty-printed JSON with every nested structure fully
//! expanded. Writes go to a sibling temp file and are renamed into place.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{FavSyncError, Result};
use crate::model::{ExportArtifact, RollbackJournal, SCHEMA_VERSION};

/// Load an export artifact.
///
/// # Errors
///
/// Returns `ArtifactNotFound` if the file does not exist, `ArtifactCorrupt`
/// if it cannot be parsed or misses required fields, and `UnsupportedSchema`
/// if it was written by an incompatible major version.
pub fn load_export(path: &Path) -> Result<ExportArtifact> {
    let artifact: ExportArtifact =
        read_json(path).map_err(|e| not_found_as(e, path, FavSyncError::ArtifactNotFound))?;
    check_schema_version(&artifact.schema_version)?;
    Ok(artifact)
}

/// Save an export artifact with atomic write.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written.
pub fn save_export(path: &Path, artifact: &ExportArtifact) -> Result<()> {
    write_json(path, artifact)
}

/// Accept any schema version sharing the major version this crate writes.
///
/// # Errors
///
/// Returns `UnsupportedSchema` for an unparsable or incompatible version.
pub fn check_schema_version(found: &str) -> Result<()> {
    let unsupported = || FavSyncError::UnsupportedSchema {
        found: found.to_string(),
    };
    let found_version = semver::Version::parse(found).map_err(|_| unsupported())?;
    let ours = semver::Version::parse(SCHEMA_VERSION).map_err(|_| unsupported())?;
    if found_version.major == ours.major {
        Ok(())
    } else {
        Err(unsupported())
    }
}

/// Handle to the single rollback journal location.
///
/// The journal is passed explicitly into the importer and rollback engine so
/// its create, consume, delete lifecycle stays visible at call sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalFile {
    path: PathBuf,
}

impl JournalFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the journal.
    ///
    /// # Errors
    ///
    /// Returns `NoJournal` if no journal exists, `ArtifactCorrupt` if it
    /// cannot be parsed.
    pub fn load(&self) -> Result<RollbackJournal> {
        let journal: RollbackJournal = read_json(&self.path)
            .map_err(|e| not_found_as(e, &self.path, FavSyncError::NoJournal))?;
        check_schema_version(&journal.schema_version)?;
        Ok(journal)
    }

    /// Write the journal, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be written.
    pub fn save(&self, journal: &RollbackJournal) -> Result<()> {
        write_json(&self.path, journal)
    }

    /// Remove the journal. Removing an absent journal is not an error.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file exists but cannot be removed.
    pub fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FavSyncError::Io(e)),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| FavSyncError::corrupt(path, e.to_string()))
}

fn not_found_as(
    err: FavSyncError,
    path: &Path,
    make: impl FnOnce(PathBuf) -> FavSyncError,
) -> FavSyncError {
    match err {
        FavSyncError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => make(path.to_path_buf()),
        other => other,
    }
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(value)?;

    let tmp_path = tmp_path_for(path);
    let written = write_then_rename(&tmp_path, path, json.as_bytes());
    if written.is_err() && tmp_path.is_file() {
        let _ = fs::remove_file(&tmp_path);
    }
    written?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

fn write_then_rename(tmp_path: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp_path)?;
    file.write_all(bytes)?;
    file.write_all(b"\n")?;
    file.flush()?;
    drop(file);

    // Atomic rename
    fs::rename(tmp_path, path)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("artifact"), OsString::from);
    name.push(".tmp");
    path.with_file_name(name)
}

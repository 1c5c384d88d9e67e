//! Connector backed by a JSON host-state file.
//!
//! The file describes a host's favorites group and the folders it can
//! resolve. Every mutation is written back before the call returns.

use std::fs;
use std::path::{Path, PathBuf};

use crate::artifact::write_json;
use crate::connector::{HostConnector, HostState};
use crate::error::{FavSyncError, Result};
use crate::model::{FolderHandle, NavEntry};

/// File-backed host connector.
#[derive(Debug, Clone)]
pub struct FileHost {
    path: PathBuf,
    state: HostState,
}

impl FileHost {
    /// Load the host state at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorUnavailable` if the file is missing or unreadable.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            FavSyncError::unavailable(format!("cannot read host state {}: {e}", path.display()))
        })?;
        let state: HostState = serde_json::from_str(&raw).map_err(|e| {
            FavSyncError::unavailable(format!("invalid host state {}: {e}", path.display()))
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            state,
        })
    }

    /// Write `state` to `path` and open it.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be written.
    pub fn create(path: impl AsRef<Path>, state: HostState) -> Result<Self> {
        let path = path.as_ref();
        write_json(path, &state)?;
        Ok(Self {
            path: path.to_path_buf(),
            state,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn state(&self) -> &HostState {
        &self.state
    }

    /// Write `next` and adopt it only once it is on disk.
    fn commit(&mut self, next: HostState) -> Result<()> {
        write_json(&self.path, &next).map_err(|e| {
            FavSyncError::unavailable(format!(
                "cannot write host state {}: {e}",
                self.path.display()
            ))
        })?;
        self.state = next;
        Ok(())
    }
}

impl HostConnector for FileHost {
    fn list_favorites(&self) -> Result<Vec<NavEntry>> {
        self.state.favorites()
    }

    fn resolve_path(&self, path: &str) -> Result<FolderHandle> {
        self.state.resolve(path)
    }

    fn add_favorite(&mut self, handle: &FolderHandle) -> Result<()> {
        let mut next = self.state.clone();
        next.add(handle)?;
        self.commit(next)
    }

    fn remove_favorite(&mut self, path: &str) -> Result<bool> {
        let mut next = self.state.clone();
        let found = next.remove(path)?;
        if found {
            self.commit(next)?;
        }
        Ok(found)
    }

    fn host_version(&self) -> String {
        self.state.host_version.clone()
    }
}

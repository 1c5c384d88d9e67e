//! Host application connector.
//!
//! The engine only sees the live favorites set through [`HostConnector`].
//! [`HostState`] holds the shared semantics of the bundled connectors;
//! [`InMemoryConnector`] wraps it with failure injection for tests and
//! [`crate::host_file::FileHost`] persists it to disk.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{FavSyncError, Result};
use crate::model::{FolderHandle, NavEntry};

/// Capabilities the engine needs from a host instance.
pub trait HostConnector {
    /// Current favorites, in the host's native order.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorUnavailable` if the host or its navigation group
    /// cannot be reached.
    fn list_favorites(&self) -> Result<Vec<NavEntry>>;

    /// Resolve a path to a host folder.
    ///
    /// # Errors
    ///
    /// Returns `PathNotResolvable` if no folder exists at `path`.
    fn resolve_path(&self, path: &str) -> Result<FolderHandle>;

    /// Add a resolved folder to the favorites set.
    ///
    /// # Errors
    ///
    /// Returns `AddRejected` if the host refuses the folder.
    fn add_favorite(&mut self, handle: &FolderHandle) -> Result<()>;

    /// Remove the first favorite whose path equals `path`.
    ///
    /// Returns `false` when no such favorite exists.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorUnavailable` if the host cannot be reached.
    fn remove_favorite(&mut self, path: &str) -> Result<bool>;

    /// Host application version, for export provenance.
    fn host_version(&self) -> String {
        "unknown".to_string()
    }
}

/// The favorites group in the host's navigation structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NavigationGroup {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<NavEntry>,
}

/// Snapshot of a host: its favorites group and the folders it can resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HostState {
    #[serde(default = "default_host_version")]
    pub host_version: String,
    /// `None` models a host whose favorites group is missing.
    pub navigation_group: Option<NavigationGroup>,
    #[serde(default)]
    pub folders: Vec<NavEntry>,
}

fn default_host_version() -> String {
    "unknown".to_string()
}

impl Default for HostState {
    fn default() -> Self {
        Self {
            host_version: default_host_version(),
            navigation_group: Some(NavigationGroup {
                name: "Favorites".to_string(),
                entries: Vec::new(),
            }),
            folders: Vec::new(),
        }
    }
}

impl HostState {
    fn group(&self) -> Result<&NavigationGroup> {
        self.navigation_group
            .as_ref()
            .ok_or_else(|| FavSyncError::unavailable("favorites navigation group is missing"))
    }

    fn group_mut(&mut self) -> Result<&mut NavigationGroup> {
        self.navigation_group
            .as_mut()
            .ok_or_else(|| FavSyncError::unavailable("favorites navigation group is missing"))
    }

    /// Favorites in group order.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorUnavailable` if the group is missing.
    pub fn favorites(&self) -> Result<Vec<NavEntry>> {
        Ok(self.group()?.entries.clone())
    }

    /// Look up a folder by exact path.
    ///
    /// # Errors
    ///
    /// Returns `PathNotResolvable` if no folder matches.
    pub fn resolve(&self, path: &str) -> Result<FolderHandle> {
        self.folders
            .iter()
            .find(|folder| folder.path == path)
            .map(|folder| FolderHandle::new(&folder.name, &folder.path))
            .ok_or_else(|| FavSyncError::PathNotResolvable {
                path: path.to_string(),
            })
    }

    /// Append a folder to the group. A path already in the group is rejected.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorUnavailable` if the group is missing, or
    /// `AddRejected` if the path is already a favorite.
    pub fn add(&mut self, handle: &FolderHandle) -> Result<()> {
        let group = self.group_mut()?;
        if group.entries.iter().any(|e| e.path == handle.path()) {
            return Err(FavSyncError::AddRejected {
                path: handle.path().to_string(),
                reason: "folder is already in favorites".to_string(),
            });
        }
        group
            .entries
            .push(NavEntry::new(handle.name(), handle.path()));
        Ok(())
    }

    /// Remove the first favorite matching `path`.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorUnavailable` if the group is missing.
    pub fn remove(&mut self, path: &str) -> Result<bool> {
        let group = self.group_mut()?;
        match group.entries.iter().position(|e| e.path == path) {
            Some(idx) => {
                group.entries.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-process connector with failure injection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConnector {
    state: HostState,
    offline: bool,
    rejected: HashSet<String>,
    failing_removals: HashSet<String>,
}

impl InMemoryConnector {
    /// Empty favorites group, no folders.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_state(state: HostState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Make a folder resolvable without marking it as a favorite.
    #[must_use]
    pub fn with_folder(mut self, name: &str, path: &str) -> Self {
        self.state.folders.push(NavEntry::new(name, path));
        self
    }

    /// Make a folder resolvable and add it to the favorites group.
    #[must_use]
    pub fn with_favorite(mut self, name: &str, path: &str) -> Self {
        self.state.folders.push(NavEntry::new(name, path));
        if let Some(group) = self.state.navigation_group.as_mut() {
            group.entries.push(NavEntry::new(name, path));
        }
        self
    }

    #[must_use]
    pub fn with_host_version(mut self, version: &str) -> Self {
        self.state.host_version = version.to_string();
        self
    }

    /// Drop the favorites group entirely.
    #[must_use]
    pub fn without_group(mut self) -> Self {
        self.state.navigation_group = None;
        self
    }

    /// Simulate an unreachable host.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Make the host reject adds of `path`.
    pub fn reject_add(&mut self, path: &str) {
        self.rejected.insert(path.to_string());
    }

    /// Make removals of `path` fail while the host stays reachable.
    pub fn reject_remove(&mut self, path: &str) {
        self.failing_removals.insert(path.to_string());
    }

    #[must_use]
    pub fn state(&self) -> &HostState {
        &self.state
    }

    /// Paths currently in the favorites group, in order.
    #[must_use]
    pub fn favorite_paths(&self) -> Vec<String> {
        self.state
            .navigation_group
            .as_ref()
            .map(|g| g.entries.iter().map(|e| e.path.clone()).collect())
            .unwrap_or_default()
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline {
            Err(FavSyncError::unavailable("host is not running"))
        } else {
            Ok(())
        }
    }
}

impl HostConnector for InMemoryConnector {
    fn list_favorites(&self) -> Result<Vec<NavEntry>> {
        self.ensure_online()?;
        self.state.favorites()
    }

    fn resolve_path(&self, path: &str) -> Result<FolderHandle> {
        self.ensure_online()?;
        self.state.resolve(path)
    }

    fn add_favorite(&mut self, handle: &FolderHandle) -> Result<()> {
        self.ensure_online()?;
        if self.rejected.contains(handle.path()) {
            return Err(FavSyncError::AddRejected {
                path: handle.path().to_string(),
                reason: "host refused the folder".to_string(),
            });
        }
        self.state.add(handle)
    }

    fn remove_favorite(&mut self, path: &str) -> Result<bool> {
        self.ensure_online()?;
        if self.failing_removals.contains(path) {
            return Err(FavSyncError::unavailable(format!(
                "host failed to remove favorite {path}"
            )));
        }
        self.state.remove(path)
    }

    fn host_version(&self) -> String {
        self.state.host_version.clone()
    }
}

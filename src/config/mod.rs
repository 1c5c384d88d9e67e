//! Configuration management for `favsync`.
//!
//! Configuration is layered, later layers winning:
//! - Built-in defaults
//! - User config (`~/.config/favsync/config.yaml`)
//! - Workspace config (`.favsync/config.yaml`)
//! - Environment variables (`FAVSYNC_HOST_STATE`, `FAVSYNC_JOURNAL`, ...)
//! - CLI flags
//!
//! Paths in config files are relative to the workspace root, the directory
//! holding `.favsync/`.

use std::path::{Path, PathBuf};

use favsync_lib::{FileHost, HostIdentity, JournalFile};
use serde::{Deserialize, Serialize};

use crate::error::{FavSyncError, Result};
use crate::sync::history::HistoryConfig;

/// Name of the workspace directory.
pub const WORKSPACE_DIR: &str = ".favsync";
/// Config file name inside the workspace or user config directory.
pub const CONFIG_FILE: &str = "config.yaml";
/// Default rollback journal file name inside the workspace.
pub const JOURNAL_FILE: &str = "rollback-journal.json";
/// Default host state file name inside the workspace.
pub const HOST_STATE_FILE: &str = "host.json";

/// One configuration layer, as written in YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub host_state: Option<PathBuf>,
    pub journal: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
    pub host_id: Option<String>,
    pub user_id: Option<String>,
    pub log_file: Option<PathBuf>,
    pub log_json: Option<bool>,
    pub history: HistoryLayer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryLayer {
    pub enabled: Option<bool>,
    pub max_count: Option<usize>,
    pub max_age_days: Option<u32>,
}

impl ConfigLayer {
    /// Overlay `other` on `self`; values set in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            host_state: other.host_state.or(self.host_state),
            journal: other.journal.or(self.journal),
            export_dir: other.export_dir.or(self.export_dir),
            host_id: other.host_id.or(self.host_id),
            user_id: other.user_id.or(self.user_id),
            log_file: other.log_file.or(self.log_file),
            log_json: other.log_json.or(self.log_json),
            history: HistoryLayer {
                enabled: other.history.enabled.or(self.history.enabled),
                max_count: other.history.max_count.or(self.history.max_count),
                max_age_days: other.history.max_age_days.or(self.history.max_age_days),
            },
        }
    }

    /// Resolve relative paths against `root`.
    #[must_use]
    fn rooted_at(mut self, root: &Path) -> Self {
        let fix = |p: Option<PathBuf>| p.map(|p| if p.is_relative() { root.join(p) } else { p });
        self.host_state = fix(self.host_state);
        self.journal = fix(self.journal);
        self.export_dir = fix(self.export_dir);
        self.log_file = fix(self.log_file);
        self
    }
}

/// CLI-level overrides.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host_state: Option<PathBuf>,
    pub journal: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl CliOverrides {
    fn as_layer(&self) -> ConfigLayer {
        ConfigLayer {
            host_state: self.host_state.clone(),
            journal: self.journal.clone(),
            log_file: self.log_file.clone(),
            ..ConfigLayer::default()
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub workspace_dir: PathBuf,
    pub host_state: PathBuf,
    pub journal: PathBuf,
    pub export_dir: PathBuf,
    pub identity: HostIdentity,
    pub log_file: Option<PathBuf>,
    pub log_json: bool,
    pub history: HistoryConfig,
}

impl Config {
    /// Workspace root: the directory containing `.favsync/`.
    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        self.workspace_dir.parent().unwrap_or(&self.workspace_dir)
    }

    #[must_use]
    pub fn history_dir(&self) -> PathBuf {
        self.workspace_dir.join("history")
    }

    #[must_use]
    pub fn journal_file(&self) -> JournalFile {
        JournalFile::new(&self.journal)
    }

    /// Open the configured host connector.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorUnavailable` if the host state cannot be read.
    pub fn open_host(&self) -> Result<FileHost> {
        FileHost::open(&self.host_state)
    }
}

/// Find the workspace directory.
///
/// `FAVSYNC_DIR` wins; otherwise walk up from `start` (or the current
/// directory) looking for `.favsync/`. Falls back to `.favsync/` under the
/// starting directory even if it does not exist yet.
///
/// # Errors
///
/// Returns `Io` if the current directory cannot be determined.
pub fn discover_workspace_dir(start: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("FAVSYNC_DIR").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let start = match start {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir()?,
    };

    for ancestor in start.ancestors() {
        let candidate = ancestor.join(WORKSPACE_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
    }

    Ok(start.join(WORKSPACE_DIR))
}

/// User-level config file location, if a home directory is known.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg).join("favsync").join(CONFIG_FILE));
    }
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|v| !v.is_empty())
        .map(|home| PathBuf::from(home).join(".config").join("favsync").join(CONFIG_FILE))
}

/// Read one YAML layer. A missing file is an empty layer.
///
/// # Errors
///
/// Returns `Config` if the file exists but is not valid config YAML.
pub fn load_layer(path: &Path) -> Result<ConfigLayer> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ConfigLayer::default()),
        Err(e) => return Err(FavSyncError::Io(e)),
    };
    if raw.trim().is_empty() {
        return Ok(ConfigLayer::default());
    }
    // A file holding only comments parses as null.
    let layer: Option<ConfigLayer> = serde_yaml::from_str(&raw)
        .map_err(|e| FavSyncError::Config(format!("{}: {e}", path.display())))?;
    Ok(layer.unwrap_or_default())
}

/// Build a layer from `FAVSYNC_*` variables, read through `lookup`.
///
/// # Errors
///
/// Returns `Config` if a numeric or boolean variable cannot be parsed.
pub fn env_layer(lookup: impl Fn(&str) -> Option<String>) -> Result<ConfigLayer> {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let log_json = get("FAVSYNC_LOG_JSON")
        .map(|v| match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(FavSyncError::Config(format!(
                "FAVSYNC_LOG_JSON: expected a boolean, got '{other}'"
            ))),
        })
        .transpose()?;
    Ok(ConfigLayer {
        host_state: get("FAVSYNC_HOST_STATE").map(PathBuf::from),
        journal: get("FAVSYNC_JOURNAL").map(PathBuf::from),
        export_dir: get("FAVSYNC_EXPORT_DIR").map(PathBuf::from),
        host_id: get("FAVSYNC_HOST_ID"),
        user_id: get("FAVSYNC_USER_ID"),
        log_file: get("FAVSYNC_LOG_FILE").map(PathBuf::from),
        log_json,
        history: HistoryLayer::default(),
    })
}

/// Load configuration for the discovered workspace.
///
/// # Errors
///
/// Returns an error if discovery fails or any layer is invalid.
pub fn load_config(cli: &CliOverrides) -> Result<Config> {
    let workspace_dir = discover_workspace_dir(None)?;
    let user = match user_config_path() {
        Some(path) => load_layer(&path)?,
        None => ConfigLayer::default(),
    };
    let env = env_layer(|key| std::env::var(key).ok())?;
    load_config_from(&workspace_dir, user, env, cli)
}

/// Resolve configuration from explicit layers.
///
/// # Errors
///
/// Returns `Config` if the workspace config file is invalid.
pub fn load_config_from(
    workspace_dir: &Path,
    user: ConfigLayer,
    env: ConfigLayer,
    cli: &CliOverrides,
) -> Result<Config> {
    let root = workspace_dir.parent().unwrap_or(workspace_dir);
    let workspace = load_layer(&workspace_dir.join(CONFIG_FILE))?.rooted_at(root);

    let merged = user
        .rooted_at(root)
        .merge(workspace)
        .merge(env)
        .merge(cli.as_layer());

    let defaults = HistoryConfig::default();
    let history = HistoryConfig {
        enabled: merged.history.enabled.unwrap_or(defaults.enabled),
        max_count: merged.history.max_count.unwrap_or(defaults.max_count),
        max_age_days: merged.history.max_age_days.unwrap_or(defaults.max_age_days),
    };

    let env_identity = HostIdentity::from_env();
    let identity = HostIdentity::new(
        merged.host_id.unwrap_or(env_identity.host_id),
        merged.user_id.unwrap_or(env_identity.user_id),
    );

    Ok(Config {
        workspace_dir: workspace_dir.to_path_buf(),
        host_state: merged
            .host_state
            .unwrap_or_else(|| workspace_dir.join(HOST_STATE_FILE)),
        journal: merged
            .journal
            .unwrap_or_else(|| workspace_dir.join(JOURNAL_FILE)),
        export_dir: merged.export_dir.unwrap_or_else(|| root.to_path_buf()),
        identity,
        log_file: merged.log_file,
        log_json: merged.log_json.unwrap_or(false),
        history,
    })
}

/// Template written by `favsync init`.
pub const CONFIG_TEMPLATE: &str = r"# favsync workspace configuration
# Paths are relative to the directory containing .favsync/
# host_state: .favsync/host.json
# journal: .favsync/rollback-journal.json
# export_dir: .
# host_id: WS-01
# user_id: ana
# log_file: .favsync/favsync.log
# history:
#   enabled: true
#   max_count: 20
#   max_age_days: 30
";

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn workspace() -> (tempfile::TempDir, PathBuf) {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join(WORKSPACE_DIR);
        fs::create_dir_all(&dir).unwrap();
        (temp, dir)
    }

    #[test]
    fn defaults_live_in_workspace() {
        let (temp, dir) = workspace();
        let config = load_config_from(
            &dir,
            ConfigLayer::default(),
            ConfigLayer::default(),
            &CliOverrides::default(),
        )
        .unwrap();
        assert_eq!(config.journal, dir.join(JOURNAL_FILE));
        assert_eq!(config.host_state, dir.join(HOST_STATE_FILE));
        assert_eq!(config.export_dir, temp.path());
        assert_eq!(config.workspace_root(), temp.path());
        assert!(config.history.enabled);
    }

    #[test]
    fn later_layers_win() {
        let (temp, dir) = workspace();
        fs::write(
            dir.join(CONFIG_FILE),
            "host_state: hosts/primary.json\nhost_id: WS-YAML\nhistory:\n  max_count: 3\n",
        )
        .unwrap();
        let user = ConfigLayer {
            host_id: Some("WS-USER".to_string()),
            user_id: Some("ana".to_string()),
            ..ConfigLayer::default()
        };
        let env = env_layer(|key| (key == "FAVSYNC_JOURNAL").then(|| "/tmp/j.json".to_string()))
            .unwrap();
        let cli = CliOverrides {
            host_state: Some(PathBuf::from("/srv/host.json")),
            ..CliOverrides::default()
        };

        let config = load_config_from(&dir, user, env, &cli).unwrap();
        assert_eq!(config.host_state, PathBuf::from("/srv/host.json"));
        assert_eq!(config.journal, PathBuf::from("/tmp/j.json"));
        assert_eq!(config.identity.host_id, "WS-YAML");
        assert_eq!(config.identity.user_id, "ana");
        assert_eq!(config.history.max_count, 3);

        let config = load_config_from(
            &dir,
            ConfigLayer::default(),
            ConfigLayer::default(),
            &CliOverrides::default(),
        )
        .unwrap();
        assert_eq!(config.host_state, temp.path().join("hosts/primary.json"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let (_temp, dir) = workspace();
        fs::write(dir.join(CONFIG_FILE), "jounral: typo.json\n").unwrap();
        let err = load_config_from(
            &dir,
            ConfigLayer::default(),
            ConfigLayer::default(),
            &CliOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FavSyncError::Config(_)));
    }

    #[test]
    fn template_parses_as_empty_layer() {
        let layer: Option<ConfigLayer> = serde_yaml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(layer.unwrap_or_default(), ConfigLayer::default());
    }

    #[test]
    fn env_layer_rejects_bad_boolean() {
        let err = env_layer(|key| (key == "FAVSYNC_LOG_JSON").then(|| "maybe".to_string()))
            .unwrap_err();
        assert!(matches!(err, FavSyncError::Config(_)));
    }

    #[test]
    fn discovery_walks_up() {
        let (temp, dir) = workspace();
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        if std::env::var_os("FAVSYNC_DIR").is_none() {
            assert_eq!(discover_workspace_dir(Some(&nested)).unwrap(), dir);
        }
    }
}

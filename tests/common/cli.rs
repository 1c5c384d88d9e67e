use assert_cmd::Command;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::process::ExitStatus;
use tempfile::TempDir;

/// Temporary directory with a `.favsync/` workspace and host state files.
pub struct FavWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

pub struct RunOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl FavWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let root = temp_dir.path().to_path_buf();
        fs::create_dir_all(root.join(".favsync")).expect("create workspace dir");
        Self { temp_dir, root }
    }

    /// Write a host state with `favorites` in the group and `folders` resolvable.
    pub fn write_host(&self, file: &str, favorites: &[(&str, &str)], folders: &[(&str, &str)]) {
        let to_json = |items: &[(&str, &str)]| {
            items
                .iter()
                .map(|(name, path)| serde_json::json!({ "name": name, "path": path }))
                .collect::<Vec<_>>()
        };
        let mut all_folders = to_json(folders);
        all_folders.extend(to_json(favorites));
        let state = serde_json::json!({
            "hostVersion": "16.0.17328",
            "navigationGroup": { "name": "Favorites", "entries": to_json(favorites) },
            "folders": all_folders,
        });
        fs::write(
            self.root.join(file),
            serde_json::to_string_pretty(&state).unwrap(),
        )
        .expect("write host state");
    }

    /// Favorite paths currently in a host state file.
    pub fn host_paths(&self, file: &str) -> Vec<String> {
        let raw = fs::read_to_string(self.root.join(file)).expect("read host state");
        let state: serde_json::Value = serde_json::from_str(&raw).expect("parse host state");
        state["navigationGroup"]["entries"]
            .as_array()
            .expect("entries array")
            .iter()
            .map(|e| e["path"].as_str().unwrap().to_string())
            .collect()
    }

    pub fn journal_path(&self) -> PathBuf {
        self.root.join(".favsync").join("rollback-journal.json")
    }
}

/// A `favsync` command inside the workspace with a clean environment.
pub fn favsync_cmd(workspace: &FavWorkspace) -> Command {
    let mut cmd = Command::cargo_bin("favsync").expect("favsync binary");
    cmd.current_dir(&workspace.root)
        .env("HOME", &workspace.root)
        .env("FAVSYNC_HOST_ID", "WS-TEST")
        .env("FAVSYNC_USER_ID", "tester")
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("FAVSYNC_DIR")
        .env_remove("FAVSYNC_HOST_STATE")
        .env_remove("FAVSYNC_JOURNAL")
        .env_remove("FAVSYNC_EXPORT_DIR")
        .env_remove("FAVSYNC_LOG")
        .env_remove("FAVSYNC_LOG_FILE")
        .env_remove("FAVSYNC_LOG_JSON");
    cmd
}

/// Run `favsync` inside the workspace and capture its output.
pub fn run_favsync<I, S>(workspace: &FavWorkspace, args: I, label: &str) -> RunOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = favsync_cmd(workspace)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("{label}: failed to run favsync: {e}"));

    RunOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

//! Logging setup for the `favsync` binary.
//!
//! Console output goes to stderr so stdout stays clean for command output
//! and `--json`. An optional log file always records run events at info
//! level or above.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry, fmt};

/// Environment variable that overrides the console filter.
pub const LOG_ENV: &str = "FAVSYNC_LOG";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Console filter directive for the given verbosity flags.
#[must_use]
pub const fn console_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a subscriber is
/// already installed.
pub fn init_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let console_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(console_level(verbose, quiet)));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let console = fmt::layer().with_writer(std::io::stderr).with_target(false);
    if json {
        layers.push(console.json().with_filter(console_filter).boxed());
    } else {
        layers.push(console.with_filter(console_filter).boxed());
    }

    if let Some(path) = log_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let file_layer = fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true);
        let file_filter = EnvFilter::new("info");
        if json {
            layers.push(file_layer.json().with_filter(file_filter).boxed());
        } else {
            layers.push(file_layer.with_filter(file_filter).boxed());
        }
    }

    tracing_subscriber::registry().with(layers).try_init()?;
    tracing::debug!("Logging initialized");
    Ok(())
}

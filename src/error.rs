//! Error types for `favsync`.
//!
//! Commands return the library's [`FavSyncError`]; the CLI layer carries it
//! inside `anyhow::Error` and maps it to a process exit code here.

pub use favsync_lib::error::{FavSyncError, Result, ValidationError};

/// Exit code for any failure that is not a precondition error.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code when a run was refused before anything was modified.
pub const EXIT_PRECONDITION: i32 = 2;

/// Map a CLI error to the process exit code.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<FavSyncError>() {
        Some(e) if e.is_precondition() => EXIT_PRECONDITION,
        _ => EXIT_FAILURE,
    }
}

//! Artifact housekeeping for `favsync`.
//!
//! This module handles:
//! - Backing up export artifacts before they are overwritten
//! - Rotating and pruning those backups
pub mod history;

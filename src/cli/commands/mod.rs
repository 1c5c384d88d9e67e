//! Command implementations.

pub mod completions;
pub mod doctor;
pub mod export;
pub mod history;
pub mod import;
pub mod init;
pub mod list;
pub mod rollback;
pub mod schema;
pub mod show;
pub mod version;

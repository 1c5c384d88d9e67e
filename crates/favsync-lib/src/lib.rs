//! `favsync-lib` - favorites export, import and rollback engine.
//!
//! The live favorites set is reached only through a [`HostConnector`].
//! Export artifacts and the rollback journal are plain JSON files.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use favsync_lib::{FileHost, HostIdentity, JournalFile, TracingSink};
//!
//! let mut host = FileHost::open(".favsync/host.json").unwrap();
//! let journal = JournalFile::new(".favsync/rollback-journal.json");
//! let identity = HostIdentity::from_env();
//!
//! // Import, journaling what was added
//! let report = favsync_lib::import_from_path(
//!     Path::new("favorites.json"), &mut host, &identity, &journal, &TracingSink,
//! ).unwrap();
//! println!("{} added", report.added_count());
//!
//! // Undo it
//! favsync_lib::rollback(&mut host, &journal, &TracingSink).unwrap();
//! ```

pub mod artifact;
pub mod connector;
pub mod error;
pub mod events;
pub mod export;
pub mod host_file;
pub mod import;
pub mod model;
pub mod rollback;
pub mod util;
pub mod validation;

pub use artifact::JournalFile;
pub use connector::{HostConnector, HostState, InMemoryConnector, NavigationGroup};
pub use error::{FavSyncError, Result};
pub use events::{EventLevel, EventSink, MemorySink, TracingSink};
pub use export::export_favorites;
pub use host_file::FileHost;
pub use import::{
    ImportReport, ImportStatus, MergePlan, PlanAction, import_favorites, import_from_path,
    plan_import,
};
pub use model::{ExportArtifact, FavoriteEntry, FolderHandle, JournalEntry, NavEntry, RollbackJournal};
pub use rollback::{RollbackReport, RollbackStatus, rollback};
pub use util::HostIdentity;

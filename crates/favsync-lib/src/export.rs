//! Exporter: snapshot the live favorites set into an [`ExportArtifact`].
//!
//! Reading is the only interaction with the host. Persisting the artifact is
//! left to the caller (see [`crate::artifact::save_export`]).

use chrono::Utc;

use crate::connector::HostConnector;
use crate::error::{FavSyncError, Result};
use crate::events::EventSink;
use crate::model::{ExportArtifact, FavoriteEntry, SCHEMA_VERSION};
use crate::util::HostIdentity;

/// Export the current favorites.
///
/// Entries keep the connector's order; `position` is the 1-based read index.
///
/// # Errors
///
/// Returns `ConnectorUnavailable` if the host cannot be read, or
/// `EmptyFavorites` if the favorites group has no entries.
pub fn export_favorites<C>(
    connector: &C,
    identity: &HostIdentity,
    sink: &dyn EventSink,
) -> Result<ExportArtifact>
where
    C: HostConnector + ?Sized,
{
    sink.info("Reading favorites from host");
    let live = connector.list_favorites().inspect_err(|e| {
        sink.error(&format!("Cannot read favorites: {e}"));
    })?;

    if live.is_empty() {
        sink.warn("Favorites group is empty; nothing to export");
        return Err(FavSyncError::EmptyFavorites);
    }

    let entries: Vec<FavoriteEntry> = live
        .into_iter()
        .enumerate()
        .map(|(idx, nav)| FavoriteEntry {
            name: nav.name,
            path: nav.path,
            position: u32::try_from(idx + 1).unwrap_or(u32::MAX),
        })
        .collect();

    for entry in &entries {
        sink.info(&format!("  [{}] {} ({})", entry.position, entry.name, entry.path));
    }

    let artifact = ExportArtifact {
        schema_version: SCHEMA_VERSION.to_string(),
        export_date: Utc::now(),
        host_id: identity.host_id.clone(),
        user_id: identity.user_id.clone(),
        host_version: connector.host_version(),
        count: entries.len(),
        entries,
    };

    sink.success(&format!("Exported {} favorite(s)", artifact.count));
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::InMemoryConnector;
    use crate::events::{EventLevel, MemorySink};

    fn identity() -> HostIdentity {
        HostIdentity::new("WS-01", "ana")
    }

    #[test]
    fn export_assigns_positions_in_read_order() {
        let host = InMemoryConnector::new()
            .with_host_version("16.0.17328")
            .with_favorite("Inbox", "\\\\ana\\Inbox")
            .with_favorite("Projects", "\\\\ana\\Inbox\\Projects")
            .with_favorite("Inbox", "\\\\shared\\Inbox");
        let sink = MemorySink::new();

        let artifact = export_favorites(&host, &identity(), &sink).unwrap();
        assert_eq!(artifact.count, 3);
        assert_eq!(artifact.host_id, "WS-01");
        assert_eq!(artifact.user_id, "ana");
        assert_eq!(artifact.host_version, "16.0.17328");
        let positions: Vec<u32> = artifact.entries.iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(artifact.entries[2].path, "\\\\shared\\Inbox");
        assert_eq!(sink.messages(EventLevel::Success).len(), 1);
    }

    #[test]
    fn export_does_not_mutate_host() {
        let host = InMemoryConnector::new().with_favorite("Inbox", "\\\\ana\\Inbox");
        let before = host.state().clone();
        export_favorites(&host, &identity(), &MemorySink::new()).unwrap();
        assert_eq!(host.state(), &before);
    }

    #[test]
    fn empty_group_is_distinct_from_unavailable() {
        let host = InMemoryConnector::new();
        let err = export_favorites(&host, &identity(), &MemorySink::new()).unwrap_err();
        assert!(matches!(err, FavSyncError::EmptyFavorites));

        let host = InMemoryConnector::new().without_group();
        let err = export_favorites(&host, &identity(), &MemorySink::new()).unwrap_err();
        assert!(matches!(err, FavSyncError::ConnectorUnavailable { .. }));
    }

    #[test]
    fn export_is_idempotent_on_entries() {
        let host = InMemoryConnector::new()
            .with_favorite("Inbox", "\\\\ana\\Inbox")
            .with_favorite("Sent", "\\\\ana\\Sent");
        let first = export_favorites(&host, &identity(), &MemorySink::new()).unwrap();
        let second = export_favorites(&host, &identity(), &MemorySink::new()).unwrap();
        assert_eq!(first.entries, second.entries);
    }
}

use crate::cli::SchemaKind;
use crate::error::Result;
use favsync_lib::{ExportArtifact, HostState, RollbackJournal};
use schemars::schema_for;

/// Execute the schema command.
///
/// # Errors
///
/// Returns an error if the schema cannot be serialized.
pub fn execute(kind: SchemaKind) -> Result<()> {
    let schema = match kind {
        SchemaKind::Export => schema_for!(ExportArtifact),
        SchemaKind::Journal => schema_for!(RollbackJournal),
        SchemaKind::Host => schema_for!(HostState),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

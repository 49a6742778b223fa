use serde_json::Value;
use tracing::debug;

use crate::error::BoardError;
use crate::lenient::value_kind;
use crate::snapshot::BoardSnapshot;

/// Parse a JSON string into a BoardSnapshot.
///
/// Only the top-level shape is checked here. Field-level problems are absorbed
/// by the lenient decoders and never fail the parse.
pub fn parse_snapshot_json(json_str: &str) -> Result<BoardSnapshot, BoardError> {
    let value: Value = serde_json::from_str(json_str)?;
    snapshot_from_value(value)
}

/// Parse a YAML string into a BoardSnapshot
pub fn parse_snapshot_yaml(yaml_str: &str) -> Result<BoardSnapshot, BoardError> {
    let value: Value = serde_yaml::from_str(yaml_str)?;
    snapshot_from_value(value)
}

/// Build a snapshot from an already-decoded value.
///
/// # Errors
///
/// `BoardError::InvalidSnapshot` when the value is not an object.
pub fn snapshot_from_value(value: Value) -> Result<BoardSnapshot, BoardError> {
    if !value.is_object() {
        return Err(BoardError::InvalidSnapshot(format!(
            "expected an object at the top level, found {}",
            value_kind(&value)
        )));
    }

    let mut snapshot: BoardSnapshot = serde_json::from_value(value)?;
    snapshot.assign_missing_ids();

    debug!(
        elements = snapshot.elements.len(),
        connections = snapshot.connections.len(),
        strokes = snapshot.strokes.len(),
        "Parsed board snapshot"
    );
    Ok(snapshot)
}

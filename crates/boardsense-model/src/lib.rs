//! # Boardsense Model
//!
//! Raw whiteboard snapshots and their canonical graph form. This crate
//! decodes snapshots leniently (JSON or YAML) and normalizes them into the
//! `CanonicalGraph` consumed by the analysis engine.
//!
//! ## Example
//!
//! ```
//! use boardsense_model::{extract, parse_snapshot_json};
//!
//! let json = r#"{
//!     "elements": [
//!         { "id": "a", "text": "Start", "shape": "start", "x": 0, "y": 0 },
//!         { "id": "b", "text": "Done", "shape": "end", "x": 200, "y": 0 }
//!     ],
//!     "connections": [ { "id": "e1", "source": "a", "target": "b" } ]
//! }"#;
//!
//! let snapshot = parse_snapshot_json(json).unwrap();
//! let graph = extract(&snapshot);
//! assert_eq!(graph.text_elements.len(), 2);
//! assert_eq!(graph.stats.connection_count, 1);
//! ```

mod error;
mod extractor;
mod lenient;
mod parser;
mod types;

pub mod snapshot;

pub use error::BoardError;
pub use extractor::{extract, BoardStats, CanonicalGraph, GraphNode, TextElement, VisualElement};
pub use parser::{parse_snapshot_json, parse_snapshot_yaml, snapshot_from_value};
pub use snapshot::{BoardSnapshot, Connection, Element, Stroke};
pub use types::{ElementKind, GeometryType, Position};

/// Returns a version string for the Boardsense model crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

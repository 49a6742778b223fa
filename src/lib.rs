//! # Boardsense
//!
//! Deterministic semantic analysis and validation of collaborative
//! whiteboard graphs.
//!
//! This crate bundles the workspace crates behind one dependency:
//!
//! - [`model`]: snapshot decoding and the canonical graph
//! - [`analysis`]: clustering, topics, structure checks, patches and reports
//! - [`store`]: the namespaced vector store interface
//!
//! ```
//! let report = boardsense::analyze_json(
//!     r#"{ "elements": [ { "id": "a", "text": "Lonely idea", "x": 0, "y": 0 } ] }"#,
//!     &boardsense::AnalysisConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(report.issues_of_type("isolated_nodes").count(), 1);
//! ```

pub use boardsense_analysis as analysis;
pub use boardsense_model as model;
pub use boardsense_store as store;

pub use boardsense_analysis::{
    analyze_json, AnalysisConfig, AnalysisError, AnalysisReport, BoardAnalyzer, Diagnostic, DiagnosticKind,
    EnrichmentProvider, Patch, Severity,
};
pub use boardsense_model::{parse_snapshot_json, parse_snapshot_yaml, BoardError, BoardSnapshot};
pub use boardsense_store::{InMemoryVectorStore, VectorStore};

//! # Boardsense Analysis
//!
//! Deterministic, rule-based analysis of whiteboard graphs. Given a board
//! snapshot this crate derives spatial clusters, keyword topics, hierarchies,
//! cycles, dependency chains and duplicate labels, runs a fixed battery of
//! structural checks and proposes prioritized remediation patches.
//!
//! ## Example
//!
//! ```
//! use boardsense_analysis::{BoardAnalyzer, AnalysisConfig};
//! use boardsense_model::parse_snapshot_json;
//!
//! let snapshot = parse_snapshot_json(r#"{
//!     "elements": [
//!         { "id": "a", "text": "Draft", "x": 0, "y": 0 },
//!         { "id": "b", "text": "Review", "x": 400, "y": 0 },
//!         { "id": "c", "text": "Revise", "x": 800, "y": 0 }
//!     ],
//!     "connections": [
//!         { "id": "e1", "source": "a", "target": "b" },
//!         { "id": "e2", "source": "b", "target": "c" },
//!         { "id": "e3", "source": "c", "target": "a" }
//!     ]
//! }"#).unwrap();
//!
//! let analyzer = BoardAnalyzer::new(AnalysisConfig::default()).unwrap();
//! let report = analyzer.analyze(&snapshot);
//!
//! assert_eq!(report.cycles.len(), 1);
//! assert_eq!(report.issues_of_type("circular_dependencies").count(), 1);
//! assert!(report.summary.health_score < 100);
//! ```

pub mod chains;
pub mod clustering;
mod config;
pub mod cycles;
pub mod diagnostics;
pub mod duplicates;
mod engine;
pub mod enrichment;
mod error;
pub mod graph;
pub mod hierarchy;
pub mod patches;
pub mod report;
pub mod terminology;
mod text;
pub mod topics;

pub use chains::{DependencyAnalysis, DependencyChain};
pub use clustering::{BoundingBox, Cluster};
pub use config::AnalysisConfig;
pub use cycles::Cycle;
pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use duplicates::{DuplicateKind, DuplicatePair, DuplicateReport};
pub use engine::{analyze_json, BoardAnalyzer};
pub use enrichment::{Enrichment, EnrichmentError, EnrichmentProvider};
pub use error::{AnalysisError, AnalysisResult};
pub use graph::GraphIndex;
pub use hierarchy::{Hierarchy, HierarchyNode};
pub use patches::{Patch, PatchAction, PatchSource, PatchType, Priority};
pub use report::{AnalysisReport, SeverityCounts, Summary};
pub use terminology::{TerminologyIssue, TerminologyIssueKind};
pub use topics::Topic;

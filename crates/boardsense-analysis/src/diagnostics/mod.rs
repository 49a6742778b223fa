//! Structural checks over the board graph.
//!
//! Each rule inspects the resolved graph independently and reports zero or
//! more [`Diagnostic`]s. Severity is a static lookup on the finding kind.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::cycles::Cycle;
use crate::error::AnalysisError;
use crate::graph::GraphIndex;

mod decision_rules;
mod flow_rules;
mod label_rules;
mod structure_rules;

/// Severity of a finding, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Severity::Critical, Severity::High, Severity::Medium, Severity::Low];

    /// Health score points deducted per finding
    pub fn penalty(self) -> u32 {
        match self {
            Severity::Critical => 20,
            Severity::High => 10,
            Severity::Medium => 5,
            Severity::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// True when this severity is `threshold` or worse
    pub fn at_least(self, threshold: Severity) -> bool {
        self <= threshold
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            other => Err(AnalysisError::UnknownSeverity(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelIssue {
    Empty,
    TooShort,
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionIssue {
    TooFewBranches,
    UnlabeledBranches,
}

/// Finding category plus its structured payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DiagnosticKind {
    #[serde(rename = "dead_ends")]
    DeadEnd,

    #[serde(rename = "missing_labels")]
    MissingLabel { issue: LabelIssue },

    #[serde(rename = "circular_dependencies")]
    CircularDependency { cycle: Vec<String> },

    #[serde(rename = "unreachable_nodes")]
    Unreachable,

    #[serde(rename = "multiple_starts")]
    MultipleStarts { starts: Vec<String> },

    #[serde(rename = "no_end_points")]
    NoEndPoints,

    #[serde(rename = "isolated_nodes")]
    Isolated,

    #[serde(rename = "invalid_decisions", rename_all = "camelCase")]
    InvalidDecision { issue: DecisionIssue, branch_count: usize },

    #[serde(rename = "broken_connections")]
    BrokenConnection { missing: Vec<String> },

    #[serde(rename = "overlapping_nodes")]
    Overlap { distance: f64 },
}

impl DiagnosticKind {
    /// Serialized type code
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::DeadEnd => "dead_ends",
            DiagnosticKind::MissingLabel { .. } => "missing_labels",
            DiagnosticKind::CircularDependency { .. } => "circular_dependencies",
            DiagnosticKind::Unreachable => "unreachable_nodes",
            DiagnosticKind::MultipleStarts { .. } => "multiple_starts",
            DiagnosticKind::NoEndPoints => "no_end_points",
            DiagnosticKind::Isolated => "isolated_nodes",
            DiagnosticKind::InvalidDecision { .. } => "invalid_decisions",
            DiagnosticKind::BrokenConnection { .. } => "broken_connections",
            DiagnosticKind::Overlap { .. } => "overlapping_nodes",
        }
    }

    pub fn severity(&self, strict: bool) -> Severity {
        match self {
            DiagnosticKind::BrokenConnection { .. } => Severity::Critical,
            DiagnosticKind::Unreachable | DiagnosticKind::NoEndPoints | DiagnosticKind::Isolated => Severity::High,
            DiagnosticKind::CircularDependency { .. } if strict => Severity::High,
            DiagnosticKind::CircularDependency { .. } => Severity::Medium,
            DiagnosticKind::DeadEnd | DiagnosticKind::MultipleStarts { .. } => Severity::Medium,
            DiagnosticKind::MissingLabel { issue } => match issue {
                LabelIssue::Empty => Severity::High,
                LabelIssue::Generic => Severity::Medium,
                LabelIssue::TooShort => Severity::Low,
            },
            DiagnosticKind::InvalidDecision { issue, .. } => match issue {
                DecisionIssue::TooFewBranches => Severity::High,
                DecisionIssue::UnlabeledBranches => Severity::Medium,
            },
            DiagnosticKind::Overlap { .. } => Severity::Low,
        }
    }
}

/// One structural finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    #[serde(flatten)]
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub element_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edge_ids: Vec<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, strict: bool, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: kind.severity(strict),
            kind,
            message: message.into(),
            element_ids: Vec::new(),
            edge_ids: Vec::new(),
        }
    }

    pub fn with_element(mut self, id: impl Into<String>) -> Self {
        self.element_ids.push(id.into());
        self
    }

    pub fn with_elements<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.element_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_edges<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edge_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Everything a rule may inspect
pub struct RuleContext<'a> {
    pub index: &'a GraphIndex<'a>,
    pub cycles: &'a [Cycle],
    pub config: &'a AnalysisConfig,
}

impl RuleContext<'_> {
    pub fn strict(&self) -> bool {
        self.config.strict_mode
    }
}

/// A structural check over the board graph
pub trait Rule {
    /// Stable rule name, reported when the rule is skipped
    fn name(&self) -> &'static str;

    /// Whether the rule can run on this board
    fn applies(&self, _context: &RuleContext<'_>) -> bool {
        true
    }

    fn check(&self, context: &RuleContext<'_>) -> Vec<Diagnostic>;
}

/// Output of a full diagnostic run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosticRun {
    pub diagnostics: Vec<Diagnostic>,
    /// Names of rules that declined to run
    pub skipped: Vec<String>,
}

fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(structure_rules::BrokenConnectionRule),
        Box::new(flow_rules::DeadEndRule),
        Box::new(label_rules::LabelRule),
        Box::new(structure_rules::CircularLogicRule),
        Box::new(flow_rules::UnreachableRule),
        Box::new(flow_rules::MultipleStartsRule),
        Box::new(flow_rules::NoEndPointsRule),
        Box::new(flow_rules::IsolatedNodeRule),
        Box::new(decision_rules::DecisionRule),
        Box::new(structure_rules::OverlapRule),
    ]
}

/// Run the full rule battery
pub fn run_diagnostics(context: &RuleContext<'_>) -> DiagnosticRun {
    let mut run = DiagnosticRun::default();

    for rule in default_rules() {
        if !rule.applies(context) {
            warn!(rule = rule.name(), nodes = context.index.node_count(), "Skipping diagnostic rule");
            run.skipped.push(rule.name().to_string());
            continue;
        }
        let findings = rule.check(context);
        debug!(rule = rule.name(), findings = findings.len(), "Diagnostic rule complete");
        run.diagnostics.extend(findings);
    }

    run
}

//! Remediation patches.
//!
//! Every diagnostic category, duplicate pair and terminology issue maps onto a
//! fixed patch template. Patches are advisory: they describe an edit, the
//! caller decides whether to apply it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use boardsense_model::{GeometryType, Position};

use crate::config::AnalysisConfig;
use crate::diagnostics::{DecisionIssue, Diagnostic, DiagnosticKind, LabelIssue, Severity};
use crate::duplicates::DuplicateReport;
use crate::graph::GraphIndex;
use crate::terminology::{TerminologyIssue, TerminologyIssueKind};

/// Offset used when placing a new node next to an existing one
const PLACEMENT_OFFSET: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl From<Severity> for Priority {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Critical | Severity::High => Priority::High,
            Severity::Medium => Priority::Medium,
            Severity::Low => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchSource {
    #[default]
    Heuristic,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchType {
    AddEndNode,
    AddPlaceholderLabel,
    ImproveLabel,
    BreakCycle,
    ConnectUnreachable,
    AddSingleStart,
    AddEndPoint,
    SuggestConnection,
    AddDecisionBranch,
    LabelDecisionBranches,
    RemoveBrokenConnection,
    SeparateOverlap,
    MergeDuplicates,
    ReviewSimilar,
    NormalizeCase,
    UnifyTerminology,
    ExpandAbbreviation,
    /// Free-form suggestion, typically from an external provider
    Suggestion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeLabel {
    pub edge_id: String,
    pub label: String,
}

/// The edit a patch proposes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PatchAction {
    #[serde(rename_all = "camelCase")]
    AddNode {
        label: String,
        shape: Option<GeometryType>,
        position: Position,
        /// New edges from these nodes to the new node
        connect_from: Vec<String>,
        /// New edges from the new node to these nodes
        connect_to: Vec<String>,
        edge_label: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    AddEdge {
        source: String,
        target: String,
        label: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    RemoveEdge { edge_id: String },
    #[serde(rename_all = "camelCase")]
    UpdateLabel { element_id: String, label: String },
    LabelEdges { labels: Vec<EdgeLabel> },
    MergeNodes { keep: String, remove: Vec<String> },
    #[serde(rename_all = "camelCase")]
    FindAndReplace {
        find: Vec<String>,
        replace: String,
        element_ids: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    MoveNode { element_id: String, dx: f64, dy: f64 },
    /// No structured edit; the reasoning says what to change
    Review,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    /// Assigned when the patch joins a report
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub patch_type: PatchType,
    pub priority: Priority,
    #[serde(default)]
    pub target_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edge_ids: Vec<String>,
    pub action: PatchAction,
    pub reasoning: String,
    #[serde(default)]
    pub auto_applicable: bool,
    #[serde(default)]
    pub requires_user_input: bool,
    #[serde(default)]
    pub source: PatchSource,
}

impl Patch {
    pub fn new(patch_type: PatchType, priority: Priority, action: PatchAction, reasoning: impl Into<String>) -> Self {
        Patch {
            id: String::new(),
            patch_type,
            priority,
            target_ids: Vec::new(),
            edge_ids: Vec::new(),
            action,
            reasoning: reasoning.into(),
            auto_applicable: false,
            requires_user_input: false,
            source: PatchSource::Heuristic,
        }
    }

    pub fn with_targets<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_ids.extend(ids.into_iter().map(Into::into));
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

    pub fn auto_applicable(mut self) -> Self {
        self.auto_applicable = true;
        self
    }

    pub fn needs_input(mut self) -> Self {
        self.requires_user_input = true;
        self
    }
}

/// Stable sort by priority, high first
pub fn sort_by_priority(patches: &mut [Patch]) {
    patches.sort_by_key(|patch| patch.priority);
}

struct PatchGenerator<'a> {
    index: &'a GraphIndex<'a>,
    config: &'a AnalysisConfig,
    /// Reachability from every entry point, shared by all unreachable findings
    reachable: Vec<bool>,
    patches: Vec<Patch>,
}

impl<'a> PatchGenerator<'a> {
    fn new(index: &'a GraphIndex<'a>, config: &'a AnalysisConfig) -> Self {
        PatchGenerator {
            index,
            config,
            reachable: index.reachable_from(&index.entry_points()),
            patches: Vec::new(),
        }
    }

    fn push(&mut self, mut patch: Patch) {
        patch.id = format!("patch-{}", self.patches.len() + 1);
        self.patches.push(patch);
    }

    fn position_of(&self, id: &str) -> Option<Position> {
        self.index.index_of(id).map(|i| self.index.node(i).position)
    }

    fn name_of(&self, id: &'a str) -> &'a str {
        match self.index.index_of(id) {
            Some(i) => self.index.node(i).display_name(),
            None => id,
        }
    }

    /// Closest node to `target` among nodes accepted by `candidate`
    fn nearest<F>(&self, target: usize, candidate: F) -> Option<usize>
    where
        F: Fn(usize) -> bool,
    {
        let origin = self.index.node(target).position;
        let mut best: Option<(usize, f64)> = None;
        for (i, node) in self.index.nodes() {
            if i == target || !candidate(i) {
                continue;
            }
            let distance = origin.distance_to(&node.position);
            if best.map_or(true, |(_, closest)| distance < closest) {
                best = Some((i, distance));
            }
        }
        best.map(|(i, _)| i)
    }

    fn diagnostic(&mut self, diagnostic: &'a Diagnostic) {
        let priority = Priority::from(diagnostic.severity);
        let first = diagnostic.element_ids.first().map(String::as_str);

        match (&diagnostic.kind, first) {
            (DiagnosticKind::DeadEnd, Some(id)) => self.dead_end(id, priority),
            (DiagnosticKind::MissingLabel { issue }, Some(id)) => self.label(id, *issue, priority),
            (DiagnosticKind::CircularDependency { cycle }, _) => self.cycle(diagnostic, cycle, priority),
            (DiagnosticKind::Unreachable, Some(id)) => self.unreachable(id, priority),
            (DiagnosticKind::MultipleStarts { starts }, _) => self.multiple_starts(starts, priority),
            (DiagnosticKind::NoEndPoints, _) => self.no_end_points(priority),
            (DiagnosticKind::Isolated, Some(id)) => self.isolated(id, priority),
            (DiagnosticKind::InvalidDecision { issue, branch_count }, Some(id)) => {
                self.decision(diagnostic, id, *issue, *branch_count, priority)
            }
            (DiagnosticKind::BrokenConnection { missing }, _) => self.broken(diagnostic, missing, priority),
            (DiagnosticKind::Overlap { distance }, _) => self.overlap(diagnostic, *distance, priority),
            _ => {}
        }
    }

    fn dead_end(&mut self, id: &'a str, priority: Priority) {
        let position = self.position_of(id).unwrap_or_default();
        self.push(
            Patch::new(
                PatchType::AddEndNode,
                priority,
                PatchAction::AddNode {
                    label: "End".to_string(),
                    shape: Some(GeometryType::End),
                    position: Position::new(position.x + PLACEMENT_OFFSET, position.y),
                    connect_from: vec![id.to_string()],
                    connect_to: Vec::new(),
                    edge_label: None,
                },
                format!("Flow stops at '{}'; add an explicit end node after it", self.name_of(id)),
            )
            .with_targets([id])
            .auto_applicable(),
        );
    }

    fn label(&mut self, id: &'a str, issue: LabelIssue, priority: Priority) {
        let (patch_type, label, reasoning) = match issue {
            LabelIssue::Empty => (
                PatchType::AddPlaceholderLabel,
                "Describe this step".to_string(),
                format!("Node '{}' has no label; give it a descriptive one", id),
            ),
            LabelIssue::TooShort | LabelIssue::Generic => {
                let current = self.name_of(id);
                (
                    PatchType::ImproveLabel,
                    current.to_string(),
                    format!("Replace '{}' with a label describing what happens at this step", current),
                )
            }
        };
        self.push(
            Patch::new(
                patch_type,
                priority,
                PatchAction::UpdateLabel {
                    element_id: id.to_string(),
                    label,
                },
                reasoning,
            )
            .with_targets([id])
            .needs_input(),
        );
    }

    fn cycle(&mut self, diagnostic: &'a Diagnostic, cycle: &'a [String], priority: Priority) {
        let Some(closing) = diagnostic.edge_ids.last() else {
            return;
        };
        self.push(
            Patch::new(
                PatchType::BreakCycle,
                priority,
                PatchAction::RemoveEdge {
                    edge_id: closing.clone(),
                },
                format!(
                    "Remove the connection closing the loop through {} node(s), or add an exit condition",
                    cycle.len()
                ),
            )
            .with_targets(cycle.iter().cloned())
            .with_edges([closing.clone()])
            .needs_input(),
        );
    }

    fn unreachable(&mut self, id: &'a str, priority: Priority) {
        let Some(target) = self.index.index_of(id) else {
            return;
        };
        let Some(source) = self.nearest(target, |i| self.reachable[i]) else {
            return;
        };
        let source = &self.index.node(source).id;
        self.push(
            Patch::new(
                PatchType::ConnectUnreachable,
                priority,
                PatchAction::AddEdge {
                    source: source.clone(),
                    target: id.to_string(),
                    label: None,
                },
                format!(
                    "'{}' is never reached; connect it from the nearest reachable node '{}'",
                    self.name_of(id),
                    self.name_of(source)
                ),
            )
            .with_targets([id]),
        );
    }

    fn multiple_starts(&mut self, starts: &'a [String], priority: Priority) {
        let positions: Vec<Position> = starts.iter().filter_map(|id| self.position_of(id)).collect();
        let centroid = Position::centroid(&positions).unwrap_or_default();
        let top = positions.iter().map(|p| p.y).fold(centroid.y, f64::min);
        self.push(
            Patch::new(
                PatchType::AddSingleStart,
                priority,
                PatchAction::AddNode {
                    label: "Start".to_string(),
                    shape: Some(GeometryType::Start),
                    position: Position::new(centroid.x, top - PLACEMENT_OFFSET),
                    connect_from: Vec::new(),
                    connect_to: starts.to_vec(),
                    edge_label: None,
                },
                format!("The flow begins in {} places; add a single start node leading to each", starts.len()),
            )
            .with_targets(starts.iter().cloned()),
        );
    }

    fn no_end_points(&mut self, priority: Priority) {
        // attach to the rightmost node, first on ties
        let mut rightmost: Option<(usize, f64)> = None;
        for (i, node) in self.index.nodes() {
            if rightmost.map_or(true, |(_, x)| node.position.x > x) {
                rightmost = Some((i, node.position.x));
            }
        }
        let Some((anchor, _)) = rightmost else {
            return;
        };
        let anchor = self.index.node(anchor);
        self.push(
            Patch::new(
                PatchType::AddEndPoint,
                priority,
                PatchAction::AddNode {
                    label: "End".to_string(),
                    shape: Some(GeometryType::End),
                    position: Position::new(anchor.position.x + PLACEMENT_OFFSET, anchor.position.y),
                    connect_from: vec![anchor.id.clone()],
                    connect_to: Vec::new(),
                    edge_label: None,
                },
                "Every node leads somewhere else; add an end node where the flow should finish",
            )
            .with_targets([anchor.id.clone()])
            .needs_input(),
        );
    }

    fn isolated(&mut self, id: &'a str, priority: Priority) {
        let Some(target) = self.index.index_of(id) else {
            return;
        };
        let index = self.index;
        let connected = self.nearest(target, |i| !index.is_isolated(i));
        let Some(source) = connected.or_else(|| self.nearest(target, |_| true)) else {
            return;
        };
        let source = &index.node(source).id;
        self.push(
            Patch::new(
                PatchType::SuggestConnection,
                priority,
                PatchAction::AddEdge {
                    source: source.clone(),
                    target: id.to_string(),
                    label: None,
                },
                format!(
                    "'{}' is not connected; link it from nearby '{}' or remove it",
                    self.name_of(id),
                    self.name_of(source)
                ),
            )
            .with_targets([id]),
        );
    }

    fn decision(
        &mut self,
        diagnostic: &'a Diagnostic,
        id: &'a str,
        issue: DecisionIssue,
        branch_count: usize,
        priority: Priority,
    ) {
        match issue {
            DecisionIssue::TooFewBranches => {
                let position = self.position_of(id).unwrap_or_default();
                let edge_label = if branch_count == 0 { "Yes" } else { "No" };
                self.push(
                    Patch::new(
                        PatchType::AddDecisionBranch,
                        priority,
                        PatchAction::AddNode {
                            label: "Alternative outcome".to_string(),
                            shape: None,
                            position: Position::new(position.x + PLACEMENT_OFFSET, position.y + PLACEMENT_OFFSET),
                            connect_from: vec![id.to_string()],
                            connect_to: Vec::new(),
                            edge_label: Some(edge_label.to_string()),
                        },
                        format!(
                            "Decision '{}' has {} branch(es); a decision needs at least two outcomes",
                            self.name_of(id),
                            branch_count
                        ),
                    )
                    .with_targets([id])
                    .needs_input(),
                );
            }
            DecisionIssue::UnlabeledBranches => {
                let labels: Vec<EdgeLabel> = diagnostic
                    .edge_ids
                    .iter()
                    .enumerate()
                    .map(|(n, edge_id)| EdgeLabel {
                        edge_id: edge_id.clone(),
                        label: branch_label(n, diagnostic.edge_ids.len(), branch_count),
                    })
                    .collect();
                // yes/no is a safe guess only for a plain two-way split
                let two_way = branch_count == 2 && diagnostic.edge_ids.len() == 2;
                let mut patch = Patch::new(
                    PatchType::LabelDecisionBranches,
                    priority,
                    PatchAction::LabelEdges { labels },
                    format!("Label each branch of decision '{}' with its condition", self.name_of(id)),
                )
                .with_targets([id])
                .with_edges(diagnostic.edge_ids.iter().cloned());
                patch = if two_way { patch.auto_applicable() } else { patch.needs_input() };
                self.push(patch);
            }
        }
    }

    fn broken(&mut self, diagnostic: &'a Diagnostic, missing: &'a [String], priority: Priority) {
        let Some(edge_id) = diagnostic.edge_ids.first() else {
            return;
        };
        self.push(
            Patch::new(
                PatchType::RemoveBrokenConnection,
                priority,
                PatchAction::RemoveEdge {
                    edge_id: edge_id.clone(),
                },
                format!("Connection '{}' points at missing element(s) {}", edge_id, missing.join(", ")),
            )
            .with_targets(diagnostic.element_ids.iter().cloned())
            .with_edges([edge_id.clone()])
            .auto_applicable(),
        );
    }

    fn overlap(&mut self, diagnostic: &'a Diagnostic, distance: f64, priority: Priority) {
        let [anchor, moved] = diagnostic.element_ids.as_slice() else {
            return;
        };
        let (Some(from), Some(to)) = (self.position_of(anchor), self.position_of(moved)) else {
            return;
        };
        let threshold = self.config.overlap_distance;
        let (dx, dy) = if distance > 0.0 {
            let scale = (threshold - distance) / distance;
            ((to.x - from.x) * scale, (to.y - from.y) * scale)
        } else {
            (threshold, 0.0)
        };
        self.push(
            Patch::new(
                PatchType::SeparateOverlap,
                priority,
                PatchAction::MoveNode {
                    element_id: moved.clone(),
                    dx,
                    dy,
                },
                format!("Move '{}' away from '{}' so they no longer overlap", self.name_of(moved), self.name_of(anchor)),
            )
            .with_targets([anchor.clone(), moved.clone()])
            .auto_applicable(),
        );
    }

    fn duplicates(&mut self, duplicates: &'a DuplicateReport) {
        // one merge per original, duplicates in discovery order
        let mut groups: Vec<(&str, Vec<String>)> = Vec::new();
        for pair in &duplicates.exact {
            match groups.iter_mut().find(|(keep, _)| *keep == pair.original_id) {
                Some((_, remove)) => remove.push(pair.duplicate_id.clone()),
                None => groups.push((pair.original_id.as_str(), vec![pair.duplicate_id.clone()])),
            }
        }
        for (keep, remove) in groups {
            let mut targets = vec![keep.to_string()];
            targets.extend(remove.iter().cloned());
            self.push(
                Patch::new(
                    PatchType::MergeDuplicates,
                    Priority::Medium,
                    PatchAction::MergeNodes {
                        keep: keep.to_string(),
                        remove,
                    },
                    format!("'{}' appears more than once; merge the copies", self.name_of(keep)),
                )
                .with_targets(targets)
                .needs_input(),
            );
        }

        for pair in &duplicates.similar {
            self.push(
                Patch::new(
                    PatchType::ReviewSimilar,
                    Priority::Low,
                    PatchAction::MergeNodes {
                        keep: pair.original_id.clone(),
                        remove: vec![pair.duplicate_id.clone()],
                    },
                    format!(
                        "'{}' and '{}' are {}% similar; merge them if they describe the same step",
                        pair.original_text, pair.duplicate_text, pair.similarity
                    ),
                )
                .with_targets([pair.original_id.clone(), pair.duplicate_id.clone()])
                .needs_input(),
            );
        }
    }

    fn terminology(&mut self, issue: &'a TerminologyIssue) {
        let find: Vec<String> = issue
            .variants
            .iter()
            .filter(|variant| **variant != issue.canonical)
            .cloned()
            .collect();
        if find.is_empty() {
            return;
        }

        let (patch_type, auto) = match issue.kind {
            TerminologyIssueKind::CaseInconsistency => (PatchType::NormalizeCase, true),
            TerminologyIssueKind::TerminologyInconsistency => (PatchType::UnifyTerminology, false),
            TerminologyIssueKind::AbbreviationMix => (PatchType::ExpandAbbreviation, false),
        };
        let patch = Patch::new(
            patch_type,
            Priority::from(issue.severity),
            PatchAction::FindAndReplace {
                find,
                replace: issue.canonical.clone(),
                element_ids: issue.element_ids.clone(),
            },
            format!("{}; standardize on '{}'", issue.message, issue.canonical),
        )
        .with_targets(issue.element_ids.iter().cloned());
        self.push(if auto { patch.auto_applicable() } else { patch.needs_input() });
    }
}

fn branch_label(n: usize, unlabeled: usize, branch_count: usize) -> String {
    if branch_count == 2 && unlabeled == 2 {
        let label = if n == 0 { "Yes" } else { "No" };
        return label.to_string();
    }
    format!("Option {}", n + 1)
}

/// Map every finding onto its patch template and order by priority
pub fn generate_patches(
    index: &GraphIndex<'_>,
    diagnostics: &[Diagnostic],
    duplicates: &DuplicateReport,
    terminology: &[TerminologyIssue],
    config: &AnalysisConfig,
) -> Vec<Patch> {
    let mut generator = PatchGenerator::new(index, config);

    for diagnostic in diagnostics {
        generator.diagnostic(diagnostic);
    }
    generator.duplicates(duplicates);
    for issue in terminology {
        generator.terminology(issue);
    }

    let mut patches = generator.patches;
    sort_by_priority(&mut patches);
    debug!(patches = patches.len(), "Patch generation complete");
    patches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycles::detect_cycles;
    use crate::diagnostics::{run_diagnostics, RuleContext};
    use crate::duplicates::find_duplicates;
    use crate::terminology::check_terminology;
    use boardsense_model::{extract, BoardSnapshot, CanonicalGraph, Connection, Element};

    fn patches_for(snapshot: &BoardSnapshot) -> Vec<Patch> {
        let graph: CanonicalGraph = extract(snapshot);
        let index = GraphIndex::build(&graph);
        let cycles = detect_cycles(&index);
        let config = AnalysisConfig::default();
        let run = run_diagnostics(&RuleContext {
            index: &index,
            cycles: &cycles,
            config: &config,
        });
        let duplicates = find_duplicates(&graph.text_elements, config.similarity_threshold, config.max_pairwise_elements);
        let terminology = check_terminology(&graph.text_elements);
        generate_patches(&index, &run.diagnostics, &duplicates, &terminology, &config)
    }

    fn find(patches: &[Patch], patch_type: PatchType) -> Vec<&Patch> {
        patches.iter().filter(|p| p.patch_type == patch_type).collect()
    }

    #[test]
    fn test_dead_end_gets_end_node() {
        let snapshot = BoardSnapshot::new()
            .with_element(Element::node("s", Some("Start"), 0.0, 0.0).with_shape("start"))
            .with_element(Element::node("a", Some("Charge card"), 400.0, 100.0))
            .with_connection(Connection::new("e1", "s", "a"));

        let patches = patches_for(&snapshot);

        let end = find(&patches, PatchType::AddEndNode);
        assert_eq!(end.len(), 1);
        assert!(end[0].auto_applicable);
        assert_eq!(
            end[0].action,
            PatchAction::AddNode {
                label: "End".into(),
                shape: Some(GeometryType::End),
                position: Position::new(600.0, 100.0),
                connect_from: vec!["a".into()],
                connect_to: vec![],
                edge_label: None,
            }
        );
    }

    #[test]
    fn test_sorted_by_priority_with_sequential_ids() {
        let snapshot = BoardSnapshot::new()
            .with_element(Element::node("a", Some("Step 1"), 0.0, 0.0))
            .with_element(Element::node("b", Some("Ship parcel"), 400.0, 0.0))
            .with_connection(Connection::new("e1", "a", "b"))
            .with_connection(Connection::new("e2", "b", "ghost"));

        let patches = patches_for(&snapshot);

        let priorities: Vec<Priority> = patches.iter().map(|p| p.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);

        let broken = find(&patches, PatchType::RemoveBrokenConnection);
        assert_eq!(broken[0].priority, Priority::High);
        assert_eq!(broken[0].action, PatchAction::RemoveEdge { edge_id: "e2".into() });

        let mut ids: Vec<&str> = patches.iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), patches.len(), "patch ids are unique");
    }

    #[test]
    fn test_every_unreachable_node_connected_from_reachable_side() {
        let snapshot = BoardSnapshot::new()
            .with_element(Element::node("s", Some("Start"), 0.0, 0.0).with_shape("start"))
            .with_element(Element::node("a", Some("Pick items"), 400.0, 0.0))
            .with_element(Element::node("x", Some("Restock"), 800.0, 0.0))
            .with_element(Element::node("y", Some("Audit shelf"), 1200.0, 0.0))
            .with_connection(Connection::new("e1", "s", "a"))
            .with_connection(Connection::new("e2", "x", "y"))
            .with_connection(Connection::new("e3", "y", "x"));

        let patches = patches_for(&snapshot);

        let connects: Vec<&PatchAction> = find(&patches, PatchType::ConnectUnreachable)
            .into_iter()
            .map(|patch| &patch.action)
            .collect();
        assert_eq!(
            connects,
            vec![
                &PatchAction::AddEdge {
                    source: "a".into(),
                    target: "x".into(),
                    label: None,
                },
                &PatchAction::AddEdge {
                    source: "a".into(),
                    target: "y".into(),
                    label: None,
                },
            ]
        );
    }

    #[test]
    fn test_missing_label_requires_input() {
        let snapshot = BoardSnapshot::new()
            .with_element(Element::node("a", None, 0.0, 0.0).with_shape("start"));

        let patches = patches_for(&snapshot);

        let label = find(&patches, PatchType::AddPlaceholderLabel);
        assert_eq!(label.len(), 1);
        assert!(label[0].requires_user_input);
        assert!(!label[0].auto_applicable);
    }

    #[test]
    fn test_isolated_suggests_nearest_connected_node() {
        let snapshot = BoardSnapshot::new()
            .with_element(Element::node("s", Some("Start"), 0.0, 0.0).with_shape("start"))
            .with_element(Element::node("e", Some("Finish"), 400.0, 0.0).with_shape("end"))
            .with_element(Element::node("lost", Some("Forgotten"), 500.0, 0.0))
            .with_connection(Connection::new("e1", "s", "e"));

        let patches = patches_for(&snapshot);

        let suggestion = find(&patches, PatchType::SuggestConnection);
        assert_eq!(suggestion.len(), 1);
        assert!(!suggestion[0].auto_applicable);
        assert_eq!(
            suggestion[0].action,
            PatchAction::AddEdge {
                source: "e".into(),
                target: "lost".into(),
                label: None,
            }
        );
    }

    #[test]
    fn test_decision_branch_labels() {
        let snapshot = BoardSnapshot::new()
            .with_element(Element::node("d", Some("In stock?"), 0.0, 0.0).with_shape("decision"))
            .with_element(Element::node("y", Some("Ship it"), 400.0, 0.0).with_shape("end"))
            .with_element(Element::node("n", Some("Backorder"), 400.0, 200.0).with_shape("end"))
            .with_connection(Connection::new("b1", "d", "y"))
            .with_connection(Connection::new("b2", "d", "n"));

        let patches = patches_for(&snapshot);

        let labels = find(&patches, PatchType::LabelDecisionBranches);
        assert_eq!(labels.len(), 1);
        assert!(labels[0].auto_applicable);
        assert_eq!(
            labels[0].action,
            PatchAction::LabelEdges {
                labels: vec![
                    EdgeLabel { edge_id: "b1".into(), label: "Yes".into() },
                    EdgeLabel { edge_id: "b2".into(), label: "No".into() },
                ]
            }
        );
    }

    #[test]
    fn test_duplicates_merge_per_original() {
        let snapshot = BoardSnapshot::new()
            .with_element(Element::node("a", Some("Send invoice"), 0.0, 0.0))
            .with_element(Element::node("b", Some("send invoice"), 400.0, 0.0))
            .with_element(Element::node("c", Some("Send Invoice"), 800.0, 0.0));

        let patches = patches_for(&snapshot);

        let merges = find(&patches, PatchType::MergeDuplicates);
        assert_eq!(merges.len(), 1);
        assert_eq!(
            merges[0].action,
            PatchAction::MergeNodes {
                keep: "a".into(),
                remove: vec!["b".into(), "c".into()],
            }
        );
    }

    #[test]
    fn test_case_inconsistency_is_auto_applicable() {
        let snapshot = BoardSnapshot::new()
            .with_element(Element::node("a", Some("Invoice customer"), 0.0, 0.0))
            .with_element(Element::node("b", Some("Email invoice"), 400.0, 0.0))
            .with_element(Element::node("c", Some("Archive Invoice"), 800.0, 0.0));

        let patches = patches_for(&snapshot);

        let normalize = find(&patches, PatchType::NormalizeCase);
        assert_eq!(normalize.len(), 1);
        assert!(normalize[0].auto_applicable);
        assert_eq!(
            normalize[0].action,
            PatchAction::FindAndReplace {
                find: vec!["invoice".into()],
                replace: "Invoice".into(),
                element_ids: vec!["a".into(), "b".into(), "c".into()],
            }
        );
    }

    #[test]
    fn test_action_serialization() {
        let patch = Patch::new(
            PatchType::SeparateOverlap,
            Priority::Low,
            PatchAction::MoveNode {
                element_id: "b".into(),
                dx: 10.0,
                dy: 0.0,
            },
            "Move b",
        );
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value["type"], "separate_overlap");
        assert_eq!(value["action"]["action"], "move_node");
        assert_eq!(value["action"]["elementId"], "b");
        assert_eq!(value["autoApplicable"], false);
        assert_eq!(value["source"], "heuristic");
    }
}

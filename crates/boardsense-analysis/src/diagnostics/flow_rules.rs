use lazy_static::lazy_static;
use std::collections::HashSet;

use boardsense_model::{GeometryType, GraphNode};

use crate::diagnostics::{Diagnostic, DiagnosticKind, Rule, RuleContext};
use crate::text::words;

lazy_static! {
    static ref TERMINAL_WORDS: HashSet<&'static str> =
        ["end", "finish", "finished", "done", "stop", "complete", "completed", "exit"]
            .into_iter()
            .collect();
}

/// Typed End, or labelled with terminal vocabulary
fn is_terminal(node: &GraphNode) -> bool {
    if node.is_shape(&GeometryType::End) {
        return true;
    }
    node.label
        .as_deref()
        .map(|label| {
            words(label)
                .into_iter()
                .any(|word| TERMINAL_WORDS.contains(word.to_lowercase().as_str()))
        })
        .unwrap_or(false)
}

/// Flow stops at a node that is not a declared end
pub struct DeadEndRule;

impl Rule for DeadEndRule {
    fn name(&self) -> &'static str {
        "dead_ends"
    }

    fn check(&self, context: &RuleContext<'_>) -> Vec<Diagnostic> {
        let index = context.index;
        index
            .nodes()
            .filter(|&(i, node)| index.out_degree(i) == 0 && index.in_degree(i) > 0 && !is_terminal(node))
            .map(|(_, node)| {
                Diagnostic::new(
                    DiagnosticKind::DeadEnd,
                    context.strict(),
                    format!("'{}' has no outgoing connections and is not an end point", node.display_name()),
                )
                .with_element(&node.id)
            })
            .collect()
    }
}

/// Connected nodes that no entry point leads to
pub struct UnreachableRule;

impl Rule for UnreachableRule {
    fn name(&self) -> &'static str {
        "unreachable_nodes"
    }

    fn check(&self, context: &RuleContext<'_>) -> Vec<Diagnostic> {
        let index = context.index;
        let entries = index.entry_points();
        if entries.is_empty() {
            return Vec::new();
        }

        let reached = index.reachable_from(&entries);
        index
            .nodes()
            .filter(|&(i, _)| !reached[i] && !index.is_isolated(i))
            .map(|(_, node)| {
                Diagnostic::new(
                    DiagnosticKind::Unreachable,
                    context.strict(),
                    format!("'{}' cannot be reached from any start node", node.display_name()),
                )
                .with_element(&node.id)
            })
            .collect()
    }
}

/// More than one place where the flow begins
pub struct MultipleStartsRule;

impl Rule for MultipleStartsRule {
    fn name(&self) -> &'static str {
        "multiple_starts"
    }

    fn check(&self, context: &RuleContext<'_>) -> Vec<Diagnostic> {
        let index = context.index;
        // declared starts and untyped roots both begin a flow
        let starts = index.entry_points();
        if starts.len() < 2 {
            return Vec::new();
        }

        let ids: Vec<String> = starts.iter().map(|&i| index.node(i).id.clone()).collect();
        vec![Diagnostic::new(
            DiagnosticKind::MultipleStarts { starts: ids.clone() },
            context.strict(),
            format!("Board has {} start points", ids.len()),
        )
        .with_elements(ids)]
    }
}

/// Board-level: nowhere for the flow to finish
pub struct NoEndPointsRule;

impl Rule for NoEndPointsRule {
    fn name(&self) -> &'static str {
        "no_end_points"
    }

    fn check(&self, context: &RuleContext<'_>) -> Vec<Diagnostic> {
        let index = context.index;
        if index.node_count() == 0 {
            return Vec::new();
        }

        let has_end = index
            .nodes()
            .any(|(i, node)| index.out_degree(i) == 0 || node.is_shape(&GeometryType::End));
        if has_end {
            return Vec::new();
        }

        vec![Diagnostic::new(
            DiagnosticKind::NoEndPoints,
            context.strict(),
            "Board has no end point: every node has an outgoing connection",
        )]
    }
}

/// Nodes with no connections at all, declared starts excepted
pub struct IsolatedNodeRule;

impl Rule for IsolatedNodeRule {
    fn name(&self) -> &'static str {
        "isolated_nodes"
    }

    fn check(&self, context: &RuleContext<'_>) -> Vec<Diagnostic> {
        let index = context.index;
        index
            .nodes()
            .filter(|&(i, node)| index.is_isolated(i) && !node.is_shape(&GeometryType::Start))
            .map(|(_, node)| {
                Diagnostic::new(
                    DiagnosticKind::Isolated,
                    context.strict(),
                    format!("'{}' is not connected to anything", node.display_name()),
                )
                .with_element(&node.id)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::test_support::check;
    use crate::diagnostics::Severity;
    use boardsense_model::{BoardSnapshot, Connection, Element};

    fn start_to_end() -> BoardSnapshot {
        BoardSnapshot::new()
            .with_element(Element::node("s", Some("Begin"), 0.0, 0.0).with_shape("start"))
            .with_element(Element::node("e", Some("Wrap up"), 400.0, 0.0).with_shape("end"))
            .with_connection(Connection::new("e1", "s", "e"))
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<&'static str> {
        diagnostics.iter().map(Diagnostic::code).collect()
    }

    #[test]
    fn test_start_to_end_is_clean() {
        let snapshot = start_to_end();
        assert!(check(&DeadEndRule, &snapshot).is_empty());
        assert!(check(&IsolatedNodeRule, &snapshot).is_empty());
        assert!(check(&NoEndPointsRule, &snapshot).is_empty());
        assert!(check(&UnreachableRule, &snapshot).is_empty());
    }

    #[test]
    fn test_dead_end_exemptions() {
        let snapshot = BoardSnapshot::new()
            .with_element(Element::node("a", Some("Collect input"), 0.0, 0.0))
            .with_element(Element::node("b", Some("Validate"), 400.0, 0.0))
            .with_element(Element::node("c", Some("All done"), 800.0, 0.0))
            .with_connection(Connection::new("e1", "a", "b"))
            .with_connection(Connection::new("e2", "a", "c"));

        let findings = check(&DeadEndRule, &snapshot);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].element_ids, vec!["b"]);
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_unreachable_excludes_isolated() {
        let snapshot = BoardSnapshot::new()
            .with_element(Element::node("s", Some("Start"), 0.0, 0.0).with_shape("start"))
            .with_element(Element::node("a", Some("Step A"), 400.0, 0.0))
            .with_element(Element::node("x", Some("Loop one"), 800.0, 0.0))
            .with_element(Element::node("y", Some("Loop two"), 1200.0, 0.0))
            .with_element(Element::node("lonely", Some("Orphan"), 1600.0, 0.0))
            .with_connection(Connection::new("e1", "s", "a"))
            .with_connection(Connection::new("e2", "x", "y"))
            .with_connection(Connection::new("e3", "y", "x"));

        let findings = check(&UnreachableRule, &snapshot);

        let ids: Vec<&str> = findings.iter().map(|d| d.element_ids[0].as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
        assert_eq!(codes(&check(&IsolatedNodeRule, &snapshot)), vec!["isolated_nodes"]);
    }

    #[test]
    fn test_no_entry_points_skips_unreachable() {
        let snapshot = BoardSnapshot::new()
            .with_element(Element::node("a", Some("A"), 0.0, 0.0))
            .with_element(Element::node("b", Some("B"), 400.0, 0.0))
            .with_connection(Connection::new("e1", "a", "b"))
            .with_connection(Connection::new("e2", "b", "a"));

        assert!(check(&UnreachableRule, &snapshot).is_empty());
        assert_eq!(codes(&check(&NoEndPointsRule, &snapshot)), vec!["no_end_points"]);
    }

    fn flagged_starts(snapshot: &BoardSnapshot) -> Option<Vec<String>> {
        let findings = check(&MultipleStartsRule, snapshot);
        assert!(findings.len() <= 1, "at most one board-level finding: {:?}", findings);
        findings.into_iter().next().map(|finding| match finding.kind {
            DiagnosticKind::MultipleStarts { starts } => starts,
            other => panic!("unexpected kind {:?}", other),
        })
    }

    #[test]
    fn test_multiple_starts_counts_declared_and_roots() {
        let merge = || {
            BoardSnapshot::new()
                .with_element(Element::node("m", Some("Merge"), 800.0, 0.0))
                .with_element(Element::node("e", Some("Finish"), 1200.0, 0.0).with_shape("end"))
                .with_connection(Connection::new("e0", "m", "e"))
        };
        let untyped = |id: &str, y: f64| Element::node(id, Some("Intake"), 0.0, y);
        let typed = |id: &str, y: f64| Element::node(id, Some("Begin"), 0.0, y).with_shape("start");

        let cases: Vec<(&str, BoardSnapshot, Option<Vec<&str>>)> = vec![
            (
                "two roots",
                merge()
                    .with_element(untyped("r1", 0.0))
                    .with_element(untyped("r2", 400.0))
                    .with_connection(Connection::new("e1", "r1", "m"))
                    .with_connection(Connection::new("e2", "r2", "m")),
                Some(vec!["r1", "r2"]),
            ),
            (
                "two declared starts",
                merge()
                    .with_element(typed("s1", 0.0))
                    .with_element(typed("s2", 400.0))
                    .with_connection(Connection::new("e1", "s1", "m"))
                    .with_connection(Connection::new("e2", "s2", "m")),
                Some(vec!["s1", "s2"]),
            ),
            (
                "declared start plus an untyped root",
                merge()
                    .with_element(typed("s", 0.0))
                    .with_element(untyped("r", 400.0))
                    .with_connection(Connection::new("e1", "s", "m"))
                    .with_connection(Connection::new("e2", "r", "m")),
                Some(vec!["s", "r"]),
            ),
            (
                "declared start that is also the root",
                merge()
                    .with_element(typed("s", 0.0))
                    .with_connection(Connection::new("e1", "s", "m")),
                None,
            ),
            (
                "single untyped root",
                merge()
                    .with_element(untyped("r", 0.0))
                    .with_connection(Connection::new("e1", "r", "m")),
                None,
            ),
        ];

        for (name, snapshot, expected) in cases {
            let expected = expected.map(|ids| ids.into_iter().map(String::from).collect::<Vec<_>>());
            assert_eq!(flagged_starts(&snapshot), expected, "case: {}", name);
        }
    }

    #[test]
    fn test_declared_start_not_isolated() {
        let snapshot = BoardSnapshot::new()
            .with_element(Element::node("s", Some("Start"), 0.0, 0.0).with_shape("start"));
        assert!(check(&IsolatedNodeRule, &snapshot).is_empty());
    }
}

use crate::diagnostics::{Diagnostic, DiagnosticKind, Rule, RuleContext};

/// Connections pointing at ids that are not nodes on the board
pub struct BrokenConnectionRule;

impl Rule for BrokenConnectionRule {
    fn name(&self) -> &'static str {
        "broken_connections"
    }

    fn check(&self, context: &RuleContext<'_>) -> Vec<Diagnostic> {
        let index = context.index;
        index
            .broken_edges()
            .iter()
            .map(|broken| {
                let connection = index.connection(broken.connection);
                let present = [&connection.source, &connection.target]
                    .into_iter()
                    .filter(|id| index.index_of(id).is_some())
                    .cloned();

                Diagnostic::new(
                    DiagnosticKind::BrokenConnection {
                        missing: broken.missing.clone(),
                    },
                    context.strict(),
                    format!(
                        "Connection '{}' references missing element(s): {}",
                        connection.id,
                        broken
                            .missing
                            .iter()
                            .map(|id| format!("'{}'", id))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                )
                .with_elements(present)
                .with_edges([connection.id.clone()])
            })
            .collect()
    }
}

/// One finding per detected cycle
pub struct CircularLogicRule;

impl Rule for CircularLogicRule {
    fn name(&self) -> &'static str {
        "circular_dependencies"
    }

    fn check(&self, context: &RuleContext<'_>) -> Vec<Diagnostic> {
        let index = context.index;
        context
            .cycles
            .iter()
            .map(|cycle| {
                let mut names: Vec<&str> = cycle
                    .nodes
                    .iter()
                    .map(|id| match index.index_of(id) {
                        Some(i) => index.node(i).display_name(),
                        None => id.as_str(),
                    })
                    .collect();
                if let Some(first) = names.first().copied() {
                    names.push(first);
                }

                Diagnostic::new(
                    DiagnosticKind::CircularDependency {
                        cycle: cycle.nodes.clone(),
                    },
                    context.strict(),
                    format!("Circular flow: {}", names.join(" -> ")),
                )
                .with_elements(cycle.nodes.iter().cloned())
                .with_edges(cycle.edges.iter().cloned())
            })
            .collect()
    }
}

/// Node centres closer than the overlap distance
pub struct OverlapRule;

impl Rule for OverlapRule {
    fn name(&self) -> &'static str {
        "overlapping_nodes"
    }

    fn applies(&self, context: &RuleContext<'_>) -> bool {
        context.index.node_count() <= context.config.max_pairwise_elements
    }

    fn check(&self, context: &RuleContext<'_>) -> Vec<Diagnostic> {
        let nodes = &context.index.graph().nodes;
        let threshold = context.config.overlap_distance;
        let mut diagnostics = Vec::new();

        for (i, left) in nodes.iter().enumerate() {
            for right in &nodes[i + 1..] {
                let distance = left.position.distance_to(&right.position);
                if distance < threshold {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::Overlap { distance },
                            context.strict(),
                            format!(
                                "'{}' and '{}' overlap ({:.1} units apart)",
                                left.display_name(),
                                right.display_name(),
                                distance
                            ),
                        )
                        .with_elements([left.id.clone(), right.id.clone()]),
                    );
                }
            }
        }

        diagnostics
    }
}

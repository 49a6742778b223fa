use boardsense_model::GeometryType;

use crate::diagnostics::{DecisionIssue, Diagnostic, DiagnosticKind, Rule, RuleContext};

/// Decision nodes need two or more labelled branches
pub struct DecisionRule;

impl Rule for DecisionRule {
    fn name(&self) -> &'static str {
        "invalid_decisions"
    }

    fn check(&self, context: &RuleContext<'_>) -> Vec<Diagnostic> {
        let index = context.index;
        let mut diagnostics = Vec::new();

        for (i, node) in index.nodes() {
            if !node.is_shape(&GeometryType::Decision) {
                continue;
            }
            let branches = index.outgoing(i);

            if branches.len() < 2 {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::InvalidDecision {
                            issue: DecisionIssue::TooFewBranches,
                            branch_count: branches.len(),
                        },
                        context.strict(),
                        format!(
                            "Decision '{}' has {} outgoing branch(es), expected at least 2",
                            node.display_name(),
                            branches.len()
                        ),
                    )
                    .with_element(&node.id),
                );
            }

            let unlabeled: Vec<String> = branches
                .iter()
                .map(|edge| index.connection(edge.connection))
                .filter(|connection| !connection.is_labeled())
                .map(|connection| connection.id.clone())
                .collect();

            if !unlabeled.is_empty() {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::InvalidDecision {
                            issue: DecisionIssue::UnlabeledBranches,
                            branch_count: branches.len(),
                        },
                        context.strict(),
                        format!(
                            "Decision '{}' has {} unlabeled branch(es)",
                            node.display_name(),
                            unlabeled.len()
                        ),
                    )
                    .with_element(&node.id)
                    .with_edges(unlabeled),
                );
            }
        }

        diagnostics
    }
}

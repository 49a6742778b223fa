use lazy_static::lazy_static;
use regex::Regex;

use crate::diagnostics::{Diagnostic, DiagnosticKind, LabelIssue, Rule, RuleContext};

/// Labels under this many characters are too short to be meaningful
const MIN_LABEL_LEN: usize = 3;

lazy_static! {
    static ref GENERIC_LABEL: Regex =
        Regex::new(r"(?i)^(step|node|item|task|box|stage|process|untitled|text|new node|shape)\s*\d*$").unwrap();
}

pub fn is_generic_label(label: &str) -> bool {
    GENERIC_LABEL.is_match(label.trim())
}

/// Missing, too short or placeholder labels
pub struct LabelRule;

impl Rule for LabelRule {
    fn name(&self) -> &'static str {
        "missing_labels"
    }

    fn check(&self, context: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for (_, node) in context.index.nodes() {
            let (issue, message) = match node.label.as_deref() {
                None => (LabelIssue::Empty, format!("Node '{}' has no label", node.id)),
                Some(label) if label.chars().count() < MIN_LABEL_LEN => (
                    LabelIssue::TooShort,
                    format!("Label '{}' is too short to describe the step", label),
                ),
                Some(label) if is_generic_label(label) => (
                    LabelIssue::Generic,
                    format!("Label '{}' is a generic placeholder", label),
                ),
                Some(_) => continue,
            };

            diagnostics.push(
                Diagnostic::new(DiagnosticKind::MissingLabel { issue }, context.strict(), message)
                    .with_element(&node.id),
            );
        }

        diagnostics
    }
}

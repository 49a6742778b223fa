//! Vocabulary consistency across labels.
//!
//! Label words are reduced to a crude stem and grouped. A stem written in
//! more than one way is a finding: differing only in case is a low severity
//! case inconsistency, anything else a medium terminology inconsistency.
//! Mixed use of a word and its common abbreviation is reported separately.

use serde::{Deserialize, Serialize};
use tracing::debug;

use boardsense_model::TextElement;

use crate::diagnostics::Severity;
use crate::text::words;

/// Words of this length or shorter are ignored unless fused with a particle
const MIN_TOKEN_LEN: usize = 4;

const PARTICLES: [&str; 2] = ["in", "on"];

const SUFFIXES: [&str; 3] = ["ing", "ed", "s"];

/// Full form and its abbreviation
const ABBREVIATIONS: [(&str, &str); 14] = [
    ("database", "db"),
    ("authentication", "auth"),
    ("application", "app"),
    ("configuration", "config"),
    ("information", "info"),
    ("administrator", "admin"),
    ("repository", "repo"),
    ("environment", "env"),
    ("message", "msg"),
    ("identifier", "id"),
    ("document", "doc"),
    ("organization", "org"),
    ("development", "dev"),
    ("production", "prod"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminologyIssueKind {
    CaseInconsistency,
    TerminologyInconsistency,
    AbbreviationMix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminologyIssue {
    #[serde(rename = "type")]
    pub kind: TerminologyIssueKind,
    pub severity: Severity,
    pub stem: String,
    /// Surface forms in first-seen order
    pub variants: Vec<String>,
    /// Suggested form to standardize on
    pub canonical: String,
    pub element_ids: Vec<String>,
    pub message: String,
}

/// Lowercased stem of a token
pub fn stem(token: &str) -> String {
    let mut stem: String = token
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    for suffix in SUFFIXES {
        if stem.len() >= suffix.len() + 3 && stem.ends_with(suffix) {
            stem.truncate(stem.len() - suffix.len());
            break;
        }
    }
    for particle in PARTICLES {
        if stem.len() >= particle.len() + 3 && stem.ends_with(particle) {
            stem.truncate(stem.len() - particle.len());
            break;
        }
    }
    stem
}

/// Surface tokens of a label: long words, and a word fused with a following
/// particle (`Log In`)
fn tokens(label: &str) -> Vec<String> {
    let words = words(label);
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < words.len() {
        let word = words[i];
        let fused = words
            .get(i + 1)
            .filter(|next| PARTICLES.contains(&next.to_lowercase().as_str()));

        if let Some(particle) = fused {
            tokens.push(format!("{} {}", word, particle));
            i += 2;
            continue;
        }
        if word.chars().count() >= MIN_TOKEN_LEN {
            tokens.push(word.to_string());
        }
        i += 1;
    }

    tokens
}

struct Occurrence {
    surface: String,
    element_id: String,
}

/// Every stem with its occurrences, stems in first-seen order
fn group_by_stem(elements: &[TextElement]) -> Vec<(String, Vec<Occurrence>)> {
    let mut groups: Vec<(String, Vec<Occurrence>)> = Vec::new();

    for element in elements {
        for surface in tokens(&element.text) {
            let key = stem(&surface);
            let occurrence = Occurrence {
                surface,
                element_id: element.id.clone(),
            };
            match groups.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, occurrences)) => occurrences.push(occurrence),
                None => groups.push((key, vec![occurrence])),
            }
        }
    }

    groups
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}

fn check_stem(stem: &str, occurrences: &[Occurrence], issues: &mut Vec<TerminologyIssue>) {
    let mut variants: Vec<String> = Vec::new();
    for occurrence in occurrences {
        push_unique(&mut variants, &occurrence.surface);
    }
    if variants.len() < 2 {
        return;
    }

    // lowercase form -> case variants, in first-seen order
    let mut buckets: Vec<(String, Vec<String>)> = Vec::new();
    for variant in &variants {
        let lowered = variant.to_lowercase();
        match buckets.iter_mut().find(|(key, _)| *key == lowered) {
            Some((_, forms)) => forms.push(variant.clone()),
            None => buckets.push((lowered, vec![variant.clone()])),
        }
    }

    for (lowered, forms) in &buckets {
        if forms.len() < 2 {
            continue;
        }
        let mut element_ids = Vec::new();
        for occurrence in occurrences.iter().filter(|o| o.surface.to_lowercase() == *lowered) {
            push_unique(&mut element_ids, &occurrence.element_id);
        }
        issues.push(TerminologyIssue {
            kind: TerminologyIssueKind::CaseInconsistency,
            severity: Severity::Low,
            stem: stem.to_string(),
            canonical: forms[0].clone(),
            message: format!("'{}' is capitalized inconsistently: {}", forms[0], quoted(forms)),
            variants: forms.clone(),
            element_ids,
        });
    }

    if buckets.len() > 1 {
        let mut element_ids = Vec::new();
        for occurrence in occurrences {
            push_unique(&mut element_ids, &occurrence.element_id);
        }
        issues.push(TerminologyIssue {
            kind: TerminologyIssueKind::TerminologyInconsistency,
            severity: Severity::Medium,
            stem: stem.to_string(),
            canonical: variants[0].clone(),
            message: format!(
                "The same term is written {} ways: {}; consider '{}'",
                variants.len(),
                quoted(&variants),
                variants[0]
            ),
            variants,
            element_ids,
        });
    }
}

fn check_abbreviations(elements: &[TextElement], issues: &mut Vec<TerminologyIssue>) {
    for (full, short) in ABBREVIATIONS {
        let mut full_ids = Vec::new();
        let mut short_ids = Vec::new();

        for element in elements {
            for word in words(&element.text) {
                let word = word.to_lowercase();
                if word == full {
                    push_unique(&mut full_ids, &element.id);
                } else if word == short {
                    push_unique(&mut short_ids, &element.id);
                }
            }
        }

        if full_ids.is_empty() || short_ids.is_empty() {
            continue;
        }

        let mut element_ids = full_ids;
        for id in &short_ids {
            push_unique(&mut element_ids, id);
        }
        issues.push(TerminologyIssue {
            kind: TerminologyIssueKind::AbbreviationMix,
            severity: Severity::Low,
            stem: full.to_string(),
            variants: vec![full.to_string(), short.to_string()],
            canonical: full.to_string(),
            element_ids,
            message: format!("Both '{}' and its abbreviation '{}' are used", full, short),
        });
    }
}

fn quoted(values: &[String]) -> String {
    values
        .iter()
        .map(|value| format!("'{}'", value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check vocabulary consistency across all text elements
pub fn check_terminology(elements: &[TextElement]) -> Vec<TerminologyIssue> {
    let mut issues = Vec::new();

    for (stem, occurrences) in group_by_stem(elements) {
        check_stem(&stem, &occurrences, &mut issues);
    }
    check_abbreviations(elements, &mut issues);

    debug!(issues = issues.len(), "Terminology check complete");
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardsense_model::{ElementKind, Position};

    fn labels(texts: &[&str]) -> Vec<TextElement> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| TextElement {
                id: format!("t{}", i + 1),
                text: text.to_string(),
                position: Position::default(),
                kind: ElementKind::Node,
                shape: None,
            })
            .collect()
    }

    fn kinds(issues: &[TerminologyIssue]) -> Vec<TerminologyIssueKind> {
        issues.iter().map(|issue| issue.kind).collect()
    }

    #[test]
    fn test_stem() {
        assert_eq!(stem("Login"), "log");
        assert_eq!(stem("Log In"), "log");
        assert_eq!(stem("logins"), "log");
        assert_eq!(stem("Checking"), "check");
        assert_eq!(stem("Saved"), "sav");
        assert_eq!(stem("bus"), "bus");
    }

    #[test]
    fn test_tokens_fuse_particles() {
        assert_eq!(tokens("Log In to portal"), vec!["Log In", "portal"]);
        assert_eq!(tokens("Sign on"), vec!["Sign on"]);
        assert_eq!(tokens("Add the item"), vec!["item"]);
    }

    #[test]
    fn test_login_variants() {
        let issues = check_terminology(&labels(&["Login", "login", "Log In"]));

        assert_eq!(
            kinds(&issues),
            vec![
                TerminologyIssueKind::CaseInconsistency,
                TerminologyIssueKind::TerminologyInconsistency,
            ]
        );
        assert!(issues.iter().all(|issue| issue.stem == "log"));

        let case = &issues[0];
        assert_eq!(case.variants, vec!["Login", "login"]);
        assert_eq!(case.element_ids, vec!["t1", "t2"]);
        assert_eq!(case.severity, Severity::Low);

        let terms = &issues[1];
        assert_eq!(terms.canonical, "Login");
        assert_eq!(terms.element_ids, vec!["t1", "t2", "t3"]);
        assert_eq!(terms.severity, Severity::Medium);
    }

    #[test]
    fn test_consistent_vocabulary_is_clean() {
        let issues = check_terminology(&labels(&["Ship order", "Cancel order", "order"]));
        assert!(issues.is_empty());
    }

    #[test]
    fn test_abbreviation_mix() {
        let issues = check_terminology(&labels(&["Write to database", "Read from DB", "Cache"]));

        assert_eq!(kinds(&issues), vec![TerminologyIssueKind::AbbreviationMix]);
        assert_eq!(issues[0].variants, vec!["database", "db"]);
        assert_eq!(issues[0].element_ids, vec!["t1", "t2"]);
    }
}

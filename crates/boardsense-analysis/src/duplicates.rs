use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use boardsense_model::TextElement;

use crate::text::similarity;

/// Labels shorter than this (after normalization) are never compared
const MIN_COMPARABLE_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateKind {
    Exact,
    Similar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicatePair {
    pub kind: DuplicateKind,
    /// First element carrying the text
    pub original_id: String,
    pub duplicate_id: String,
    pub original_text: String,
    pub duplicate_text: String,
    /// Similarity as a rounded percentage
    pub similarity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateReport {
    pub exact: Vec<DuplicatePair>,
    pub similar: Vec<DuplicatePair>,
    /// True when the board was too large for the pairwise pass
    pub fuzzy_skipped: bool,
}

impl DuplicateReport {
    pub fn len(&self) -> usize {
        self.exact.len() + self.similar.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.similar.is_empty()
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Find exact and near-duplicate labels.
///
/// The exact pass keeps the first occurrence of each normalized label and
/// reports every later occurrence against it. The fuzzy pass compares the
/// surviving labels pairwise and keeps pairs scoring strictly above
/// `threshold`; it is skipped when more than `max_pairwise` labels survive.
pub fn find_duplicates(elements: &[TextElement], threshold: f64, max_pairwise: usize) -> DuplicateReport {
    let mut report = DuplicateReport::default();
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    // (element index, normalized label) of every canonical label
    let mut canonical: Vec<(usize, String)> = Vec::new();

    for (position, element) in elements.iter().enumerate() {
        let normalized = normalize(&element.text);
        if normalized.chars().count() < MIN_COMPARABLE_LEN {
            continue;
        }

        match first_seen.get(&normalized) {
            Some(&original) => {
                let original = &elements[original];
                report.exact.push(DuplicatePair {
                    kind: DuplicateKind::Exact,
                    original_id: original.id.clone(),
                    duplicate_id: element.id.clone(),
                    original_text: original.text.clone(),
                    duplicate_text: element.text.clone(),
                    similarity: 100,
                });
            }
            None => {
                first_seen.insert(normalized.clone(), position);
                canonical.push((position, normalized));
            }
        }
    }

    if canonical.len() > max_pairwise {
        warn!(
            labels = canonical.len(),
            limit = max_pairwise,
            "Too many labels for pairwise similarity, skipping fuzzy pass"
        );
        report.fuzzy_skipped = true;
    } else {
        for (i, (left, left_text)) in canonical.iter().enumerate() {
            for (right, right_text) in &canonical[i + 1..] {
                let score = similarity(left_text, right_text);
                if score > threshold {
                    let (original, duplicate) = (&elements[*left], &elements[*right]);
                    report.similar.push(DuplicatePair {
                        kind: DuplicateKind::Similar,
                        original_id: original.id.clone(),
                        duplicate_id: duplicate.id.clone(),
                        original_text: original.text.clone(),
                        duplicate_text: duplicate.text.clone(),
                        similarity: (score * 100.0).round() as u32,
                    });
                }
            }
        }
    }

    debug!(
        exact = report.exact.len(),
        similar = report.similar.len(),
        "Duplicate detection complete"
    );
    report
}

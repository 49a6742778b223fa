use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use boardsense_model::{Position, TextElement};

use crate::text::keyword_tokens;

/// A keyword recurring across the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub keyword: String,
    /// Total occurrences across all text elements
    pub frequency: usize,
    /// Elements mentioning the keyword, each listed once
    pub element_ids: Vec<String>,
    /// Mean position of the contributing elements
    pub centroid: Position,
}

struct TopicAccumulator {
    keyword: String,
    frequency: usize,
    element_ids: Vec<String>,
    positions: Vec<Position>,
}

/// Rank keywords by frequency, keeping the first `limit`. Ties keep
/// first-seen order.
pub fn extract_topics(elements: &[TextElement], limit: usize) -> Vec<Topic> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut accumulators: Vec<TopicAccumulator> = Vec::new();

    for element in elements {
        for token in keyword_tokens(&element.text) {
            let slot = match slots.get(&token) {
                Some(&slot) => slot,
                None => {
                    slots.insert(token.clone(), accumulators.len());
                    accumulators.push(TopicAccumulator {
                        keyword: token,
                        frequency: 0,
                        element_ids: Vec::new(),
                        positions: Vec::new(),
                    });
                    accumulators.len() - 1
                }
            };

            let topic = &mut accumulators[slot];
            topic.frequency += 1;
            if topic.element_ids.last() != Some(&element.id) {
                topic.element_ids.push(element.id.clone());
                topic.positions.push(element.position);
            }
        }
    }

    // stable sort keeps first-seen order among equal frequencies
    accumulators.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    accumulators.truncate(limit);

    let topics: Vec<Topic> = accumulators
        .into_iter()
        .map(|topic| Topic {
            centroid: Position::centroid(&topic.positions).unwrap_or_default(),
            keyword: topic.keyword,
            frequency: topic.frequency,
            element_ids: topic.element_ids,
        })
        .collect();

    debug!(topics = topics.len(), "Topic extraction complete");
    topics
}

//! Normalization of a raw snapshot into the canonical graph every analysis
//! stage works on.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::snapshot::{BoardSnapshot, Connection};
use crate::types::{ElementKind, GeometryType, Position};

/// An element carrying non-empty text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: String,
    /// Trimmed label text
    pub text: String,
    pub position: Position,
    pub kind: ElementKind,
    pub shape: Option<GeometryType>,
}

/// Anything with a position: every element, plus one centroid per stroke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualElement {
    pub id: String,
    pub position: Position,
    pub kind: ElementKind,
    pub shape: Option<GeometryType>,
}

/// A node-kind element, the unit the structural checks reason about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    /// Trimmed label; `None` when missing or blank
    pub label: Option<String>,
    pub position: Position,
    pub shape: Option<GeometryType>,
}

impl GraphNode {
    pub fn is_shape(&self, shape: &GeometryType) -> bool {
        self.shape.as_ref() == Some(shape)
    }

    /// Label for messages: the text when present, the id otherwise
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStats {
    pub element_count: usize,
    pub node_count: usize,
    pub text_element_count: usize,
    pub visual_element_count: usize,
    pub connection_count: usize,
    pub stroke_count: usize,
}

/// Canonical form of a board
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalGraph {
    pub text_elements: Vec<TextElement>,
    pub visual_elements: Vec<VisualElement>,
    pub nodes: Vec<GraphNode>,
    pub connections: Vec<Connection>,
    pub stats: BoardStats,
}

impl CanonicalGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Label of any text element with the given id
    pub fn label_of(&self, id: &str) -> Option<&str> {
        self.text_elements
            .iter()
            .find(|element| element.id == id)
            .map(|element| element.text.as_str())
    }
}

/// Extract the canonical graph from a snapshot. Never fails.
pub fn extract(snapshot: &BoardSnapshot) -> CanonicalGraph {
    let mut text_elements = Vec::new();
    let mut visual_elements = Vec::with_capacity(snapshot.elements.len() + snapshot.strokes.len());
    let mut nodes = Vec::new();

    for element in &snapshot.elements {
        let position = element.position();
        let label = element.label().map(str::to_string);

        if let Some(text) = &label {
            text_elements.push(TextElement {
                id: element.id.clone(),
                text: text.clone(),
                position,
                kind: element.kind,
                shape: element.shape.clone(),
            });
        }

        visual_elements.push(VisualElement {
            id: element.id.clone(),
            position,
            kind: element.kind,
            shape: element.shape.clone(),
        });

        if element.is_node() {
            nodes.push(GraphNode {
                id: element.id.clone(),
                label,
                position,
                shape: element.shape.clone(),
            });
        }
    }

    for stroke in &snapshot.strokes {
        match stroke.centroid() {
            Some(position) => visual_elements.push(VisualElement {
                id: stroke.id.clone(),
                position,
                kind: ElementKind::Stroke,
                shape: None,
            }),
            None => debug!(stroke_id = %stroke.id, "Stroke has no points, skipping"),
        }
    }

    let stats = BoardStats {
        element_count: snapshot.elements.len(),
        node_count: nodes.len(),
        text_element_count: text_elements.len(),
        visual_element_count: visual_elements.len(),
        connection_count: snapshot.connections.len(),
        stroke_count: snapshot.strokes.len(),
    };

    debug!(?stats, "Extracted canonical graph");

    CanonicalGraph {
        text_elements,
        visual_elements,
        nodes,
        connections: snapshot.connections.clone(),
        stats,
    }
}

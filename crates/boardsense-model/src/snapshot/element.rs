use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::lenient;
use crate::types::{ElementKind, GeometryType, Position};

/// A visual unit placed on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawElement")]
pub struct Element {
    /// Unique identifier of the element on its board
    pub id: String,

    /// Whether this is a node or a freehand stroke
    pub kind: ElementKind,

    /// Text label, if any
    pub text: Option<String>,

    /// Top-left corner of the element
    pub x: f64,
    pub y: f64,

    pub width: f64,
    pub height: f64,

    /// Geometric role tag (decision, start, end, process, ...)
    pub shape: Option<GeometryType>,

    /// Arbitrary style metadata, passed through untouched
    pub style: HashMap<String, Value>,
}

impl Element {
    /// A node element with no style and a zero-sized frame
    pub fn node(id: impl Into<String>, text: Option<&str>, x: f64, y: f64) -> Self {
        Element {
            id: id.into(),
            kind: ElementKind::Node,
            text: text.map(str::to_string),
            x,
            y,
            width: 0.0,
            height: 0.0,
            shape: None,
            style: HashMap::new(),
        }
    }

    pub fn with_shape(mut self, shape: impl Into<GeometryType>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_node(&self) -> bool {
        self.kind == ElementKind::Node
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Trimmed label, `None` when missing or blank
    pub fn label(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Wire shape of an element. Canvas libraries disagree on field names, so
/// every known spelling is accepted and resolved in `From<RawElement>`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawElement {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    element_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    text: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    label: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    x: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    y: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    width: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    height: f64,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    shape: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient::opt_string")]
    type_tag: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    geometry: Option<String>,
    #[serde(default, deserialize_with = "lenient::map")]
    style: HashMap<String, Value>,
}

impl From<RawElement> for Element {
    fn from(raw: RawElement) -> Self {
        let shape_name = raw.shape.or(raw.geometry).or(raw.type_tag);
        let kind = match raw.kind.or(raw.element_type) {
            Some(kind) => ElementKind::from(kind.as_str()),
            None => shape_name
                .as_deref()
                .map(ElementKind::from)
                .unwrap_or_default(),
        };

        Element {
            id: raw.id.unwrap_or_default(),
            kind,
            text: raw.text.or(raw.label),
            x: raw.x,
            y: raw.y,
            width: raw.width,
            height: raw.height,
            shape: shape_name
                .filter(|name| !name.trim().is_empty())
                .map(GeometryType::from),
            style: raw.style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_alternate_field_names() {
        let element: Element = serde_json::from_value(json!({
            "id": "n1",
            "label": "Approve?",
            "type": "diamond",
            "x": 10,
            "y": "20"
        }))
        .unwrap();

        assert_eq!(element.id, "n1");
        assert_eq!(element.kind, ElementKind::Node);
        assert_eq!(element.label(), Some("Approve?"));
        assert_eq!(element.shape, Some(GeometryType::Decision));
        assert_eq!(element.position(), Position::new(10.0, 20.0));
    }

    #[test]
    fn test_text_and_label_both_present() {
        let element: Element = serde_json::from_value(json!({
            "id": "n1",
            "text": "Primary",
            "label": "Secondary",
            "shape": "process",
            "type": "rectangle"
        }))
        .unwrap();

        assert_eq!(element.label(), Some("Primary"));
        assert_eq!(element.shape, Some(GeometryType::Process));
    }

    #[test]
    fn test_stroke_kind_inferred_from_type() {
        let element: Element = serde_json::from_value(json!({ "id": "s", "type": "freehand" })).unwrap();
        assert_eq!(element.kind, ElementKind::Stroke);
    }

    #[test]
    fn test_blank_label_is_none() {
        let element: Element = serde_json::from_value(json!({ "id": "n", "text": "   " })).unwrap();
        assert_eq!(element.label(), None);
        assert_eq!(element.text.as_deref(), Some("   "));
    }
}

mod connection;
mod element;
mod stroke;

pub use connection::Connection;
pub use element::Element;
pub use stroke::Stroke;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;

/// A raw board snapshot as sent by the canvas client.
/// All fields are optional; absent or malformed collections decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default, deserialize_with = "lenient::seq")]
    pub elements: Vec<Element>,

    #[serde(default, deserialize_with = "lenient::seq")]
    pub connections: Vec<Connection>,

    #[serde(default, deserialize_with = "lenient::seq")]
    pub strokes: Vec<Stroke>,

    /// Free-form board metadata (title, owner, ...), passed through untouched
    #[serde(default, deserialize_with = "lenient::object")]
    pub metadata: Map<String, Value>,
}

impl BoardSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connections.push(connection);
        self
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.strokes.push(stroke);
        self
    }

    /// Give every entity without an id a positional one (`element-3`, ...)
    pub fn assign_missing_ids(&mut self) {
        for (index, element) in self.elements.iter_mut().enumerate() {
            if element.id.trim().is_empty() {
                element.id = format!("element-{}", index);
            }
        }
        for (index, connection) in self.connections.iter_mut().enumerate() {
            if connection.id.trim().is_empty() {
                connection.id = format!("connection-{}", index);
            }
        }
        for (index, stroke) in self.strokes.iter_mut().enumerate() {
            if stroke.id.trim().is_empty() {
                stroke.id = format!("stroke-{}", index);
            }
        }
    }
}

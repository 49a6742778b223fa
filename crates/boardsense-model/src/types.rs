use serde::{Deserialize, Serialize};

/// A point on the board canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    /// Straight-line distance to another point
    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Mean of a set of points, `None` when the set is empty
    pub fn centroid<'a, I>(points: I) -> Option<Position>
    where
        I: IntoIterator<Item = &'a Position>,
    {
        let (mut sum_x, mut sum_y, mut count) = (0.0, 0.0, 0usize);
        for point in points {
            sum_x += point.x;
            sum_y += point.y;
            count += 1;
        }

        if count == 0 {
            return None;
        }
        Some(Position::new(sum_x / count as f64, sum_y / count as f64))
    }
}

/// Kind of a board element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    #[default]
    Node,
    Stroke,
}

impl From<&str> for ElementKind {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "stroke" | "freehand" | "path" => ElementKind::Stroke,
            _ => ElementKind::Node,
        }
    }
}

/// Geometric role tag of a node (e.g. a diamond is a decision)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GeometryType {
    Decision,
    Start,
    End,
    Process,
    Other(String),
}

impl GeometryType {
    pub fn as_str(&self) -> &str {
        match self {
            GeometryType::Decision => "decision",
            GeometryType::Start => "start",
            GeometryType::End => "end",
            GeometryType::Process => "process",
            GeometryType::Other(name) => name,
        }
    }
}

impl From<&str> for GeometryType {
    fn from(s: &str) -> Self {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "decision" | "diamond" | "rhombus" => GeometryType::Decision,
            "start" | "begin" | "terminal-start" => GeometryType::Start,
            "end" | "stop" | "terminal-end" | "finish" => GeometryType::End,
            "process" | "rectangle" | "rect" | "box" => GeometryType::Process,
            _ => GeometryType::Other(normalized),
        }
    }
}

impl From<String> for GeometryType {
    fn from(s: String) -> Self {
        GeometryType::from(s.as_str())
    }
}

impl From<GeometryType> for String {
    fn from(geometry: GeometryType) -> Self {
        geometry.as_str().to_string()
    }
}

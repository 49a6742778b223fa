use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::types::Position;

/// A freehand stroke drawn on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,

    /// Sampled points of the stroke, in drawing order
    #[serde(default, deserialize_with = "lenient::points")]
    pub points: Vec<Position>,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    lenient::opt_string(deserializer).map(Option::unwrap_or_default)
}

impl Stroke {
    /// Mean of all points, `None` for a stroke without points
    pub fn centroid(&self) -> Option<Position> {
        Position::centroid(&self.points)
    }
}

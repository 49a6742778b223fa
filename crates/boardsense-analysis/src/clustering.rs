//! Greedy proximity clustering of visual elements.
//!
//! Each unvisited element seeds a cluster and absorbs every other unvisited
//! element closer than the threshold *to the seed*. Absorbed members do not
//! extend the search radius, so a chain of elements that are each close to a
//! neighbour but far from the seed is split across clusters.

use serde::{Deserialize, Serialize};
use tracing::debug;

use boardsense_model::{Position, VisualElement};

/// Area unit used to normalize cluster density
const DENSITY_AREA_UNIT: f64 = 10_000.0;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn at(point: Position) -> Self {
        BoundingBox {
            min_x: point.x,
            min_y: point.y,
            max_x: point.x,
            max_y: point.y,
        }
    }

    pub fn include(&mut self, point: Position) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// A proximity group of at least two elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub id: String,
    pub element_ids: Vec<String>,
    pub bounds: BoundingBox,
    pub centroid: Position,
    /// Members per 10,000 square units of bounding box. A degenerate (zero
    /// area) box counts as one unit.
    pub density: f64,
}

impl Cluster {
    pub fn size(&self) -> usize {
        self.element_ids.len()
    }
}

/// Cluster elements in input order using a single seed radius
pub fn cluster_elements(elements: &[VisualElement], threshold: f64) -> Vec<Cluster> {
    let mut visited = vec![false; elements.len()];
    let mut clusters = Vec::new();

    for seed in 0..elements.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;

        let origin = elements[seed].position;
        let mut members = vec![seed];
        let mut bounds = BoundingBox::at(origin);

        for candidate in (seed + 1)..elements.len() {
            if visited[candidate] {
                continue;
            }
            let position = elements[candidate].position;
            if origin.distance_to(&position) < threshold {
                visited[candidate] = true;
                members.push(candidate);
                bounds.include(position);
            }
        }

        if members.len() < 2 {
            continue;
        }

        let positions: Vec<Position> = members.iter().map(|&m| elements[m].position).collect();
        let centroid = Position::centroid(&positions).unwrap_or(origin);
        let normalized_area = bounds.area() / DENSITY_AREA_UNIT;
        let density = if normalized_area > 0.0 {
            members.len() as f64 / normalized_area
        } else {
            members.len() as f64
        };

        clusters.push(Cluster {
            id: format!("cluster-{}", clusters.len() + 1),
            element_ids: members.iter().map(|&m| elements[m].id.clone()).collect(),
            bounds,
            centroid,
            density,
        });
    }

    debug!(clusters = clusters.len(), threshold, "Spatial clustering complete");
    clusters
}

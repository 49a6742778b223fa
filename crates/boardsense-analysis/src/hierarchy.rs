use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

use crate::graph::GraphIndex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    pub id: String,
    pub label: Option<String>,
    /// Direct successors, in connection order
    pub children: Vec<String>,
}

/// A breadth-first level tree rooted at a node with no incoming edges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hierarchy {
    pub root: String,
    pub levels: Vec<Vec<HierarchyNode>>,
    /// Number of levels
    pub depth: usize,
    /// Width of the widest level
    pub breadth: usize,
}

/// Text-bearing nodes with outgoing edges and no incoming edges
pub fn hierarchy_roots(index: &GraphIndex<'_>) -> Vec<usize> {
    index
        .roots()
        .into_iter()
        .filter(|&root| index.node(root).label.is_some())
        .collect()
}

/// Build one hierarchy per root. Nodes unreachable from every root appear in
/// none of them.
pub fn build_hierarchies(index: &GraphIndex<'_>) -> Vec<Hierarchy> {
    let hierarchies: Vec<Hierarchy> = hierarchy_roots(index)
        .into_iter()
        .map(|root| build_from_root(index, root))
        .collect();

    debug!(hierarchies = hierarchies.len(), "Hierarchy building complete");
    hierarchies
}

fn build_from_root(index: &GraphIndex<'_>, root: usize) -> Hierarchy {
    let mut visited = vec![false; index.node_count()];
    let mut levels: Vec<Vec<HierarchyNode>> = Vec::new();
    let mut queue = VecDeque::new();

    visited[root] = true;
    queue.push_back((root, 0usize));

    while let Some((node, level)) = queue.pop_front() {
        let mut children: Vec<String> = Vec::new();
        for edge in index.outgoing(node) {
            let child = index.node(edge.node);
            if !children.contains(&child.id) {
                children.push(child.id.clone());
            }
            if !visited[edge.node] {
                visited[edge.node] = true;
                queue.push_back((edge.node, level + 1));
            }
        }

        if levels.len() <= level {
            levels.resize_with(level + 1, Vec::new);
        }
        let current = index.node(node);
        levels[level].push(HierarchyNode {
            id: current.id.clone(),
            label: current.label.clone(),
            children,
        });
    }

    let breadth = levels.iter().map(Vec::len).max().unwrap_or(0);
    Hierarchy {
        root: index.node(root).id.clone(),
        depth: levels.len(),
        breadth,
        levels,
    }
}

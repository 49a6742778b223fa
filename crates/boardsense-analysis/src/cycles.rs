//! Cycle detection over the resolved adjacency.
//!
//! Iterative depth-first search with an explicit path stack. A node is marked
//! finished once all its successors have been expanded, and finished nodes are
//! never expanded again from a later root. A cycle is reported when an edge
//! leads back to a node still on the current path.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::GraphIndex;

/// A directed cycle. `edges[k]` leads from `nodes[k]` to `nodes[k + 1]`; the
/// last edge closes the cycle back to `nodes[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub nodes: Vec<String>,
    pub edges: Vec<String>,
}

impl Cycle {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The edge returning to the first node
    pub fn closing_edge(&self) -> Option<&str> {
        self.edges.last().map(String::as_str)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Finished,
}

/// Find the cycles reachable from every node, roots taken in node order
pub fn detect_cycles(index: &GraphIndex<'_>) -> Vec<Cycle> {
    let count = index.node_count();
    let mut marks = vec![Mark::Unvisited; count];
    let mut path_pos: Vec<Option<usize>> = vec![None; count];
    let mut entered_by: Vec<Option<usize>> = vec![None; count];
    let mut cycles = Vec::new();

    for root in 0..count {
        if marks[root] != Mark::Unvisited {
            continue;
        }

        let mut path: Vec<usize> = Vec::new();
        // (node, next outgoing edge to try)
        let mut stack: Vec<(usize, usize)> = Vec::new();

        marks[root] = Mark::OnPath;
        path_pos[root] = Some(0);
        path.push(root);
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            let Some(edge) = index.outgoing(node).get(next).copied() else {
                marks[node] = Mark::Finished;
                path_pos[node] = None;
                entered_by[node] = None;
                path.pop();
                stack.pop();
                continue;
            };
            frame.1 += 1;

            match marks[edge.node] {
                Mark::OnPath => {
                    let start = path_pos[edge.node].unwrap_or(0);
                    let members = &path[start..];
                    let mut edges: Vec<String> = members[1..]
                        .iter()
                        .filter_map(|&member| entered_by[member])
                        .map(|connection| index.connection(connection).id.clone())
                        .collect();
                    edges.push(index.connection(edge.connection).id.clone());

                    cycles.push(Cycle {
                        nodes: members.iter().map(|&member| index.node(member).id.clone()).collect(),
                        edges,
                    });
                }
                Mark::Unvisited => {
                    marks[edge.node] = Mark::OnPath;
                    path_pos[edge.node] = Some(path.len());
                    entered_by[edge.node] = Some(edge.connection);
                    path.push(edge.node);
                    stack.push((edge.node, 0));
                }
                Mark::Finished => {}
            }
        }
    }

    debug!(cycles = cycles.len(), "Cycle detection complete");
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::graph;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_triangle_cycle() {
        let graph = graph(
            &[("A", Some("A")), ("B", Some("B")), ("C", Some("C"))],
            &[("A", "B"), ("B", "C"), ("C", "A")],
        );
        let index = GraphIndex::build(&graph);

        let cycles = detect_cycles(&index);

        assert_eq!(
            cycles,
            vec![Cycle {
                nodes: vec!["A".into(), "B".into(), "C".into()],
                edges: vec!["e1".into(), "e2".into(), "e3".into()],
            }]
        );
        assert_eq!(cycles[0].closing_edge(), Some("e3"));
    }

    #[test]
    fn test_cycle_below_entry_path() {
        let graph = graph(
            &[("s", None), ("a", None), ("b", None), ("t", None)],
            &[("s", "a"), ("a", "b"), ("b", "a"), ("b", "t")],
        );
        let index = GraphIndex::build(&graph);

        let cycles = detect_cycles(&index);

        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].nodes, vec!["a", "b"]);
        assert_eq!(cycles[0].edges, vec!["e2", "e3"]);
    }

    #[test]
    fn test_self_loop() {
        let graph = graph(&[("a", None)], &[("a", "a")]);
        let index = GraphIndex::build(&graph);

        let cycles = detect_cycles(&index);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), 1);
        assert_eq!(cycles[0].edges, vec!["e1"]);
    }

    #[test]
    fn test_dag_has_no_cycles() {
        let graph = graph(
            &[("a", None), ("b", None), ("c", None), ("d", None)],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        let index = GraphIndex::build(&graph);
        assert!(detect_cycles(&index).is_empty());
    }

    #[test]
    fn test_finished_nodes_not_reexpanded() {
        // the cycle is reachable from both roots but reported once
        let graph = graph(
            &[("r1", None), ("r2", None), ("x", None), ("y", None)],
            &[("r1", "x"), ("r2", "x"), ("x", "y"), ("y", "x")],
        );
        let index = GraphIndex::build(&graph);
        assert_eq!(detect_cycles(&index).len(), 1);
    }
}

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::GraphIndex;

/// A simple directed path through the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyChain {
    pub nodes: Vec<String>,
    pub connection_ids: Vec<String>,
    /// Number of nodes on the path
    pub length: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyAnalysis {
    /// Longest first, ties in discovery order
    pub chains: Vec<DependencyChain>,
    pub average_chain_length: f64,
    pub longest_chain: usize,
}

/// Walk a chain from every connection not consumed by an earlier chain
pub fn analyze_chains(index: &GraphIndex<'_>) -> DependencyAnalysis {
    let mut consumed = vec![false; index.graph().connections.len()];
    let mut chains = Vec::new();

    for &(start, source, target) in index.resolved_edges() {
        if consumed[start] {
            continue;
        }
        consumed[start] = true;

        let mut on_chain = vec![false; index.node_count()];
        on_chain[source] = true;
        let mut nodes = vec![source];
        let mut connections = Vec::new();

        if !on_chain[target] {
            on_chain[target] = true;
            nodes.push(target);
            connections.push(start);

            let mut current = target;
            while let Some(edge) = index
                .outgoing(current)
                .iter()
                .find(|edge| !on_chain[edge.node])
                .copied()
            {
                consumed[edge.connection] = true;
                on_chain[edge.node] = true;
                nodes.push(edge.node);
                connections.push(edge.connection);
                current = edge.node;
            }
        }

        if nodes.len() > 1 {
            chains.push(DependencyChain {
                length: nodes.len(),
                nodes: nodes.iter().map(|&node| index.node(node).id.clone()).collect(),
                connection_ids: connections
                    .iter()
                    .map(|&connection| index.connection(connection).id.clone())
                    .collect(),
            });
        }
    }

    chains.sort_by(|a, b| b.length.cmp(&a.length));

    let longest_chain = chains.first().map(|chain| chain.length).unwrap_or(0);
    let average_chain_length = if chains.is_empty() {
        0.0
    } else {
        chains.iter().map(|chain| chain.length).sum::<usize>() as f64 / chains.len() as f64
    };

    debug!(chains = chains.len(), longest_chain, "Dependency chain analysis complete");

    DependencyAnalysis {
        chains,
        average_chain_length,
        longest_chain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::graph;

    #[test]
    fn test_linear_path_is_one_chain() {
        let graph = graph(
            &[("a", None), ("b", None), ("c", None), ("d", None)],
            &[("a", "b"), ("b", "c"), ("c", "d")],
        );
        let index = GraphIndex::build(&graph);

        let analysis = analyze_chains(&index);

        assert_eq!(analysis.chains.len(), 1, "later edges were consumed by the first walk");
        assert_eq!(analysis.chains[0].nodes, vec!["a", "b", "c", "d"]);
        assert_eq!(analysis.chains[0].connection_ids, vec!["e1", "e2", "e3"]);
        assert_eq!(analysis.longest_chain, 4);
        assert_eq!(analysis.average_chain_length, 4.0);
    }

    #[test]
    fn test_branch_starts_second_chain() {
        let graph = graph(
            &[("a", None), ("b", None), ("c", None), ("d", None)],
            &[("a", "b"), ("b", "c"), ("a", "d")],
        );
        let index = GraphIndex::build(&graph);

        let analysis = analyze_chains(&index);

        assert_eq!(analysis.chains.len(), 2);
        assert_eq!(analysis.chains[0].nodes, vec!["a", "b", "c"]);
        assert_eq!(analysis.chains[1].nodes, vec!["a", "d"]);
        assert_eq!(analysis.average_chain_length, 2.5);
    }

    #[test]
    fn test_cycle_walk_stops_on_revisit() {
        let graph = graph(
            &[("a", None), ("b", None), ("c", None)],
            &[("a", "b"), ("b", "c"), ("c", "a")],
        );
        let index = GraphIndex::build(&graph);

        let analysis = analyze_chains(&index);

        assert_eq!(analysis.chains.len(), 2);
        assert_eq!(analysis.chains[0].nodes, vec!["a", "b", "c"]);
        // the closing edge was never walked, so it starts its own chain
        assert_eq!(analysis.chains[1].nodes, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_self_loop_discarded() {
        let graph = graph(&[("a", None)], &[("a", "a")]);
        let index = GraphIndex::build(&graph);

        let analysis = analyze_chains(&index);
        assert!(analysis.chains.is_empty());
        assert_eq!(analysis.average_chain_length, 0.0);
    }
}

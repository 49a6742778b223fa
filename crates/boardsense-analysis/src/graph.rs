//! Resolved adjacency over the canonical graph.
//!
//! Only connections whose endpoints are both known nodes enter the adjacency
//! lists. Everything else is kept aside as a broken connection.

use std::collections::HashMap;

use boardsense_model::{CanonicalGraph, Connection, GeometryType, GraphNode};

/// One resolved edge seen from a node: the connection and the node at its other end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRef {
    /// Index into `CanonicalGraph::connections`
    pub connection: usize,
    /// Index into `CanonicalGraph::nodes`
    pub node: usize,
}

/// A connection with at least one endpoint that is not a known node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenEdge {
    pub connection: usize,
    pub missing: Vec<String>,
}

#[derive(Debug)]
pub struct GraphIndex<'g> {
    graph: &'g CanonicalGraph,
    positions: HashMap<&'g str, usize>,
    outgoing: Vec<Vec<EdgeRef>>,
    incoming: Vec<Vec<EdgeRef>>,
    resolved: Vec<(usize, usize, usize)>,
    broken: Vec<BrokenEdge>,
}

impl<'g> GraphIndex<'g> {
    pub fn build(graph: &'g CanonicalGraph) -> Self {
        let mut positions = HashMap::with_capacity(graph.nodes.len());
        for (index, node) in graph.nodes.iter().enumerate() {
            // first occurrence wins for duplicated ids
            positions.entry(node.id.as_str()).or_insert(index);
        }

        let mut outgoing = vec![Vec::new(); graph.nodes.len()];
        let mut incoming = vec![Vec::new(); graph.nodes.len()];
        let mut resolved = Vec::with_capacity(graph.connections.len());
        let mut broken = Vec::new();

        for (connection, edge) in graph.connections.iter().enumerate() {
            let source = positions.get(edge.source.as_str()).copied();
            let target = positions.get(edge.target.as_str()).copied();

            match (source, target) {
                (Some(source), Some(target)) => {
                    outgoing[source].push(EdgeRef { connection, node: target });
                    incoming[target].push(EdgeRef { connection, node: source });
                    resolved.push((connection, source, target));
                }
                _ => {
                    let mut missing = Vec::new();
                    if source.is_none() {
                        missing.push(edge.source.clone());
                    }
                    if target.is_none() {
                        missing.push(edge.target.clone());
                    }
                    broken.push(BrokenEdge { connection, missing });
                }
            }
        }

        GraphIndex {
            graph,
            positions,
            outgoing,
            incoming,
            resolved,
            broken,
        }
    }

    pub fn graph(&self) -> &'g CanonicalGraph {
        self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.nodes.len()
    }

    pub fn node(&self, index: usize) -> &'g GraphNode {
        &self.graph.nodes[index]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (usize, &'g GraphNode)> + 'g {
        self.graph.nodes.iter().enumerate()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn connection(&self, index: usize) -> &'g Connection {
        &self.graph.connections[index]
    }

    pub fn outgoing(&self, node: usize) -> &[EdgeRef] {
        &self.outgoing[node]
    }

    pub fn incoming(&self, node: usize) -> &[EdgeRef] {
        &self.incoming[node]
    }

    pub fn out_degree(&self, node: usize) -> usize {
        self.outgoing[node].len()
    }

    pub fn in_degree(&self, node: usize) -> usize {
        self.incoming[node].len()
    }

    pub fn is_isolated(&self, node: usize) -> bool {
        self.outgoing[node].is_empty() && self.incoming[node].is_empty()
    }

    /// Resolved edges in connection order as `(connection, source, target)`
    pub fn resolved_edges(&self) -> &[(usize, usize, usize)] {
        &self.resolved
    }

    pub fn broken_edges(&self) -> &[BrokenEdge] {
        &self.broken
    }

    /// Nodes with outgoing edges and no incoming edges
    pub fn roots(&self) -> Vec<usize> {
        (0..self.node_count())
            .filter(|&node| !self.outgoing[node].is_empty() && self.incoming[node].is_empty())
            .collect()
    }

    /// Nodes explicitly typed as start
    pub fn declared_starts(&self) -> Vec<usize> {
        self.nodes()
            .filter(|(_, node)| node.is_shape(&GeometryType::Start))
            .map(|(index, _)| index)
            .collect()
    }

    /// Declared starts followed by roots, without repeats
    pub fn entry_points(&self) -> Vec<usize> {
        let mut entries = self.declared_starts();
        for root in self.roots() {
            if !entries.contains(&root) {
                entries.push(root);
            }
        }
        entries
    }

    /// Nodes reachable from `sources` following outgoing edges (sources included)
    pub fn reachable_from(&self, sources: &[usize]) -> Vec<bool> {
        let mut reached = vec![false; self.node_count()];
        let mut queue = std::collections::VecDeque::new();

        for &source in sources {
            if !reached[source] {
                reached[source] = true;
                queue.push_back(source);
            }
        }

        while let Some(node) = queue.pop_front() {
            for edge in &self.outgoing[node] {
                if !reached[edge.node] {
                    reached[edge.node] = true;
                    queue.push_back(edge.node);
                }
            }
        }

        reached
    }
}

//! Immutable simple-graph value produced by the generator.

use std::fmt;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

/// Unordered pair of distinct node identifiers, stored as `(low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    low: usize,
    high: usize,
}

impl Edge {
    /// Builds an edge from two endpoints in either order.
    ///
    /// Returns `None` for a self-loop.
    #[must_use]
    pub fn new(a: usize, b: usize) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Smaller endpoint.
    #[must_use]
    pub const fn low(&self) -> usize {
        self.low
    }

    /// Larger endpoint.
    #[must_use]
    pub const fn high(&self) -> usize {
        self.high
    }

    #[must_use]
    pub const fn endpoints(&self) -> (usize, usize) {
        (self.low, self.high)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {}", self.low, self.high)
    }
}

/// Undirected graph with nodes `0..node_count` and no self-loops or
/// parallel edges.
///
/// Node weights hold the node identifier so the petgraph view can be handed
/// straight to renderers.
#[derive(Debug, Clone)]
pub struct SimpleGraph {
    inner: UnGraph<usize, ()>,
}

impl SimpleGraph {
    /// Assembles a graph from edges already known to be distinct and in range.
    pub(crate) fn from_edges(num_nodes: usize, edges: &[Edge]) -> Self {
        let mut inner = UnGraph::with_capacity(num_nodes, edges.len());
        for id in 0..num_nodes {
            inner.add_node(id);
        }
        for edge in edges {
            inner.add_edge(NodeIndex::new(edge.low), NodeIndex::new(edge.high), ());
        }
        Self { inner }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Node identifiers in ascending order, including isolated nodes.
    pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.inner.node_indices().map(|index| self.inner[index])
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.inner.edge_references().filter_map(|edge| {
            Edge::new(self.inner[edge.source()], self.inner[edge.target()])
        })
    }

    #[must_use]
    pub fn contains_edge(&self, a: usize, b: usize) -> bool {
        if a >= self.node_count() || b >= self.node_count() {
            return false;
        }
        self.inner
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .is_some()
    }

    /// Number of edges incident to `node`; zero for unknown nodes.
    #[must_use]
    pub fn degree(&self, node: usize) -> usize {
        if node >= self.node_count() {
            return 0;
        }
        self.inner.neighbors(NodeIndex::new(node)).count()
    }

    /// Nodes with no incident edge.
    pub fn isolated_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes().filter(|&node| self.degree(node) == 0)
    }

    /// Borrow the underlying petgraph storage.
    #[must_use]
    pub const fn as_petgraph(&self) -> &UnGraph<usize, ()> {
        &self.inner
    }
}

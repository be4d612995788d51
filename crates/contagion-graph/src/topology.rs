//! Topology - Nodes, edges and the adjacency views engines run on

use contagion_core::NodeId;
use std::collections::{HashMap, HashSet};

/// Edge between two node indices, as written in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Edge {
    from: usize,
    to: usize,
}

/// An immutable-for-the-run graph with string-labelled nodes
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Does the source format declare the graph directed?
    directed: bool,

    /// Nodes in insertion order
    nodes: Vec<NodeId>,

    /// Label -> position in `nodes`
    index: HashMap<NodeId, usize>,

    /// Edges in insertion order (duplicates kept as written)
    edges: Vec<Edge>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            ..Self::default()
        }
    }

    /// Build a graph from labelled edges
    pub fn from_edges<A, B>(directed: bool, edges: impl IntoIterator<Item = (A, B)>) -> Self
    where
        A: Into<NodeId>,
        B: Into<NodeId>,
    {
        let mut graph = Self::new(directed);
        for (from, to) in edges {
            graph.add_edge(from.into(), to.into());
        }
        graph
    }

    /// Add a node, returning its index (existing nodes keep theirs)
    pub fn add_node(&mut self, node: NodeId) -> usize {
        if let Some(&i) = self.index.get(&node) {
            return i;
        }
        let i = self.nodes.len();
        self.index.insert(node.clone(), i);
        self.nodes.push(node);
        i
    }

    /// Add an edge, adding missing endpoints
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        let from = self.add_node(from);
        let to = self.add_node(to);
        self.edges.push(Edge { from, to });
    }

    /// Is the source graph directed?
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Get node count
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get edge count, as written in the source
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check if a node exists
    pub fn has_node(&self, node: &str) -> bool {
        self.index.contains_key(node)
    }

    /// Index of a node label
    pub fn index_of(&self, node: &str) -> Option<usize> {
        self.index.get(node).copied()
    }

    /// All nodes, in insertion order
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Undirected view: direction and duplicate edges collapse.
    ///
    /// A self-loop makes the node its own neighbour once.
    pub fn undirected(&self) -> Adjacency<'_> {
        let mut builder = AdjacencyBuilder::new(self.nodes.len());
        for edge in &self.edges {
            builder.link(edge.from, edge.to);
            builder.link(edge.to, edge.from);
        }
        builder.finish(self)
    }

    /// Directed view: arcs as written; an undirected source yields both
    /// directions for every edge.
    pub fn directed(&self) -> Adjacency<'_> {
        let mut builder = AdjacencyBuilder::new(self.nodes.len());
        for edge in &self.edges {
            builder.link(edge.from, edge.to);
            if !self.directed {
                builder.link(edge.to, edge.from);
            }
        }
        builder.finish(self)
    }
}

/// Deduplicating neighbour-list builder
struct AdjacencyBuilder {
    neighbors: Vec<Vec<usize>>,
    seen: HashSet<(usize, usize)>,
}

impl AdjacencyBuilder {
    fn new(node_count: usize) -> Self {
        Self {
            neighbors: vec![Vec::new(); node_count],
            seen: HashSet::new(),
        }
    }

    fn link(&mut self, from: usize, to: usize) {
        if self.seen.insert((from, to)) {
            self.neighbors[from].push(to);
        }
    }

    fn finish(self, graph: &Graph) -> Adjacency<'_> {
        Adjacency {
            labels: &graph.nodes,
            index: &graph.index,
            neighbors: self.neighbors,
        }
    }
}

/// Index-based adjacency over a borrowed graph
///
/// Node `i` of the view is `graph.nodes()[i]`; engines keep their per-node
/// state in vectors indexed the same way.
#[derive(Debug, Clone)]
pub struct Adjacency<'g> {
    labels: &'g [NodeId],
    index: &'g HashMap<NodeId, usize>,
    neighbors: Vec<Vec<usize>>,
}

impl<'g> Adjacency<'g> {
    /// Get node count
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Label of node `i`
    pub fn label(&self, i: usize) -> &'g NodeId {
        &self.labels[i]
    }

    /// All labels, in index order
    pub fn labels(&self) -> &'g [NodeId] {
        self.labels
    }

    /// Index of a node label
    pub fn index_of(&self, node: &str) -> Option<usize> {
        self.index.get(node).copied()
    }

    /// Neighbours of node `i` (successors, for a directed view)
    pub fn neighbors(&self, i: usize) -> &[usize] {
        self.neighbors.get(i).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Degree of node `i` (out-degree, for a directed view)
    pub fn degree(&self, i: usize) -> usize {
        self.neighbors(i).len()
    }

    /// Node indices
    pub fn indices(&self) -> std::ops::Range<usize> {
        0..self.labels.len()
    }
}

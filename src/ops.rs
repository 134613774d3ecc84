/*!
# Graph Operations

Basic traits every graph representation provides. Algorithms in [`algo`](crate::algo) are
written against these traits and implemented for every graph that satisfies them.

Nodes are addressed by dense indices ([`Node`]) in the range `0..node_bound()`. Indices of
removed nodes are never handed out again, hence `vertices()` may skip some of them.
The user-facing keys are reachable via [`KeyedGraph`].
*/

use fxhash::FxHashMap;
use itertools::Itertools;

use crate::{edge::*, error::*, node::*};

/// One entry of an adjacency list: the node on the other side and the id of the stored edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Neighbor {
    pub node: Node,
    pub edge: EdgeId,
}

/// Provides the configuration flags of a graph
pub trait GraphType {
    /// Returns *true* if edges are one-way
    fn is_directed(&self) -> bool;

    /// Returns *true* if edges are mirrored
    fn is_undirected(&self) -> bool {
        !self.is_directed()
    }

    /// Returns *true* if edges carry meaningful weights
    fn is_weighted(&self) -> bool;

    /// Returns *true* if self-loops and parallel edges are allowed
    fn is_multigraph(&self) -> bool;
}

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of (live) nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Returns an exclusive upper bound on all node indices ever handed out.
    /// Arrays indexed by [`Node`] must have at least this length.
    fn node_bound(&self) -> usize;

    /// Returns *true* if `u` is a live node of the graph
    fn contains_node(&self, u: Node) -> bool;

    /// Returns an iterator over all live nodes in increasing index order
    fn vertices(&self) -> impl Iterator<Item = Node> + '_;

    /// Returns a NodeBitSet over all indices below `node_bound()` with all bits unset
    fn vertex_bitset_unset(&self) -> NodeBitSet {
        NodeBitSet::new(self.node_bound() as Node)
    }

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns *true* if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Provides getters pertaining to the edge-size of a graph
pub trait GraphEdgeOrder {
    /// Returns the number of stored edges. An undirected edge counts once.
    fn number_of_edges(&self) -> NumEdges;

    /// Returns an exclusive upper bound on all edge ids ever handed out
    fn edge_bound(&self) -> usize;

    /// Returns an EdgeBitSet over all ids below `edge_bound()` with all bits unset
    fn edge_bitset_unset(&self) -> EdgeBitSet {
        EdgeBitSet::new(self.edge_bound() as EdgeId)
    }

    /// Returns *true* if the graph has no edges
    fn is_singleton_graph(&self) -> bool {
        self.number_of_edges() == 0
    }
}

/// Traits pertaining getters for neighborhoods & edges
pub trait AdjacencyList: GraphNodeOrder + GraphEdgeOrder + GraphType {
    /// Returns the (outgoing) adjacency entries of `u`.
    /// For undirected graphs every edge appears at both endpoints; an undirected
    /// self-loop appears twice at its node.
    /// ** Panics if `u >= node_bound()` **
    fn incidences_of(&self, u: Node) -> &[Neighbor];

    /// Returns the weight of a stored edge (`1.0` in unweighted graphs).
    /// ** Panics if `id` does not belong to a stored edge **
    fn weight_of(&self, id: EdgeId) -> f64;

    /// Returns the endpoints of a stored edge in insertion order `(source, target)`.
    /// ** Panics if `id` does not belong to a stored edge **
    fn endpoints_of(&self, id: EdgeId) -> Edge;

    /// Returns an iterator over all stored edges, each exactly once
    fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_;

    /// Returns an iterator over the (outgoing) neighbors of `u`.
    /// Parallel edges yield the same neighbor multiple times.
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.incidences_of(u).iter().map(|nb| nb.node)
    }

    /// Returns an iterator over `(neighbor, weight)` pairs of the outgoing edges of `u`
    fn weighted_neighbors_of(&self, u: Node) -> impl Iterator<Item = (Node, f64)> + '_ {
        self.incidences_of(u)
            .iter()
            .map(|nb| (nb.node, self.weight_of(nb.edge)))
    }

    /// Returns the number of (outgoing) adjacency entries of `u`
    fn degree_of(&self, u: Node) -> NumNodes {
        self.incidences_of(u).len() as NumNodes
    }

    /// Returns the id of some edge `u -> v` if one exists
    fn edge_between(&self, u: Node, v: Node) -> Option<EdgeId> {
        self.incidences_of(u)
            .iter()
            .find(|nb| nb.node == v)
            .map(|nb| nb.edge)
    }

    /// Returns an iterator over all directed arcs `(u, v, weight)`.
    /// Undirected edges are reported in both directions.
    fn arcs(&self) -> impl Iterator<Item = (Node, Node, f64)> + '_ {
        self.vertices()
            .flat_map(move |u| self.weighted_neighbors_of(u).map(move |(v, w)| (u, v, w)))
    }
}

/// Reverse adjacency for directed graphs.
/// For undirected graphs, in- and out-neighborhoods coincide.
pub trait DirectedAdjacencyList: AdjacencyList {
    /// Returns the incoming adjacency entries of `u` (entries name the source node)
    fn in_incidences_of(&self, u: Node) -> &[Neighbor];

    /// Returns an iterator over the incoming neighbors of `u`
    fn in_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.in_incidences_of(u).iter().map(|nb| nb.node)
    }

    /// Returns the number of incoming adjacency entries of `u`
    fn in_degree_of(&self, u: Node) -> NumNodes {
        self.in_incidences_of(u).len() as NumNodes
    }

    /// Returns the neighbors of `u` when edge directions are ignored
    fn undirected_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        let incoming: &[Neighbor] = if self.is_directed() {
            self.in_incidences_of(u)
        } else {
            &[]
        };
        self.neighbors_of(u)
            .chain(incoming.iter().map(|nb| nb.node))
    }
}

/// Maps between dense indices and user-facing node keys
pub trait KeyedGraph: GraphNodeOrder {
    type Key: NodeKey;

    /// Returns the index of `key` or `None` if the key is unknown
    fn try_index_of(&self, key: &Self::Key) -> Option<Node>;

    /// Returns the key of a live node.
    /// ** Panics if `u` is not a live node **
    fn key_of(&self, u: Node) -> &Self::Key;

    /// Returns the index of `key` or [`GraphError::NodeNotFound`]
    fn index_of(&self, key: &Self::Key) -> Result<Node> {
        self.try_index_of(key)
            .ok_or_else(|| GraphError::node_not_found(key))
    }

    /// Collects a dense array into a map keyed by node keys; only live nodes are included
    fn key_map<V: Clone>(&self, values: &[V]) -> FxHashMap<Self::Key, V> {
        self.vertices()
            .map(|u| (self.key_of(u).clone(), values[u as usize].clone()))
            .collect()
    }

    /// Translates a sequence of indices into keys
    fn keys_of<I>(&self, nodes: I) -> Vec<Self::Key>
    where
        I: IntoIterator<Item = Node>,
    {
        nodes.into_iter().map(|u| self.key_of(u).clone()).collect()
    }

    /// Sorts indices by their keys
    fn sort_by_key(&self, nodes: &mut [Node]) {
        nodes.sort_unstable_by(|&a, &b| self.key_of(a).cmp(self.key_of(b)));
    }

    /// Returns all live nodes sorted by key
    fn vertices_by_key(&self) -> Vec<Node> {
        let mut nodes = self.vertices().collect_vec();
        self.sort_by_key(&mut nodes);
        nodes
    }
}

/// Outgoing neighbors of `u` without repetitions, in ascending key order.
/// Traversals use this to explore neighborhoods reproducibly.
pub fn ordered_neighbors_of<G>(graph: &G, u: Node) -> Vec<Node>
where
    G: AdjacencyList + KeyedGraph,
{
    let mut nbs = graph.neighbors_of(u).collect_vec();
    graph.sort_by_key(&mut nbs);
    nbs.dedup();
    nbs
}

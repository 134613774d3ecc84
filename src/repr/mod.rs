/*!
# Graph Representation

[`Graph<K>`] is the single storage backend of this crate. Its behavior is parametrized by a
[`GraphConfig`] (directed / weighted / multigraph) instead of one type per variant.

### Storage

- Keys are mapped to dense indices by a [`NodeIndex`].
- Every edge is stored exactly once in an edge table indexed by [`EdgeId`]; adjacency lists only
  hold `(neighbor, edge id)` pairs. An undirected edge is referenced from both endpoints, so both
  directions always report the same weight and are removed or updated together.
- Directed graphs additionally keep in-adjacency lists for reverse traversals and for cascading
  node removal.

```rust
use wgraphs::prelude::*;

let mut g = Graph::new(GraphConfig::new().weighted(true));
g.add_edge("a", "b", Some(2.0)).unwrap();
g.add_edge("b", "c", Some(1.5)).unwrap();

assert!(g.has_edge(&"b", &"a"));
assert_eq!(g.get_edge_weight(&"b", &"a").unwrap(), 2.0);
assert_eq!(g.number_of_edges(), 2);
```
*/

use fxhash::FxHashMap;
use itertools::Itertools;
use smallvec::SmallVec;
use tracing::trace;

use crate::{config::GraphConfig, edge::*, error::*, node::*, ops::*};

mod attributes;
mod node_index;

pub use attributes::*;
pub use node_index::*;

type Adjacency = SmallVec<[Neighbor; 4]>;

#[derive(Debug, Clone, Copy, PartialEq)]
struct EdgeRecord {
    source: Node,
    target: Node,
    weight: f64,
}

/// A keyed graph with configurable directedness, weights and multi-edges.
/// See the [module documentation](self).
#[derive(Debug, Clone)]
pub struct Graph<K> {
    config: GraphConfig,
    nodes: NodeIndex<K>,
    out_nbs: Vec<Adjacency>,
    in_nbs: Vec<Adjacency>,
    edges: Vec<Option<EdgeRecord>>,
    num_edges: NumEdges,
    node_attrs: FxHashMap<Node, AttrMap>,
    edge_attrs: FxHashMap<EdgeId, AttrMap>,
}

impl<K: NodeKey> Default for Graph<K> {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}

/// Items accepted by [`Graph::from_edges`]: `(u, v)` or `(u, v, weight)`
pub trait IntoWeightedEdge<K> {
    fn into_weighted_edge(self) -> (K, K, Option<f64>);
}

impl<K> IntoWeightedEdge<K> for (K, K) {
    fn into_weighted_edge(self) -> (K, K, Option<f64>) {
        (self.0, self.1, None)
    }
}

impl<K> IntoWeightedEdge<K> for (K, K, f64) {
    fn into_weighted_edge(self) -> (K, K, Option<f64>) {
        (self.0, self.1, Some(self.2))
    }
}

impl<K: NodeKey> Graph<K> {
    /// Creates an empty graph with the given configuration
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            nodes: NodeIndex::new(),
            out_nbs: Vec::new(),
            in_nbs: Vec::new(),
            edges: Vec::new(),
            num_edges: 0,
            node_attrs: FxHashMap::default(),
            edge_attrs: FxHashMap::default(),
        }
    }

    /// Creates an empty, unweighted, simple, directed graph
    pub fn directed() -> Self {
        Self::new(GraphConfig::new().directed(true))
    }

    /// Creates an empty, unweighted, simple, undirected graph
    pub fn undirected() -> Self {
        Self::new(GraphConfig::new())
    }

    /// Creates a graph from a list of edges; see [`Graph::add_edge`] for the failure modes.
    ///
    /// ```rust
    /// use wgraphs::prelude::*;
    ///
    /// let g = Graph::from_edges(GraphConfig::new().directed(true), [(1, 2), (2, 3)]).unwrap();
    /// assert_eq!(g.get_nodes(), vec![1, 2, 3]);
    /// ```
    pub fn from_edges<I, E>(config: GraphConfig, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: IntoWeightedEdge<K>,
    {
        let mut graph = Self::new(config);
        for e in edges {
            let (u, v, w) = e.into_weighted_edge();
            graph.add_edge(u, v, w)?;
        }
        Ok(graph)
    }

    /// Returns the configuration of the graph
    pub fn config(&self) -> GraphConfig {
        self.config
    }

    /// Inserts `key` if it is not present yet and returns its index. Idempotent.
    pub fn add_node(&mut self, key: K) -> Node {
        let (u, is_new) = self.nodes.insert(key);
        if is_new {
            self.out_nbs.push(Adjacency::new());
            self.in_nbs.push(Adjacency::new());
        }
        u
    }

    /// Adds the nodes of an iterator
    pub fn add_nodes<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
    {
        for key in keys {
            self.add_node(key);
        }
    }

    /// Returns *true* if `key` is a node of the graph
    pub fn has_node(&self, key: &K) -> bool {
        self.nodes.get(key).is_some()
    }

    /// Returns all node keys in insertion order
    pub fn get_nodes(&self) -> Vec<K> {
        self.nodes.iter().map(|(_, k)| k.clone()).collect()
    }

    /// Removes a node and every incident edge.
    ///
    /// Fails with [`GraphError::NodeNotFound`] if the node is absent.
    pub fn remove_node(&mut self, key: &K) -> Result<()> {
        let u = self.index_of(key)?;

        let incident = self.out_nbs[u as usize]
            .iter()
            .chain(self.in_nbs[u as usize].iter())
            .map(|nb| nb.edge)
            .unique()
            .collect_vec();

        for id in incident {
            self.remove_edge_record(id);
        }

        self.nodes.remove(key);
        self.out_nbs[u as usize] = Adjacency::new();
        self.in_nbs[u as usize] = Adjacency::new();
        self.node_attrs.remove(&u);

        trace!(node = ?key, "removed node");
        Ok(())
    }

    fn resolve_weight(&self, weight: Option<f64>) -> Result<f64> {
        if !self.config.is_weighted() {
            return Ok(1.0);
        }

        match weight {
            None => Err(GraphError::Configuration(
                "weighted graph requires a weight for every edge".into(),
            )),
            Some(w) if w.is_nan() => Err(GraphError::InvalidOperation(
                "edge weight must not be NaN".into(),
            )),
            Some(w) => Ok(w),
        }
    }

    /// Adds the edge `u -> v` (or `u - v` if undirected) and returns its id.
    /// Missing endpoints are created.
    ///
    /// - For weighted graphs, `weight` is mandatory ([`GraphError::Configuration`] otherwise);
    ///   unweighted graphs ignore it and use `1.0`.
    /// - Simple graphs reject self-loops with [`GraphError::InvalidOperation`]; adding an
    ///   already present edge updates its weight and returns the existing id.
    /// - Multigraphs always create a new edge with a fresh id.
    ///
    /// Nothing is modified if the call fails.
    pub fn add_edge(&mut self, u: K, v: K, weight: Option<f64>) -> Result<EdgeId> {
        let weight = self.resolve_weight(weight)?;

        if u == v && !self.config.is_multigraph() {
            return Err(GraphError::InvalidOperation(format!(
                "self-loop at {u:?} in a simple graph"
            )));
        }

        let ui = self.add_node(u);
        let vi = self.add_node(v);

        if !self.config.is_multigraph() {
            if let Some(id) = self.edge_between(ui, vi) {
                self.record_mut(id).weight = weight;
                return Ok(id);
            }
        }

        let id = self.edges.len() as EdgeId;
        self.edges.push(Some(EdgeRecord {
            source: ui,
            target: vi,
            weight,
        }));

        self.out_nbs[ui as usize].push(Neighbor { node: vi, edge: id });
        if self.config.is_directed() {
            self.in_nbs[vi as usize].push(Neighbor { node: ui, edge: id });
        } else {
            self.out_nbs[vi as usize].push(Neighbor { node: ui, edge: id });
        }
        self.num_edges += 1;

        Ok(id)
    }

    fn record(&self, id: EdgeId) -> Option<&EdgeRecord> {
        self.edges.get(id as usize).and_then(Option::as_ref)
    }

    fn record_mut(&mut self, id: EdgeId) -> &mut EdgeRecord {
        match self.edges.get_mut(id as usize).and_then(Option::as_mut) {
            Some(record) => record,
            None => panic!("edge {id} is not stored"),
        }
    }

    fn remove_edge_record(&mut self, id: EdgeId) -> Option<EdgeRecord> {
        let record = self.edges.get_mut(id as usize)?.take()?;

        self.out_nbs[record.source as usize].retain(|nb| nb.edge != id);
        if self.config.is_directed() {
            self.in_nbs[record.target as usize].retain(|nb| nb.edge != id);
        } else {
            self.out_nbs[record.target as usize].retain(|nb| nb.edge != id);
        }

        self.edge_attrs.remove(&id);
        self.num_edges -= 1;
        Some(record)
    }

    /// Ids of all edges `u -> v` (for undirected graphs: between `u` and `v`)
    fn edge_ids_between(&self, u: Node, v: Node) -> Vec<EdgeId> {
        self.out_nbs[u as usize]
            .iter()
            .filter(|nb| nb.node == v)
            .map(|nb| nb.edge)
            .unique()
            .collect()
    }

    fn existing_edges(&self, u: &K, v: &K) -> Result<Vec<EdgeId>> {
        let ids = match (self.nodes.get(u), self.nodes.get(v)) {
            (Some(ui), Some(vi)) => self.edge_ids_between(ui, vi),
            _ => Vec::new(),
        };

        if ids.is_empty() {
            Err(GraphError::edge_not_found(u, v))
        } else {
            Ok(ids)
        }
    }

    /// Removes the edge `u -> v` (every parallel copy in a multigraph).
    ///
    /// Fails with [`GraphError::EdgeNotFound`] if there is no such edge.
    pub fn remove_edge(&mut self, u: &K, v: &K) -> Result<()> {
        for id in self.existing_edges(u, v)? {
            self.remove_edge_record(id);
        }
        Ok(())
    }

    /// Removes a single edge by its id.
    pub fn remove_edge_by_id(&mut self, id: EdgeId) -> Result<()> {
        self.remove_edge_record(id)
            .map(|_| ())
            .ok_or_else(|| GraphError::EdgeNotFound(format!("#{id}")))
    }

    /// Returns *true* if the edge `u -> v` exists. For undirected graphs
    /// `has_edge(u, v) == has_edge(v, u)`.
    pub fn has_edge(&self, u: &K, v: &K) -> bool {
        match (self.nodes.get(u), self.nodes.get(v)) {
            (Some(ui), Some(vi)) => self.edge_between(ui, vi).is_some(),
            _ => false,
        }
    }

    /// Returns the weight of `u -> v` (of the first parallel copy in a multigraph).
    pub fn get_edge_weight(&self, u: &K, v: &K) -> Result<f64> {
        let ids = self.existing_edges(u, v)?;
        Ok(self.weight_of(ids[0]))
    }

    fn check_weight_update(&self, weight: f64) -> Result<()> {
        if !self.config.is_weighted() {
            return Err(GraphError::Configuration(
                "cannot change edge weights of an unweighted graph".into(),
            ));
        }
        if weight.is_nan() {
            return Err(GraphError::InvalidOperation(
                "edge weight must not be NaN".into(),
            ));
        }
        Ok(())
    }

    /// Updates the weight of `u -> v` (of every parallel copy in a multigraph).
    /// Runs in `O(deg(u))`.
    ///
    /// Fails with [`GraphError::EdgeNotFound`] if the edge is absent and with
    /// [`GraphError::Configuration`] if the graph is unweighted.
    pub fn update_edge_weight(&mut self, u: &K, v: &K, weight: f64) -> Result<()> {
        let ids = self.existing_edges(u, v)?;
        self.check_weight_update(weight)?;
        for id in ids {
            self.record_mut(id).weight = weight;
        }
        Ok(())
    }

    /// Updates the weight of a single edge by its id
    pub fn update_edge_weight_by_id(&mut self, id: EdgeId, weight: f64) -> Result<()> {
        if self.record(id).is_none() {
            return Err(GraphError::EdgeNotFound(format!("#{id}")));
        }
        self.check_weight_update(weight)?;
        self.record_mut(id).weight = weight;
        Ok(())
    }

    fn to_weighted_edge(&self, id: EdgeId, record: &EdgeRecord) -> WeightedEdge<K> {
        let mut source = self.key_of(record.source);
        let mut target = self.key_of(record.target);
        if self.config.is_undirected() && target < source {
            std::mem::swap(&mut source, &mut target);
        }

        WeightedEdge {
            id,
            source: source.clone(),
            target: target.clone(),
            weight: record.weight,
        }
    }

    /// Returns the edge with the given id.
    /// Undirected edges are canonicalized such that `source <= target`.
    pub fn edge_by_id(&self, id: EdgeId) -> Option<WeightedEdge<K>> {
        self.record(id).map(|r| self.to_weighted_edge(id, r))
    }

    /// Returns all edges ordered by id. Undirected edges are reported exactly once with
    /// `source <= target`; directed edges once per direction.
    pub fn get_edges(&self) -> Vec<WeightedEdge<K>> {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(id, r)| r.as_ref().map(|r| self.to_weighted_edge(id as EdgeId, r)))
            .collect()
    }

    /// Ids of all parallel edges `u -> v`; empty if there are none or a node is unknown
    pub fn parallel_edges_between(&self, u: &K, v: &K) -> Vec<EdgeId> {
        self.existing_edges(u, v).unwrap_or_default()
    }

    /// Number of incident edge endpoints of `key`: undirected self-loops count twice,
    /// directed graphs count in- and out-edges.
    pub fn degree(&self, key: &K) -> Result<usize> {
        let u = self.index_of(key)?;
        Ok(self.out_nbs[u as usize].len() + self.in_nbs[u as usize].len())
    }

    /// Number of outgoing edges of `key` (equals [`Graph::degree`] for undirected graphs)
    pub fn out_degree(&self, key: &K) -> Result<usize> {
        let u = self.index_of(key)?;
        Ok(self.out_nbs[u as usize].len())
    }

    /// Number of incoming edges of `key` (equals [`Graph::degree`] for undirected graphs)
    pub fn in_degree(&self, key: &K) -> Result<usize> {
        let u = self.index_of(key)?;
        Ok(self.in_incidences_of(u).len())
    }

    /// Distinct (outgoing) neighbors of `key` in ascending order
    pub fn neighbors(&self, key: &K) -> Result<Vec<K>> {
        let u = self.index_of(key)?;
        Ok(self.keys_of(ordered_neighbors_of(self, u)))
    }

    /// Ratio of present to possible edges among distinct node pairs
    pub fn density(&self) -> f64 {
        let n = self.number_of_nodes() as f64;
        if n < 2.0 {
            return 0.0;
        }

        let possible = if self.config.is_directed() {
            n * (n - 1.0)
        } else {
            n * (n - 1.0) / 2.0
        };
        self.num_edges as f64 / possible
    }
}

impl<K> GraphType for Graph<K> {
    fn is_directed(&self) -> bool {
        self.config.is_directed()
    }

    fn is_weighted(&self) -> bool {
        self.config.is_weighted()
    }

    fn is_multigraph(&self) -> bool {
        self.config.is_multigraph()
    }
}

impl<K: NodeKey> GraphNodeOrder for Graph<K> {
    fn number_of_nodes(&self) -> NumNodes {
        self.nodes.len() as NumNodes
    }

    fn node_bound(&self) -> usize {
        self.nodes.bound()
    }

    fn contains_node(&self, u: Node) -> bool {
        self.nodes.key(u).is_some()
    }

    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.nodes.iter().map(|(u, _)| u)
    }
}

impl<K> GraphEdgeOrder for Graph<K> {
    fn number_of_edges(&self) -> NumEdges {
        self.num_edges
    }

    fn edge_bound(&self) -> usize {
        self.edges.len()
    }
}

impl<K: NodeKey> AdjacencyList for Graph<K> {
    fn incidences_of(&self, u: Node) -> &[Neighbor] {
        &self.out_nbs[u as usize]
    }

    fn weight_of(&self, id: EdgeId) -> f64 {
        match self.record(id) {
            Some(r) => r.weight,
            None => panic!("edge {id} is not stored"),
        }
    }

    fn endpoints_of(&self, id: EdgeId) -> Edge {
        match self.record(id) {
            Some(r) => Edge(r.source, r.target),
            None => panic!("edge {id} is not stored"),
        }
    }

    fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(id, r)| r.is_some().then_some(id as EdgeId))
    }
}

impl<K: NodeKey> DirectedAdjacencyList for Graph<K> {
    fn in_incidences_of(&self, u: Node) -> &[Neighbor] {
        if self.config.is_directed() {
            &self.in_nbs[u as usize]
        } else {
            &self.out_nbs[u as usize]
        }
    }
}

impl<K: NodeKey> KeyedGraph for Graph<K> {
    type Key = K;

    fn try_index_of(&self, key: &K) -> Option<Node> {
        self.nodes.get(key)
    }

    fn key_of(&self, u: Node) -> &K {
        match self.nodes.key(u) {
            Some(k) => k,
            None => panic!("node {u} is not part of the graph"),
        }
    }
}

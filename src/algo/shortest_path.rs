/*!
# Shortest Paths

Single-source and all-pairs shortest paths on weighted graphs. Unweighted graphs are handled
as if every edge had weight `1.0`; undirected edges can be used in both directions.

| algorithm                                   | weights             | complexity       |
|---------------------------------------------|---------------------|------------------|
| [`ShortestPath::dijkstra`]                  | non-negative        | `O(E log V)`     |
| [`ShortestPath::bellman_ford`]              | arbitrary           | `O(V E)`         |
| [`ShortestPath::floyd_warshall`]            | arbitrary           | `O(V^3)`         |
| [`ShortestPath::dag_shortest_paths`]        | arbitrary, acyclic  | `O(V + E)`       |
| [`ShortestPath::dag_longest_paths`]         | arbitrary, acyclic  | `O(V + E)`       |

Unreachable nodes get distance `f64::INFINITY` (`f64::NEG_INFINITY` for longest paths) and no
predecessor. Failures are reported instead of returning meaningless distances: a negative edge
reachable in Dijkstra's algorithm, a reachable negative cycle in Bellman-Ford, and cycles in the
DAG variants.
*/

use std::collections::BinaryHeap;

use fxhash::FxHashMap;
use tracing::{debug, trace};

use super::{topo::kahn_order, traversal::trace_back, *};

/// Distances and predecessors of a single-source computation
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths<K: NodeKey> {
    pub source: K,
    /// Distance of every node from `source`
    pub dist: FxHashMap<K, f64>,
    /// Predecessor on a best path; `None` for the source and unreachable nodes
    pub prev: FxHashMap<K, Option<K>>,
}

impl<K: NodeKey> ShortestPaths<K> {
    /// Returns the best path from the source to `target` (both inclusive),
    /// or `None` if `target` is unknown or unreachable.
    pub fn path_to(&self, target: &K) -> Option<Vec<K>> {
        if !self.dist.get(target)?.is_finite() {
            return None;
        }
        Some(trace_back(&self.prev, target))
    }

    /// Returns the distance of `target` or `None` if it is unknown
    pub fn distance(&self, target: &K) -> Option<f64> {
        self.dist.get(target).copied()
    }
}

/// Distance and next-hop matrices of the Floyd-Warshall algorithm.
/// Rows and columns are ordered by key.
#[derive(Debug, Clone)]
pub struct AllPairsShortestPaths<K: NodeKey> {
    keys: Vec<K>,
    position: FxHashMap<K, usize>,
    dist: Vec<Vec<f64>>,
    next: Vec<Vec<Option<usize>>>,
}

impl<K: NodeKey> AllPairsShortestPaths<K> {
    /// Node keys in the order of the matrix rows
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Returns the distance from `u` to `v` (`f64::INFINITY` if unreachable),
    /// or `None` if a key is unknown.
    pub fn distance(&self, u: &K, v: &K) -> Option<f64> {
        let (i, j) = (*self.position.get(u)?, *self.position.get(v)?);
        Some(self.dist[i][j])
    }

    /// Returns the full distance matrix
    pub fn matrix(&self) -> &[Vec<f64>] {
        &self.dist
    }

    /// Returns *true* if some node lies on a negative cycle.
    /// Distances and paths are meaningless in this case.
    pub fn has_negative_cycle(&self) -> bool {
        (0..self.keys.len()).any(|i| self.dist[i][i] < 0.0)
    }

    /// Reconstructs a shortest path from `u` to `v` (both inclusive) in `O(path length)`.
    /// Returns `None` if a key is unknown, `v` is unreachable, or the path runs into a
    /// negative cycle.
    pub fn path(&self, u: &K, v: &K) -> Option<Vec<K>> {
        let (mut i, j) = (*self.position.get(u)?, *self.position.get(v)?);
        let mut path = vec![self.keys[i].clone()];

        while i != j {
            i = self.next[i][j]?;
            path.push(self.keys[i].clone());
            if path.len() > self.keys.len() {
                return None;
            }
        }

        Some(path)
    }
}

/// Shortest-path algorithms on graphs with keyed nodes
pub trait ShortestPath: DirectedAdjacencyList + KeyedGraph + Sized {
    /// Dijkstra's algorithm with a binary heap; stale heap entries are skipped on pop.
    ///
    /// Fails with [`GraphError::NodeNotFound`] if `source` is unknown and with
    /// [`GraphError::InvalidOperation`] if an edge of negative weight is reachable from
    /// `source`.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(
    ///     GraphConfig::new().weighted(true),
    ///     [("A", "B", 1.0), ("B", "C", 2.0), ("A", "C", 4.0), ("C", "D", 1.0)],
    /// )
    /// .unwrap();
    ///
    /// let sp = g.dijkstra(&"A").unwrap();
    /// assert_eq!(sp.dist[&"C"], 3.0);
    /// assert_eq!(sp.prev[&"C"], Some("B"));
    /// ```
    fn dijkstra(&self, source: &Self::Key) -> Result<ShortestPaths<Self::Key>> {
        let s = self.index_of(source)?;

        let mut dist = vec![f64::INFINITY; self.node_bound()];
        let mut prev: Vec<Option<Node>> = vec![None; self.node_bound()];
        let mut heap = BinaryHeap::new();

        dist[s as usize] = 0.0;
        heap.push(MinScored(0.0, s));

        let mut settled = 0usize;
        while let Some(MinScored(d, u)) = heap.pop() {
            if d > dist[u as usize] {
                continue;
            }
            settled += 1;

            for (v, w) in self.weighted_neighbors_of(u) {
                if w < 0.0 {
                    return Err(GraphError::InvalidOperation(format!(
                        "dijkstra requires non-negative weights, found {w} on ({:?}, {:?})",
                        self.key_of(u),
                        self.key_of(v)
                    )));
                }

                let candidate = d + w;
                if candidate < dist[v as usize] {
                    dist[v as usize] = candidate;
                    prev[v as usize] = Some(u);
                    heap.push(MinScored(candidate, v));
                }
            }
        }

        debug!(source = ?source, settled, "dijkstra finished");
        Ok(self.shortest_paths(source, &dist, &prev))
    }

    /// Bellman-Ford algorithm: at most `|V| - 1` relaxation passes over all edges (stopping
    /// early once nothing changes), followed by a verification pass.
    ///
    /// Fails with [`GraphError::NodeNotFound`] if `source` is unknown and with
    /// [`GraphError::NegativeCycle`] if a negative cycle is reachable from `source`.
    /// Note that an undirected edge of negative weight forms such a cycle on its own.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let config = GraphConfig::new().weighted(true).directed(true);
    /// let g = Graph::from_edges(config, [("A", "B", 1.0), ("B", "A", -2.0)]).unwrap();
    /// assert_eq!(g.bellman_ford(&"A").unwrap_err().kind(), ErrorKind::NegativeCycle);
    /// ```
    fn bellman_ford(&self, source: &Self::Key) -> Result<ShortestPaths<Self::Key>> {
        let s = self.index_of(source)?;
        let arcs: Vec<(Node, Node, f64)> = self.arcs().collect();

        let mut dist = vec![f64::INFINITY; self.node_bound()];
        let mut prev: Vec<Option<Node>> = vec![None; self.node_bound()];
        dist[s as usize] = 0.0;

        let relax = |dist: &mut Vec<f64>, prev: &mut Vec<Option<Node>>| {
            let mut changed = false;
            for &(u, v, w) in &arcs {
                let du = dist[u as usize];
                if du.is_finite() && du + w < dist[v as usize] {
                    dist[v as usize] = du + w;
                    prev[v as usize] = Some(u);
                    changed = true;
                }
            }
            changed
        };

        let mut passes = 0;
        while passes + 1 < self.len() {
            passes += 1;
            if !relax(&mut dist, &mut prev) {
                break;
            }
            trace!(pass = passes, "bellman-ford relaxation pass");
        }

        if relax(&mut dist, &mut prev) {
            debug!(source = ?source, passes, "bellman-ford found a negative cycle");
            return Err(GraphError::NegativeCycle(format!("{source:?}")));
        }

        debug!(source = ?source, passes, "bellman-ford finished");
        Ok(self.shortest_paths(source, &dist, &prev))
    }

    /// Floyd-Warshall all-pairs shortest paths in `O(V^3)` time and `O(V^2)` memory.
    /// Never fails; check [`AllPairsShortestPaths::has_negative_cycle`] if weights may be
    /// negative.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let config = GraphConfig::new().weighted(true).directed(true);
    /// let g = Graph::from_edges(config, [(1, 2, 5.0), (2, 3, -2.0), (1, 3, 4.0)]).unwrap();
    ///
    /// let apsp = g.floyd_warshall();
    /// assert_eq!(apsp.distance(&1, &3), Some(3.0));
    /// assert_eq!(apsp.distance(&3, &1), Some(f64::INFINITY));
    /// assert_eq!(apsp.path(&1, &3), Some(vec![1, 2, 3]));
    /// assert!(!apsp.has_negative_cycle());
    /// ```
    fn floyd_warshall(&self) -> AllPairsShortestPaths<Self::Key> {
        let nodes = self.vertices_by_key();
        let n = nodes.len();

        let mut index = vec![usize::MAX; self.node_bound()];
        for (i, &u) in nodes.iter().enumerate() {
            index[u as usize] = i;
        }

        let mut dist = vec![vec![f64::INFINITY; n]; n];
        let mut next = vec![vec![None; n]; n];
        for i in 0..n {
            dist[i][i] = 0.0;
            next[i][i] = Some(i);
        }
        for (u, v, w) in self.arcs() {
            let (i, j) = (index[u as usize], index[v as usize]);
            if w < dist[i][j] {
                dist[i][j] = w;
                next[i][j] = Some(j);
            }
        }

        for k in 0..n {
            for i in 0..n {
                let dik = dist[i][k];
                if !dik.is_finite() {
                    continue;
                }
                for j in 0..n {
                    let candidate = dik + dist[k][j];
                    if candidate < dist[i][j] {
                        dist[i][j] = candidate;
                        next[i][j] = next[i][k];
                    }
                }
            }
        }

        debug!(nodes = n, "floyd-warshall finished");

        let keys = self.keys_of(nodes);
        let position = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i))
            .collect();

        AllPairsShortestPaths {
            keys,
            position,
            dist,
            next,
        }
    }

    /// Shortest paths in a directed acyclic graph by relaxing every edge once in topological
    /// order. Negative weights are fine.
    ///
    /// Fails with [`GraphError::NodeNotFound`] if `source` is unknown, with
    /// [`GraphError::Cycle`] if the graph is not acyclic and with
    /// [`GraphError::Configuration`] if it is undirected.
    fn dag_shortest_paths(&self, source: &Self::Key) -> Result<ShortestPaths<Self::Key>> {
        self.dag_relaxation(source, f64::INFINITY, |candidate, current| candidate < current)
    }

    /// Longest paths in a directed acyclic graph (critical paths). Unreachable nodes get
    /// distance `f64::NEG_INFINITY`. Fails like [`ShortestPath::dag_shortest_paths`].
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let config = GraphConfig::new().weighted(true).directed(true);
    /// let g = Graph::from_edges(
    ///     config,
    ///     [("start", "a", 3.0), ("start", "b", 2.0), ("a", "end", 1.0), ("b", "end", 4.0)],
    /// )
    /// .unwrap();
    ///
    /// let lp = g.dag_longest_paths(&"start").unwrap();
    /// assert_eq!(lp.dist[&"end"], 6.0);
    /// assert_eq!(lp.path_to(&"end"), Some(vec!["start", "b", "end"]));
    /// ```
    fn dag_longest_paths(&self, source: &Self::Key) -> Result<ShortestPaths<Self::Key>> {
        self.dag_relaxation(source, f64::NEG_INFINITY, |candidate, current| {
            candidate > current
        })
    }

    #[doc(hidden)]
    fn dag_relaxation<F>(
        &self,
        source: &Self::Key,
        unreachable: f64,
        improves: F,
    ) -> Result<ShortestPaths<Self::Key>>
    where
        F: Fn(f64, f64) -> bool,
    {
        let s = self.index_of(source)?;
        let order = kahn_order(self)?;

        let mut dist = vec![unreachable; self.node_bound()];
        let mut prev: Vec<Option<Node>> = vec![None; self.node_bound()];
        dist[s as usize] = 0.0;

        for u in order {
            let du = dist[u as usize];
            if du == unreachable {
                continue;
            }
            for (v, w) in self.weighted_neighbors_of(u) {
                if improves(du + w, dist[v as usize]) {
                    dist[v as usize] = du + w;
                    prev[v as usize] = Some(u);
                }
            }
        }

        debug!(source = ?source, "dag relaxation finished");
        Ok(self.shortest_paths(source, &dist, &prev))
    }

    #[doc(hidden)]
    fn shortest_paths(
        &self,
        source: &Self::Key,
        dist: &[f64],
        prev: &[Option<Node>],
    ) -> ShortestPaths<Self::Key> {
        ShortestPaths {
            source: source.clone(),
            dist: self.key_map(dist),
            prev: self
                .vertices()
                .map(|u| {
                    (
                        self.key_of(u).clone(),
                        prev[u as usize].map(|p| self.key_of(p).clone()),
                    )
                })
                .collect(),
        }
    }
}

impl<G> ShortestPath for G where G: DirectedAdjacencyList + KeyedGraph + Sized {}

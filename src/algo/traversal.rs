/*!
Graph traversal algorithms and traversal-derived utilities.

This module provides:
- A generic traversal iterator ([`TraversalSearch`]) whose frontier is either a queue
  (breadth-first) or a stack (depth-first), see [`NodeSequencer`].
- The key-level [`Traversal`] trait exposing BFS/DFS with distances and predecessors,
  reachability and unweighted shortest paths directly as methods on graphs.

Neighborhoods are explored in ascending key order, so every traversal is reproducible.
Nothing in here recurses: long paths do not exhaust the call stack.
*/

use std::collections::VecDeque;

use fxhash::FxHashMap;
use itertools::Itertools;
use tracing::debug;

use super::*;

/// A node reached by a traversal together with the node it was discovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    pub node: Node,
    /// `None` for the node a search was (re)started at
    pub parent: Option<Node>,
}

/// Abstraction for the traversal frontier data structure.
///
/// Different implementations determine the traversal order:
/// - [`VecDeque`] -> queue semantics -> **BFS**
/// - [`Vec`] -> stack semantics -> **DFS**
pub trait NodeSequencer<T>: Default {
    /// Pushes an item into the frontier.
    fn push(&mut self, item: T);

    /// Removes and returns the next item from the frontier.
    fn pop(&mut self) -> Option<T>;

    /// Pushes all items such that they are popped in the given relative order.
    fn push_in_order(&mut self, items: Vec<T>);

    /// Returns the number of items currently in the frontier.
    fn cardinality(&self) -> usize;
}

impl<T> NodeSequencer<T> for VecDeque<T> {
    fn push(&mut self, item: T) {
        self.push_back(item)
    }
    fn pop(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn push_in_order(&mut self, items: Vec<T>) {
        self.extend(items);
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
}

impl<T> NodeSequencer<T> for Vec<T> {
    fn push(&mut self, item: T) {
        self.push(item)
    }
    fn pop(&mut self) -> Option<T> {
        self.pop()
    }
    fn push_in_order(&mut self, items: Vec<T>) {
        self.extend(items.into_iter().rev());
    }
    fn cardinality(&self) -> usize {
        self.len()
    }
}

/// Generic traversal iterator supporting BFS and DFS.
///
/// Maintains an explicit frontier of [`Visit`]s and a set of visited nodes. A node is marked
/// as visited when it is popped, which yields a proper pre-order for DFS and the usual
/// level-order for BFS. The frontier may thus hold a node multiple times; stale entries are
/// skipped.
///
/// The visited-set is a type parameter: [`NodeBitSet`] for dense searches (see [`BFS`] and
/// [`DFS`]) or e.g. an `FxHashSet<Node>` if only a small part of a huge graph is explored.
pub struct TraversalSearch<'a, G, S, V> {
    graph: &'a G,
    visited: V,
    sequencer: S,
    ignore_direction: bool,
}

/// A **breadth-first search** iterator with a custom visited-set
pub type BFSWithSet<'a, G, V> = TraversalSearch<'a, G, VecDeque<Visit>, V>;

/// A **depth-first search** iterator with a custom visited-set
pub type DFSWithSet<'a, G, V> = TraversalSearch<'a, G, Vec<Visit>, V>;

/// A **breadth-first search** iterator using a queue (`VecDeque`).
pub type BFS<'a, G> = BFSWithSet<'a, G, NodeBitSet>;

/// A **depth-first search** iterator using a stack (`Vec`).
pub type DFS<'a, G> = DFSWithSet<'a, G, NodeBitSet>;

impl<'a, G, S, V> TraversalSearch<'a, G, S, V>
where
    G: DirectedAdjacencyList + KeyedGraph,
    S: NodeSequencer<Visit>,
    V: Set<Node> + FromCapacity,
{
    /// Creates a new traversal iterator starting from `start`.
    pub fn new(graph: &'a G, start: Node) -> Self {
        let mut search = Self::idle(graph);
        search.restart_at(start);
        search
    }

    /// Creates a traversal iterator with an empty frontier; use [`TraversalSearch::restart_at`]
    /// to seed it.
    pub fn idle(graph: &'a G) -> Self {
        Self {
            graph,
            visited: V::from_capacity(graph.node_bound()),
            sequencer: S::default(),
            ignore_direction: false,
        }
    }
}

impl<G, S, V> TraversalSearch<'_, G, S, V>
where
    G: DirectedAdjacencyList + KeyedGraph,
    S: NodeSequencer<Visit>,
    V: Set<Node>,
{
    /// If set, edges are followed in both directions (weak connectivity for directed graphs).
    pub fn set_ignore_direction(&mut self, ignore: bool) {
        self.ignore_direction = ignore;
    }

    /// If set, edges are followed in both directions (weak connectivity for directed graphs).
    pub fn ignore_direction(mut self, ignore: bool) -> Self {
        self.set_ignore_direction(ignore);
        self
    }

    /// Seeds the search with `u` if it was not visited yet and returns *true* iff so.
    /// Typically called once the iterator returned `None` to continue in another component.
    pub fn restart_at(&mut self, u: Node) -> bool {
        if self.visited.contains(&u) {
            return false;
        }
        self.sequencer.push(Visit {
            node: u,
            parent: None,
        });
        true
    }

    /// Returns *true* if `u` was already returned by the iterator
    pub fn did_visit_node(&self, u: Node) -> bool {
        self.visited.contains(&u)
    }

    /// Returns the set of nodes returned so far
    pub fn visited(&self) -> &V {
        &self.visited
    }

    /// Number of nodes returned so far
    pub fn num_visited(&self) -> usize {
        self.visited.len()
    }

    fn frontier_of(&self, u: Node) -> Vec<Node> {
        let mut nbs = if self.ignore_direction {
            self.graph.undirected_neighbors_of(u).collect_vec()
        } else {
            self.graph.neighbors_of(u).collect_vec()
        };
        nbs.retain(|v| !self.visited.contains(v));
        self.graph.sort_by_key(&mut nbs);
        nbs.dedup();
        nbs
    }
}

impl<G, S, V> Iterator for TraversalSearch<'_, G, S, V>
where
    G: DirectedAdjacencyList + KeyedGraph,
    S: NodeSequencer<Visit>,
    V: Set<Node>,
{
    type Item = Visit;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let visit = self.sequencer.pop()?;
            if self.visited.insert(visit.node) {
                continue;
            }

            let next = self
                .frontier_of(visit.node)
                .into_iter()
                .map(|v| Visit {
                    node: v,
                    parent: Some(visit.node),
                })
                .collect();
            self.sequencer.push_in_order(next);

            return Some(visit);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.graph.len() - self.visited.len()))
    }
}

/// Result of a breadth-first search
#[derive(Debug, Clone, PartialEq)]
pub struct BfsResult<K: NodeKey> {
    /// Visited keys in visitation order
    pub order: Vec<K>,
    /// Hop distance from the start for every node; `None` if unreachable
    pub dist: FxHashMap<K, Option<usize>>,
    /// Predecessor in the BFS tree for every node; `None` for the start and unreachable nodes
    pub prev: FxHashMap<K, Option<K>>,
}

impl<K: NodeKey> BfsResult<K> {
    /// Returns the path from the start to `target` (both inclusive) with the fewest hops
    pub fn path_to(&self, target: &K) -> Option<Vec<K>> {
        self.dist.get(target)?.as_ref()?;
        Some(trace_back(&self.prev, target))
    }
}

/// Follows the predecessor map from `target` back to a node without predecessor and
/// returns the path in forward direction.
pub(crate) fn trace_back<K: NodeKey>(prev: &FxHashMap<K, Option<K>>, target: &K) -> Vec<K> {
    let mut path = vec![target.clone()];
    let mut current = target;
    while let Some(Some(p)) = prev.get(current) {
        path.push(p.clone());
        current = p;
    }
    path.reverse();
    path
}

/// Provides traversal methods (BFS, DFS, reachability) on graphs with keyed nodes
pub trait Traversal: DirectedAdjacencyList + KeyedGraph + Sized {
    /// Returns an iterator that traverses the nodes reachable from `start` in
    /// **breadth-first** order.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(GraphConfig::new(), [(0, 1), (0, 2), (1, 3)]).unwrap();
    ///
    /// let order: Vec<_> = g.bfs_iter(0).map(|v| v.node).collect();
    /// assert_eq!(order, vec![0, 1, 2, 3]);
    /// ```
    fn bfs_iter(&self, start: Node) -> BFS<'_, Self> {
        BFS::new(self, start)
    }

    /// Returns an iterator that traverses the nodes reachable from `start` in
    /// **depth-first** pre-order.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(GraphConfig::new(), [(0, 1), (0, 2), (1, 3)]).unwrap();
    ///
    /// let order: Vec<_> = g.dfs_iter(0).map(|v| v.node).collect();
    /// assert_eq!(order, vec![0, 1, 3, 2]);
    /// ```
    fn dfs_iter(&self, start: Node) -> DFS<'_, Self> {
        DFS::new(self, start)
    }

    /// Runs a breadth-first search from `start` and returns the visitation order, the hop
    /// distances and the BFS tree.
    ///
    /// Fails with [`GraphError::NodeNotFound`] if `start` is not part of the graph.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let mut g = Graph::from_edges(GraphConfig::new(), [("a", "b"), ("b", "c")]).unwrap();
    /// g.add_node("z");
    ///
    /// let res = g.bfs(&"a").unwrap();
    /// assert_eq!(res.order, vec!["a", "b", "c"]);
    /// assert_eq!(res.dist[&"c"], Some(2));
    /// assert_eq!(res.dist[&"z"], None);
    /// assert_eq!(res.prev[&"c"], Some("b"));
    /// ```
    fn bfs(&self, start: &Self::Key) -> Result<BfsResult<Self::Key>> {
        let s = self.index_of(start)?;

        let mut hops: Vec<Option<usize>> = vec![None; self.node_bound()];
        let mut prev: Vec<Option<Node>> = vec![None; self.node_bound()];
        let mut order = Vec::new();

        for Visit { node, parent } in self.bfs_iter(s) {
            hops[node as usize] = Some(
                parent
                    .and_then(|p| hops[p as usize])
                    .map_or(0, |d| d + 1),
            );
            prev[node as usize] = parent;
            order.push(node);
        }

        debug!(source = ?start, visited = order.len(), "bfs finished");

        Ok(BfsResult {
            order: self.keys_of(order),
            dist: self.key_map(&hops),
            prev: self
                .vertices()
                .map(|u| {
                    (
                        self.key_of(u).clone(),
                        prev[u as usize].map(|p| self.key_of(p).clone()),
                    )
                })
                .collect(),
        })
    }

    /// Returns the depth-first pre-order of the nodes reachable from `start`.
    /// Neighbors are explored in ascending key order.
    ///
    /// Fails with [`GraphError::NodeNotFound`] if `start` is not part of the graph.
    fn dfs(&self, start: &Self::Key) -> Result<Vec<Self::Key>> {
        let s = self.index_of(start)?;
        let order = self.keys_of(self.dfs_iter(s).map(|v| v.node));
        debug!(source = ?start, visited = order.len(), "dfs finished");
        Ok(order)
    }

    /// Returns *true* if there exists a (directed) path from `u` to `v`.
    /// Every node reaches itself.
    fn has_path(&self, u: &Self::Key, v: &Self::Key) -> Result<bool> {
        let s = self.index_of(u)?;
        let t = self.index_of(v)?;
        Ok(self.bfs_iter(s).any(|visit| visit.node == t))
    }

    /// Returns a path from `u` to `v` (both inclusive) with the fewest edges, or `None` if `v`
    /// is unreachable. Weights are ignored.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(GraphConfig::new(), [(1, 2), (2, 3), (1, 4), (4, 3)]).unwrap();
    /// assert_eq!(g.shortest_path_unweighted(&1, &3).unwrap(), Some(vec![1, 2, 3]));
    /// ```
    fn shortest_path_unweighted(
        &self,
        u: &Self::Key,
        v: &Self::Key,
    ) -> Result<Option<Vec<Self::Key>>> {
        let s = self.index_of(u)?;
        let t = self.index_of(v)?;

        let mut prev: Vec<Option<Node>> = vec![None; self.node_bound()];
        for Visit { node, parent } in self.bfs_iter(s) {
            prev[node as usize] = parent;
            if node != t {
                continue;
            }

            let mut path = vec![t];
            let mut current = t;
            while let Some(p) = prev[current as usize] {
                path.push(p);
                current = p;
            }
            path.reverse();
            return Ok(Some(self.keys_of(path)));
        }

        Ok(None)
    }
}

impl<G> Traversal for G where G: DirectedAdjacencyList + KeyedGraph + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::GeneratorSubstructures;
    use fxhash::FxHashSet;

    #[test]
    fn bfs_levels() {
        //  / b --- \
        // a         e - d
        //  \ c - f /
        let g = Graph::from_edges(
            GraphConfig::new(),
            [("a", "b"), ("a", "c"), ("e", "d"), ("c", "f"), ("b", "e"), ("f", "e")],
        )
        .unwrap();

        let res = g.bfs(&"a").unwrap();
        assert_eq!(res.order, vec!["a", "b", "c", "e", "f", "d"]);
        assert_eq!(res.dist[&"a"], Some(0));
        assert_eq!(res.dist[&"e"], Some(2));
        assert_eq!(res.dist[&"d"], Some(3));
        assert_eq!(res.prev[&"a"], None);
        assert_eq!(res.prev[&"e"], Some("b"));
        assert_eq!(res.path_to(&"d"), Some(vec!["a", "b", "e", "d"]));
    }

    #[test]
    fn bfs_respects_direction() {
        let mut g = Graph::from_edges(GraphConfig::new().directed(true), [(1, 2), (3, 2)]).unwrap();
        g.add_node(4);

        let res = g.bfs(&1).unwrap();
        assert_eq!(res.order, vec![1, 2]);
        assert_eq!(res.dist[&3], None);
        assert_eq!(res.dist[&4], None);
        assert_eq!(res.prev[&3], None);
        assert_eq!(res.path_to(&3), None);
        assert_eq!(res.dist.len(), 4);

        let weak = BFS::new(&g, g.index_of(&1).unwrap())
            .ignore_direction(true)
            .count();
        assert_eq!(weak, 3);
    }

    #[test]
    fn dfs_preorder() {
        let g = Graph::from_edges(
            GraphConfig::new(),
            [('a', 'c'), ('a', 'b'), ('b', 'd'), ('c', 'd'), ('d', 'e')],
        )
        .unwrap();
        assert_eq!(g.dfs(&'a').unwrap(), vec!['a', 'b', 'd', 'c', 'e']);
        assert_eq!(g.dfs(&'e').unwrap(), vec!['e', 'd', 'b', 'a', 'c']);
    }

    #[test]
    fn unknown_start() {
        let g: Graph<u32> = Graph::undirected();
        assert_eq!(
            g.bfs(&0).unwrap_err().kind(),
            crate::error::ErrorKind::NotFound
        );
        assert!(g.dfs(&0).is_err());
        assert!(g.has_path(&0, &1).is_err());
    }

    #[test]
    fn long_path_does_not_overflow() {
        let n = 200_000u32;
        let mut g = Graph::directed();
        g.connect_path(0..n, None).unwrap();

        let order = g.dfs(&0).unwrap();
        assert_eq!(order.len(), n as usize);
        assert_eq!(order[n as usize - 1], n - 1);
        assert!(g.has_path(&0, &(n - 1)).unwrap());
        assert!(!g.has_path(&(n - 1), &0).unwrap());
    }

    #[test]
    fn restart_covers_all_components() {
        let mut g = Graph::from_edges(GraphConfig::new(), [(0, 1), (2, 3)]).unwrap();
        g.add_node(4);

        let mut search = DFS::idle(&g);
        let mut roots = Vec::new();
        for u in g.vertices_by_key() {
            if search.restart_at(u) {
                roots.push(u);
                search.by_ref().for_each(drop);
            }
        }
        assert_eq!(g.keys_of(roots), vec![0, 2, 4]);
        assert_eq!(search.num_visited(), 5);
    }

    #[test]
    fn sparse_visited_set() {
        let n = 1000u32;
        let mut g = Graph::directed();
        g.connect_path(0..n, None).unwrap();

        let start = g.index_of(&(n - 5)).unwrap();
        let mut dense = BFS::new(&g, start);
        let mut sparse = BFSWithSet::<_, FxHashSet<Node>>::new(&g, start);
        assert!(dense.by_ref().eq(sparse.by_ref()));
        assert_eq!(sparse.visited().len(), 5);
        assert_eq!(dense.num_visited(), 5);
        assert!(dense.visited().get_bit(start));
    }

    #[test]
    fn unweighted_shortest_path() {
        let mut g = Graph::from_edges(
            GraphConfig::new().directed(true),
            [("s", "a"), ("a", "b"), ("b", "t"), ("s", "c"), ("c", "t")],
        )
        .unwrap();
        g.add_node("x");

        assert_eq!(
            g.shortest_path_unweighted(&"s", &"t").unwrap(),
            Some(vec!["s", "c", "t"])
        );
        assert_eq!(
            g.shortest_path_unweighted(&"s", &"s").unwrap(),
            Some(vec!["s"])
        );
        assert_eq!(g.shortest_path_unweighted(&"t", &"s").unwrap(), None);
        assert_eq!(g.shortest_path_unweighted(&"s", &"x").unwrap(), None);
    }
}

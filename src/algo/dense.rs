/*!
# Dense Views

Whole-graph views that are quadratic in the number of nodes:

- [`DenseViews::adjacency_matrix`] lists the lightest edge weight between every pair of nodes,
- [`DenseViews::transitive_closure`] records which node reaches which (one BFS per node),
- [`DenseViews::is_complete`] and [`DenseViews::complement`] compare the graph against the
  complete graph on its nodes.

Rows and columns of both matrices follow the ascending key order. Edge directions are
respected; undirected graphs yield symmetric matrices.
*/

use itertools::Itertools;
use tracing::debug;

use super::{traversal::*, *};

/// Adjacency matrix with the lightest weight of all parallel edges per entry
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyMatrix<K> {
    keys: Vec<K>,
    entries: Vec<Option<f64>>,
}

impl<K: NodeKey> AdjacencyMatrix<K> {
    /// Keys labelling rows and columns, in ascending order
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Position of `key` among the rows
    pub fn position(&self, key: &K) -> Option<usize> {
        self.keys.binary_search(key).ok()
    }

    /// Lightest weight of an edge `u -> v`; `None` if there is none or a key is unknown
    pub fn weight(&self, u: &K, v: &K) -> Option<f64> {
        let (i, j) = (self.position(u)?, self.position(v)?);
        self.entries[i * self.len() + j]
    }

    /// Rows of the matrix in key order
    pub fn rows(&self) -> impl Iterator<Item = &[Option<f64>]> + '_ {
        self.entries.chunks(self.len().max(1))
    }

    /// The matrix with `1` for adjacent and `0` for non-adjacent pairs
    pub fn to_binary(&self) -> Vec<Vec<u8>> {
        self.rows()
            .map(|row| row.iter().map(|w| w.is_some() as u8).collect())
            .collect()
    }
}

/// Reachability between all pairs of nodes. Every node reaches itself.
#[derive(Debug, Clone)]
pub struct TransitiveClosure<K> {
    keys: Vec<K>,
    rows: Vec<NodeBitSet>,
}

impl<K: NodeKey> TransitiveClosure<K> {
    /// Keys labelling rows and columns, in ascending order
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    fn position(&self, key: &K) -> Option<Node> {
        self.keys.binary_search(key).ok().map(|i| i as Node)
    }

    /// Returns *true* if there is a path from `u` to `v`; *false* for unknown keys
    pub fn reaches(&self, u: &K, v: &K) -> bool {
        match (self.position(u), self.position(v)) {
            (Some(i), Some(j)) => self.rows[i as usize].get_bit(j),
            _ => false,
        }
    }

    /// All keys reachable from `u` (including `u`) in ascending order
    pub fn reachable_from(&self, u: &K) -> Vec<K> {
        self.position(u)
            .map(|i| {
                self.rows[i as usize]
                    .iter_set_bits()
                    .map(|j| self.keys[j as usize].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of ordered pairs `(u, v)` such that `u` reaches `v`
    pub fn number_of_pairs(&self) -> usize {
        self.rows.iter().map(|row| row.cardinality() as usize).sum()
    }
}

/// Out-neighbors of `u` (without `u` itself) as a bitset over node indices
fn neighbor_set<G>(graph: &G, u: Node) -> NodeBitSet
where
    G: AdjacencyList,
{
    let mut set = graph.vertex_bitset_unset();
    for v in graph.neighbors_of(u).filter(|&v| v != u) {
        set.set_bit(v);
    }
    set
}

/// Matrix views and completeness
pub trait DenseViews: DirectedAdjacencyList + KeyedGraph + Sized {
    /// Returns the adjacency matrix in key order. Parallel edges contribute their lightest
    /// weight, self-loops appear on the diagonal.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(
    ///     GraphConfig::new().weighted(true).directed(true),
    ///     [('b', 'a', 2.0), ('a', 'c', 5.0)],
    /// )
    /// .unwrap();
    ///
    /// let matrix = g.adjacency_matrix();
    /// assert_eq!(matrix.weight(&'a', &'c'), Some(5.0));
    /// assert_eq!(matrix.weight(&'c', &'a'), None);
    /// assert_eq!(matrix.to_binary(), vec![vec![0, 0, 1], vec![1, 0, 0], vec![0, 0, 0]]);
    /// ```
    fn adjacency_matrix(&self) -> AdjacencyMatrix<Self::Key> {
        let order = self.vertices_by_key();
        let n = order.len();
        let mut position = vec![0usize; self.node_bound()];
        for (i, &u) in order.iter().enumerate() {
            position[u as usize] = i;
        }

        let mut entries: Vec<Option<f64>> = vec![None; n * n];
        for (i, &u) in order.iter().enumerate() {
            for (v, w) in self.weighted_neighbors_of(u) {
                let entry = &mut entries[i * n + position[v as usize]];
                *entry = Some(entry.map_or(w, |x| x.min(w)));
            }
        }

        AdjacencyMatrix {
            keys: self.keys_of(order),
            entries,
        }
    }

    /// Computes the reflexive transitive closure by a BFS from every node.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(GraphConfig::new().directed(true), [(1, 2), (2, 3)]).unwrap();
    /// let closure = g.transitive_closure();
    ///
    /// assert!(closure.reaches(&1, &3));
    /// assert!(!closure.reaches(&3, &1));
    /// assert_eq!(closure.reachable_from(&2), vec![2, 3]);
    /// ```
    fn transitive_closure(&self) -> TransitiveClosure<Self::Key> {
        let order = self.vertices_by_key();
        let mut position = vec![0 as Node; self.node_bound()];
        for (i, &u) in order.iter().enumerate() {
            position[u as usize] = i as Node;
        }

        let rows = order
            .iter()
            .map(|&u| {
                let mut row = NodeBitSet::new(order.len() as Node);
                for visit in BFS::new(self, u) {
                    row.set_bit(position[visit.node as usize]);
                }
                row
            })
            .collect_vec();

        let closure = TransitiveClosure {
            keys: self.keys_of(order),
            rows,
        };
        debug!(
            nodes = closure.keys.len(),
            pairs = closure.number_of_pairs(),
            "computed transitive closure"
        );
        closure
    }

    /// Returns *true* if every node is adjacent to every other node (in both directions for
    /// directed graphs). Self-loops and parallel edges are ignored; graphs with fewer than two
    /// nodes are complete.
    fn is_complete(&self) -> bool {
        let others = self.len().saturating_sub(1);
        self.vertices()
            .all(|u| neighbor_set(self, u).cardinality() as usize == others)
    }

    /// Returns the complement: an unweighted simple graph on the same keys and with the same
    /// directedness that has an edge exactly where this graph has none. Self-loops are never
    /// part of the complement.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(GraphConfig::new(), [(1, 2), (2, 3)]).unwrap();
    /// let h = g.complement().unwrap();
    ///
    /// assert_eq!(h.number_of_edges(), 1);
    /// assert!(h.has_edge(&3, &1));
    /// ```
    fn complement(&self) -> Result<Graph<Self::Key>> {
        let order = self.vertices_by_key();
        let mut complement = Graph::new(GraphConfig::new().directed(self.is_directed()));
        complement.add_nodes(self.keys_of(order.iter().copied()));

        for &u in &order {
            let adjacent = neighbor_set(self, u);
            for &v in &order {
                let pair_once = self.is_directed() || self.key_of(u) < self.key_of(v);
                if u != v && pair_once && !adjacent.get_bit(v) {
                    complement.add_edge(self.key_of(u).clone(), self.key_of(v).clone(), None)?;
                }
            }
        }

        debug!(
            nodes = complement.len(),
            edges = complement.number_of_edges(),
            "computed complement"
        );
        Ok(complement)
    }
}

impl<G> DenseViews for G where G: DirectedAdjacencyList + KeyedGraph + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gens::*, testing::random_graph};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn matrix_of_multigraph() {
        let mut g = Graph::new(GraphConfig::new().weighted(true).multigraph(true));
        g.add_edge("a", "b", Some(4.0)).unwrap();
        g.add_edge("b", "a", Some(1.5)).unwrap();
        g.add_edge("c", "c", Some(2.0)).unwrap();

        let matrix = g.adjacency_matrix();
        assert_eq!(matrix.keys(), &["a", "b", "c"]);
        assert_eq!(matrix.weight(&"a", &"b"), Some(1.5));
        assert_eq!(matrix.weight(&"b", &"a"), Some(1.5));
        assert_eq!(matrix.weight(&"c", &"c"), Some(2.0));
        assert_eq!(matrix.weight(&"a", &"z"), None);
        assert_eq!(
            matrix.to_binary(),
            vec![vec![0, 1, 0], vec![1, 0, 0], vec![0, 0, 1]]
        );

        let empty: Graph<u8> = Graph::undirected();
        assert!(empty.adjacency_matrix().is_empty());
        assert_eq!(empty.adjacency_matrix().rows().count(), 0);
    }

    #[test]
    fn closure_of_directed_cycle_with_tail() {
        let mut g = Graph::directed();
        g.connect_cycle([1, 2, 3], None).unwrap();
        g.add_edge(3, 4, None).unwrap();
        g.add_node(5);

        let closure = g.transitive_closure();
        assert_eq!(closure.reachable_from(&1), vec![1, 2, 3, 4]);
        assert_eq!(closure.reachable_from(&4), vec![4]);
        assert_eq!(closure.reachable_from(&9), Vec::<i32>::new());
        assert!(closure.reaches(&5, &5));
        assert!(!closure.reaches(&4, &1));
        // three nodes reach four, two reach themselves only
        assert_eq!(closure.number_of_pairs(), 3 * 4 + 2);
    }

    #[test]
    fn closure_agrees_with_has_path() {
        let rng = &mut Pcg64Mcg::seed_from_u64(23);
        for directed in [false, true] {
            for _ in 0..20 {
                let n = rng.random_range(1..15);
                let m = rng.random_range(0..2 * n);
                let g = random_graph(rng, n, m, 1.0..1.0, GraphConfig::new().directed(directed));

                let closure = g.transitive_closure();
                for u in 0..n {
                    for v in 0..n {
                        assert_eq!(closure.reaches(&u, &v), g.has_path(&u, &v).unwrap());
                    }
                }
            }
        }
    }

    #[test]
    fn completeness() {
        let mut g = Graph::undirected();
        g.connect_clique(&[1, 2, 3, 4], None).unwrap();
        assert!(g.is_complete());
        assert_eq!(g.complement().unwrap().number_of_edges(), 0);

        g.remove_edge(&2, &4).unwrap();
        assert!(!g.is_complete());
        let h = g.complement().unwrap();
        assert_eq!(h.get_nodes().len(), 4);
        assert_eq!(h.number_of_edges(), 1);
        assert!(h.has_edge(&4, &2));

        let mut d = Graph::directed();
        d.connect_path([1, 2], None).unwrap();
        assert!(!d.is_complete());
        d.add_edge(2, 1, None).unwrap();
        assert!(d.is_complete());

        let mut single: Graph<u8> = Graph::undirected();
        assert!(single.is_complete());
        single.add_node(7);
        assert!(single.is_complete());
    }

    #[test]
    fn self_loops_do_not_count_for_completeness() {
        let g = Graph::from_edges(
            GraphConfig::new().multigraph(true),
            [(1, 1), (2, 2), (1, 2), (1, 2)],
        )
        .unwrap();
        assert!(g.is_complete());

        let h = Graph::from_edges(GraphConfig::new().multigraph(true), [(1, 1), (2, 2)]).unwrap();
        assert!(!h.is_complete());
        let c = h.complement().unwrap();
        assert_eq!(c.number_of_edges(), 1);
        assert!(!c.has_edge(&1, &1));
    }

    #[test]
    fn complement_is_an_involution() {
        let rng = &mut Pcg64Mcg::seed_from_u64(29);
        for directed in [false, true] {
            for _ in 0..20 {
                let n = rng.random_range(1..12);
                let pairs = if directed { n * (n - 1) } else { n * (n - 1) / 2 };
                let m = rng.random_range(0..=pairs);
                let g = random_graph(rng, n, m, 1.0..1.0, GraphConfig::new().directed(directed));

                let h = g.complement().unwrap();
                assert_eq!(g.number_of_edges() + h.number_of_edges(), pairs);
                assert_eq!(h.complement().unwrap().get_edges().len(), g.get_edges().len());
                for e in h.get_edges() {
                    assert!(!g.has_edge(&e.source, &e.target));
                }
            }
        }
    }
}

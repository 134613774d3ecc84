/*!
# Bipartite Graphs

Tests whether a graph is **bipartite**, i.e. whether its nodes can be split into two sides
such that every edge runs between the sides. Edge directions are ignored and every component
is colored independently by BFS; a self-loop makes a graph non-bipartite.
*/

use tracing::debug;

use super::{traversal::*, *};

/// The two sides of a bipartite graph, each sorted by key.
/// In every component, the node with the smallest key is on the left side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bipartition<K> {
    pub left: Vec<K>,
    pub right: Vec<K>,
}

impl<K: NodeKey> Bipartition<K> {
    /// Returns `Some(true)` if `u` is on the left side, `Some(false)` if on the right
    /// and `None` if the key is not part of the bipartition
    pub fn is_on_left_side(&self, u: &K) -> Option<bool> {
        if self.left.binary_search(u).is_ok() {
            Some(true)
        } else if self.right.binary_search(u).is_ok() {
            Some(false)
        } else {
            None
        }
    }
}

/// Colors every node by a BFS over the weak components; set bits mark the right side.
/// The result may be illegal if the graph is not bipartite.
fn propose_coloring<G>(graph: &G) -> NodeBitSet
where
    G: DirectedAdjacencyList + KeyedGraph,
{
    let mut on_right = graph.vertex_bitset_unset();
    let mut bfs = BFS::idle(graph).ignore_direction(true);

    for root in graph.vertices_by_key() {
        if !bfs.restart_at(root) {
            continue;
        }
        for Visit { node, parent } in bfs.by_ref() {
            if parent.is_some_and(|p| !on_right.get_bit(p)) {
                on_right.set_bit(node);
            }
        }
    }

    on_right
}

/// Two-coloring of all nodes (set bit = right side) or `None` if the graph is not bipartite
pub(crate) fn two_coloring<G>(graph: &G) -> Option<NodeBitSet>
where
    G: DirectedAdjacencyList + KeyedGraph,
{
    let on_right = propose_coloring(graph);
    graph
        .arcs()
        .all(|(u, v, _)| on_right.get_bit(u) != on_right.get_bit(v))
        .then_some(on_right)
}

/// Bipartiteness test
pub trait BipartiteTest: DirectedAdjacencyList + KeyedGraph + Sized {
    /// Returns a bipartition of the graph or `None` if it is not bipartite.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*, gens::*};
    ///
    /// let mut g = Graph::undirected();
    /// g.connect_cycle([1, 2, 3, 4], None).unwrap();
    ///
    /// let bip = g.is_bipartite().unwrap();
    /// assert_eq!(bip.left, vec![1, 3]);
    /// assert_eq!(bip.right, vec![2, 4]);
    ///
    /// g.add_edge(1, 3, None).unwrap();
    /// assert!(g.is_bipartite().is_none());
    /// ```
    fn is_bipartite(&self) -> Option<Bipartition<Self::Key>> {
        let Some(on_right) = two_coloring(self) else {
            debug!(nodes = self.number_of_nodes(), "graph is not bipartite");
            return None;
        };

        let (right, left): (Vec<Node>, Vec<Node>) = self
            .vertices_by_key()
            .into_iter()
            .partition(|&u| on_right.get_bit(u));

        debug!(left = left.len(), right = right.len(), "computed bipartition");
        Some(Bipartition {
            left: self.keys_of(left),
            right: self.keys_of(right),
        })
    }
}

impl<G> BipartiteTest for G where G: DirectedAdjacencyList + KeyedGraph + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gens::*, testing::random_graph};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn even_and_odd_cycles() {
        for n in 3..12u32 {
            let mut g = Graph::undirected();
            g.connect_cycle(0..n, None).unwrap();
            assert_eq!(g.is_bipartite().is_some(), n % 2 == 0);
        }
    }

    #[test]
    fn components_are_colored_independently() {
        let mut g = Graph::from_edges(GraphConfig::new(), [(5, 6), (2, 1), (3, 2)]).unwrap();
        g.add_node(9);

        let bip = g.is_bipartite().unwrap();
        assert_eq!(bip.left, vec![1, 3, 5, 9]);
        assert_eq!(bip.right, vec![2, 6]);
        assert_eq!(bip.is_on_left_side(&9), Some(true));
        assert_eq!(bip.is_on_left_side(&6), Some(false));
        assert_eq!(bip.is_on_left_side(&7), None);
    }

    #[test]
    fn self_loop_is_not_bipartite() {
        let g = Graph::from_edges(GraphConfig::new().multigraph(true), [(1, 2), (2, 2)]).unwrap();
        assert!(g.is_bipartite().is_none());
    }

    #[test]
    fn directions_are_ignored() {
        let g = Graph::from_edges(
            GraphConfig::new().directed(true),
            [('a', 'b'), ('c', 'b'), ('c', 'd')],
        )
        .unwrap();
        let bip = g.is_bipartite().unwrap();
        assert_eq!(bip.left, vec!['a', 'c']);

        let g = Graph::from_edges(
            GraphConfig::new().directed(true),
            [('a', 'b'), ('b', 'c'), ('a', 'c')],
        )
        .unwrap();
        assert!(g.is_bipartite().is_none());
    }

    #[test]
    fn random_graphs() {
        let rng = &mut Pcg64Mcg::seed_from_u64(71);
        for _ in 0..50 {
            let n = rng.random_range(1..25);
            let m = rng.random_range(0..2 * n);
            let g = random_graph(rng, n, m, 1.0..1.0, GraphConfig::new());

            if let Some(bip) = g.is_bipartite() {
                assert_eq!(bip.left.len() + bip.right.len(), g.len());
                for e in g.get_edges() {
                    assert_ne!(bip.is_on_left_side(&e.source), bip.is_on_left_side(&e.target));
                }
            } else {
                // a non-bipartite graph contains an odd cycle, hence a cycle
                assert!(g.has_cycle());
            }
        }
    }
}

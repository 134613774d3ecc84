/*!
# Connectivity

Weakly and strongly connected components, cycle detection and related predicates.

- [`Connectivity::connected_components`] treats directed edges as undirected (weak components).
- [`Connectivity::strongly_connected_components`] implements Kosaraju's algorithm with two
  iterative passes.
- [`Connectivity::has_cycle`] uses a three-colored DFS for directed graphs and a DFS that
  tracks the edge a node was entered by for undirected graphs; the latter also recognizes
  parallel edges and self-loops of multigraphs as cycles.

All components are sorted by key and listed in order of their smallest key.
*/

use itertools::Itertools;
use tracing::debug;

use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Outcome of an iterative depth-first search that records finishing times.
pub(crate) struct PostOrder {
    /// Nodes in the order they were finished
    pub order: Vec<Node>,
    /// *true* if an edge to a node on the DFS stack was found (a directed cycle)
    pub back_edge: bool,
}

/// Runs a DFS along outgoing edges from each of `roots` (in the given order) that is not
/// visited yet. Neighbors are explored in ascending key order.
pub(crate) fn dfs_postorder<G>(graph: &G, roots: &[Node]) -> PostOrder
where
    G: AdjacencyList + KeyedGraph,
{
    let mut color = vec![Color::White; graph.node_bound()];
    let mut order = Vec::with_capacity(graph.len());
    let mut back_edge = false;

    // (node, its neighbors, index of the next neighbor to explore)
    let mut stack: Vec<(Node, Vec<Node>, usize)> = Vec::new();

    for &root in roots {
        if color[root as usize] != Color::White {
            continue;
        }
        color[root as usize] = Color::Gray;
        stack.push((root, ordered_neighbors_of(graph, root), 0));

        while let Some(top) = stack.last_mut() {
            let u = top.0;
            let next = top.1.get(top.2).copied();
            top.2 += 1;

            match next {
                Some(v) => match color[v as usize] {
                    Color::White => {
                        color[v as usize] = Color::Gray;
                        stack.push((v, ordered_neighbors_of(graph, v), 0));
                    }
                    Color::Gray => back_edge = true,
                    Color::Black => {}
                },
                None => {
                    color[u as usize] = Color::Black;
                    order.push(u);
                    stack.pop();
                }
            }
        }
    }

    PostOrder { order, back_edge }
}

/// Component and cycle queries on graphs with keyed nodes
pub trait Connectivity: Traversal {
    /// Returns the (weakly) connected components of the graph.
    /// Each component is sorted by key; components are ordered by their smallest key.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let mut g = Graph::from_edges(GraphConfig::new().directed(true), [(3, 1), (2, 4)]).unwrap();
    /// g.add_node(0);
    ///
    /// assert_eq!(g.connected_components(), vec![vec![0], vec![1, 3], vec![2, 4]]);
    /// ```
    fn connected_components(&self) -> Vec<Vec<Self::Key>> {
        let mut search = BFS::idle(self).ignore_direction(true);
        let mut components = Vec::new();

        for u in self.vertices_by_key() {
            if !search.restart_at(u) {
                continue;
            }
            let mut component = search.by_ref().map(|v| v.node).collect_vec();
            self.sort_by_key(&mut component);
            components.push(self.keys_of(component));
        }

        debug!(
            nodes = self.number_of_nodes(),
            components = components.len(),
            "computed connected components"
        );
        components
    }

    /// Returns *true* if the graph consists of at most one (weakly) connected component.
    /// The empty graph counts as connected.
    fn is_connected(&self) -> bool {
        match self.vertices().next() {
            None => true,
            Some(u) => BFS::new(self, u).ignore_direction(true).count() == self.len(),
        }
    }

    /// Returns the strongly connected components (Kosaraju's algorithm).
    /// For undirected graphs, these coincide with the connected components.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(
    ///     GraphConfig::new().directed(true),
    ///     [("a", "b"), ("b", "a"), ("b", "c"), ("c", "d"), ("d", "c")],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(
    ///     g.strongly_connected_components(),
    ///     vec![vec!["a", "b"], vec!["c", "d"]]
    /// );
    /// ```
    fn strongly_connected_components(&self) -> Vec<Vec<Self::Key>> {
        let finished = dfs_postorder(self, &self.vertices_by_key()).order;

        let mut assigned = self.vertex_bitset_unset();
        let mut components = Vec::new();
        let mut stack = Vec::new();

        // second pass on the reversed graph in decreasing finishing time
        for &root in finished.iter().rev() {
            if assigned.set_bit(root) {
                continue;
            }
            stack.push(root);

            let mut component = Vec::new();
            while let Some(u) = stack.pop() {
                component.push(u);
                for v in self.in_neighbors_of(u) {
                    if !assigned.set_bit(v) {
                        stack.push(v);
                    }
                }
            }

            self.sort_by_key(&mut component);
            components.push(self.keys_of(component));
        }

        components.sort_unstable_by(|a, b| a[0].cmp(&b[0]));
        debug!(
            nodes = self.number_of_nodes(),
            components = components.len(),
            "computed strongly connected components"
        );
        components
    }

    /// Returns *true* if the graph contains a cycle.
    ///
    /// - Directed graphs: a cycle is a closed directed walk (self-loops included).
    /// - Undirected graphs: a cycle uses at least one edge other than the one a node was
    ///   entered by, so parallel edges and self-loops of multigraphs form cycles.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let dag = Graph::from_edges(GraphConfig::new().directed(true), [(1, 2), (1, 3), (2, 3)]).unwrap();
    /// assert!(!dag.has_cycle());
    ///
    /// let triangle = Graph::from_edges(GraphConfig::new(), [(1, 2), (1, 3), (2, 3)]).unwrap();
    /// assert!(triangle.has_cycle());
    /// ```
    fn has_cycle(&self) -> bool {
        if self.is_directed() {
            return dfs_postorder(self, &self.vertices_by_key()).back_edge;
        }

        let mut visited = self.vertex_bitset_unset();
        // (node, edge it was entered by, index of the next incidence to explore)
        let mut stack: Vec<(Node, Option<EdgeId>, usize)> = Vec::new();

        for root in self.vertices() {
            if visited.set_bit(root) {
                continue;
            }
            stack.push((root, None, 0));

            while let Some(top) = stack.last_mut() {
                let (u, entered_by) = (top.0, top.1);
                let Some(&nb) = self.incidences_of(u).get(top.2) else {
                    stack.pop();
                    continue;
                };
                top.2 += 1;

                if Some(nb.edge) == entered_by {
                    continue;
                }
                if visited.set_bit(nb.node) {
                    return true;
                }
                stack.push((nb.node, Some(nb.edge), 0));
            }
        }

        false
    }

    /// Returns *true* if the graph is a tree when edge directions are ignored,
    /// i.e. it is non-empty, connected and has exactly `n - 1` edges.
    fn is_tree(&self) -> bool {
        !self.is_empty()
            && self.number_of_edges() as usize + 1 == self.len()
            && self.is_connected()
    }
}

impl<G> Connectivity for G where G: Traversal {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gens::GeneratorSubstructures;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn components_of_undirected_graph() {
        let mut g = Graph::from_edges(
            GraphConfig::new(),
            [("d", "e"), ("a", "c"), ("c", "b"), ("f", "e")],
        )
        .unwrap();
        g.add_node("g");

        assert_eq!(
            g.connected_components(),
            vec![vec!["a", "b", "c"], vec!["d", "e", "f"], vec!["g"]]
        );
        assert!(!g.is_connected());

        g.add_edge("g", "a", None).unwrap();
        g.add_edge("g", "f", None).unwrap();
        assert!(g.is_connected());
        assert!(g.is_tree());
    }

    #[test]
    fn empty_graph() {
        let g: Graph<u8> = Graph::directed();
        assert!(g.connected_components().is_empty());
        assert!(g.strongly_connected_components().is_empty());
        assert!(g.is_connected());
        assert!(!g.is_tree());
        assert!(!g.has_cycle());
    }

    #[test]
    fn directed_three_cycle() {
        let g = Graph::from_edges(
            GraphConfig::new().directed(true),
            [("A", "B"), ("B", "C"), ("C", "A")],
        )
        .unwrap();
        assert!(g.has_cycle());
        assert_eq!(g.strongly_connected_components(), vec![vec!["A", "B", "C"]]);
    }

    #[test]
    fn directed_acyclic_with_reconvergence() {
        // diamond: no cycle even though `d` is reached twice
        let g = Graph::from_edges(
            GraphConfig::new().directed(true),
            [('a', 'b'), ('a', 'c'), ('b', 'd'), ('c', 'd')],
        )
        .unwrap();
        assert!(!g.has_cycle());
        assert_eq!(g.strongly_connected_components().len(), 4);
        assert_eq!(g.connected_components().len(), 1);
    }

    #[test]
    fn multigraph_cycles() {
        let config = GraphConfig::new().multigraph(true);

        let mut g = Graph::from_edges(config, [(1, 2), (2, 3)]).unwrap();
        assert!(!g.has_cycle());
        g.add_edge(2, 1, None).unwrap();
        assert!(g.has_cycle());

        let mut g = Graph::from_edges(config, [(1, 2)]).unwrap();
        g.add_edge(2, 2, None).unwrap();
        assert!(g.has_cycle());

        let mut g = Graph::from_edges(config.directed(true), [(1, 2)]).unwrap();
        g.add_edge(2, 1, None).unwrap();
        assert!(g.has_cycle());
    }

    #[test]
    fn long_cycle_is_found_iteratively() {
        let n = 100_000u32;
        let mut g = Graph::directed();
        g.connect_path(0..n, None).unwrap();
        assert!(!g.has_cycle());
        g.add_edge(n - 1, 0, None).unwrap();
        assert!(g.has_cycle());
        assert_eq!(g.strongly_connected_components().len(), 1);

        let mut g = Graph::undirected();
        g.connect_path(0..n, None).unwrap();
        assert!(g.is_tree());
        assert!(!g.has_cycle());
    }

    /// Reachability matrix by repeated traversals
    fn reaches(g: &Graph<Node>) -> Vec<NodeBitSet> {
        (0..g.len() as Node)
            .map(|u| {
                let mut row = g.vertex_bitset_unset();
                for v in g.bfs_iter(u) {
                    row.set_bit(v.node);
                }
                row
            })
            .collect()
    }

    #[test]
    fn scc_matches_mutual_reachability() {
        let rng = &mut Pcg64Mcg::seed_from_u64(11);
        for _ in 0..50 {
            let n = rng.random_range(1..15);
            let m = rng.random_range(0..3 * n);
            let g = crate::testing::random_graph(
                rng,
                n,
                m,
                1.0..1.0,
                GraphConfig::new().directed(true),
            );
            let reach = reaches(&g);

            let mut component_of = vec![usize::MAX; n as usize];
            for (i, comp) in g.strongly_connected_components().into_iter().enumerate() {
                for u in comp {
                    component_of[u as usize] = i;
                }
            }

            for u in 0..n {
                for v in 0..n {
                    let mutual = reach[u as usize].get_bit(v) && reach[v as usize].get_bit(u);
                    assert_eq!(mutual, component_of[u as usize] == component_of[v as usize]);
                }
            }

            let cyclic = (0..n).any(|u| {
                (0..n).any(|v| u != v && reach[u as usize].get_bit(v) && reach[v as usize].get_bit(u))
            });
            assert_eq!(cyclic, g.has_cycle());
        }
    }
}

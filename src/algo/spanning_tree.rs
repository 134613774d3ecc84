/*!
# Minimum Spanning Trees

Kruskal's algorithm (sorting + [`UnionFind`]) and Prim's algorithm (lazy binary heap) for
undirected graphs. Both return a minimum spanning *forest* on disconnected graphs, while
[`SpanningTree::prim_from`] only covers the component of its start node; use
[`SpanningForest::is_spanning_tree`] to check whether it spans the whole graph. Self-loops
never take part in a spanning forest.
*/

use std::collections::BinaryHeap;

use itertools::Itertools;
use tracing::debug;

use super::*;

/// Edges of a minimum spanning forest
#[derive(Debug, Clone, PartialEq)]
pub struct SpanningForest<K> {
    /// Chosen edges with endpoints ordered by key (`source <= target`)
    pub edges: Vec<WeightedEdge<K>>,
    pub total_weight: f64,
    num_nodes: usize,
}

impl<K> SpanningForest<K> {
    /// Returns *true* if the forest is a single tree covering every node of the graph
    pub fn is_spanning_tree(&self) -> bool {
        self.num_nodes > 0 && self.edges.len() + 1 == self.num_nodes
    }

    /// Number of trees in the forest (isolated nodes count as trees)
    pub fn number_of_trees(&self) -> usize {
        self.num_nodes - self.edges.len()
    }
}

fn require_undirected<G: GraphType>(graph: &G, algo: &str) -> Result<()> {
    if graph.is_directed() {
        Err(GraphError::Configuration(format!(
            "{algo} is only defined for undirected graphs"
        )))
    } else {
        Ok(())
    }
}

/// Translates a stored edge into a keyed edge with ordered endpoints
fn keyed_edge<G>(graph: &G, id: EdgeId) -> WeightedEdge<G::Key>
where
    G: AdjacencyList + KeyedGraph,
{
    let Edge(u, v) = graph.endpoints_of(id);
    let (mut source, mut target) = (graph.key_of(u), graph.key_of(v));
    if target < source {
        std::mem::swap(&mut source, &mut target);
    }
    WeightedEdge {
        id,
        source: source.clone(),
        target: target.clone(),
        weight: graph.weight_of(id),
    }
}

fn forest<G>(graph: &G, edges: Vec<WeightedEdge<G::Key>>) -> SpanningForest<G::Key>
where
    G: AdjacencyList + KeyedGraph,
{
    SpanningForest {
        total_weight: edges.iter().map(|e| e.weight).sum(),
        edges,
        num_nodes: graph.len(),
    }
}

/// Grows a minimum spanning tree of the component of `root` with a lazy heap of
/// candidate edges; `root` must not be in the tree yet.
fn grow_tree<G>(
    graph: &G,
    root: Node,
    in_tree: &mut NodeBitSet,
    edges: &mut Vec<WeightedEdge<G::Key>>,
) where
    G: AdjacencyList + KeyedGraph,
{
    let mut heap = BinaryHeap::new();
    in_tree.set_bit(root);
    for nb in graph.incidences_of(root) {
        heap.push(MinScored(graph.weight_of(nb.edge), (nb.edge, nb.node)));
    }

    while let Some(MinScored(_, (id, v))) = heap.pop() {
        if in_tree.set_bit(v) {
            continue;
        }
        edges.push(keyed_edge(graph, id));

        for nb in graph.incidences_of(v) {
            if !in_tree.get_bit(nb.node) {
                heap.push(MinScored(graph.weight_of(nb.edge), (nb.edge, nb.node)));
            }
        }
    }
}

/// Minimum spanning forests of undirected graphs
pub trait SpanningTree: AdjacencyList + KeyedGraph + Sized {
    /// Kruskal's algorithm: edges are scanned by ascending weight (ties broken by endpoint
    /// keys, then by id) and accepted unless both endpoints are already connected.
    ///
    /// Fails with [`GraphError::Configuration`] on directed graphs.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(
    ///     GraphConfig::new().weighted(true),
    ///     [("a", "b", 4.0), ("b", "c", 1.0), ("a", "c", 2.0), ("c", "d", 7.0)],
    /// )
    /// .unwrap();
    ///
    /// let mst = g.kruskal().unwrap();
    /// assert_eq!(mst.total_weight, 10.0);
    /// assert!(mst.is_spanning_tree());
    /// ```
    fn kruskal(&self) -> Result<SpanningForest<Self::Key>> {
        require_undirected(self, "kruskal")?;

        let candidates = self
            .edge_ids()
            .filter(|&id| !self.endpoints_of(id).is_loop())
            .map(|id| keyed_edge(self, id))
            .sorted_by(|a, b| {
                a.weight
                    .total_cmp(&b.weight)
                    .then_with(|| a.source.cmp(&b.source))
                    .then_with(|| a.target.cmp(&b.target))
                    .then_with(|| a.id.cmp(&b.id))
            })
            .collect_vec();

        let target = self.len().saturating_sub(1);
        let mut uf = UnionFind::new(self.node_bound());
        let mut edges = Vec::with_capacity(target);

        for e in candidates {
            if edges.len() == target {
                break;
            }
            let Edge(u, v) = self.endpoints_of(e.id);
            if uf.union(u, v) {
                edges.push(e);
            }
        }

        let forest = forest(self, edges);
        debug!(
            edges = forest.edges.len(),
            weight = forest.total_weight,
            "kruskal finished"
        );
        Ok(forest)
    }

    /// Prim's algorithm: grows a tree from the unvisited node with the smallest key by
    /// repeatedly taking the lightest edge leaving it; repeated for every component.
    ///
    /// Fails with [`GraphError::Configuration`] on directed graphs.
    fn prim(&self) -> Result<SpanningForest<Self::Key>> {
        require_undirected(self, "prim")?;

        let mut in_tree = self.vertex_bitset_unset();
        let mut edges = Vec::with_capacity(self.len().saturating_sub(1));
        for root in self.vertices_by_key() {
            if !in_tree.get_bit(root) {
                grow_tree(self, root, &mut in_tree, &mut edges);
            }
        }

        let forest = forest(self, edges);
        debug!(
            edges = forest.edges.len(),
            weight = forest.total_weight,
            "prim finished"
        );
        Ok(forest)
    }

    /// Prim's algorithm restricted to the component of `start`: the returned tree spans
    /// exactly the nodes reachable from `start`. Nodes of other components are counted as
    /// isolated trees by [`SpanningForest::number_of_trees`].
    ///
    /// Fails with [`GraphError::Configuration`] on directed graphs and with
    /// [`GraphError::NodeNotFound`] if `start` is unknown.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(
    ///     GraphConfig::new().weighted(true),
    ///     [(1, 2, 3.0), (2, 3, 1.0), (1, 3, 2.0), (7, 8, 5.0)],
    /// )
    /// .unwrap();
    ///
    /// let tree = g.prim_from(&2).unwrap();
    /// assert_eq!(tree.total_weight, 3.0);
    /// assert_eq!(tree.edges.len(), 2);
    /// ```
    fn prim_from(&self, start: &Self::Key) -> Result<SpanningForest<Self::Key>> {
        require_undirected(self, "prim")?;
        let root = self.index_of(start)?;

        let mut in_tree = self.vertex_bitset_unset();
        let mut edges = Vec::new();
        grow_tree(self, root, &mut in_tree, &mut edges);

        let forest = forest(self, edges);
        debug!(
            start = ?start,
            edges = forest.edges.len(),
            weight = forest.total_weight,
            "prim finished"
        );
        Ok(forest)
    }
}

impl<G> SpanningTree for G where G: AdjacencyList + KeyedGraph + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        testing::{assert_close, random_graph},
    };
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn classic_example() {
        let g = Graph::from_edges(
            GraphConfig::new().weighted(true),
            [
                ('a', 'b', 7.0),
                ('a', 'd', 5.0),
                ('b', 'c', 8.0),
                ('b', 'd', 9.0),
                ('b', 'e', 7.0),
                ('c', 'e', 5.0),
                ('d', 'e', 15.0),
                ('d', 'f', 6.0),
                ('e', 'f', 8.0),
                ('e', 'g', 9.0),
                ('f', 'g', 11.0),
            ],
        )
        .unwrap();

        for mst in [g.kruskal().unwrap(), g.prim().unwrap()] {
            assert_eq!(mst.total_weight, 39.0);
            assert!(mst.is_spanning_tree());
            let pairs = mst
                .edges
                .iter()
                .map(|e| (e.source, e.target))
                .sorted()
                .collect_vec();
            assert_eq!(
                pairs,
                vec![
                    ('a', 'b'),
                    ('a', 'd'),
                    ('b', 'e'),
                    ('c', 'e'),
                    ('d', 'f'),
                    ('e', 'g')
                ]
            );
        }
    }

    #[test]
    fn disconnected_graph_yields_forest() {
        let mut g = Graph::from_edges(
            GraphConfig::new().weighted(true),
            [(1, 2, 1.0), (2, 3, 2.0), (1, 3, 3.0), (4, 5, 1.0)],
        )
        .unwrap();
        g.add_node(6);

        for forest in [g.kruskal().unwrap(), g.prim().unwrap()] {
            assert!(!forest.is_spanning_tree());
            assert_eq!(forest.number_of_trees(), 3);
            assert_eq!(forest.total_weight, 4.0);
        }
    }

    #[test]
    fn multigraph_uses_lightest_parallel_edge() {
        let mut g = Graph::new(GraphConfig::new().weighted(true).multigraph(true));
        g.add_edge("x", "y", Some(5.0)).unwrap();
        let light = g.add_edge("y", "x", Some(2.0)).unwrap();
        g.add_edge("x", "x", Some(-10.0)).unwrap();

        for mst in [g.kruskal().unwrap(), g.prim().unwrap()] {
            assert_eq!(mst.edges.len(), 1);
            assert_eq!(mst.edges[0].id, light);
            assert_eq!((mst.edges[0].source, mst.edges[0].target), ("x", "y"));
        }
    }

    #[test]
    fn directed_graphs_are_rejected() {
        let g = Graph::from_edges(GraphConfig::new().directed(true), [(1, 2)]).unwrap();
        assert_eq!(g.kruskal().unwrap_err().kind(), ErrorKind::Configuration);
        assert_eq!(g.prim().unwrap_err().kind(), ErrorKind::Configuration);
    }

    #[test]
    fn empty_and_single_node() {
        let mut g: Graph<u8> = Graph::new(GraphConfig::new().weighted(true));
        assert!(!g.kruskal().unwrap().is_spanning_tree());
        g.add_node(0);
        assert!(g.kruskal().unwrap().is_spanning_tree());
        assert!(g.prim().unwrap().is_spanning_tree());
    }

    #[test]
    fn prim_from_stays_in_component() {
        let mut g = Graph::from_edges(
            GraphConfig::new().weighted(true),
            [(1, 2, 1.0), (2, 3, 2.0), (1, 3, 3.0), (4, 5, 1.0)],
        )
        .unwrap();
        g.add_node(6);

        let tree = g.prim_from(&3).unwrap();
        assert_eq!(tree.total_weight, 3.0);
        let pairs = tree.edges.iter().map(|e| (e.source, e.target)).sorted().collect_vec();
        assert_eq!(pairs, vec![(1, 2), (2, 3)]);
        assert!(!tree.is_spanning_tree());

        let tree = g.prim_from(&6).unwrap();
        assert!(tree.edges.is_empty());
        assert_eq!(tree.total_weight, 0.0);

        assert_eq!(g.prim_from(&9).unwrap_err().kind(), ErrorKind::NotFound);
        let g = Graph::from_edges(GraphConfig::new().directed(true), [(1, 2)]).unwrap();
        assert_eq!(g.prim_from(&1).unwrap_err().kind(), ErrorKind::Configuration);
    }

    #[test]
    fn kruskal_and_prim_agree() {
        let rng = &mut Pcg64Mcg::seed_from_u64(51);
        for _ in 0..100 {
            let n = rng.random_range(1..30);
            let m = rng.random_range(0..4 * n);
            let g = random_graph(rng, n, m, -5.0..20.0, GraphConfig::new().weighted(true));

            let kruskal = g.kruskal().unwrap();
            let prim = g.prim().unwrap();
            assert_close(kruskal.total_weight, prim.total_weight);
            assert_eq!(kruskal.edges.len(), prim.edges.len());
            assert_eq!(
                kruskal.number_of_trees(),
                g.connected_components().len()
            );

            // on connected graphs every start node reaches the same weight
            if kruskal.is_spanning_tree() {
                let start = rng.random_range(0..n);
                let tree = g.prim_from(&start).unwrap();
                assert!(tree.is_spanning_tree());
                assert_close(tree.total_weight, kruskal.total_weight);
            }
        }
    }
}

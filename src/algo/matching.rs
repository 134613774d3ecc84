/*!
# Matching Algorithms

Maximum matchings and minimum vertex covers in **bipartite** graphs.

A *matching* is a set of edges without shared endpoints. [`Matching::hopcroft_karp`] computes a
maximum matching in `O(E sqrt(V))`: every phase layers the graph by a BFS from all free left
nodes and then augments along a maximal set of vertex-disjoint shortest augmenting paths.
The sides are taken from [`BipartiteTest::is_bipartite`], edge directions are ignored.

By König's theorem, a minimum vertex cover of a bipartite graph has exactly as many nodes as a
maximum matching has edges; [`Matching::min_vertex_cover`] derives one from the matching.
*/

use std::collections::VecDeque;

use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;
use tracing::{debug, trace};

use super::{bipartite::two_coloring, *};

const UNLAYERED: usize = usize::MAX;

/// A maximum matching
#[derive(Debug, Clone, PartialEq)]
pub struct MaximumMatching<K: NodeKey> {
    /// Partner of every node (symmetric), `None` for unmatched nodes
    pub pairing: FxHashMap<K, Option<K>>,
    /// Number of matched edges
    pub size: usize,
}

impl<K: NodeKey> MaximumMatching<K> {
    /// Returns the matched pairs `(a, b)` with `a < b`, sorted
    pub fn pairs(&self) -> Vec<(K, K)> {
        self.pairing
            .iter()
            .filter_map(|(u, v)| v.as_ref().filter(|v| u < *v).map(|v| (u.clone(), v.clone())))
            .sorted()
            .collect()
    }

    /// Returns the partner of `u`, if matched
    pub fn mate(&self, u: &K) -> Option<&K> {
        self.pairing.get(u)?.as_ref()
    }
}

/// State of a Hopcroft-Karp run on dense indices
struct HopcroftKarp {
    /// Left nodes in key order
    left: Vec<Node>,
    /// Neighbors of left nodes, sorted by key and deduplicated
    adj: Vec<Vec<Node>>,
    mate: Vec<Option<Node>>,
    layer: Vec<usize>,
    /// Layer of the left nodes from which a free right node is reachable in the current phase
    limit: usize,
}

impl HopcroftKarp {
    fn new<G>(graph: &G, on_right: &NodeBitSet) -> Self
    where
        G: DirectedAdjacencyList + KeyedGraph,
    {
        let left = graph
            .vertices_by_key()
            .into_iter()
            .filter(|&u| !on_right.get_bit(u))
            .collect_vec();

        let mut adj = vec![Vec::new(); graph.node_bound()];
        for &u in &left {
            let mut nbs = graph.undirected_neighbors_of(u).collect_vec();
            graph.sort_by_key(&mut nbs);
            nbs.dedup();
            adj[u as usize] = nbs;
        }

        Self {
            left,
            adj,
            mate: vec![None; graph.node_bound()],
            layer: vec![UNLAYERED; graph.node_bound()],
            limit: UNLAYERED,
        }
    }

    /// Layers the left nodes by alternating BFS from all free left nodes.
    /// Returns *true* if some augmenting path exists.
    fn build_layers(&mut self) -> bool {
        let mut queue = VecDeque::new();
        for &u in &self.left {
            if self.mate[u as usize].is_none() {
                self.layer[u as usize] = 0;
                queue.push_back(u);
            } else {
                self.layer[u as usize] = UNLAYERED;
            }
        }

        self.limit = UNLAYERED;
        while let Some(u) = queue.pop_front() {
            if self.layer[u as usize] >= self.limit {
                continue;
            }
            for &v in &self.adj[u as usize] {
                match self.mate[v as usize] {
                    None => self.limit = self.limit.min(self.layer[u as usize]),
                    Some(w) if self.layer[w as usize] == UNLAYERED => {
                        self.layer[w as usize] = self.layer[u as usize] + 1;
                        queue.push_back(w);
                    }
                    Some(_) => {}
                }
            }
        }

        self.limit != UNLAYERED
    }

    /// Searches a shortest augmenting path from the free left node `root` along the layers
    /// and flips it. Dead ends are removed from the layering.
    fn augment_from(&mut self, root: Node) -> bool {
        // left nodes on the current path with the index of their next neighbor to try
        let mut stack: Vec<(Node, usize)> = vec![(root, 0)];
        // right nodes connecting consecutive stack entries
        let mut via: Vec<Node> = Vec::new();

        while let Some(&(u, i)) = stack.last() {
            let Some(&v) = self.adj[u as usize].get(i) else {
                self.layer[u as usize] = UNLAYERED;
                stack.pop();
                via.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }

            match self.mate[v as usize] {
                None if self.layer[u as usize] == self.limit => {
                    via.push(v);
                    for (&(u, _), &v) in stack.iter().zip(&via) {
                        self.mate[u as usize] = Some(v);
                        self.mate[v as usize] = Some(u);
                    }
                    return true;
                }
                Some(w) if self.layer[w as usize] == self.layer[u as usize] + 1 => {
                    via.push(v);
                    stack.push((w, 0));
                }
                _ => {}
            }
        }

        false
    }

    fn run(&mut self) -> usize {
        let mut size = 0;
        let mut phases = 0usize;

        while self.build_layers() {
            let free = self
                .left
                .iter()
                .copied()
                .filter(|&u| self.mate[u as usize].is_none())
                .collect_vec();

            let mut augmented = 0;
            for u in free {
                if self.augment_from(u) {
                    augmented += 1;
                }
            }

            phases += 1;
            trace!(phase = phases, augmented, "hopcroft-karp phase finished");
            if augmented == 0 {
                break;
            }
            size += augmented;
        }

        size
    }

    /// König's construction: nodes reachable from free left nodes by alternating paths
    /// decide the cover
    fn vertex_cover(&self, on_right: &NodeBitSet) -> Vec<Node> {
        let mut reached = NodeBitSet::new(self.mate.len() as Node);
        let mut queue = VecDeque::new();
        for &u in &self.left {
            if self.mate[u as usize].is_none() {
                reached.set_bit(u);
                queue.push_back(u);
            }
        }

        while let Some(u) = queue.pop_front() {
            for &v in &self.adj[u as usize] {
                if self.mate[u as usize] == Some(v) || reached.set_bit(v) {
                    continue;
                }
                if let Some(w) = self.mate[v as usize] {
                    if !reached.set_bit(w) {
                        queue.push_back(w);
                    }
                }
            }
        }

        self.left
            .iter()
            .copied()
            .filter(|&u| !reached.get_bit(u))
            .chain(reached.iter_set_bits().filter(|&v| on_right.get_bit(v)))
            .collect()
    }
}

fn not_bipartite() -> GraphError {
    GraphError::InvalidOperation("matching requires a bipartite graph".into())
}

/// Maximum matchings and minimum vertex covers of bipartite graphs
pub trait Matching: DirectedAdjacencyList + KeyedGraph + Sized {
    /// Computes a maximum matching with the Hopcroft-Karp algorithm.
    ///
    /// Fails with [`GraphError::InvalidOperation`] if the graph is not bipartite.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(
    ///     GraphConfig::new(),
    ///     [("alice", "x"), ("bob", "x"), ("bob", "y"), ("carol", "y")],
    /// )
    /// .unwrap();
    ///
    /// let matching = g.hopcroft_karp().unwrap();
    /// assert_eq!(matching.size, 2);
    /// assert_eq!(matching.mate(&"alice"), Some(&"x"));
    /// assert_eq!(g.min_vertex_cover().unwrap().len(), 2);
    /// ```
    fn hopcroft_karp(&self) -> Result<MaximumMatching<Self::Key>> {
        let on_right = two_coloring(self).ok_or_else(not_bipartite)?;

        let mut hk = HopcroftKarp::new(self, &on_right);
        let size = hk.run();

        debug!(nodes = self.number_of_nodes(), size, "hopcroft-karp finished");
        Ok(MaximumMatching {
            pairing: self
                .vertices()
                .map(|u| {
                    (
                        self.key_of(u).clone(),
                        hk.mate[u as usize].map(|v| self.key_of(v).clone()),
                    )
                })
                .collect(),
            size,
        })
    }

    /// Computes a minimum vertex cover via König's theorem: starting from the free left nodes
    /// of a maximum matching, alternating paths reach a set `Z`; the cover consists of the left
    /// nodes outside `Z` and the right nodes inside `Z`.
    ///
    /// Fails with [`GraphError::InvalidOperation`] if the graph is not bipartite.
    fn min_vertex_cover(&self) -> Result<FxHashSet<Self::Key>> {
        let on_right = two_coloring(self).ok_or_else(not_bipartite)?;

        let mut hk = HopcroftKarp::new(self, &on_right);
        let size = hk.run();
        let cover = hk.vertex_cover(&on_right);
        debug_assert_eq!(cover.len(), size);

        debug!(nodes = self.number_of_nodes(), cover = cover.len(), "computed vertex cover");
        Ok(cover.into_iter().map(|u| self.key_of(u).clone()).collect())
    }
}

impl<G> Matching for G where G: DirectedAdjacencyList + KeyedGraph + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, gens::*};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    fn assert_valid_matching<K: NodeKey>(g: &Graph<K>, matching: &MaximumMatching<K>) {
        let pairs = matching.pairs();
        assert_eq!(pairs.len(), matching.size);
        for (u, v) in &pairs {
            assert!(g.has_edge(u, v) || g.has_edge(v, u));
            assert_eq!(matching.mate(u), Some(v));
            assert_eq!(matching.mate(v), Some(u));
        }
        assert!(pairs.iter().flat_map(|(u, v)| [u, v]).all_unique());
    }

    fn assert_valid_cover<K: NodeKey>(g: &Graph<K>, cover: &FxHashSet<K>) {
        for e in g.get_edges() {
            assert!(cover.contains(&e.source) || cover.contains(&e.target));
        }
    }

    #[test]
    fn complete_bipartite() {
        let mut g = Graph::undirected();
        for a in 0..3 {
            for b in 10..14 {
                g.add_edge(a, b, None).unwrap();
            }
        }

        let matching = g.hopcroft_karp().unwrap();
        assert_eq!(matching.size, 3);
        assert_valid_matching(&g, &matching);
        assert!((10..14).any(|b| matching.mate(&b).is_none()));

        let cover = g.min_vertex_cover().unwrap();
        assert_eq!(cover, (0..3).collect::<FxHashSet<_>>());
    }

    #[test]
    fn requires_augmenting_path() {
        // the first phase matches 1-2 and leaves 3 free; the second flips 3-2-1-4
        let g = Graph::from_edges(GraphConfig::new(), [(1, 2), (1, 4), (3, 2)]).unwrap();

        let matching = g.hopcroft_karp().unwrap();
        assert_eq!(matching.size, 2);
        assert_eq!(matching.pairs(), vec![(1, 4), (2, 3)]);
        assert_eq!(g.min_vertex_cover().unwrap().len(), 2);
    }

    #[test]
    fn empty_and_isolated() {
        let mut g: Graph<u8> = Graph::undirected();
        assert_eq!(g.hopcroft_karp().unwrap().size, 0);
        g.add_nodes([1, 2]);
        let matching = g.hopcroft_karp().unwrap();
        assert_eq!(matching.size, 0);
        assert_eq!(matching.pairing.len(), 2);
        assert!(g.min_vertex_cover().unwrap().is_empty());
    }

    #[test]
    fn directed_and_parallel_edges() {
        let mut g = Graph::new(GraphConfig::new().directed(true).multigraph(true));
        g.add_edge('a', 'x', None).unwrap();
        g.add_edge('x', 'a', None).unwrap();
        g.add_edge('y', 'b', None).unwrap();
        g.add_edge('b', 'x', None).unwrap();

        let matching = g.hopcroft_karp().unwrap();
        assert_eq!(matching.size, 2);
        assert_valid_matching(&g, &matching);
        assert_valid_cover(&g, &g.min_vertex_cover().unwrap());
    }

    #[test]
    fn odd_cycle_is_rejected() {
        let mut g = Graph::undirected();
        g.connect_cycle(['a', 'b', 'c'], None).unwrap();
        assert_eq!(
            g.hopcroft_karp().unwrap_err().kind(),
            ErrorKind::InvalidOperation
        );
        assert_eq!(
            g.min_vertex_cover().unwrap_err().kind(),
            ErrorKind::InvalidOperation
        );
    }

    #[test]
    fn agrees_with_max_flow() {
        let rng = &mut Pcg64Mcg::seed_from_u64(81);
        for _ in 0..100 {
            let a: i64 = rng.random_range(1..15);
            let b: i64 = rng.random_range(1..15);
            let mut g = Graph::undirected();
            let mut network = FlowNetwork::new();
            g.add_nodes(0..a + b);

            for _ in 0..rng.random_range(0..a * b + 1) {
                let u = rng.random_range(0..a);
                let v = rng.random_range(a..a + b);
                g.add_edge(u, v, None).unwrap();
                network.add_edge(u, v, 1.0).unwrap();
            }
            for u in 0..a {
                network.add_edge(-1, u, 1.0).unwrap();
            }
            for v in a..a + b {
                network.add_edge(v, -2, 1.0).unwrap();
            }

            let matching = g.hopcroft_karp().unwrap();
            assert_valid_matching(&g, &matching);
            assert_eq!(matching.size as f64, network.dinic(&-1, &-2).unwrap());

            let cover = g.min_vertex_cover().unwrap();
            assert_eq!(cover.len(), matching.size);
            assert_valid_cover(&g, &cover);

            let matched = matching.pairing.values().filter(|v| v.is_some()).count();
            assert_eq!(matched / 2, cover.len());
        }
    }
}

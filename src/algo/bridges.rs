/*!
# Bridges and Articulation Points

Tarjan's low-link algorithm for undirected graphs, implemented with an explicit stack.

A **bridge** is an edge whose removal increases the number of connected components; an
**articulation point** is a node whose removal does so. Parallel edges are never bridges and
self-loops are ignored.
*/

use itertools::Itertools;
use tracing::debug;

use super::*;

const UNVISITED: usize = usize::MAX;

struct LowLink {
    bridges: Vec<EdgeId>,
    articulation_points: NodeBitSet,
}

fn low_link<G>(graph: &G) -> Result<LowLink>
where
    G: AdjacencyList,
{
    if graph.is_directed() {
        return Err(GraphError::Configuration(
            "bridges and articulation points require an undirected graph".into(),
        ));
    }

    let n = graph.node_bound();
    let mut disc = vec![UNVISITED; n];
    let mut low = vec![UNVISITED; n];
    let mut is_cut = graph.vertex_bitset_unset();
    let mut bridges = Vec::new();
    let mut time = 0;

    // (node, edge it was entered by, index of the next incidence to explore)
    let mut stack: Vec<(Node, Option<EdgeId>, usize)> = Vec::new();

    for root in graph.vertices() {
        if disc[root as usize] != UNVISITED {
            continue;
        }
        disc[root as usize] = time;
        low[root as usize] = time;
        time += 1;

        let mut root_children = 0;
        stack.push((root, None, 0));

        while let Some(top) = stack.last_mut() {
            let (u, entered_by) = (top.0, top.1);

            if let Some(&nb) = graph.incidences_of(u).get(top.2) {
                top.2 += 1;
                let v = nb.node;
                if v == u || Some(nb.edge) == entered_by {
                    continue;
                }

                if disc[v as usize] == UNVISITED {
                    disc[v as usize] = time;
                    low[v as usize] = time;
                    time += 1;
                    stack.push((v, Some(nb.edge), 0));
                } else {
                    low[u as usize] = low[u as usize].min(disc[v as usize]);
                }
                continue;
            }

            // u is finished: propagate its low-link to the parent
            stack.pop();
            let Some(&(p, _, _)) = stack.last() else {
                continue;
            };
            low[p as usize] = low[p as usize].min(low[u as usize]);

            if low[u as usize] > disc[p as usize] {
                if let Some(e) = entered_by {
                    bridges.push(e);
                }
            }

            if p == root {
                root_children += 1;
            } else if low[u as usize] >= disc[p as usize] {
                is_cut.set_bit(p);
            }
        }

        if root_children >= 2 {
            is_cut.set_bit(root);
        }
    }

    Ok(LowLink {
        bridges,
        articulation_points: is_cut,
    })
}

/// Bridges and articulation points of undirected graphs
pub trait Bridges: AdjacencyList + KeyedGraph + Sized {
    /// Returns all bridges as key pairs `(a, b)` with `a < b`, sorted.
    ///
    /// Fails with [`GraphError::Configuration`] on directed graphs.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// // triangle 1-2-3 with a pendant edge 3-4
    /// let g = Graph::from_edges(GraphConfig::new(), [(1, 2), (2, 3), (3, 1), (4, 3)]).unwrap();
    /// assert_eq!(g.bridges().unwrap(), vec![(3, 4)]);
    /// assert_eq!(g.articulation_points().unwrap(), vec![3]);
    /// ```
    fn bridges(&self) -> Result<Vec<(Self::Key, Self::Key)>> {
        let result = low_link(self)?;

        let bridges = result
            .bridges
            .into_iter()
            .map(|id| {
                let Edge(u, v) = self.endpoints_of(id);
                let (a, b) = (self.key_of(u).clone(), self.key_of(v).clone());
                if a <= b { (a, b) } else { (b, a) }
            })
            .sorted()
            .collect_vec();

        debug!(bridges = bridges.len(), "computed bridges");
        Ok(bridges)
    }

    /// Returns all articulation points sorted by key.
    ///
    /// Fails with [`GraphError::Configuration`] on directed graphs.
    fn articulation_points(&self) -> Result<Vec<Self::Key>> {
        let result = low_link(self)?;

        let mut cut = result.articulation_points.iter_set_bits().collect_vec();
        self.sort_by_key(&mut cut);

        debug!(articulation_points = cut.len(), "computed articulation points");
        Ok(self.keys_of(cut))
    }
}

impl<G> Bridges for G where G: AdjacencyList + KeyedGraph + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, gens::GeneratorSubstructures};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn path_and_cycle() {
        let mut g = Graph::undirected();
        g.connect_path(['a', 'b', 'c', 'd'], None).unwrap();
        assert_eq!(
            g.bridges().unwrap(),
            vec![('a', 'b'), ('b', 'c'), ('c', 'd')]
        );
        assert_eq!(g.articulation_points().unwrap(), vec!['b', 'c']);

        g.add_edge('d', 'a', None).unwrap();
        assert!(g.bridges().unwrap().is_empty());
        assert!(g.articulation_points().unwrap().is_empty());
    }

    #[test]
    fn two_triangles_sharing_a_node() {
        let g = Graph::from_edges(
            GraphConfig::new(),
            [(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2)],
        )
        .unwrap();
        assert!(g.bridges().unwrap().is_empty());
        assert_eq!(g.articulation_points().unwrap(), vec![2]);
    }

    #[test]
    fn parallel_edges_are_no_bridges() {
        let mut g = Graph::from_edges(GraphConfig::new().multigraph(true), [(1, 2), (2, 3)]).unwrap();
        g.add_edge(3, 2, None).unwrap();
        g.add_edge(3, 3, None).unwrap();
        assert_eq!(g.bridges().unwrap(), vec![(1, 2)]);
        assert_eq!(g.articulation_points().unwrap(), vec![2]);
    }

    #[test]
    fn directed_graphs_are_rejected() {
        let g = Graph::from_edges(GraphConfig::new().directed(true), [(1, 2)]).unwrap();
        assert_eq!(g.bridges().unwrap_err().kind(), ErrorKind::Configuration);
        assert_eq!(
            g.articulation_points().unwrap_err().kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn agrees_with_removal() {
        let rng = &mut Pcg64Mcg::seed_from_u64(21);
        for _ in 0..30 {
            let n = rng.random_range(2..12);
            let m = rng.random_range(n / 2..2 * n);
            let g = crate::testing::random_graph(rng, n, m, 1.0..1.0, GraphConfig::new());
            let components = g.connected_components().len();

            let bridges = g.bridges().unwrap();
            for e in g.get_edges() {
                let mut h = g.clone();
                h.remove_edge(&e.source, &e.target).unwrap();
                let is_bridge = h.connected_components().len() > components;
                assert_eq!(is_bridge, bridges.contains(&(e.source, e.target)));
            }

            let cut = g.articulation_points().unwrap();
            for u in g.get_nodes() {
                let mut h = g.clone();
                let isolated = h.degree(&u).unwrap() == 0;
                h.remove_node(&u).unwrap();
                // removing an isolated node drops a component without being a cut
                let expected = components - usize::from(isolated);
                let is_cut = h.connected_components().len() > expected;
                assert_eq!(is_cut, cut.contains(&u));
            }
        }
    }
}

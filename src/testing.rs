/*!
Crate-private helpers for tests: random instances, brute-force references and the
`test_graph_store!` macro that checks the store invariants for a given configuration.
*/

use std::ops::Range;

use itertools::Itertools;
use rand::Rng;

use crate::{gens::*, prelude::*};

/// Random graph on keys `0..n` with at most `m` edges and weights drawn from `weights`
pub(crate) fn random_graph<R: Rng>(
    rng: &mut R,
    n: NumNodes,
    m: NumEdges,
    weights: Range<f64>,
    config: GraphConfig,
) -> Graph<Node> {
    match Gnm::new()
        .nodes(n)
        .edges(m)
        .weights(weights)
        .generate(rng, config)
    {
        Ok(graph) => graph,
        Err(e) => panic!("generator produced invalid graph: {e}"),
    }
}

/// Shortest distances from `source` by enumerating every simple path.
/// Only usable for tiny graphs.
pub(crate) fn brute_force_distances<G>(graph: &G, source: Node) -> Vec<f64>
where
    G: AdjacencyList,
{
    let mut best = vec![f64::INFINITY; graph.node_bound()];
    let mut on_path = graph.vertex_bitset_unset();

    fn explore<G: AdjacencyList>(
        graph: &G,
        u: Node,
        dist: f64,
        on_path: &mut NodeBitSet,
        best: &mut [f64],
    ) {
        best[u as usize] = best[u as usize].min(dist);
        on_path.set_bit(u);
        for (v, w) in graph.weighted_neighbors_of(u).collect_vec() {
            if !on_path.get_bit(v) {
                explore(graph, v, dist + w, on_path, best);
            }
        }
        on_path.clear_bit(u);
    }

    explore(graph, source, 0.0, &mut on_path, &mut best);
    best
}

/// Asserts two floats agree up to a small relative error (infinities must match exactly)
pub(crate) fn assert_close(a: f64, b: f64) {
    if a.is_infinite() || b.is_infinite() {
        assert_eq!(a, b);
    } else {
        assert!(
            (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs())),
            "{a} != {b}"
        );
    }
}

/// Generates invariant tests of the graph store for one [`GraphConfig`](crate::config::GraphConfig)
macro_rules! test_graph_store {
    ($env:ident, $config:expr) => {
        #[cfg(test)]
        mod $env {
            use crate::{prelude::*, testing::random_graph};
            use itertools::Itertools;
            use rand::{Rng, SeedableRng};
            use rand_pcg::Pcg64Mcg;

            fn config() -> GraphConfig {
                $config
            }

            #[test]
            fn mirror_invariant() {
                let rng = &mut Pcg64Mcg::seed_from_u64(3);
                for n in [5, 10, 20] {
                    let g = random_graph(rng, n, 3 * n, 1.0..10.0, config());
                    for u in 0..n {
                        for v in 0..n {
                            if g.has_edge(&u, &v) && g.is_undirected() {
                                assert!(g.has_edge(&v, &u));
                                assert_eq!(
                                    g.get_edge_weight(&u, &v).unwrap(),
                                    g.get_edge_weight(&v, &u).unwrap()
                                );
                            }
                        }
                    }
                }
            }

            #[test]
            fn remove_node_cascades() {
                let rng = &mut Pcg64Mcg::seed_from_u64(4);
                for _ in 0..10 {
                    let mut g = random_graph(rng, 12, 30, 1.0..10.0, config());
                    let victim = rng.random_range(0..12);
                    let degree = g.degree(&victim).unwrap();
                    let m = g.number_of_edges() as usize;

                    g.remove_node(&victim).unwrap();

                    assert!(!g.has_node(&victim));
                    assert!(!g.get_nodes().contains(&victim));
                    assert!(
                        g.get_edges()
                            .iter()
                            .all(|e| e.source != victim && e.target != victim)
                    );
                    assert_eq!(g.number_of_edges() as usize, m - degree);
                    assert!(g.remove_node(&victim).is_err());
                }
            }

            #[test]
            fn add_node_is_idempotent() {
                let mut g: Graph<&str> = Graph::new(config());
                g.add_node("a");
                g.add_node("b");
                let a = g.add_node("a");
                assert_eq!(g.get_nodes(), vec!["a", "b"]);
                assert_eq!(g.try_index_of(&"a"), Some(a));
            }

            #[test]
            fn weight_round_trip() {
                let rng = &mut Pcg64Mcg::seed_from_u64(5);
                let mut g: Graph<u32> = Graph::new(config());
                for _ in 0..100 {
                    let u = rng.random_range(0..10);
                    let v = (u + rng.random_range(1..10)) % 10;
                    let w: f64 = rng.random_range(-5.0..5.0);

                    let id = g.add_edge(u, v, Some(w)).unwrap();
                    assert_eq!(g.edge_by_id(id).unwrap().weight, w);
                    if !g.is_multigraph() {
                        assert_eq!(g.get_edge_weight(&u, &v).unwrap(), w);
                    }

                    g.update_edge_weight(&u, &v, w + 1.0).unwrap();
                    assert_eq!(g.get_edge_weight(&u, &v).unwrap(), w + 1.0);
                }
            }

            #[test]
            fn edge_listing_matches_count() {
                let rng = &mut Pcg64Mcg::seed_from_u64(6);
                for n in [4, 8, 16] {
                    let mut g = random_graph(rng, n, 2 * n, 1.0..2.0, config());
                    let edges = g.get_edges();
                    assert_eq!(edges.len(), g.number_of_edges() as usize);
                    assert!(edges.iter().map(|e| e.id).all_unique());
                    if g.is_undirected() {
                        assert!(edges.iter().all(|e| e.source <= e.target));
                    }

                    let e = &edges[0];
                    if g.is_undirected() {
                        g.remove_edge(&e.target, &e.source).unwrap();
                    } else {
                        g.remove_edge(&e.source, &e.target).unwrap();
                    }
                    assert!(!g.has_edge(&e.source, &e.target));
                    assert_eq!(g.get_edges().len(), g.number_of_edges() as usize);
                }
            }
        }
    };
}

pub(crate) use test_graph_store;

/*!
# Graph Generators

This module provides builders for random weighted graphs, Euclidean graphs on points in the
plane ([`Euclidean`]) and helpers to add deterministic substructures (paths, cycles, cliques)
to existing graphs.

The typical workflow is:

1. Create a generator instance (e.g., `Gnp::new()`).
2. Set parameters using the builder methods (e.g., `.nodes(n).prob(p).weights(1.0..5.0)`).
3. Either stream the node pairs via `stream()` or build a whole graph via `generate()`.

Generated graphs use the node keys `0..n`. Pairs never form self-loops, and undirected
generators only produce normalized pairs, so the result is valid for every [`GraphConfig`].

```rust
use wgraphs::{prelude::*, gens::*};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

let rng = &mut Pcg64Mcg::seed_from_u64(1);
let config = GraphConfig::new().weighted(true);
let g = Gnm::new().nodes(10).edges(20).weights(1.0..2.0).generate(rng, config).unwrap();

assert_eq!(g.number_of_nodes(), 10);
assert_eq!(g.number_of_edges(), 20);
```
*/

use std::ops::Range;

use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::prelude::*;

mod euclidean;
mod gnm;
mod gnp;
mod substructures;

pub use euclidean::*;
pub use gnm::*;
pub use gnp::*;
pub use substructures::*;

/// Trait for generators that allow setting the number of nodes.
pub trait NumNodesGen {
    /// Sets the number of nodes in the graph generator.
    fn nodes(self, n: NumNodes) -> Self;
}

/// Trait for generators that allow setting the number of edges.
pub trait NumEdgesGen {
    /// Sets the number of edges in the graph generator.
    fn edges(self, m: NumEdges) -> Self;
}

/// Trait for generators that draw edge weights uniformly from a range.
pub trait WeightRangeGen {
    /// Sets the half-open range edge weights are drawn from.
    /// An empty range (`a..a`) assigns the constant weight `a`.
    fn weights(self, range: Range<f64>) -> Self;
}

/// Samples edge weights uniformly from a range, or a constant if the range is empty
#[derive(Debug, Clone, Copy)]
enum WeightSampler {
    Constant(f64),
    Uniform(Uniform<f64>),
}

impl WeightSampler {
    fn new(range: &Range<f64>) -> Self {
        match Uniform::new(range.start, range.end) {
            Ok(distr) => WeightSampler::Uniform(distr),
            Err(_) => WeightSampler::Constant(range.start),
        }
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match self {
            WeightSampler::Constant(w) => *w,
            WeightSampler::Uniform(distr) => distr.sample(rng),
        }
    }
}

/// General trait for a configurable random graph generator.
pub trait GraphGenerator {
    /// Returns the configured number of nodes
    fn number_of_nodes(&self) -> NumNodes;

    /// Returns the configured weight range
    fn weight_range(&self) -> Range<f64>;

    /// Creates a lazy iterator over the generated node pairs.
    /// Undirected pairs are normalized, no pair is a self-loop.
    fn stream<R>(&self, rng: &mut R, directed: bool) -> impl Iterator<Item = Edge>
    where
        R: Rng;

    /// Generates a list of random node pairs.
    fn generate_pairs<R>(&self, rng: &mut R, directed: bool) -> Vec<Edge>
    where
        R: Rng,
    {
        self.stream(rng, directed).collect()
    }

    /// Builds a graph with keys `0..n` and random weights (ignored by unweighted configs).
    fn generate<R>(&self, rng: &mut R, config: GraphConfig) -> Result<Graph<Node>>
    where
        R: Rng,
    {
        let pairs = self.generate_pairs(rng, config.is_directed());
        let sampler = WeightSampler::new(&self.weight_range());

        let mut graph = Graph::new(config);
        graph.add_nodes(0..self.number_of_nodes());
        for Edge(u, v) in pairs {
            graph.add_edge(u, v, Some(sampler.sample(rng)))?;
        }

        Ok(graph)
    }
}

/// Number of candidate pairs among `n` nodes
fn max_pairs(n: u64, directed: bool) -> u64 {
    if n < 2 {
        0
    } else if directed {
        n * (n - 1)
    } else {
        n * (n - 1) / 2
    }
}

/// Maps a candidate index to its node pair
fn pair_of(x: u64, n: u64, directed: bool) -> Edge {
    if directed {
        Edge::from_u64_no_loops(x, n)
    } else {
        Edge::from_u64_undir(x, n)
    }
}

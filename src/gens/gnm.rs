use rand::seq::index::sample;

use super::*;

/// Generator for uniform `G(n,m)` random graphs with `n` nodes and exactly `m` distinct pairs.
/// If `m` exceeds the number of possible pairs, every pair is generated.
#[derive(Debug, Clone)]
pub struct Gnm {
    n: NumNodes,
    m: NumEdges,
    weights: Range<f64>,
}

impl Default for Gnm {
    fn default() -> Self {
        Self {
            n: 0,
            m: 0,
            weights: 1.0..1.0,
        }
    }
}

impl Gnm {
    /// Creates a new empty `G(n,m)` generator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl NumNodesGen for Gnm {
    fn nodes(mut self, n: NumNodes) -> Self {
        self.n = n;
        self
    }
}

impl NumEdgesGen for Gnm {
    fn edges(mut self, m: NumEdges) -> Self {
        self.m = m;
        self
    }
}

impl WeightRangeGen for Gnm {
    fn weights(mut self, range: Range<f64>) -> Self {
        self.weights = range;
        self
    }
}

impl GraphGenerator for Gnm {
    fn number_of_nodes(&self) -> NumNodes {
        self.n
    }

    fn weight_range(&self) -> Range<f64> {
        self.weights.clone()
    }

    fn stream<R: Rng>(&self, rng: &mut R, directed: bool) -> impl Iterator<Item = Edge> {
        let n = self.n as u64;
        let max = max_pairs(n, directed);
        let m = (self.m as u64).min(max);

        sample(rng, max as usize, m as usize)
            .into_iter()
            .map(move |x| pair_of(x as u64, n, directed))
    }
}

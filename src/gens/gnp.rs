use super::*;
use crate::utils::Probability;

/// `G(n,p)` generators include every possible pair of `n` nodes with probability `p`,
/// independently from each other.
#[derive(Debug, Clone)]
pub struct Gnp {
    n: NumNodes,
    p: f64,
    weights: Range<f64>,
}

impl Default for Gnp {
    fn default() -> Self {
        Self {
            n: 0,
            p: 0.0,
            weights: 1.0..1.0,
        }
    }
}

impl Gnp {
    /// Creates a new empty `G(n,p)` generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates `p` directly
    pub fn prob(mut self, prob: f64) -> Self {
        assert!(prob.is_valid_probability());
        self.p = prob;
        self
    }

    /// Updates `p` such that the expected average (out-)degree is `deg`
    pub fn avg_deg(mut self, deg: f64) -> Self {
        assert!(self.n > 1, "set the number of nodes before the average degree");
        let p = deg / (self.n - 1) as f64;
        assert!(
            p.is_valid_probability(),
            "The average degree is invalid for the given n!"
        );
        self.p = p;
        self
    }
}

impl NumNodesGen for Gnp {
    fn nodes(mut self, n: NumNodes) -> Self {
        self.n = n;
        self
    }
}

impl WeightRangeGen for Gnp {
    fn weights(mut self, range: Range<f64>) -> Self {
        self.weights = range;
        self
    }
}

impl GraphGenerator for Gnp {
    fn number_of_nodes(&self) -> NumNodes {
        self.n
    }

    fn weight_range(&self) -> Range<f64> {
        self.weights.clone()
    }

    fn stream<R: Rng>(&self, rng: &mut R, directed: bool) -> impl Iterator<Item = Edge> {
        let n = self.n as u64;
        let p = self.p;
        (0..max_pairs(n, directed))
            .filter(move |_| rng.random_bool(p))
            .map(move |x| pair_of(x, n, directed))
    }
}

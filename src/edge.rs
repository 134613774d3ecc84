use std::fmt::{Debug, Display};

use stream_bitset::bitset::BitSetImpl;

use crate::node::*;

/// An edge between two dense node indices.
/// Is is up to the caller whether an Edge is directed or not.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(pub Node, pub Node);

/// Identifier of a stored edge. Parallel edges of a multigraph carry distinct ids.
pub type EdgeId = u32;

/// We limit the number of edges to `2^32 - 1`.
pub type NumEdges = u32;

/// BitSet over edge ids
pub type EdgeBitSet = BitSetImpl<EdgeId>;

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

impl Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl Edge {
    /// Normalizes the edge such that the endpoint with smaller value comes first
    pub fn normalized(&self) -> Self {
        Edge(self.0.min(self.1), self.0.max(self.1))
    }

    /// Returns true if the endpoint with smaller index comes first
    pub fn is_normalized(&self) -> bool {
        self.0 <= self.1
    }

    /// Returns true if both endpoints are equal
    pub fn is_loop(&self) -> bool {
        self.0 == self.1
    }

    /// Reverses the edge by switching the endpoints
    pub fn reverse(&self) -> Self {
        Edge(self.1, self.0)
    }

    /// Bijection from `0..n(n-1)` to all directed edges of `n` nodes without self-loops
    pub fn from_u64_no_loops(x: u64, n: u64) -> Self {
        debug_assert!(x < n * (n - 1));

        let u = x / (n - 1);
        let r = x % (n - 1);
        let v = if r >= u { r + 1 } else { r };
        Edge(u as Node, v as Node)
    }

    /// Bijection from `0..(n choose 2)` to all normalized edges of `n` nodes without self-loops.
    ///
    /// Node `u` is assigned the next `(n - 1)/2` nodes modulo `n` as neighbors (rounded up for
    /// the upper half of nodes if `n` is even), and the resulting edge is normalized.
    pub fn from_u64_undir(x: u64, n: u64) -> Self {
        debug_assert!(x < n * (n - 1) / 2);

        let per_node = (n - 1) / 2;
        let (u, offset) = if n & 1 == 1 {
            (x / per_node, x % per_node)
        } else {
            let lower_half = per_node * (n / 2);
            if x < lower_half {
                (x / per_node, x % per_node)
            } else {
                let y = x - lower_half;
                (y / (per_node + 1) + n / 2, y % (per_node + 1))
            }
        };

        let v = (u + 1 + offset) % n;
        Edge(u as Node, v as Node).normalized()
    }
}

impl From<(Node, Node)> for Edge {
    fn from(value: (Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

/// An edge as seen by the user: endpoints are keys and the weight is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedEdge<K> {
    pub id: EdgeId,
    pub source: K,
    pub target: K,
    pub weight: f64,
}

impl<K> WeightedEdge<K> {
    /// Returns the endpoints as a `(source, target)` pair
    pub fn endpoints(&self) -> (&K, &K) {
        (&self.source, &self.target)
    }
}

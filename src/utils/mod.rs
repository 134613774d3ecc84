/*!
# Utilities

Helper structs and traits used by the algorithms:
- [`UnionFind`]: disjoint-set-union used by Kruskal's algorithm,
- [`MinScored`]: min-heap entries for Dijkstra's and Prim's algorithm,
- [`Set`]: abstraction over visited-sets (`NodeBitSet` or `FxHashSet`) used by traversals,
- [`Probability`]: validation of probabilities for the random generators.
*/

use num::{One, Zero};

pub mod min_scored;
pub mod set;
pub mod union_find;

pub use min_scored::MinScored;
pub use set::*;
pub use union_find::UnionFind;

/// Helper trait for probabilities
pub trait Probability {
    /// Returns *true* if the probability is valid (ie. between `0` and `1`)
    fn is_valid_probability(&self) -> bool;
}

impl<P> Probability for P
where
    P: Zero + One + PartialOrd,
{
    fn is_valid_probability(&self) -> bool {
        Self::zero().le(self) && Self::one().ge(self)
    }
}

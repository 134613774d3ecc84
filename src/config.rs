/*!
# Graph Configuration

The three flags of a [`Graph`](crate::repr::Graph) are fixed at construction time:

- `directed`: edges are one-way (`u -> v`) instead of mirrored (`u - v`),
- `weighted`: edges carry a caller-supplied weight instead of an implicit `1.0`,
- `multigraph`: self-loops and parallel edges are allowed and every edge gets its own id.

```rust
use wgraphs::prelude::*;

let config = GraphConfig::new().directed(true).weighted(true);
assert!(config.is_directed() && config.is_weighted() && !config.is_multigraph());
assert!(GraphConfig::new().is_undirected());
```
*/

/// Configuration of a graph; see the [module documentation](self).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GraphConfig {
    directed: bool,
    weighted: bool,
    multigraph: bool,
}

impl GraphConfig {
    /// Creates an undirected, unweighted, simple configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether edges are directed
    pub fn set_directed(&mut self, directed: bool) {
        self.directed = directed;
    }

    /// Sets whether edges are directed
    pub fn directed(mut self, directed: bool) -> Self {
        self.set_directed(directed);
        self
    }

    /// Sets whether edges carry a weight
    pub fn set_weighted(&mut self, weighted: bool) {
        self.weighted = weighted;
    }

    /// Sets whether edges carry a weight
    pub fn weighted(mut self, weighted: bool) -> Self {
        self.set_weighted(weighted);
        self
    }

    /// Sets whether self-loops and parallel edges are allowed
    pub fn set_multigraph(&mut self, multigraph: bool) {
        self.multigraph = multigraph;
    }

    /// Sets whether self-loops and parallel edges are allowed
    pub fn multigraph(mut self, multigraph: bool) -> Self {
        self.set_multigraph(multigraph);
        self
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_undirected(&self) -> bool {
        !self.directed
    }

    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    pub fn is_multigraph(&self) -> bool {
        self.multigraph
    }
}

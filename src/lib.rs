/*!
`wgraphs` is a graph data structure & algorithms library for **w**eighted graphs with
arbitrary node keys.

# Representation

Users address nodes by keys of any type implementing [`NodeKey`](crate::node::NodeKey)
(`Clone + Eq + Hash + Ord + Debug`): strings, integers, tuples, ...
Internally, every key is assigned a dense index [`Node`](crate::node::Node) (`u32`) when it is
inserted, and all algorithms operate on these indices. Results are translated back to keys.

A single [`Graph<K>`](crate::repr::Graph) type covers all variants. Its behavior is fixed at
construction by a [`GraphConfig`](crate::config::GraphConfig):

- **directed** or **undirected** edges,
- **weighted** edges (mandatory `f64` weight) or **unweighted** edges (implicit weight `1.0`),
- **simple** graphs (no self-loops, re-adding an edge updates it) or **multigraphs**
  (self-loops and parallel edges, each with its own [`EdgeId`](crate::edge::EdgeId)).

# Design

Algorithms are provided as traits that are implemented for every graph satisfying the basic
operations of [`ops`]. Hence, `use wgraphs::{prelude::*, algo::*};` makes them callable as
methods on the graph itself:

```rust
use wgraphs::{prelude::*, algo::*};

let g = Graph::from_edges(
    GraphConfig::new().weighted(true),
    [("A", "B", 1.0), ("B", "C", 2.0), ("A", "C", 4.0), ("C", "D", 1.0)],
)
.unwrap();

let sp = g.dijkstra(&"A").unwrap();
assert_eq!(sp.dist[&"D"], 4.0);
assert_eq!(sp.path_to(&"D"), Some(vec!["A", "B", "C", "D"]));
```

Maximum flows are computed on a dedicated [`FlowNetwork`](crate::algo::FlowNetwork) that keeps
residual arcs next to the capacities.

# Usage

There are *4* core submodules you probably want to interact with:
- [`prelude`] includes definitions for nodes, edges, errors, basic graph operations, and the graph itself,
- [`algo`] includes traversal, connectivity, cycles, shortest paths, spanning trees, flows and matchings,
- [`gens`] includes random and Euclidean graph generators and deterministic substructures
  (paths/cycles/cliques),
- [`utils`] includes helpers such as [`UnionFind`](crate::utils::UnionFind) and the
  [`Set`](crate::utils::Set) abstraction over visited sets.

Fallible operations return [`Result`](crate::error::Result) with a [`GraphError`](crate::error::GraphError).
The library emits [`tracing`] events but never installs a subscriber.
*/

pub mod algo;
pub mod config;
pub mod edge;
pub mod error;
pub mod gens;
pub mod node;
pub mod ops;
pub mod repr;
#[cfg(test)]
pub(crate) mod testing;
pub mod utils;

/// `wgraphs::prelude` includes definitions for nodes, edges and errors, the configuration,
/// all basic graph operation traits as well as the graph representation.
pub mod prelude {
    pub use super::{config::*, edge::*, error::*, node::*, ops::*, repr::*};
}

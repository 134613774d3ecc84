/*!
# Graph Algorithms

This module provides a suite of **graph algorithms** built on top of the graph operations in this crate.
All algorithms are re-exported at the top level of this module, so you can simply do:
```rust
use wgraphs::algo::*;
```
and gain access to traversal, connectivity, cycles, shortest paths, spanning trees, flows,
matchings, eccentricities and dense views such as the transitive closure.

Algorithms are exposed as traits with blanket implementations for every graph providing the
required [`ops`](crate::ops) traits. They take node keys, work on dense indices internally, and
translate their results back into keys. Apart from [`FlowNetwork`], which keeps flow values on
its arcs, no algorithm mutates its input.
*/

mod bipartite;
mod bridges;
mod connectivity;
mod cycles;
mod dense;
mod eccentricity;
mod euler;
mod matching;
mod network_flow;
mod shortest_path;
mod spanning_tree;
mod topo;
mod traversal;

use crate::{prelude::*, utils::*};

pub use bipartite::*;
pub use bridges::*;
pub use connectivity::*;
pub use cycles::*;
pub use dense::*;
pub use eccentricity::*;
pub use euler::*;
pub use matching::*;
pub use network_flow::*;
pub use shortest_path::*;
pub use spanning_tree::*;
pub use topo::*;
pub use traversal::*;

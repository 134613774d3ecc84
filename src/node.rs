/*!
# Node Representation

Users address nodes by arbitrary keys (anything implementing [`NodeKey`]). Internally every key
is mapped to a dense index `Node = u32` on insertion, so algorithms can work on plain arrays.
As almost all graphs have fewer than `2^32` nodes, `u32` saves space over `usize`.
*/

use std::{fmt::Debug, hash::Hash};
use stream_bitset::bitset::BitSetImpl;

/// Dense node index in the range `0..node_bound`
pub type Node = u32;

/// Node-Value that is considered invalid
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` nodes in a graph!
pub type NumNodes = Node;

/// BitSet over node indices
pub type NodeBitSet = BitSetImpl<Node>;

/// Bound for user-facing node identifiers.
///
/// Keys must be hashable for the key-to-index map and totally ordered so that traversals can
/// visit neighbors in a reproducible order.
pub trait NodeKey: Clone + Eq + Hash + Ord + Debug {}

impl<T> NodeKey for T where T: Clone + Eq + Hash + Ord + Debug {}

use fxhash::FxHashMap;

use crate::node::*;

/// Bijection between user keys and dense node indices.
///
/// Indices are handed out in insertion order and never reused; a removed node leaves a hole
/// in `keys`. Hence iterating over the live indices yields the keys in insertion order.
#[derive(Debug, Clone)]
pub struct NodeIndex<K> {
    keys: Vec<Option<K>>,
    index: FxHashMap<K, Node>,
}

impl<K> Default for NodeIndex<K> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<K: NodeKey> NodeIndex<K> {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `key` if absent and returns its index together with *true* if it was new
    pub fn insert(&mut self, key: K) -> (Node, bool) {
        if let Some(&u) = self.index.get(&key) {
            return (u, false);
        }

        let u = self.keys.len() as Node;
        assert!(u < INVALID_NODE, "too many nodes");
        self.keys.push(Some(key.clone()));
        self.index.insert(key, u);
        (u, true)
    }

    /// Removes `key` and returns its former index
    pub fn remove(&mut self, key: &K) -> Option<Node> {
        let u = self.index.remove(key)?;
        self.keys[u as usize] = None;
        Some(u)
    }

    /// Returns the index of `key`
    pub fn get(&self, key: &K) -> Option<Node> {
        self.index.get(key).copied()
    }

    /// Returns the key of index `u` if `u` is live
    pub fn key(&self, u: Node) -> Option<&K> {
        self.keys.get(u as usize).and_then(Option::as_ref)
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Exclusive upper bound on all indices ever handed out
    pub fn bound(&self) -> usize {
        self.keys.len()
    }

    /// Iterates over all live `(index, key)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Node, &K)> + '_ {
        self.keys
            .iter()
            .enumerate()
            .filter_map(|(u, k)| k.as_ref().map(|k| (u as Node, k)))
    }
}

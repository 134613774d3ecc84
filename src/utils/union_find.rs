/*!
Disjoint-set-union over dense node indices with iterative path compression and
union by rank. Both `find` and `union` run in near-constant amortized time.
*/

use crate::node::*;

/// Union-Find data structure with path compression and union by rank.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<Node>,
    rank: Vec<u8>,
    num_components: usize,
}

impl UnionFind {
    /// Creates `n` singleton sets `{0}, ..., {n - 1}`
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n as Node).collect(),
            rank: vec![0; n],
            num_components: n,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of disjoint sets
    pub fn num_components(&self) -> usize {
        self.num_components
    }

    /// Returns the representative of the set containing `x` and points every
    /// element on the way directly to it.
    pub fn find(&mut self, x: Node) -> Node {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        let mut node = x;
        while self.parent[node as usize] != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }

        root
    }

    /// Merges the sets of `x` and `y`.
    /// Returns *true* if they were disjoint before.
    pub fn union(&mut self, x: Node, y: Node) -> bool {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return false;
        }

        let (rank_x, rank_y) = (self.rank[rx as usize], self.rank[ry as usize]);
        if rank_x < rank_y {
            self.parent[rx as usize] = ry;
        } else {
            self.parent[ry as usize] = rx;
            if rank_x == rank_y {
                self.rank[rx as usize] += 1;
            }
        }

        self.num_components -= 1;
        true
    }

    /// Returns *true* if `x` and `y` belong to the same set
    pub fn same_set(&mut self, x: Node, y: Node) -> bool {
        self.find(x) == self.find(y)
    }
}

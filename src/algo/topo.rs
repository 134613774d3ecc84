/*!
# Topological Sorting

Two interchangeable ways of ordering the nodes of a directed acyclic graph such that every
edge points forward:

- [`TopologicalSort::topological_sort`] uses Kahn's algorithm: nodes of in-degree zero are
  repeatedly removed. Among all available nodes, the one with the smallest key goes first, so
  the result is the lexicographically smallest topological order.
- [`TopologicalSort::topological_sort_dfs`] reverses the finishing order of an iterative DFS.

Both fail with [`GraphError::Cycle`] if the graph contains a cycle and with
[`GraphError::Configuration`] on undirected graphs.
*/

use std::{cmp::Reverse, collections::BinaryHeap};

use tracing::debug;

use super::{connectivity::dfs_postorder, *};

fn require_directed<G: GraphType>(graph: &G) -> Result<()> {
    if graph.is_directed() {
        Ok(())
    } else {
        Err(GraphError::Configuration(
            "topological orders are only defined for directed graphs".into(),
        ))
    }
}

/// Kahn's algorithm on indices; shared by the DAG shortest-path routines
pub(crate) fn kahn_order<G>(graph: &G) -> Result<Vec<Node>>
where
    G: DirectedAdjacencyList + KeyedGraph,
{
    require_directed(graph)?;

    let mut in_degs = vec![0; graph.node_bound()];
    let mut ready = BinaryHeap::new();
    for u in graph.vertices() {
        in_degs[u as usize] = graph.in_degree_of(u);
        if in_degs[u as usize] == 0 {
            ready.push(Reverse((graph.key_of(u), u)));
        }
    }

    let mut order = Vec::with_capacity(graph.len());
    while let Some(Reverse((_, u))) = ready.pop() {
        order.push(u);
        for v in graph.neighbors_of(u) {
            in_degs[v as usize] -= 1;
            if in_degs[v as usize] == 0 {
                ready.push(Reverse((graph.key_of(v), v)));
            }
        }
    }

    if order.len() < graph.len() {
        return Err(GraphError::Cycle);
    }
    Ok(order)
}

/// Topological orders of directed acyclic graphs
pub trait TopologicalSort: DirectedAdjacencyList + KeyedGraph + Sized {
    /// Returns the lexicographically smallest topological order (Kahn's algorithm).
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(
    ///     GraphConfig::new().directed(true),
    ///     [("shirt", "tie"), ("tie", "jacket"), ("pants", "shoes"), ("pants", "jacket")],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(
    ///     g.topological_sort().unwrap(),
    ///     vec!["pants", "shirt", "shoes", "tie", "jacket"]
    /// );
    /// ```
    fn topological_sort(&self) -> Result<Vec<Self::Key>> {
        let order = kahn_order(self)?;
        debug!(nodes = order.len(), "topological sort (kahn) finished");
        Ok(self.keys_of(order))
    }

    /// Returns a topological order obtained from the reversed DFS finishing order.
    /// Roots are tried in ascending key order.
    fn topological_sort_dfs(&self) -> Result<Vec<Self::Key>> {
        require_directed(self)?;

        let post = dfs_postorder(self, &self.vertices_by_key());
        if post.back_edge {
            return Err(GraphError::Cycle);
        }

        debug!(nodes = post.order.len(), "topological sort (dfs) finished");
        Ok(self.keys_of(post.order.into_iter().rev()))
    }
}

impl<G> TopologicalSort for G where G: DirectedAdjacencyList + KeyedGraph + Sized {}

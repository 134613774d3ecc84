/*!
# Eccentricity, Diameter and Centers

The **eccentricity** of a node is the largest hop distance from it to any other node. The
**diameter** is the largest and the **radius** the smallest eccentricity; the **centers** are
the nodes attaining the radius. Weights are ignored and edges are followed in their direction,
so in directed graphs every node needs to reach every other one.

All quantities are computed exactly with one BFS per node (`O(n * (n + m))`). If some node
cannot reach all others, eccentricities are undefined: [`Eccentricity::diameter`] and
[`Eccentricity::radius`] return `None` and [`Eccentricity::centers`] is empty.
*/

use fxhash::FxHashMap;
use tracing::debug;

use super::{traversal::*, *};

/// Hop distance from `s` to the farthest node and that node (smallest key among ties),
/// or `None` if `s` does not reach every node
fn farthest_from<G>(graph: &G, s: Node) -> Option<(usize, Node)>
where
    G: DirectedAdjacencyList + KeyedGraph,
{
    let mut hops = vec![0usize; graph.node_bound()];
    let mut farthest = (0, s);
    let mut visited = 0;

    for Visit { node, parent } in BFS::new(graph, s) {
        visited += 1;
        let d = parent.map_or(0, |p| hops[p as usize] + 1);
        hops[node as usize] = d;
        if d > farthest.0 || (d == farthest.0 && graph.key_of(node) < graph.key_of(farthest.1)) {
            farthest = (d, node);
        }
    }

    (visited == graph.len()).then_some(farthest)
}

/// Eccentricity-based measures of (strongly) connected graphs
pub trait Eccentricity: Traversal {
    /// Returns the eccentricity of `u`, or `None` if `u` does not reach every node.
    ///
    /// Fails with [`GraphError::NodeNotFound`] if `u` is not part of the graph.
    fn eccentricity(&self, u: &Self::Key) -> Result<Option<usize>> {
        let s = self.index_of(u)?;
        Ok(farthest_from(self, s).map(|(d, _)| d))
    }

    /// Eccentricity of every node
    fn eccentricities(&self) -> FxHashMap<Self::Key, Option<usize>> {
        self.vertices()
            .map(|u| (self.key_of(u).clone(), farthest_from(self, u).map(|(d, _)| d)))
            .collect()
    }

    /// Returns the diameter together with a shortest path of that length. The path starts at
    /// the smallest key of maximum eccentricity and ends at the smallest key farthest from it.
    /// Returns `None` for empty graphs and graphs in which some node does not reach all others.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*, gens::*};
    ///
    /// let mut g = Graph::undirected();
    /// g.connect_path([3, 1, 4, 5], None).unwrap();
    /// g.add_edge(1, 9, None).unwrap();
    ///
    /// assert_eq!(g.diameter(), Some((3, vec![3, 1, 4, 5])));
    /// assert_eq!(g.centers(), vec![1, 4]);
    /// ```
    fn diameter(&self) -> Option<(usize, Vec<Self::Key>)> {
        let mut best: Option<(usize, Node, Node)> = None;
        for u in self.vertices_by_key() {
            let (d, v) = farthest_from(self, u)?;
            if best.is_none_or(|(b, _, _)| d > b) {
                best = Some((d, u, v));
            }
        }

        let (d, u, v) = best?;
        let path = self
            .shortest_path_unweighted(self.key_of(u), self.key_of(v))
            .ok()
            .flatten()?;
        debug_assert_eq!(path.len(), d + 1);
        debug!(diameter = d, "computed diameter");
        Some((d, path))
    }

    /// Returns the smallest eccentricity, or `None` (see [`Eccentricity::diameter`])
    fn radius(&self) -> Option<usize> {
        self.vertices()
            .map(|u| farthest_from(self, u).map(|(d, _)| d))
            .try_fold(None, |min: Option<usize>, d| {
                let d = d?;
                Some(Some(min.map_or(d, |m| m.min(d))))
            })
            .flatten()
    }

    /// Returns all nodes of minimum eccentricity in ascending key order. Trees have one or
    /// two centers; the list is empty if eccentricities are undefined.
    fn centers(&self) -> Vec<Self::Key> {
        let mut ecc = Vec::with_capacity(self.len());
        for u in self.vertices_by_key() {
            match farthest_from(self, u) {
                Some((d, _)) => ecc.push((u, d)),
                None => return Vec::new(),
            }
        }

        let Some(radius) = ecc.iter().map(|&(_, d)| d).min() else {
            return Vec::new();
        };
        let centers = self.keys_of(
            ecc.into_iter()
                .filter(|&(_, d)| d == radius)
                .map(|(u, _)| u),
        );
        debug!(radius, centers = centers.len(), "computed centers");
        centers
    }
}

impl<G> Eccentricity for G where G: Traversal {}

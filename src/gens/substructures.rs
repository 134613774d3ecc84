/*!
# Substructure Generators

Adds common motifs (paths, cycles, cliques) to an existing graph, which is useful for
building test instances with known structure.

```rust
use wgraphs::{prelude::*, gens::*};

let mut g = Graph::new(GraphConfig::new().weighted(true));
g.connect_path(["a", "b", "c"], Some(1.0)).unwrap();
g.connect_cycle(["c", "d", "e"], Some(2.0)).unwrap();

assert!(g.has_edge(&"b", &"c"));
assert!(g.has_edge(&"e", &"c"));
assert_eq!(g.number_of_edges(), 5);
```
*/

use itertools::Itertools;

use super::*;

/// Trait for creating additional **substructures** (paths, cycles, cliques) inside a graph.
/// All edges created by one call share the same `weight`.
pub trait GeneratorSubstructures<K> {
    /// Connects consecutive nodes with an edge.
    fn connect_path<P>(&mut self, nodes_on_path: P, weight: Option<f64>) -> Result<()>
    where
        P: IntoIterator<Item = K>;

    /// Connects consecutive nodes with an edge and closes the cycle from the last to the
    /// first node. A cycle of a single node is a self-loop (multigraphs only).
    fn connect_cycle<C>(&mut self, nodes_in_cycle: C, weight: Option<f64>) -> Result<()>
    where
        C: IntoIterator<Item = K>;

    /// Connects all distinct pairs of the given nodes (both directions if directed).
    fn connect_clique(&mut self, nodes: &[K], weight: Option<f64>) -> Result<()>;
}

impl<K: NodeKey> GeneratorSubstructures<K> for Graph<K> {
    fn connect_path<P>(&mut self, nodes_on_path: P, weight: Option<f64>) -> Result<()>
    where
        P: IntoIterator<Item = K>,
    {
        for (u, v) in nodes_on_path.into_iter().tuple_windows() {
            self.add_edge(u, v, weight)?;
        }
        Ok(())
    }

    fn connect_cycle<C>(&mut self, nodes_in_cycle: C, weight: Option<f64>) -> Result<()>
    where
        C: IntoIterator<Item = K>,
    {
        let nodes = nodes_in_cycle.into_iter().collect_vec();
        let (Some(first), Some(last)) = (nodes.first(), nodes.last()) else {
            return Ok(());
        };
        let closing = (last.clone(), first.clone());

        self.connect_path(nodes, weight)?;
        self.add_edge(closing.0, closing.1, weight)?;
        Ok(())
    }

    fn connect_clique(&mut self, nodes: &[K], weight: Option<f64>) -> Result<()> {
        for (i, u) in nodes.iter().enumerate() {
            for (j, v) in nodes.iter().enumerate() {
                if u == v || (self.is_undirected() && j < i) {
                    continue;
                }
                self.add_edge(u.clone(), v.clone(), weight)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_path() {
        let mut g = Graph::directed();
        g.connect_path(Vec::<u32>::new(), None).unwrap();
        g.connect_path([7], None).unwrap();
        assert_eq!(g.number_of_edges(), 0);

        g.connect_path([0, 3, 1, 4], None).unwrap();
        assert_eq!(
            g.get_edges().into_iter().map(|e| (e.source, e.target)).collect_vec(),
            vec![(0, 3), (3, 1), (1, 4)]
        );
    }

    #[test]
    fn test_connect_cycle() {
        let mut g = Graph::new(GraphConfig::new().multigraph(true).directed(true));
        g.connect_cycle([1], None).unwrap();
        assert!(g.has_edge(&1, &1));

        let mut g = Graph::directed();
        g.connect_cycle([0, 3, 1, 4], None).unwrap();
        assert_eq!(g.number_of_edges(), 4);
        assert!(g.has_edge(&4, &0));

        // a single node cannot close a cycle in a simple graph
        assert!(Graph::directed().connect_cycle([1], None).is_err());
    }

    #[test]
    fn test_connect_clique() {
        let mut g = Graph::undirected();
        g.connect_clique(&[1, 2, 4], None).unwrap();
        assert_eq!(g.number_of_edges(), 3);

        let mut g = Graph::directed();
        g.connect_clique(&[1, 2, 4], None).unwrap();
        assert_eq!(g.number_of_edges(), 6);
    }
}

/*!
# Euclidean Graphs

[`Euclidean`] places keyed nodes in the plane and connects them by their Euclidean distance,
which becomes the weight of every edge. Three constructions are offered:

- [`Euclidean::build_complete`] connects every pair,
- [`Euclidean::build_knn`] connects every node to its `k` nearest neighbors,
- [`Euclidean::build_radius`] connects all pairs at distance at most `r`.

The coordinates are stored on the nodes as the float attributes `"x"` and `"y"`, so they
survive in the built graph (see [`position_of`]).

```rust
use wgraphs::{prelude::*, gens::*};

let g = Euclidean::new()
    .point('a', 0.0, 0.0)
    .point('b', 3.0, 4.0)
    .point('c', 0.0, 1.0)
    .build_radius(2.0)
    .unwrap();

assert!(g.has_edge(&'a', &'c'));
assert!(!g.has_edge(&'a', &'b'));
assert_eq!(position_of(&g, &'b'), Some([3.0, 4.0]));
```
*/

use std::collections::BTreeMap;

use itertools::Itertools;
use tracing::debug;

use super::*;

/// A point in the plane
pub type Point = [f64; 2];

/// Node attribute holding the x-coordinate
pub const X_ATTR: &str = "x";
/// Node attribute holding the y-coordinate
pub const Y_ATTR: &str = "y";

/// Euclidean distance between two points
pub fn euclidean_distance(a: Point, b: Point) -> f64 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

/// Reads the coordinates stored by [`Euclidean`] on node `key`
pub fn position_of<K: NodeKey>(graph: &Graph<K>, key: &K) -> Option<Point> {
    let coord = |name: &str| match graph.node_attr(key, name) {
        Ok(Some(AttrValue::Float(c))) => Some(*c),
        _ => None,
    };
    Some([coord(X_ATTR)?, coord(Y_ATTR)?])
}

/// Builder for graphs on points in the plane, weighted by Euclidean distance.
///
/// Undirected by default. For directed graphs, `symmetric` (default *true*) decides whether
/// every chosen arc `u -> v` is accompanied by `v -> u`; without it, complete and radius
/// graphs only contain arcs from the smaller to the larger key, while k-NN graphs contain
/// the arcs from every node to its own nearest neighbors.
#[derive(Debug, Clone)]
pub struct Euclidean<K> {
    points: BTreeMap<K, Point>,
    directed: bool,
    symmetric: bool,
}

impl<K: NodeKey> Default for Euclidean<K> {
    fn default() -> Self {
        Self {
            points: BTreeMap::new(),
            directed: false,
            symmetric: true,
        }
    }
}

impl Euclidean<Node> {
    /// Places the nodes `0..n` uniformly at random in the unit square
    pub fn random_points<R: Rng>(rng: &mut R, n: NumNodes) -> Self {
        let unit = WeightSampler::new(&(0.0..1.0));
        (0..n).fold(Self::new(), |builder, u| {
            let (x, y) = (unit.sample(rng), unit.sample(rng));
            builder.point(u, x, y)
        })
    }
}

impl<K: NodeKey> Euclidean<K> {
    /// Creates a builder without points
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `key` at `(x, y)`; placing a key again moves it
    pub fn point(mut self, key: K, x: f64, y: f64) -> Self {
        self.points.insert(key, [x, y]);
        self
    }

    /// Places all given keys
    pub fn points<I>(self, points: I) -> Self
    where
        I: IntoIterator<Item = (K, f64, f64)>,
    {
        points
            .into_iter()
            .fold(self, |builder, (key, x, y)| builder.point(key, x, y))
    }

    /// Sets whether the built graph is directed
    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Sets whether arcs of directed graphs are mirrored
    pub fn symmetric(mut self, symmetric: bool) -> Self {
        self.symmetric = symmetric;
        self
    }

    /// Number of placed points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Connects every pair of points.
    ///
    /// Fails with [`GraphError::InvalidOperation`] if a coordinate is not finite.
    pub fn build_complete(&self) -> Result<Graph<K>> {
        self.build_by_pairs(|_| true)
    }

    /// Connects every pair of points at distance at most `r`.
    ///
    /// Fails with [`GraphError::InvalidOperation`] if `r` is negative or NaN, or if a
    /// coordinate is not finite.
    pub fn build_radius(&self, r: f64) -> Result<Graph<K>> {
        if r.is_nan() || r < 0.0 {
            return Err(GraphError::InvalidOperation(format!(
                "radius must be non-negative, got {r}"
            )));
        }
        self.build_by_pairs(|d| d <= r)
    }

    /// Connects every point to its `k` nearest other points (all of them if there are
    /// fewer); ties are broken by key. In undirected graphs a pair is connected if either
    /// point counts the other among its nearest neighbors.
    ///
    /// Fails with [`GraphError::InvalidOperation`] if `k == 0` or a coordinate is not finite.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, gens::*};
    ///
    /// let g = Euclidean::new()
    ///     .points([(0, 0.0, 0.0), (1, 1.0, 0.0), (2, 5.0, 0.0), (3, 5.5, 0.0)])
    ///     .build_knn(1)
    ///     .unwrap();
    ///
    /// // two clusters of mutual nearest neighbors
    /// assert_eq!(g.number_of_edges(), 2);
    /// assert!(g.has_edge(&0, &1) && g.has_edge(&2, &3));
    /// assert!(!g.has_edge(&1, &2));
    /// ```
    pub fn build_knn(&self, k: usize) -> Result<Graph<K>> {
        if k == 0 {
            return Err(GraphError::InvalidOperation(
                "k-nearest-neighbor graphs need k >= 1".into(),
            ));
        }
        let (mut graph, keys) = self.empty_graph()?;

        for (i, u) in keys.iter().enumerate() {
            let nearest = keys
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(j, v)| (euclidean_distance(self.points[u], self.points[v]), j))
                .sorted_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
                .take(k);

            for (d, j) in nearest {
                self.connect(&mut graph, u, &keys[j], d)?;
            }
        }

        debug!(
            nodes = graph.len(),
            edges = graph.number_of_edges(),
            k,
            "built k-nearest-neighbor graph"
        );
        Ok(graph)
    }

    fn build_by_pairs<F>(&self, accept: F) -> Result<Graph<K>>
    where
        F: Fn(f64) -> bool,
    {
        let (mut graph, keys) = self.empty_graph()?;

        for (u, v) in keys.iter().tuple_combinations() {
            let d = euclidean_distance(self.points[u], self.points[v]);
            if accept(d) {
                self.connect(&mut graph, u, v, d)?;
            }
        }

        debug!(
            nodes = graph.len(),
            edges = graph.number_of_edges(),
            "built euclidean graph"
        );
        Ok(graph)
    }

    /// Adds `u -> v` and, for symmetric directed graphs, `v -> u`
    fn connect(&self, graph: &mut Graph<K>, u: &K, v: &K, d: f64) -> Result<()> {
        graph.add_edge(u.clone(), v.clone(), Some(d))?;
        if self.directed && self.symmetric {
            graph.add_edge(v.clone(), u.clone(), Some(d))?;
        }
        Ok(())
    }

    /// Graph with all points as nodes (carrying their coordinates) and no edges
    fn empty_graph(&self) -> Result<(Graph<K>, Vec<K>)> {
        if let Some((key, p)) = self.points.iter().find(|(_, p)| !p.iter().all(|c| c.is_finite())) {
            return Err(GraphError::InvalidOperation(format!(
                "point {key:?} has non-finite coordinates {p:?}"
            )));
        }

        let mut graph = Graph::new(GraphConfig::new().weighted(true).directed(self.directed));
        for (key, &[x, y]) in &self.points {
            graph.add_node(key.clone());
            graph.set_node_attr(key, X_ATTR, x)?;
            graph.set_node_attr(key, Y_ATTR, y)?;
        }

        Ok((graph, self.points.keys().cloned().collect()))
    }
}

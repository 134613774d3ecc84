/*!
# Cycles

[`Cycles::find_one_cycle`] returns a witness for [`Connectivity::has_cycle`], and
[`Cycles::enumerate_simple_cycles`] lists every simple cycle up to a given length.

Cycles are reported as closed node sequences `[v0, v1, ..., vk, v0]`. A self-loop is the cycle
`[u, u]`; in undirected graphs, two parallel edges between `u` and `v` form the cycle
`[u, v, u]`, while a single edge does not.
*/

use fxhash::FxHashSet;
use tracing::debug;

use super::{connectivity::*, *};

/// Outgoing incidences of `u` ordered by neighbor key, then by edge id
fn sorted_incidences<G>(graph: &G, u: Node) -> Vec<Neighbor>
where
    G: AdjacencyList + KeyedGraph,
{
    let mut nbs = graph.incidences_of(u).to_vec();
    nbs.sort_unstable_by(|a, b| {
        graph
            .key_of(a.node)
            .cmp(graph.key_of(b.node))
            .then(a.edge.cmp(&b.edge))
    });
    nbs
}

/// Closes the cycle that runs along the stack from `v` to the top and back to `v`
fn close_cycle(path: &[Node], v: Node) -> Option<Vec<Node>> {
    let from = path.iter().rposition(|&u| u == v)?;
    let mut cycle = path[from..].to_vec();
    cycle.push(v);
    Some(cycle)
}

/// DFS in key order; returns the first cycle closed by a back edge
fn first_cycle<G>(graph: &G) -> Option<Vec<Node>>
where
    G: AdjacencyList + KeyedGraph,
{
    let directed = graph.is_directed();
    let mut visited = graph.vertex_bitset_unset();
    let mut on_path = graph.vertex_bitset_unset();
    let mut path: Vec<Node> = Vec::new();
    // (incidences still to explore, edge the node was entered by)
    let mut frames: Vec<(std::vec::IntoIter<Neighbor>, Option<EdgeId>)> = Vec::new();

    for root in graph.vertices_by_key() {
        if visited.set_bit(root) {
            continue;
        }
        on_path.set_bit(root);
        path.push(root);
        frames.push((sorted_incidences(graph, root).into_iter(), None));

        while let Some((nbs, entered_by)) = frames.last_mut() {
            let Some(nb) = nbs.next() else {
                frames.pop();
                if let Some(u) = path.pop() {
                    on_path.clear_bit(u);
                }
                continue;
            };

            if !directed && Some(nb.edge) == *entered_by {
                continue;
            }
            if on_path.get_bit(nb.node) {
                return close_cycle(&path, nb.node);
            }
            // finished nodes; only reachable along directed edges
            if visited.set_bit(nb.node) {
                continue;
            }

            on_path.set_bit(nb.node);
            path.push(nb.node);
            frames.push((sorted_incidences(graph, nb.node).into_iter(), Some(nb.edge)));
        }
    }

    None
}

/// Finding and enumerating cycles
pub trait Cycles: Connectivity {
    /// Returns some cycle as a closed node sequence, or `None` if the graph is acyclic.
    /// The search runs depth-first from the smallest key, exploring neighbors by key, and
    /// reports the first cycle it closes.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let g = Graph::from_edges(
    ///     GraphConfig::new().directed(true),
    ///     [("a", "b"), ("b", "c"), ("c", "b"), ("c", "d")],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(g.find_one_cycle(), Some(vec!["b", "c", "b"]));
    /// ```
    fn find_one_cycle(&self) -> Option<Vec<Self::Key>> {
        let cycle = first_cycle(self)?;
        debug!(length = cycle.len() - 1, "found cycle");
        Some(self.keys_of(cycle))
    }

    /// Lists all simple cycles with at most `max_length` edges, sorted lexicographically.
    /// Every cycle starts (and ends) at its smallest key; undirected cycles are reported in
    /// only one direction, namely with the smaller of the two neighbors of the start second.
    ///
    /// The number of cycles can be exponential in the size of the graph; keep `max_length`
    /// small on dense graphs.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*, gens::*};
    ///
    /// let mut g = Graph::undirected();
    /// g.connect_clique(&[1, 2, 3, 4], None).unwrap();
    ///
    /// // four triangles and three squares
    /// assert_eq!(g.enumerate_simple_cycles(4).len(), 7);
    /// assert_eq!(g.enumerate_simple_cycles(3)[0], vec![1, 2, 3, 1]);
    /// ```
    fn enumerate_simple_cycles(&self, max_length: usize) -> Vec<Vec<Self::Key>> {
        let directed = self.is_directed();
        let order = self.vertices_by_key();
        let mut rank = vec![0usize; self.node_bound()];
        for (i, &u) in order.iter().enumerate() {
            rank[u as usize] = i;
        }

        let mut parallel: FxHashSet<(Node, Node)> = FxHashSet::default();
        let adj: Vec<Vec<Node>> = (0..self.node_bound() as Node)
            .map(|u| {
                if !self.contains_node(u) {
                    return Vec::new();
                }
                let mut nbs = self.neighbors_of(u).collect::<Vec<_>>();
                nbs.sort_unstable_by_key(|&v| rank[v as usize]);
                for w in nbs.windows(2) {
                    if w[0] == w[1] {
                        parallel.insert((u, w[0]));
                    }
                }
                nbs.dedup();
                nbs
            })
            .collect();

        let mut cycles = Vec::new();
        let mut on_path = self.vertex_bitset_unset();

        for &s in &order {
            if max_length == 0 {
                break;
            }
            let mut path = vec![s];
            let mut next = vec![0usize];
            on_path.set_bit(s);

            while let Some(pos) = next.last_mut() {
                let u = *path.last().unwrap_or(&s);
                let Some(&v) = adj[u as usize].get(*pos) else {
                    next.pop();
                    if let Some(u) = path.pop() {
                        on_path.clear_bit(u);
                    }
                    continue;
                };
                *pos += 1;

                if v == s {
                    let closes = match path.len() {
                        1 => true,
                        2 if !directed => parallel.contains(&(s, u)),
                        _ => directed || rank[path[1] as usize] < rank[u as usize],
                    };
                    if closes && path.len() <= max_length {
                        let mut cycle = path.clone();
                        cycle.push(s);
                        cycles.push(self.keys_of(cycle));
                    }
                    continue;
                }

                if rank[v as usize] < rank[s as usize]
                    || on_path.get_bit(v)
                    || path.len() >= max_length
                {
                    continue;
                }
                on_path.set_bit(v);
                path.push(v);
                next.push(0);
            }
        }

        cycles.sort();
        debug!(max_length, cycles = cycles.len(), "enumerated simple cycles");
        cycles
    }
}

impl<G> Cycles for G where G: Connectivity {}

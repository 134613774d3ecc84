/*!
# Network Flow

Maximum flows, minimum cuts and flow decompositions on a dedicated [`FlowNetwork`].

Every arc `u -> v` with capacity `c` is stored next to its residual partner `v -> u` with
capacity `0`; the arc with index `a` is paired with the arc `a ^ 1`. Pushing `f` units along an
arc increases its flow by `f` and decreases the flow of its partner by `f`, which lets later
augmentations cancel earlier ones. At all times `0 <= flow <= capacity` holds on forward arcs.

- [`FlowNetwork::edmonds_karp`] augments along shortest paths found by BFS (`O(V E^2)`).
- [`FlowNetwork::dinic`] repeatedly builds a BFS level graph and saturates it with a blocking
  flow (`O(V^2 E)`, `O(E sqrt(V))` on unit capacities). Augmenting paths are found
  iteratively, remembering per node which arcs are exhausted in the current phase.
- [`FlowNetwork::min_cut`] and [`FlowNetwork::flow_decomposition`] post-process a maximum flow.
- [`FlowNetwork::write_flows`] copies the flow of a network built by [`FlowNetwork::from_graph`]
  back onto the edges of its graph as an edge attribute.

Residual capacities below a tolerance ([`FlowNetwork::with_epsilon`], default `1e-12`) count
as zero, which keeps floating-point capacities from producing endless tiny augmentations.

```rust
use wgraphs::algo::FlowNetwork;

let mut network = FlowNetwork::new();
for (u, v) in [("s", "a"), ("s", "b"), ("a", "t"), ("b", "t")] {
    network.add_edge(u, v, 10.0).unwrap();
}

assert_eq!(network.dinic(&"s", &"t").unwrap(), 20.0);
assert_eq!(network.flow(&"s", &"a").unwrap(), 10.0);
```
*/

use std::collections::VecDeque;

use fxhash::FxHashMap;
use itertools::Itertools;
use tracing::{debug, trace};

use super::*;

/// Default tolerance below which residual capacities are treated as zero
pub const DEFAULT_FLOW_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy)]
struct Arc {
    from: Node,
    to: Node,
    capacity: f64,
    flow: f64,
}

impl Arc {
    fn residual(&self) -> f64 {
        self.capacity - self.flow
    }
}

/// A forward arc of a [`FlowNetwork`] with its current flow
#[derive(Debug, Clone, PartialEq)]
pub struct FlowEdge<K> {
    pub source: K,
    pub target: K,
    pub capacity: f64,
    pub flow: f64,
}

/// Source/sink partition of a minimum cut
#[derive(Debug, Clone, PartialEq)]
pub struct MinCut<K> {
    /// Nodes reachable from the source in the final residual network, sorted
    pub source_side: Vec<K>,
    /// All remaining nodes, sorted
    pub sink_side: Vec<K>,
    /// Saturated arcs from the source side to the sink side
    pub cut_edges: Vec<FlowEdge<K>>,
    /// Sum of the capacities of `cut_edges`; equals the maximum flow value
    pub capacity: f64,
}

/// One path of a flow decomposition
#[derive(Debug, Clone, PartialEq)]
pub struct FlowPath<K> {
    /// Nodes from source to sink
    pub nodes: Vec<K>,
    pub flow: f64,
}

/// A directed network with capacities and residual arcs. See the [module documentation](self).
#[derive(Debug, Clone)]
pub struct FlowNetwork<K> {
    nodes: NodeIndex<K>,
    out_arcs: Vec<Vec<usize>>,
    arcs: Vec<Arc>,
    /// Graph edge every forward arc was created from (see [`FlowNetwork::from_graph`])
    origins: Vec<Option<EdgeId>>,
    epsilon: f64,
    /// Terminals and value of the last maximum-flow computation
    last_flow: Option<(Node, Node, f64)>,
}

impl<K: NodeKey> Default for FlowNetwork<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: NodeKey> FlowNetwork<K> {
    /// Creates an empty network
    pub fn new() -> Self {
        Self {
            nodes: NodeIndex::new(),
            out_arcs: Vec::new(),
            arcs: Vec::new(),
            origins: Vec::new(),
            epsilon: DEFAULT_FLOW_EPSILON,
            last_flow: None,
        }
    }

    /// Sets the tolerance below which residual capacities count as zero
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.abs();
    }

    /// Sets the tolerance below which residual capacities count as zero
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.set_epsilon(epsilon);
        self
    }

    /// Builds a network from a graph: edge weights become capacities and every undirected
    /// edge becomes two opposite arcs. Self-loops are dropped.
    ///
    /// Fails with [`GraphError::InvalidOperation`] if some weight is negative.
    pub fn from_graph(graph: &Graph<K>) -> Result<Self> {
        let mut network = Self::new();
        network.add_nodes(graph.get_nodes());

        for e in graph.get_edges() {
            if e.source == e.target {
                continue;
            }
            if graph.is_undirected() {
                let back = network.add_edge(e.target.clone(), e.source.clone(), e.weight)?;
                network.origins[back] = Some(e.id);
            }
            let forward = network.add_edge(e.source, e.target, e.weight)?;
            network.origins[forward] = Some(e.id);
        }

        Ok(network)
    }

    /// Stores the current flow of every arc created by [`FlowNetwork::from_graph`] as the
    /// attribute `name` of its edge in `graph`. An undirected edge receives the net flow
    /// from its smaller to its larger endpoint (negative if the flow runs the other way).
    /// Self-loops are left untouched.
    ///
    /// Fails with [`GraphError::EdgeNotFound`] if `graph` lost an edge the network was
    /// built from.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// let mut g = Graph::from_edges(
    ///     GraphConfig::new().directed(true).weighted(true),
    ///     [("s", "a", 3.0), ("a", "t", 2.0)],
    /// )
    /// .unwrap();
    ///
    /// let mut network = FlowNetwork::from_graph(&g).unwrap();
    /// network.dinic(&"s", &"t").unwrap();
    /// network.write_flows(&mut g, "flow").unwrap();
    ///
    /// let id = g.parallel_edges_between(&"s", &"a")[0];
    /// assert_eq!(g.edge_attr(id, "flow").unwrap(), Some(&AttrValue::Float(2.0)));
    /// ```
    pub fn write_flows(&self, graph: &mut Graph<K>, name: &str) -> Result<()> {
        let mut net_flow: FxHashMap<EdgeId, f64> = FxHashMap::default();
        for (a, origin) in self.origins.iter().enumerate() {
            let Some(id) = *origin else {
                continue;
            };
            let arc = &self.arcs[2 * a];
            let canonical = match graph.edge_by_id(id) {
                Some(e) => e.source == *self.key_of(arc.from),
                None => return Err(GraphError::EdgeNotFound(format!("#{id}"))),
            };
            let flow = if canonical { arc.flow } else { -arc.flow };
            *net_flow.entry(id).or_default() += flow;
        }

        for (id, flow) in net_flow {
            graph.set_edge_attr(id, name, flow)?;
        }
        debug!(name, edges = self.origins.len(), "wrote flows onto graph");
        Ok(())
    }

    /// Inserts `key` if not present yet and returns its index. Idempotent.
    pub fn add_node(&mut self, key: K) -> Node {
        let (u, is_new) = self.nodes.insert(key);
        if is_new {
            self.out_arcs.push(Vec::new());
        }
        u
    }

    /// Adds the nodes of an iterator
    pub fn add_nodes<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
    {
        for key in keys {
            self.add_node(key);
        }
    }

    /// Adds the arc `u -> v` with the given capacity (and its residual partner) and returns
    /// the index of the arc. Parallel arcs are allowed.
    ///
    /// Fails with [`GraphError::InvalidOperation`] if the capacity is negative or NaN.
    pub fn add_edge(&mut self, u: K, v: K, capacity: f64) -> Result<usize> {
        if capacity.is_nan() || capacity < 0.0 {
            return Err(GraphError::InvalidOperation(format!(
                "capacity of ({u:?}, {v:?}) must be non-negative, got {capacity}"
            )));
        }

        let ui = self.add_node(u);
        let vi = self.add_node(v);
        let forward = self.arcs.len();

        self.arcs.push(Arc {
            from: ui,
            to: vi,
            capacity,
            flow: 0.0,
        });
        self.arcs.push(Arc {
            from: vi,
            to: ui,
            capacity: 0.0,
            flow: 0.0,
        });
        self.out_arcs[ui as usize].push(forward);
        self.out_arcs[vi as usize].push(forward + 1);
        self.origins.push(None);

        self.last_flow = None;
        Ok(forward / 2)
    }

    /// Number of nodes
    pub fn number_of_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of (forward) arcs
    pub fn number_of_edges(&self) -> usize {
        self.arcs.len() / 2
    }

    /// Value of the last maximum flow computed by [`FlowNetwork::edmonds_karp`] or
    /// [`FlowNetwork::dinic`], if the network was not modified since
    pub fn flow_value(&self) -> Option<f64> {
        self.last_flow.map(|(_, _, value)| value)
    }

    /// Total flow on all arcs `u -> v`.
    ///
    /// Fails with [`GraphError::NodeNotFound`] for unknown keys and with
    /// [`GraphError::EdgeNotFound`] if there is no such arc.
    pub fn flow(&self, u: &K, v: &K) -> Result<f64> {
        let ui = self.index_of(u)?;
        let vi = self.index_of(v)?;

        let mut arcs = self.out_arcs[ui as usize]
            .iter()
            .filter(|&&a| a % 2 == 0 && self.arcs[a].to == vi)
            .peekable();
        if arcs.peek().is_none() {
            return Err(GraphError::edge_not_found(u, v));
        }
        Ok(arcs.map(|&a| self.arcs[a].flow).sum())
    }

    /// All forward arcs in insertion order
    pub fn edges(&self) -> Vec<FlowEdge<K>> {
        self.arcs
            .iter()
            .step_by(2)
            .map(|arc| self.flow_edge(arc))
            .collect()
    }

    fn flow_edge(&self, arc: &Arc) -> FlowEdge<K> {
        FlowEdge {
            source: self.key_of(arc.from).clone(),
            target: self.key_of(arc.to).clone(),
            capacity: arc.capacity,
            flow: arc.flow,
        }
    }

    fn index_of(&self, key: &K) -> Result<Node> {
        self.nodes
            .get(key)
            .ok_or_else(|| GraphError::node_not_found(key))
    }

    fn key_of(&self, u: Node) -> &K {
        match self.nodes.key(u) {
            Some(k) => k,
            None => panic!("node {u} is not part of the network"),
        }
    }

    fn sorted_keys<I>(&self, nodes: I) -> Vec<K>
    where
        I: IntoIterator<Item = Node>,
    {
        nodes
            .into_iter()
            .map(|u| self.key_of(u).clone())
            .sorted()
            .collect()
    }

    fn terminals(&self, s: &K, t: &K) -> Result<(Node, Node)> {
        let si = self.index_of(s)?;
        let ti = self.index_of(t)?;
        if si == ti {
            return Err(GraphError::InvalidOperation(format!(
                "source and sink must differ, both are {s:?}"
            )));
        }
        Ok((si, ti))
    }

    fn node_bitset(&self) -> NodeBitSet {
        NodeBitSet::new(self.nodes.bound() as Node)
    }

    fn reset_flow(&mut self) {
        for arc in &mut self.arcs {
            arc.flow = 0.0;
        }
        self.last_flow = None;
    }

    fn push(&mut self, a: usize, amount: f64) {
        self.arcs[a].flow += amount;
        self.arcs[a ^ 1].flow -= amount;
    }

    /// BFS over arcs with positive residual capacity. Returns the arc each node was reached by.
    fn residual_bfs(&self, s: Node, stop_at: Option<Node>) -> Vec<Option<usize>> {
        let mut via = vec![None; self.nodes.bound()];
        let mut seen = self.node_bitset();
        let mut queue = VecDeque::from([s]);
        seen.set_bit(s);

        while let Some(u) = queue.pop_front() {
            if Some(u) == stop_at {
                break;
            }
            for &a in &self.out_arcs[u as usize] {
                let arc = &self.arcs[a];
                if arc.residual() > self.epsilon && !seen.set_bit(arc.to) {
                    via[arc.to as usize] = Some(a);
                    queue.push_back(arc.to);
                }
            }
        }

        via
    }

    /// Edmonds-Karp algorithm. Discards previous flows, computes a maximum `s`-`t` flow,
    /// stores it on the arcs and returns its value.
    ///
    /// Fails with [`GraphError::NodeNotFound`] for unknown terminals and with
    /// [`GraphError::InvalidOperation`] if `s == t`.
    pub fn edmonds_karp(&mut self, s: &K, t: &K) -> Result<f64> {
        let (si, ti) = self.terminals(s, t)?;
        self.reset_flow();

        let mut total = 0.0;
        let mut augmentations = 0usize;
        loop {
            let via = self.residual_bfs(si, Some(ti));
            if via[ti as usize].is_none() {
                break;
            }

            let mut path = Vec::new();
            let mut v = ti;
            while let Some(a) = via[v as usize] {
                path.push(a);
                v = self.arcs[a].from;
            }

            let bottleneck = path
                .iter()
                .map(|&a| self.arcs[a].residual())
                .fold(f64::INFINITY, f64::min);
            for &a in &path {
                self.push(a, bottleneck);
            }

            total += bottleneck;
            augmentations += 1;
            trace!(augmentations, bottleneck, "edmonds-karp augmentation");
        }

        debug!(source = ?s, sink = ?t, flow = total, augmentations, "edmonds-karp finished");
        self.last_flow = Some((si, ti, total));
        Ok(total)
    }

    /// BFS levels over positive-residual arcs; `None` if `t` is unreachable.
    fn levels(&self, s: Node, t: Node) -> Option<Vec<usize>> {
        let mut level = vec![usize::MAX; self.nodes.bound()];
        let mut queue = VecDeque::from([s]);
        level[s as usize] = 0;

        while let Some(u) = queue.pop_front() {
            for &a in &self.out_arcs[u as usize] {
                let arc = &self.arcs[a];
                if arc.residual() > self.epsilon && level[arc.to as usize] == usize::MAX {
                    level[arc.to as usize] = level[u as usize] + 1;
                    queue.push_back(arc.to);
                }
            }
        }

        (level[t as usize] != usize::MAX).then_some(level)
    }

    /// Finds one augmenting path in the level graph and pushes its bottleneck along it.
    /// `next_arc[u]` skips the arcs of `u` that are already exhausted in this phase.
    /// Returns `0.0` once the flow is blocking.
    fn augment_in_level_graph(
        &mut self,
        s: Node,
        t: Node,
        level: &[usize],
        next_arc: &mut [usize],
    ) -> f64 {
        let mut path: Vec<usize> = Vec::new();
        let mut u = s;

        loop {
            if u == t {
                let bottleneck = path
                    .iter()
                    .map(|&a| self.arcs[a].residual())
                    .fold(f64::INFINITY, f64::min);
                for &a in &path {
                    self.push(a, bottleneck);
                }
                return bottleneck;
            }

            let arcs = &self.out_arcs[u as usize];
            let mut advanced = false;
            while let Some(&a) = arcs.get(next_arc[u as usize]) {
                let arc = &self.arcs[a];
                if arc.residual() > self.epsilon && level[arc.to as usize] == level[u as usize] + 1
                {
                    path.push(a);
                    u = arc.to;
                    advanced = true;
                    break;
                }
                next_arc[u as usize] += 1;
            }

            if !advanced {
                // dead end: retreat and skip the arc that led here
                match path.pop() {
                    None => return 0.0,
                    Some(a) => {
                        u = self.arcs[a].from;
                        next_arc[u as usize] += 1;
                    }
                }
            }
        }
    }

    /// Dinic's algorithm. Discards previous flows, computes a maximum `s`-`t` flow,
    /// stores it on the arcs and returns its value.
    ///
    /// Fails with [`GraphError::NodeNotFound`] for unknown terminals and with
    /// [`GraphError::InvalidOperation`] if `s == t`.
    pub fn dinic(&mut self, s: &K, t: &K) -> Result<f64> {
        let (si, ti) = self.terminals(s, t)?;
        self.reset_flow();

        let mut total = 0.0;
        let mut phases = 0usize;
        while let Some(level) = self.levels(si, ti) {
            let mut next_arc = vec![0; self.nodes.bound()];
            let mut phase_flow = 0.0;
            loop {
                let pushed = self.augment_in_level_graph(si, ti, &level, &mut next_arc);
                if pushed <= self.epsilon {
                    break;
                }
                phase_flow += pushed;
            }

            phases += 1;
            total += phase_flow;
            trace!(phase = phases, flow = phase_flow, "dinic phase finished");

            if phase_flow <= self.epsilon {
                break;
            }
        }

        debug!(source = ?s, sink = ?t, flow = total, phases, "dinic finished");
        self.last_flow = Some((si, ti, total));
        Ok(total)
    }

    /// Makes sure the arcs carry a maximum `s`-`t` flow
    fn ensure_max_flow(&mut self, s: &K, t: &K) -> Result<(Node, Node)> {
        let (si, ti) = self.terminals(s, t)?;
        if !matches!(self.last_flow, Some((a, b, _)) if a == si && b == ti) {
            self.dinic(s, t)?;
        }
        Ok((si, ti))
    }

    /// Returns a minimum `s`-`t` cut. Runs [`FlowNetwork::dinic`] first unless the arcs
    /// already carry a maximum flow between these terminals.
    ///
    /// The source side consists of all nodes reachable from `s` in the residual network.
    ///
    /// # Examples
    /// ```
    /// use wgraphs::algo::FlowNetwork;
    ///
    /// let mut network = FlowNetwork::new();
    /// network.add_edge(0, 1, 3.0).unwrap();
    /// network.add_edge(1, 2, 1.0).unwrap();
    /// network.add_edge(0, 2, 1.0).unwrap();
    ///
    /// let cut = network.min_cut(&0, &2).unwrap();
    /// assert_eq!(cut.capacity, 2.0);
    /// assert_eq!(cut.source_side, vec![0, 1]);
    /// assert_eq!(cut.cut_edges.len(), 2);
    /// ```
    pub fn min_cut(&mut self, s: &K, t: &K) -> Result<MinCut<K>> {
        let (si, _) = self.ensure_max_flow(s, t)?;

        let via = self.residual_bfs(si, None);
        let mut on_source_side = self.node_bitset();
        on_source_side.set_bit(si);
        for (u, _) in self.nodes.iter() {
            if via[u as usize].is_some() {
                on_source_side.set_bit(u);
            }
        }

        let cut_edges = self
            .arcs
            .iter()
            .step_by(2)
            .filter(|arc| on_source_side.get_bit(arc.from) && !on_source_side.get_bit(arc.to))
            .map(|arc| self.flow_edge(arc))
            .collect_vec();
        let capacity = cut_edges.iter().map(|e| e.capacity).sum();

        let (source_side, sink_side): (Vec<Node>, Vec<Node>) = self
            .nodes
            .iter()
            .map(|(u, _)| u)
            .partition(|&u| on_source_side.get_bit(u));

        debug!(source = ?s, sink = ?t, capacity, "computed minimum cut");
        Ok(MinCut {
            source_side: self.sorted_keys(source_side),
            sink_side: self.sorted_keys(sink_side),
            cut_edges,
            capacity,
        })
    }

    /// Decomposes the current maximum `s`-`t` flow into paths: repeatedly takes a path of
    /// positive-flow arcs (fewest hops first) and subtracts its bottleneck. Runs
    /// [`FlowNetwork::dinic`] first unless the arcs already carry a maximum flow between
    /// these terminals. The path flows add up to the flow value; flow on cycles is ignored.
    pub fn flow_decomposition(&mut self, s: &K, t: &K) -> Result<Vec<FlowPath<K>>> {
        let (si, ti) = self.ensure_max_flow(s, t)?;

        let mut remaining = self
            .arcs
            .iter()
            .enumerate()
            .map(|(a, arc)| if a % 2 == 0 { arc.flow.max(0.0) } else { 0.0 })
            .collect_vec();

        let mut paths = Vec::new();
        loop {
            let mut via = vec![None; self.nodes.bound()];
            let mut seen = self.node_bitset();
            let mut queue = VecDeque::from([si]);
            seen.set_bit(si);

            while let Some(u) = queue.pop_front() {
                if u == ti {
                    break;
                }
                for &a in &self.out_arcs[u as usize] {
                    let to = self.arcs[a].to;
                    if remaining[a] > self.epsilon && !seen.set_bit(to) {
                        via[to as usize] = Some(a);
                        queue.push_back(to);
                    }
                }
            }

            if !seen.get_bit(ti) {
                break;
            }

            let mut arcs = Vec::new();
            let mut v = ti;
            while let Some(a) = via[v as usize] {
                arcs.push(a);
                v = self.arcs[a].from;
            }
            arcs.reverse();

            let flow = arcs
                .iter()
                .map(|&a| remaining[a])
                .fold(f64::INFINITY, f64::min);
            for &a in &arcs {
                remaining[a] -= flow;
            }

            let nodes = std::iter::once(si)
                .chain(arcs.iter().map(|&a| self.arcs[a].to))
                .map(|u| self.key_of(u).clone())
                .collect();
            paths.push(FlowPath { nodes, flow });
        }

        debug!(source = ?s, sink = ?t, paths = paths.len(), "decomposed flow");
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, testing::assert_close};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    fn diamond() -> FlowNetwork<&'static str> {
        let mut network = FlowNetwork::new();
        for (u, v) in [("s", "a"), ("s", "b"), ("a", "t"), ("b", "t")] {
            network.add_edge(u, v, 10.0).unwrap();
        }
        network
    }

    /// Checks capacity constraints and flow conservation; returns the net outflow of `s`
    fn check_flow<K: NodeKey>(network: &FlowNetwork<K>, s: &K, t: &K) -> f64 {
        let mut balance: FxHashMap<K, f64> = FxHashMap::default();
        for e in network.edges() {
            assert!(e.flow >= -1e-9 && e.flow <= e.capacity + 1e-9);
            *balance.entry(e.source.clone()).or_default() -= e.flow;
            *balance.entry(e.target.clone()).or_default() += e.flow;
        }
        for (k, b) in &balance {
            if k != s && k != t {
                assert!(b.abs() < 1e-6, "conservation violated at {k:?}: {b}");
            }
        }
        -balance.get(s).copied().unwrap_or_default()
    }

    #[test]
    fn diamond_scenario() {
        let mut network = diamond();
        assert_eq!(network.edmonds_karp(&"s", &"t").unwrap(), 20.0);
        assert_eq!(network.flow_value(), Some(20.0));
        assert_eq!(network.dinic(&"s", &"t").unwrap(), 20.0);
        assert_eq!(check_flow(&network, &"s", &"t"), 20.0);

        let cut = network.min_cut(&"s", &"t").unwrap();
        assert_eq!(cut.capacity, 20.0);
        assert!(cut.cut_edges.iter().all(|e| e.flow == e.capacity));

        let paths = network.flow_decomposition(&"s", &"t").unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths.iter().map(|p| p.flow).sum::<f64>(), 20.0);
        assert!(paths.iter().all(|p| p.nodes[0] == "s" && p.nodes[2] == "t"));
    }

    #[test]
    fn flow_cancellation() {
        // the shortest path s-a-b-t must be partially undone to reach the optimum
        let mut network = FlowNetwork::new();
        for (u, v, c) in [
            ('s', 'a', 1.0),
            ('s', 'b', 1.0),
            ('a', 'b', 1.0),
            ('a', 't', 1.0),
            ('b', 't', 1.0),
        ] {
            network.add_edge(u, v, c).unwrap();
        }
        assert_eq!(network.edmonds_karp(&'s', &'t').unwrap(), 2.0);
        assert_eq!(network.dinic(&'s', &'t').unwrap(), 2.0);
    }

    #[test]
    fn invalid_requests() {
        let mut network = diamond();
        assert_eq!(
            network.dinic(&"s", &"s").unwrap_err().kind(),
            ErrorKind::InvalidOperation
        );
        assert_eq!(
            network.edmonds_karp(&"s", &"x").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            network.add_edge("a", "b", -1.0).unwrap_err().kind(),
            ErrorKind::InvalidOperation
        );
        assert!(network.add_edge("a", "b", f64::NAN).is_err());
        assert_eq!(network.number_of_edges(), 4);
        assert_eq!(
            network.flow(&"a", &"b").unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn sink_unreachable() {
        let mut network = FlowNetwork::new();
        network.add_edge(1, 2, 5.0).unwrap();
        network.add_node(3);

        assert_eq!(network.dinic(&1, &3).unwrap(), 0.0);
        assert_eq!(network.edmonds_karp(&1, &3).unwrap(), 0.0);
        let cut = network.min_cut(&1, &3).unwrap();
        assert_eq!(cut.source_side, vec![1, 2]);
        assert_eq!(cut.sink_side, vec![3]);
        assert_eq!(cut.capacity, 0.0);
        assert!(network.flow_decomposition(&1, &3).unwrap().is_empty());
    }

    #[test]
    fn modifications_invalidate_flow() {
        let mut network = diamond();
        network.dinic(&"s", &"t").unwrap();
        network.add_edge("s", "t", 5.0).unwrap();
        assert_eq!(network.flow_value(), None);
        assert_eq!(network.min_cut(&"s", &"t").unwrap().capacity, 25.0);
        assert_eq!(network.flow_value(), Some(25.0));
    }

    #[test]
    fn from_undirected_graph() {
        let g = Graph::from_edges(
            GraphConfig::new().weighted(true),
            [("s", "a", 3.0), ("a", "t", 2.0), ("t", "b", 4.0), ("b", "s", 1.0)],
        )
        .unwrap();
        let mut network = FlowNetwork::from_graph(&g).unwrap();
        assert_eq!(network.number_of_edges(), 8);
        assert_eq!(network.dinic(&"s", &"t").unwrap(), 3.0);
        assert_eq!(network.dinic(&"t", &"s").unwrap(), 3.0);

        let mut g = Graph::new(GraphConfig::new().weighted(true).directed(true));
        g.add_edge(0, 1, Some(-1.0)).unwrap();
        assert!(FlowNetwork::from_graph(&g).is_err());
    }

    #[test]
    fn flows_written_back_onto_graph() {
        let mut g = Graph::from_edges(
            GraphConfig::new().weighted(true),
            [("s", "a", 3.0), ("a", "t", 2.0), ("t", "b", 4.0), ("b", "s", 1.0)],
        )
        .unwrap();

        let mut network = FlowNetwork::from_graph(&g).unwrap();
        assert_eq!(network.dinic(&"s", &"t").unwrap(), 3.0);
        network.write_flows(&mut g, "flow").unwrap();

        // undirected edges carry the net flow from the smaller to the larger key
        for (u, v, flow) in [("a", "s", -2.0), ("a", "t", 2.0), ("b", "t", 1.0), ("b", "s", -1.0)] {
            let id = g.parallel_edges_between(&u, &v)[0];
            assert_eq!(g.edge_attr(id, "flow").unwrap(), Some(&AttrValue::Float(flow)));
        }

        g.remove_edge(&"b", &"t").unwrap();
        assert_eq!(
            network.write_flows(&mut g, "flow").unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn written_flows_of_directed_multigraph() {
        let mut g = Graph::new(GraphConfig::new().directed(true).weighted(true).multigraph(true));
        g.add_edge(0, 1, Some(2.0)).unwrap();
        g.add_edge(0, 1, Some(3.0)).unwrap();
        g.add_edge(1, 2, Some(4.0)).unwrap();
        g.add_edge(2, 2, Some(1.0)).unwrap();

        let mut network = FlowNetwork::from_graph(&g).unwrap();
        assert_eq!(network.edmonds_karp(&0, &2).unwrap(), 4.0);
        network.write_flows(&mut g, "f").unwrap();

        let total: f64 = g
            .parallel_edges_between(&0, &1)
            .into_iter()
            .map(|id| match g.edge_attr(id, "f").unwrap() {
                Some(AttrValue::Float(x)) => *x,
                other => panic!("unexpected attribute {other:?}"),
            })
            .sum();
        assert_eq!(total, 4.0);

        let id = g.parallel_edges_between(&1, &2)[0];
        assert_eq!(g.edge_attr(id, "f").unwrap(), Some(&AttrValue::Float(4.0)));
        let id = g.parallel_edges_between(&2, &2)[0];
        assert_eq!(g.edge_attr(id, "f").unwrap(), None);
    }

    #[test]
    fn epsilon_ignores_tiny_residuals() {
        let mut network = FlowNetwork::new().with_epsilon(1e-3);
        network.add_edge(0, 1, 1.0).unwrap();
        network.add_edge(1, 2, 1e-6).unwrap();
        assert_eq!(network.dinic(&0, &2).unwrap(), 0.0);
    }

    fn random_network(rng: &mut Pcg64Mcg, n: u32, m: usize, integral: bool) -> FlowNetwork<u32> {
        let mut network = FlowNetwork::new();
        network.add_nodes(0..n);
        for _ in 0..m {
            let u = rng.random_range(0..n);
            let v = rng.random_range(0..n);
            if u == v {
                continue;
            }
            let capacity = if integral {
                rng.random_range(0..10) as f64
            } else {
                rng.random_range(0.0..10.0)
            };
            network.add_edge(u, v, capacity).unwrap();
        }
        network
    }

    #[test]
    fn max_flow_equals_min_cut() {
        let rng = &mut Pcg64Mcg::seed_from_u64(61);
        for round in 0..200 {
            let n = rng.random_range(2..20);
            let m = rng.random_range(0..(n * n) as usize);
            let mut network = random_network(rng, n, m, round % 2 == 0);
            let (s, t) = (0, n - 1);

            let ek = network.edmonds_karp(&s, &t).unwrap();
            assert_close(check_flow(&network, &s, &t), ek);

            let dinic = network.dinic(&s, &t).unwrap();
            assert_close(check_flow(&network, &s, &t), dinic);
            assert_close(ek, dinic);

            let cut = network.min_cut(&s, &t).unwrap();
            assert_close(cut.capacity, dinic);
            assert!(cut.source_side.contains(&s));
            assert!(cut.sink_side.contains(&t));

            let paths = network.flow_decomposition(&s, &t).unwrap();
            assert_close(paths.iter().map(|p| p.flow).sum(), dinic);
            for p in &paths {
                assert_eq!(p.nodes.first(), Some(&s));
                assert_eq!(p.nodes.last(), Some(&t));
                assert!(p.nodes.iter().all_unique());
            }
        }
    }
}

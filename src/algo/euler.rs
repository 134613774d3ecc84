/*!
# Eulerian Trails

An **Eulerian trail** uses every edge exactly once; an **Eulerian circuit** additionally ends
where it starts. Isolated nodes are irrelevant, but all edges must lie in one (weakly)
connected component. Beyond that:

- undirected graphs need zero (circuit) or two (trail) nodes of odd degree;
- directed graphs need `in = out` everywhere (circuit), or exactly one node with
  `out = in + 1`, one with `in = out + 1` and all others balanced (trail).

Trails are computed with an iterative version of Hierholzer's algorithm over edge ids, so
parallel edges and self-loops are handled naturally.
*/

use tracing::debug;

use super::{traversal::*, *};

/// Classification returned by [`Euler::eulerian_kind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EulerianKind {
    /// There is a closed trail through every edge (includes graphs without edges)
    Circuit,
    /// There is an open trail through every edge, but no closed one
    Trail,
    NotEulerian,
}

/// Determines the kind and the node a trail has to start at
fn classify<G>(graph: &G) -> (EulerianKind, Option<Node>)
where
    G: DirectedAdjacencyList + KeyedGraph,
{
    let with_edges = graph
        .vertices_by_key()
        .into_iter()
        .filter(|&u| graph.degree_of(u) + graph.in_degree_of(u) > 0)
        .collect::<Vec<_>>();

    let Some(&first) = with_edges.first() else {
        return (EulerianKind::Circuit, None);
    };

    let reached = {
        let mut bfs = BFS::new(graph, first).ignore_direction(true);
        bfs.by_ref().for_each(|_| {});
        with_edges.iter().all(|&u| bfs.did_visit_node(u))
    };
    if !reached {
        return (EulerianKind::NotEulerian, None);
    }

    if graph.is_undirected() {
        let odd = with_edges
            .iter()
            .copied()
            .filter(|&u| graph.degree_of(u) % 2 == 1)
            .collect::<Vec<_>>();
        return match odd.len() {
            0 => (EulerianKind::Circuit, Some(first)),
            2 => (EulerianKind::Trail, Some(odd[0])),
            _ => (EulerianKind::NotEulerian, None),
        };
    }

    let mut start = None;
    let mut num_ends = 0;
    for &u in &with_edges {
        let (out_deg, in_deg) = (graph.degree_of(u) as i64, graph.in_degree_of(u) as i64);
        match out_deg - in_deg {
            0 => {}
            1 if start.is_none() => start = Some(u),
            -1 if num_ends == 0 => num_ends += 1,
            _ => return (EulerianKind::NotEulerian, None),
        }
    }

    match (start, num_ends) {
        (None, 0) => (EulerianKind::Circuit, Some(first)),
        (Some(s), 1) => (EulerianKind::Trail, Some(s)),
        _ => (EulerianKind::NotEulerian, None),
    }
}

/// Eulerian trails and circuits
pub trait Euler: DirectedAdjacencyList + KeyedGraph + Sized {
    /// Classifies the graph as having an Eulerian circuit, only an Eulerian trail, or neither.
    fn eulerian_kind(&self) -> EulerianKind {
        classify(self).0
    }

    /// Returns the edge ids of an Eulerian trail (a circuit if one exists) or `None` if the
    /// graph has neither. A circuit starts at the smallest key incident to an edge; an open
    /// trail starts at the smallest odd-degree node (undirected) or at the node with surplus
    /// out-degree (directed).
    ///
    /// # Examples
    /// ```
    /// use wgraphs::{prelude::*, algo::*};
    ///
    /// // a triangle with a pendant edge: trail from 3 to 4
    /// let g = Graph::from_edges(GraphConfig::new(), [(1, 2), (2, 3), (3, 1), (3, 4)]).unwrap();
    /// assert_eq!(g.eulerian_kind(), EulerianKind::Trail);
    ///
    /// let trail = g.eulerian_trail().unwrap();
    /// assert_eq!(trail.len(), 4);
    /// assert_eq!(g.edge_by_id(*trail.last().unwrap()).unwrap().target, 4);
    /// ```
    fn eulerian_trail(&self) -> Option<Vec<EdgeId>> {
        let (kind, start) = classify(self);
        if kind == EulerianKind::NotEulerian {
            return None;
        }
        let Some(start) = start else {
            return Some(Vec::new());
        };

        let mut used = self.edge_bitset_unset();
        let mut next_incidence = vec![0usize; self.node_bound()];
        // (node, edge it was reached by)
        let mut stack: Vec<(Node, Option<EdgeId>)> = vec![(start, None)];
        let mut trail = Vec::with_capacity(self.number_of_edges() as usize);

        while let Some(&(u, entered_by)) = stack.last() {
            let incidences = self.incidences_of(u);
            let pos = &mut next_incidence[u as usize];
            while *pos < incidences.len() && used.get_bit(incidences[*pos].edge) {
                *pos += 1;
            }

            match incidences.get(*pos) {
                Some(nb) => {
                    used.set_bit(nb.edge);
                    stack.push((nb.node, Some(nb.edge)));
                }
                None => {
                    stack.pop();
                    trail.extend(entered_by);
                }
            }
        }

        trail.reverse();
        debug_assert_eq!(trail.len(), self.number_of_edges() as usize);
        debug!(edges = trail.len(), ?kind, "computed eulerian trail");
        Some(trail)
    }
}

impl<G> Euler for G where G: DirectedAdjacencyList + KeyedGraph + Sized {}

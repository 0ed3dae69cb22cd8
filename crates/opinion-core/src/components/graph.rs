//! Network Graph
//!
//! Undirected simple graph over agent ids, stored as adjacency lists
//! indexed by `AgentId`. Neighbor order is insertion order, which keeps
//! iteration deterministic for a fixed seed.

use crate::components::agent::AgentId;
use crate::error::TopologyError;

/// Neighbor lookup capability.
pub trait NeighborQuery {
    /// Neighbors of `id` in insertion order.
    fn neighbors(&self, id: AgentId) -> Result<&[AgentId], TopologyError>;

    /// Number of neighbors of `id`.
    fn degree(&self, id: AgentId) -> Result<usize, TopologyError> {
        Ok(self.neighbors(id)?.len())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkGraph {
    adjacency: Vec<Vec<AgentId>>,
    edge_count: usize,
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph with nodes `0..node_count` and no edges.
    pub fn with_nodes(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
            edge_count: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn contains(&self, id: AgentId) -> bool {
        id.index() < self.adjacency.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.adjacency.len()).map(AgentId)
    }

    pub fn has_edge(&self, u: AgentId, v: AgentId) -> bool {
        self.adjacency
            .get(u.index())
            .map_or(false, |adj| adj.contains(&v))
    }

    /// Inserts the undirected edge `u`–`v`.
    ///
    /// Returns `Ok(false)` if the edge already exists.
    pub fn add_edge(&mut self, u: AgentId, v: AgentId) -> Result<bool, TopologyError> {
        for id in [u, v] {
            if !self.contains(id) {
                return Err(TopologyError::UnknownNode(id));
            }
        }
        if u == v {
            return Err(TopologyError::SelfLoop(u));
        }
        if self.has_edge(u, v) {
            return Ok(false);
        }
        self.adjacency[u.index()].push(v);
        self.adjacency[v.index()].push(u);
        self.edge_count += 1;
        Ok(true)
    }

    /// Each undirected edge once, as `(lower, higher)` ordered by the lower id.
    pub fn edges(&self) -> impl Iterator<Item = (AgentId, AgentId)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(u, adj)| {
            adj.iter()
                .filter(move |v| v.index() > u)
                .map(move |&v| (AgentId(u), v))
        })
    }

    /// Copies every edge of `other` into this graph, relabeling node `i`
    /// of `other` as `mapping[i]`.
    ///
    /// Returns the number of edges that were new to this graph.
    pub fn compose_relabeled(
        &mut self,
        other: &NetworkGraph,
        mapping: &[AgentId],
    ) -> Result<usize, TopologyError> {
        if let Some(unmapped) = other.nodes().find(|n| n.index() >= mapping.len()) {
            return Err(TopologyError::UnknownNode(unmapped));
        }
        let mut added = 0;
        for (u, v) in other.edges() {
            if self.add_edge(mapping[u.index()], mapping[v.index()])? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Largest degree in the graph, 0 for an empty graph.
    pub fn max_degree(&self) -> usize {
        self.adjacency.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn mean_degree(&self) -> f64 {
        if self.adjacency.is_empty() {
            0.0
        } else {
            2.0 * self.edge_count as f64 / self.adjacency.len() as f64
        }
    }
}

impl NeighborQuery for NetworkGraph {
    fn neighbors(&self, id: AgentId) -> Result<&[AgentId], TopologyError> {
        self.adjacency
            .get(id.index())
            .map(Vec::as_slice)
            .ok_or(TopologyError::UnknownNode(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> NetworkGraph {
        let mut g = NetworkGraph::with_nodes(n);
        for i in 1..n {
            g.add_edge(AgentId(i - 1), AgentId(i)).unwrap();
        }
        g
    }

    #[test]
    fn test_add_edge_is_undirected_and_simple() {
        let mut g = NetworkGraph::with_nodes(3);
        assert!(g.add_edge(AgentId(0), AgentId(1)).unwrap());
        assert!(!g.add_edge(AgentId(1), AgentId(0)).unwrap());
        assert_eq!(g.edge_count(), 1);
        assert!(g.has_edge(AgentId(1), AgentId(0)));
        assert_eq!(g.degree(AgentId(0)).unwrap(), 1);
        assert_eq!(g.degree(AgentId(2)).unwrap(), 0);
    }

    #[test]
    fn test_rejects_self_loops_and_unknown_nodes() {
        let mut g = NetworkGraph::with_nodes(2);
        assert_eq!(
            g.add_edge(AgentId(1), AgentId(1)),
            Err(TopologyError::SelfLoop(AgentId(1)))
        );
        assert_eq!(
            g.add_edge(AgentId(0), AgentId(5)),
            Err(TopologyError::UnknownNode(AgentId(5)))
        );
        assert_eq!(
            g.neighbors(AgentId(9)),
            Err(TopologyError::UnknownNode(AgentId(9)))
        );
    }

    #[test]
    fn test_neighbors_keep_insertion_order() {
        let mut g = NetworkGraph::with_nodes(4);
        g.add_edge(AgentId(0), AgentId(3)).unwrap();
        g.add_edge(AgentId(0), AgentId(1)).unwrap();
        g.add_edge(AgentId(2), AgentId(0)).unwrap();
        assert_eq!(
            g.neighbors(AgentId(0)).unwrap(),
            &[AgentId(3), AgentId(1), AgentId(2)]
        );
    }

    #[test]
    fn test_edges_listed_once() {
        let g = path(4);
        let edges: Vec<_> = g.edges().collect();
        assert_eq!(
            edges,
            vec![
                (AgentId(0), AgentId(1)),
                (AgentId(1), AgentId(2)),
                (AgentId(2), AgentId(3)),
            ]
        );
    }

    #[test]
    fn test_compose_relabeled_keeps_identity_spaces_disjoint() {
        let a = path(3);
        let b = path(2);
        let mut composed = NetworkGraph::with_nodes(5);
        let added_a = composed
            .compose_relabeled(&a, &[AgentId(0), AgentId(1), AgentId(2)])
            .unwrap();
        let added_b = composed
            .compose_relabeled(&b, &[AgentId(3), AgentId(4)])
            .unwrap();

        assert_eq!(added_a + added_b, a.edge_count() + b.edge_count());
        assert_eq!(composed.edge_count(), 3);
        assert!(composed.has_edge(AgentId(3), AgentId(4)));
        assert!(!composed.has_edge(AgentId(2), AgentId(3)));
    }

    #[test]
    fn test_compose_rejects_short_mapping() {
        let a = path(3);
        let mut composed = NetworkGraph::with_nodes(3);
        assert!(composed
            .compose_relabeled(&a, &[AgentId(0), AgentId(1)])
            .is_err());
    }

    #[test]
    fn test_degree_stats() {
        let g = path(3);
        assert_eq!(g.max_degree(), 2);
        assert!((g.mean_degree() - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(NetworkGraph::new().mean_degree(), 0.0);
    }
}

//! Influence System
//!
//! Social influence on an agent blends two ratios over its neighborhood:
//! how much of the opinion similarity comes from active neighbors, and how
//! much of the status pressure (degree share) does. Both are 0 when the
//! neighborhood contributes nothing.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::components::{Agent, AgentId, NeighborQuery};

/// Similarity of two opinions in [-1, 1], mapped to [0, 1].
pub fn similarity(neighbor_opinion: f64, own_opinion: f64) -> f64 {
    1.0 - (neighbor_opinion - own_opinion).abs() / 2.0
}

/// Share of the pair's combined degree held by the neighbor.
pub fn status_pressure(neighbor_degree: usize, own_degree: usize) -> f64 {
    let total = neighbor_degree + own_degree;
    if total == 0 {
        return 0.0;
    }
    neighbor_degree as f64 / total as f64
}

fn ratio(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part / total
    }
}

/// The two components of social influence and their blend.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InfluenceBreakdown {
    pub opinion: f64,
    pub relation: f64,
    pub combined: f64,
}

/// Read-only influence queries over a population bound to a graph.
pub struct InfluenceModel<'a, G: NeighborQuery> {
    graph: &'a G,
    population: &'a [Agent],
}

impl<'a, G: NeighborQuery> InfluenceModel<'a, G> {
    pub fn new(graph: &'a G, population: &'a [Agent]) -> Self {
        Self { graph, population }
    }

    fn agent(&self, id: AgentId) -> Option<&'a Agent> {
        self.population.get(id.index())
    }

    /// Neighbors other than `id` itself; empty (with a warning) when `id`
    /// is not in the graph.
    fn neighbors(&self, id: AgentId) -> impl Iterator<Item = &'a Agent> + '_ {
        let neighbors: &[AgentId] = match self.graph.neighbors(id) {
            Ok(neighbors) => neighbors,
            Err(err) => {
                warn!(agent = %id, error = %err, "neighbor lookup failed");
                &[]
            }
        };
        neighbors
            .iter()
            .filter(move |&&nbr| nbr != id)
            .filter_map(move |&nbr| {
                let agent = self.agent(nbr);
                if agent.is_none() {
                    warn!(agent = %id, neighbor = %nbr, "neighbor missing from population");
                }
                agent
            })
    }

    fn degree(&self, id: AgentId) -> usize {
        match self.graph.degree(id) {
            Ok(degree) => degree,
            Err(err) => {
                warn!(agent = %id, error = %err, "degree lookup failed");
                0
            }
        }
    }

    /// Active-neighbor share of total opinion similarity.
    pub fn opinion_influence(&self, id: AgentId) -> f64 {
        let Some(me) = self.agent(id) else {
            warn!(agent = %id, "influence requested for unknown agent");
            return 0.0;
        };
        let mut active = 0.0;
        let mut total = 0.0;
        for nbr in self.neighbors(id) {
            let sim = similarity(nbr.opinion, me.opinion);
            total += sim;
            if nbr.is_active {
                active += sim;
            }
        }
        ratio(active, total)
    }

    /// Active-neighbor share of total status pressure.
    pub fn relation_influence(&self, id: AgentId) -> f64 {
        if self.agent(id).is_none() {
            warn!(agent = %id, "influence requested for unknown agent");
            return 0.0;
        }
        let own_degree = self.degree(id);
        let mut active = 0.0;
        let mut total = 0.0;
        for nbr in self.neighbors(id) {
            let pressure = status_pressure(self.degree(nbr.id), own_degree);
            total += pressure;
            if nbr.is_active {
                active += pressure;
            }
        }
        ratio(active, total)
    }

    /// Both components and their blend by the agent's social influence factor.
    pub fn breakdown(&self, id: AgentId) -> InfluenceBreakdown {
        let Some(me) = self.agent(id) else {
            warn!(agent = %id, "influence requested for unknown agent");
            return InfluenceBreakdown::default();
        };
        let opinion = self.opinion_influence(id);
        let relation = self.relation_influence(id);
        let w = me.social_influence_factor;
        InfluenceBreakdown {
            opinion,
            relation,
            combined: w * opinion + (1.0 - w) * relation,
        }
    }

    /// Social influence on `id`, in [0, 1].
    pub fn social_influence(&self, id: AgentId) -> f64 {
        self.breakdown(id).combined
    }

    /// Mean opinion of the active neighbors, `None` if there are none.
    pub fn active_neighbor_mean(&self, id: AgentId) -> Option<f64> {
        let (sum, count) = self
            .neighbors(id)
            .filter(|nbr| nbr.is_active)
            .fold((0.0, 0usize), |(sum, count), nbr| (sum + nbr.opinion, count + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    /// The opinion `id` would move to, or `None` when it has no active
    /// neighbors to listen to.
    pub fn updated_opinion(&self, id: AgentId) -> Option<f64> {
        let me = self.agent(id)?;
        let mean = self.active_neighbor_mean(id)?;
        Some(me.blended_opinion(mean))
    }
}

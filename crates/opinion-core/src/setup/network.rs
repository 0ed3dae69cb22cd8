//! Network Setup
//!
//! Builds the two seed populations, embeds each in its own power-law
//! cluster graph, composes them into one network and optionally
//! cross-links agents of opposite polarity whose opinions are close.

use opinion_events::Polarity;
use tracing::{debug, info};

use crate::components::{Agent, AgentId, NetworkGraph};
use crate::config::{AgentConfig, NetworkConfig, PartitionMode, SimConfig};
use crate::error::{BuildError, ConfigurationError};
use crate::rng::RandomSource;
use crate::setup::agents::{partition_ids, spawn_mixed_agents, spawn_signed_agents};
use crate::setup::powerlaw::powerlaw_cluster_graph;

/// A population bound one-to-one onto a composed graph.
#[derive(Debug, Clone)]
pub struct Network {
    /// Agents in creation order; `population[i].id == AgentId(i)`
    pub population: Vec<Agent>,
    pub graph: NetworkGraph,
    /// Agents of the positive subgraph, in subgraph node order
    pub positive: Vec<AgentId>,
    /// Agents of the negative subgraph, in subgraph node order
    pub negative: Vec<AgentId>,
    pub positive_edges: usize,
    pub negative_edges: usize,
    pub cross_links: usize,
}

impl Network {
    /// Members of one side.
    pub fn side(&self, polarity: Polarity) -> &[AgentId] {
        match polarity {
            Polarity::Positive => &self.positive,
            Polarity::Negative => &self.negative,
        }
    }
}

/// Builds a `Network` from configuration.
#[derive(Debug, Clone)]
pub struct NetworkBuilder<'a> {
    network: &'a NetworkConfig,
    agents: &'a AgentConfig,
}

impl<'a> NetworkBuilder<'a> {
    pub fn new(network: &'a NetworkConfig, agents: &'a AgentConfig) -> Self {
        Self { network, agents }
    }

    pub fn from_config(config: &'a SimConfig) -> Self {
        Self::new(&config.network, &config.agents)
    }

    /// Rejects parameters that cannot produce a network. Shares the
    /// section checks `SimConfig::validate` runs.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.network.validate()?;
        self.agents.validate()
    }

    /// Spawns the population, generates both subgraphs, composes them and
    /// applies cross-links, in that order of random draws.
    pub fn build(&self, rng: &mut RandomSource) -> Result<Network, BuildError> {
        self.validate()?;
        let net = self.network;
        let shape = self.agents.opinion_shape()?;

        let mut population = Vec::new();
        match net.partition {
            PartitionMode::Construction => {
                spawn_signed_agents(
                    &mut population,
                    net.positive_count,
                    Polarity::Positive,
                    self.agents,
                    &shape,
                    rng,
                );
                spawn_signed_agents(
                    &mut population,
                    net.negative_count,
                    Polarity::Negative,
                    self.agents,
                    &shape,
                    rng,
                );
            }
            PartitionMode::OpinionSign => {
                spawn_mixed_agents(
                    &mut population,
                    net.positive_count + net.negative_count,
                    self.agents,
                    &shape,
                    rng,
                );
            }
        }

        let positive = partition_ids(&population, Polarity::Positive);
        let negative = partition_ids(&population, Polarity::Negative);

        let positive_graph = self.side_graph(positive.len(), rng)?;
        let negative_graph = self.side_graph(negative.len(), rng)?;

        let mut graph = NetworkGraph::with_nodes(population.len());
        let positive_edges = graph.compose_relabeled(&positive_graph, &positive)?;
        let negative_edges = graph.compose_relabeled(&negative_graph, &negative)?;

        let cross_links = self.cross_link(&population, &positive, &negative, &mut graph, rng)?;

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            positive = positive.len(),
            negative = negative.len(),
            cross_links,
            "network built"
        );

        Ok(Network {
            population,
            graph,
            positive,
            negative,
            positive_edges,
            negative_edges,
            cross_links,
        })
    }

    /// Power-law cluster graph for one side. A side smaller than the
    /// attachment count uses its own size as `m`; an empty side has no graph.
    fn side_graph(
        &self,
        size: usize,
        rng: &mut RandomSource,
    ) -> Result<NetworkGraph, ConfigurationError> {
        if size == 0 {
            return Ok(NetworkGraph::new());
        }
        let m = self.network.attachment.min(size);
        if m < self.network.attachment {
            debug!(size, m, "side smaller than attachment count");
        }
        powerlaw_cluster_graph(size, m, self.network.cluster_prob, rng)
    }

    /// Proposes an edge for every positive/negative pair whose opinions lie
    /// within the threshold, accepting it with the cross-link probability.
    fn cross_link(
        &self,
        population: &[Agent],
        positive: &[AgentId],
        negative: &[AgentId],
        graph: &mut NetworkGraph,
        rng: &mut RandomSource,
    ) -> Result<usize, BuildError> {
        let threshold = self.network.cross_link_threshold;
        let prob = self.network.cross_link_prob;
        if prob <= 0.0 {
            return Ok(0);
        }

        let mut added = 0;
        for &u in positive {
            for &v in negative {
                // Endpoint roles are drawn even though the edge is undirected,
                // so the draw sequence stays fixed for a seed.
                let (a, b) = match rng.choose(&[u, v]) {
                    Some(&first) if first == v => (v, u),
                    _ => (u, v),
                };
                let distance = (population[u.index()].opinion - population[v.index()].opinion).abs();
                if distance <= threshold && rng.chance(prob) && graph.add_edge(a, b)? {
                    added += 1;
                }
            }
        }
        Ok(added)
    }
}

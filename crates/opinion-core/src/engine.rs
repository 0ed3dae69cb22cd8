//! Simulation Engine
//!
//! Owns the population and the composed graph and advances the activation
//! cascade one tick at a time until a stop condition holds.

use opinion_events::{
    generate_snapshot_id, AgentTrace, CascadeEvent, RunMetadata, TickSnapshot,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::components::{Agent, AgentId, NetworkGraph};
use crate::config::{SimConfig, SimulationConfig};
use crate::error::{BuildError, ConfigurationError};
use crate::output::stats::OpinionHistogram;
use crate::rng::RandomSource;
use crate::setup::network::{Network, NetworkBuilder};
use crate::systems::cascade::{commit_plan, plan_tick};
use crate::systems::influence::{InfluenceBreakdown, InfluenceModel};

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The tick budget was used up
    MaxTicks,
    /// The opinion range fell below the convergence threshold
    Converged,
}

impl StopReason {
    pub fn label(self) -> &'static str {
        match self {
            StopReason::MaxTicks => "max_ticks",
            StopReason::Converged => "converged",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Running,
    Stopped(StopReason),
}

/// What one executed tick changed.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Tick count after the step
    pub tick: u64,
    /// Agents that became active, in activation order
    pub activated: Vec<AgentId>,
    /// Agents whose opinion was updated
    pub updated: Vec<AgentId>,
    pub events: Vec<CascadeEvent>,
    pub active_count: usize,
}

/// Outcome of a finished (or interrupted) run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub stop_reason: Option<StopReason>,
    pub initial_active: usize,
    pub final_active: usize,
    pub opinion_min: f64,
    pub opinion_max: f64,
    pub events: u64,
}

impl RunSummary {
    pub fn opinion_range(&self) -> f64 {
        self.opinion_max - self.opinion_min
    }
}

/// Steps the cascade over a fixed network.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: SimulationConfig,
    population: Vec<Agent>,
    graph: NetworkGraph,
    positive_count: usize,
    negative_count: usize,
    cross_links: usize,
    /// Active agents in activation order, mirrored by `Agent::is_active`
    active: Vec<AgentId>,
    initial_active: usize,
    tick: u64,
    state: EngineState,
    next_event: u64,
}

impl SimulationEngine {
    /// Validates `config`, builds the network from its seed and wraps it.
    pub fn from_config(config: &SimConfig) -> Result<Self, BuildError> {
        config.validate()?;
        let mut rng = RandomSource::new(config.seed);
        let network = NetworkBuilder::from_config(config).build(&mut rng)?;
        Ok(Self::from_network(network, config.simulation.clone())?)
    }

    /// Wraps an already built network. Agents must be indexed `0..n` and
    /// bound one-to-one to the graph's nodes.
    pub fn from_network(
        network: Network,
        config: SimulationConfig,
    ) -> Result<Self, ConfigurationError> {
        let Network {
            population,
            graph,
            positive,
            negative,
            cross_links,
            ..
        } = network;

        let misplaced = population
            .iter()
            .enumerate()
            .any(|(index, agent)| agent.id.index() != index);
        if population.len() != graph.node_count() || misplaced {
            return Err(ConfigurationError::PopulationMismatch {
                agents: population.len(),
                nodes: graph.node_count(),
            });
        }

        let active: Vec<AgentId> = population
            .iter()
            .filter(|a| a.is_active)
            .map(|a| a.id)
            .collect();

        info!(
            agents = population.len(),
            edges = graph.edge_count(),
            active = active.len(),
            max_ticks = config.max_ticks,
            "engine ready"
        );

        Ok(Self {
            config,
            initial_active: active.len(),
            population,
            graph,
            positive_count: positive.len(),
            negative_count: negative.len(),
            cross_links,
            active,
            tick: 0,
            state: EngineState::Running,
            next_event: 1,
        })
    }

    /// Advances one tick.
    ///
    /// The stop predicate is checked first; once it holds the engine moves
    /// to `Stopped` without touching any agent and this returns `None`, as do
    /// all later calls.
    pub fn step(&mut self) -> Option<TickReport> {
        if let EngineState::Stopped(_) = self.state {
            return None;
        }
        if let Some(reason) = self.stop_condition() {
            self.state = EngineState::Stopped(reason);
            info!(
                tick = self.tick,
                reason = %reason,
                active = self.active.len(),
                "simulation stopped"
            );
            return None;
        }

        let activated = self.active.clone();
        let plan = plan_tick(&self.graph, &self.population, &activated, self.config.cascade);

        self.tick += 1;
        let events = commit_plan(
            &plan,
            &mut self.population,
            &mut self.active,
            self.tick,
            &mut self.next_event,
        );

        let report = TickReport {
            tick: self.tick,
            activated: self.active[activated.len()..].to_vec(),
            updated: plan
                .changes
                .iter()
                .filter(|c| c.new_opinion.is_some())
                .map(|c| c.agent)
                .collect(),
            events,
            active_count: self.active.len(),
        };

        debug!(
            tick = report.tick,
            activated = report.activated.len(),
            updated = report.updated.len(),
            active = report.active_count,
            "tick complete"
        );
        Some(report)
    }

    /// Steps until stopped.
    pub fn run(&mut self) -> RunSummary {
        while self.step().is_some() {}
        self.summary()
    }

    fn stop_condition(&self) -> Option<StopReason> {
        if self.tick >= self.config.max_ticks {
            return Some(StopReason::MaxTicks);
        }
        match self.config.convergence_epsilon {
            Some(epsilon) if self.opinion_range() < epsilon => Some(StopReason::Converged),
            _ => None,
        }
    }

    pub fn summary(&self) -> RunSummary {
        let (opinion_min, opinion_max) = self.opinion_bounds().unwrap_or((0.0, 0.0));
        RunSummary {
            ticks: self.tick,
            stop_reason: self.stop_reason(),
            initial_active: self.initial_active,
            final_active: self.active.len(),
            opinion_min,
            opinion_max,
            events: self.next_event - 1,
        }
    }

    pub fn population(&self) -> &[Agent] {
        &self.population
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.population.get(id.index())
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn active(&self) -> &[AgentId] {
        &self.active
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.state, EngineState::Stopped(_))
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.state {
            EngineState::Stopped(reason) => Some(reason),
            EngineState::Running => None,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Smallest and largest opinion, `None` for an empty population.
    pub fn opinion_bounds(&self) -> Option<(f64, f64)> {
        let mut opinions = self.population.iter().map(|a| a.opinion);
        let first = opinions.next()?;
        Some(opinions.fold((first, first), |(lo, hi), o| (lo.min(o), hi.max(o))))
    }

    /// `max(opinion) - min(opinion)`, 0 for an empty population.
    pub fn opinion_range(&self) -> f64 {
        self.opinion_bounds().map_or(0.0, |(lo, hi)| hi - lo)
    }

    pub fn opinion_mean(&self) -> f64 {
        if self.population.is_empty() {
            return 0.0;
        }
        self.population.iter().map(|a| a.opinion).sum::<f64>() / self.population.len() as f64
    }

    /// Influence currently acting on `id`.
    pub fn influence(&self, id: AgentId) -> InfluenceBreakdown {
        InfluenceModel::new(&self.graph, &self.population).breakdown(id)
    }

    /// Opinion, activation and social influence of one agent.
    pub fn trace(&self, id: AgentId) -> Option<AgentTrace> {
        let agent = self.agent(id)?;
        Some(AgentTrace {
            agent_id: id.index(),
            opinion: agent.opinion,
            is_active: agent.is_active,
            social_influence: self.influence(id).combined,
        })
    }

    /// Current state as a renderer-facing snapshot.
    pub fn snapshot(&self, bins: usize) -> TickSnapshot {
        let (opinion_min, opinion_max) = self.opinion_bounds().unwrap_or((0.0, 0.0));
        let histogram =
            OpinionHistogram::from_opinions(self.population.iter().map(|a| a.opinion), bins);
        TickSnapshot {
            snapshot_id: generate_snapshot_id(self.tick),
            tick: self.tick,
            active_count: self.active.len(),
            opinion_min,
            opinion_max,
            opinion_mean: self.opinion_mean(),
            histogram: histogram.to_snapshot(),
            agents: self.population.iter().map(Agent::state).collect(),
            focus: self.config.focus_agent.and_then(|id| self.trace(AgentId(id))),
        }
    }

    /// Network and run description for exporters.
    pub fn metadata(&self, seed: u64) -> RunMetadata {
        RunMetadata {
            seed,
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            positive_count: self.positive_count,
            negative_count: self.negative_count,
            cross_link_count: self.cross_links,
            max_ticks: self.config.max_ticks,
            final_tick: self.is_stopped().then_some(self.tick),
            stop_reason: self.stop_reason().map(|r| r.label().to_string()),
        }
    }
}

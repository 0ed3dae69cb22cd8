//! Agent Components
//!
//! Per-individual state: opinion, activation, self-belief and the
//! social-influence blend weight.

use opinion_events::{AgentState, Polarity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index of an agent in the population arena.
///
/// Graph nodes carry the same index, so an `AgentId` is also a node id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub usize);

impl AgentId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for AgentId {
    fn from(index: usize) -> Self {
        AgentId(index)
    }
}

/// Largest overshoot of [-1, 1] attributed to floating-point rounding.
pub const ROUNDING_SLACK: f64 = 1e-12;

/// `self_belief * opinion + (1 - self_belief) * neighbor_mean`, unclamped.
///
/// A convex combination, so it stays in [-1, 1] whenever `self_belief` is in
/// [0, 1] and both opinions are in [-1, 1].
pub fn weighted_opinion(self_belief: f64, opinion: f64, neighbor_mean: f64) -> f64 {
    self_belief * opinion + (1.0 - self_belief) * neighbor_mean
}

/// A single individual in the population.
///
/// Agents never hold a reference to the network; influence code receives
/// the graph as a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    /// Stance in [-1, 1]; sign is direction, magnitude is strength
    pub opinion: f64,
    /// Once true, stays true for the rest of the run
    pub is_active: bool,
    /// Resistance threshold in [0, 1]
    pub self_belief: f64,
    /// Weight of opinion similarity vs. network status, in [0, 1]
    pub social_influence_factor: f64,
    /// Seed population the agent was bound to
    pub polarity: Polarity,
}

impl Agent {
    /// Creates an inactive agent.
    pub fn new(
        id: AgentId,
        opinion: f64,
        self_belief: f64,
        social_influence_factor: f64,
        polarity: Polarity,
    ) -> Self {
        Self {
            id,
            opinion: opinion.clamp(-1.0, 1.0),
            is_active: false,
            self_belief: self_belief.clamp(0.0, 1.0),
            social_influence_factor: social_influence_factor.clamp(0.0, 1.0),
            polarity,
        }
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Marks the agent active. Returns true if it was inactive before.
    pub fn activate(&mut self) -> bool {
        let newly = !self.is_active;
        self.is_active = true;
        newly
    }

    /// Weighted average of the agent's own opinion and `neighbor_mean`,
    /// weighted by self-belief.
    ///
    /// The clamp only absorbs rounding; an input outside [-1, 1] trips the
    /// debug assertion instead of being hidden.
    pub fn blended_opinion(&self, neighbor_mean: f64) -> f64 {
        let blended = weighted_opinion(self.self_belief, self.opinion, neighbor_mean);
        debug_assert!(
            blended.abs() <= 1.0 + ROUNDING_SLACK,
            "blended opinion {blended} outside [-1, 1]"
        );
        blended.clamp(-1.0, 1.0)
    }

    /// Read-only view for snapshots.
    pub fn state(&self) -> AgentState {
        AgentState {
            agent_id: self.id.index(),
            opinion: self.opinion,
            is_active: self.is_active,
            polarity: self.polarity,
        }
    }
}

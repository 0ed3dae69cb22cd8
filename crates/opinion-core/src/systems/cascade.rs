//! Cascade System
//!
//! One tick of the activation cascade, split into a read-only plan over the
//! tick-start state and a commit that applies every planned change at once.
//! Nothing committed in a tick is seen by another candidate in that tick.

use opinion_events::{generate_event_id, ActivationCause, CascadeEvent, CascadeEventType};
use tracing::{trace, warn};

use crate::components::{Agent, AgentId, NeighborQuery};
use crate::config::CascadePolicy;
use crate::systems::influence::InfluenceModel;

/// A change to one agent, decided during planning.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedChange {
    pub agent: AgentId,
    /// Active agent whose neighborhood the candidate was reached through
    pub source: AgentId,
    pub activate: bool,
    pub new_opinion: Option<f64>,
    pub influence: f64,
}

/// Every change planned for a tick, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadePlan {
    pub policy: CascadePolicy,
    pub changes: Vec<PlannedChange>,
}

impl CascadePlan {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }
}

/// Plans one tick.
///
/// Walks `activated` in order, then each agent's neighbors in adjacency
/// order. A candidate is evaluated at most once per tick.
pub fn plan_tick<G: NeighborQuery>(
    graph: &G,
    population: &[Agent],
    activated: &[AgentId],
    policy: CascadePolicy,
) -> CascadePlan {
    let model = InfluenceModel::new(graph, population);
    let mut evaluated = vec![false; population.len()];
    let mut changes = Vec::new();

    for &source in activated {
        let neighbors = match graph.neighbors(source) {
            Ok(neighbors) => neighbors,
            Err(err) => {
                warn!(agent = %source, error = %err, "active agent missing from graph");
                continue;
            }
        };
        for &candidate in neighbors {
            let Some(agent) = population.get(candidate.index()) else {
                warn!(agent = %source, neighbor = %candidate, "neighbor missing from population");
                continue;
            };
            if evaluated[candidate.index()] {
                continue;
            }
            if policy == CascadePolicy::ThresholdGated && agent.is_active {
                continue;
            }
            evaluated[candidate.index()] = true;

            let influence = model.social_influence(candidate);
            let persuaded = influence >= agent.self_belief;
            let change = match policy {
                CascadePolicy::ThresholdGated => persuaded.then(|| PlannedChange {
                    agent: candidate,
                    source,
                    activate: true,
                    new_opinion: model.updated_opinion(candidate),
                    influence,
                }),
                CascadePolicy::ActivateOnContact => {
                    let new_opinion = if persuaded {
                        model.updated_opinion(candidate)
                    } else {
                        None
                    };
                    (!agent.is_active || new_opinion.is_some()).then(|| PlannedChange {
                        agent: candidate,
                        source,
                        activate: !agent.is_active,
                        new_opinion,
                        influence,
                    })
                }
            };
            if let Some(change) = change {
                trace!(agent = %candidate, influence, "planned change");
                changes.push(change);
            }
        }
    }

    CascadePlan { policy, changes }
}

/// Applies a plan, appending newly active agents to `active` and returning
/// one event per change. `next_event` is the sequence number of the next
/// event id and is advanced past the ids used.
pub fn commit_plan(
    plan: &CascadePlan,
    population: &mut [Agent],
    active: &mut Vec<AgentId>,
    tick: u64,
    next_event: &mut u64,
) -> Vec<CascadeEvent> {
    let cause = match plan.policy {
        CascadePolicy::ThresholdGated => ActivationCause::Threshold,
        CascadePolicy::ActivateOnContact => ActivationCause::Contact,
    };
    let mut events = Vec::with_capacity(plan.len());

    for change in &plan.changes {
        let Some(agent) = population.get_mut(change.agent.index()) else {
            warn!(agent = %change.agent, "planned change for unknown agent");
            continue;
        };
        let opinion_before = agent.opinion;
        let newly_active = change.activate && agent.activate();
        if newly_active {
            active.push(change.agent);
        }
        if let Some(opinion) = change.new_opinion {
            agent.opinion = opinion;
        }

        let event_type = match (newly_active, change.new_opinion.is_some()) {
            (true, true) => CascadeEventType::Activated,
            (true, false) => CascadeEventType::ActivatedUnchanged,
            (false, true) => CascadeEventType::OpinionUpdated,
            (false, false) => continue,
        };
        events.push(CascadeEvent {
            event_id: generate_event_id(*next_event),
            tick,
            event_type,
            agent_id: change.agent.index(),
            source_id: change.source.index(),
            cause: newly_active.then_some(cause),
            opinion_before,
            opinion_after: agent.opinion,
            influence: change.influence,
        });
        *next_event += 1;
    }

    events
}

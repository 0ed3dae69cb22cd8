//! Agent Spawning
//!
//! Creates agents with randomized activation, opinion and self-belief.

use opinion_events::Polarity;

use crate::components::{Agent, AgentId};
use crate::config::{AgentConfig, SelfBelief};
use crate::rng::{OpinionShape, RandomSource};

/// Draws an opinion.
///
/// With a direction the beta draw is signed, giving values in [0, 1] or
/// [-1, 0]; without one it is stretched over [-1, 1].
pub fn generate_opinion(
    direction: Option<Polarity>,
    shape: &OpinionShape,
    rng: &mut RandomSource,
) -> f64 {
    let draw = rng.beta(shape);
    match direction {
        Some(polarity) => polarity.sign() * draw,
        None => 2.0 * draw - 1.0,
    }
}

/// Creates one agent.
///
/// Draw order is fixed (activation, opinion, self-belief) so a seed
/// reproduces the same population.
pub fn spawn_agent(
    id: AgentId,
    direction: Option<Polarity>,
    config: &AgentConfig,
    shape: &OpinionShape,
    rng: &mut RandomSource,
) -> Agent {
    let is_active = rng.chance(config.activation_rate);
    let opinion = generate_opinion(direction, shape, rng);
    let self_belief = match config.self_belief {
        SelfBelief::Fixed { value } => value,
        SelfBelief::Uniform => rng.uniform(),
    };
    let polarity = direction.unwrap_or_else(|| Polarity::of(opinion));

    Agent::new(
        id,
        opinion,
        self_belief,
        config.social_influence_factor,
        polarity,
    )
    .with_active(is_active)
}

/// Appends `count` agents of a fixed polarity, continuing the id sequence.
pub fn spawn_signed_agents(
    population: &mut Vec<Agent>,
    count: usize,
    polarity: Polarity,
    config: &AgentConfig,
    shape: &OpinionShape,
    rng: &mut RandomSource,
) {
    population.reserve(count);
    for _ in 0..count {
        let id = AgentId(population.len());
        population.push(spawn_agent(id, Some(polarity), config, shape, rng));
    }
}

/// Appends `count` agents whose polarity follows their drawn opinion.
pub fn spawn_mixed_agents(
    population: &mut Vec<Agent>,
    count: usize,
    config: &AgentConfig,
    shape: &OpinionShape,
    rng: &mut RandomSource,
) {
    population.reserve(count);
    for _ in 0..count {
        let id = AgentId(population.len());
        population.push(spawn_agent(id, None, config, shape, rng));
    }
}

/// Ids of the agents with the given polarity, in creation order.
pub fn partition_ids(population: &[Agent], polarity: Polarity) -> Vec<AgentId> {
    population
        .iter()
        .filter(|a| a.polarity == polarity)
        .map(|a| a.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AgentConfig {
        AgentConfig {
            activation_rate: 0.3,
            opinion_alpha: 0.2,
            opinion_beta: 0.8,
            social_influence_factor: 0.6,
            self_belief: SelfBelief::Fixed { value: 0.15 },
        }
    }

    #[test]
    fn test_signed_agents_respect_direction() {
        let config = config();
        let shape = config.opinion_shape().unwrap();
        let mut rng = RandomSource::new(42);
        let mut population = Vec::new();
        spawn_signed_agents(&mut population, 30, Polarity::Positive, &config, &shape, &mut rng);
        spawn_signed_agents(&mut population, 30, Polarity::Negative, &config, &shape, &mut rng);

        assert_eq!(population.len(), 60);
        for (index, agent) in population.iter().enumerate() {
            assert_eq!(agent.id, AgentId(index));
            assert_eq!(agent.self_belief, 0.15);
            assert_eq!(agent.social_influence_factor, 0.6);
        }
        assert!(population[..30].iter().all(|a| (0.0..=1.0).contains(&a.opinion)));
        assert!(population[30..].iter().all(|a| (-1.0..=0.0).contains(&a.opinion)));
        assert_eq!(partition_ids(&population, Polarity::Negative).len(), 30);
    }

    #[test]
    fn test_mixed_agents_partition_by_sign() {
        let config = AgentConfig {
            self_belief: SelfBelief::Uniform,
            ..config()
        };
        let shape = OpinionShape::new(0.4, 0.4).unwrap();
        let mut rng = RandomSource::new(8);
        let mut population = Vec::new();
        spawn_mixed_agents(&mut population, 200, &config, &shape, &mut rng);

        for agent in &population {
            assert!((-1.0..=1.0).contains(&agent.opinion));
            assert!((0.0..1.0).contains(&agent.self_belief));
            assert_eq!(agent.polarity, Polarity::of(agent.opinion));
        }
        let positives = partition_ids(&population, Polarity::Positive).len();
        let negatives = partition_ids(&population, Polarity::Negative).len();
        assert_eq!(positives + negatives, 200);
        assert!(positives > 0 && negatives > 0);
    }

    #[test]
    fn test_activation_rate_extremes() {
        let shape = OpinionShape::new(0.4, 0.4).unwrap();
        let mut rng = RandomSource::new(1);

        let never = AgentConfig {
            activation_rate: 0.0,
            ..config()
        };
        let mut population = Vec::new();
        spawn_mixed_agents(&mut population, 50, &never, &shape, &mut rng);
        assert!(population.iter().all(|a| !a.is_active));

        let always = AgentConfig {
            activation_rate: 1.0,
            ..config()
        };
        let mut population = Vec::new();
        spawn_mixed_agents(&mut population, 50, &always, &shape, &mut rng);
        assert!(population.iter().all(|a| a.is_active));
    }
}

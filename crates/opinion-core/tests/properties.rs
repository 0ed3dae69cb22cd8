//! Property tests over randomly parameterized runs.

use opinion_core::{
    weighted_opinion, AgentId, CascadePolicy, PartitionMode, SelfBelief, SimConfig,
    SimulationEngine, ROUNDING_SLACK,
};
use proptest::prelude::*;

fn config(
    seed: u64,
    side: usize,
    attachment: usize,
    cluster_prob: f64,
    cross_link_prob: f64,
    contact: bool,
    sign_split: bool,
) -> SimConfig {
    let mut config = SimConfig::mixed();
    config.seed = seed;
    config.network.positive_count = side;
    config.network.negative_count = side;
    config.network.attachment = attachment;
    config.network.cluster_prob = cluster_prob;
    config.network.cross_link_prob = cross_link_prob;
    config.network.partition = if sign_split {
        PartitionMode::OpinionSign
    } else {
        PartitionMode::Construction
    };
    config.agents.activation_rate = 0.1;
    config.agents.self_belief = SelfBelief::Uniform;
    config.simulation.max_ticks = 15;
    config.simulation.convergence_epsilon = Some(0.05);
    config.simulation.cascade = if contact {
        CascadePolicy::ActivateOnContact
    } else {
        CascadePolicy::ThresholdGated
    };
    config
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn opinions_stay_in_range_and_active_set_only_grows(
        seed in 1_u64..10_000,
        side in 4_usize..30,
        attachment in 1_usize..4,
        cluster_prob in 0.0_f64..=1.0,
        cross_link_prob in 0.0_f64..=1.0,
        contact in any::<bool>(),
        sign_split in any::<bool>(),
    ) {
        let config = config(seed, side, attachment, cluster_prob, cross_link_prob, contact, sign_split);
        let mut engine = SimulationEngine::from_config(&config).unwrap();
        let mut previous: Vec<AgentId> = engine.active().to_vec();

        while engine.step().is_some() {
            for agent in engine.population() {
                prop_assert!((-1.0..=1.0).contains(&agent.opinion));
            }
            prop_assert!(engine.active().len() >= previous.len());
            prop_assert_eq!(&engine.active()[..previous.len()], previous.as_slice());
            for id in engine.active() {
                prop_assert!(engine.agent(*id).unwrap().is_active);
            }
            previous = engine.active().to_vec();
        }

        let flagged = engine.population().iter().filter(|a| a.is_active).count();
        prop_assert_eq!(flagged, engine.active().len());
    }

    #[test]
    fn runs_terminate_within_tick_budget(
        seed in 1_u64..10_000,
        max_ticks in 1_u64..25,
        contact in any::<bool>(),
    ) {
        let mut config = config(seed, 12, 2, 0.5, 0.1, contact, true);
        config.simulation.max_ticks = max_ticks;
        let mut engine = SimulationEngine::from_config(&config).unwrap();

        let mut steps = 0;
        while engine.step().is_some() {
            steps += 1;
            prop_assert!(steps <= max_ticks);
        }
        prop_assert!(engine.is_stopped());
        prop_assert!(engine.tick() <= max_ticks);
        prop_assert_eq!(engine.tick(), steps);
    }

    #[test]
    fn influence_is_a_fraction(
        seed in 1_u64..10_000,
        side in 4_usize..30,
        cross_link_prob in 0.0_f64..=1.0,
    ) {
        let config = config(seed, side, 3, 0.5, cross_link_prob, true, true);
        let engine = SimulationEngine::from_config(&config).unwrap();
        for agent in engine.population() {
            let breakdown = engine.influence(agent.id);
            prop_assert!((0.0..=1.0).contains(&breakdown.opinion));
            prop_assert!((0.0..=1.0).contains(&breakdown.relation));
            prop_assert!(breakdown.combined >= 0.0 && breakdown.combined <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn unclamped_blend_stays_in_range(
        self_belief in 0.0_f64..=1.0,
        opinion in -1.0_f64..=1.0,
        neighbor_mean in -1.0_f64..=1.0,
    ) {
        let blended = weighted_opinion(self_belief, opinion, neighbor_mean);
        prop_assert!(blended.abs() <= 1.0 + ROUNDING_SLACK);
        prop_assert!(blended >= opinion.min(neighbor_mean) - ROUNDING_SLACK);
        prop_assert!(blended <= opinion.max(neighbor_mean) + ROUNDING_SLACK);
    }
}

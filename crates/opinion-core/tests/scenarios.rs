//! Scenario tests
//!
//! Small hand-checkable networks and the two presets run end to end.

use opinion_core::output::{
    read_edge_list_file, write_edge_list_file, EventLogger, SnapshotLogger, StatsCollector,
};
use opinion_core::{
    Agent, AgentId, CascadePolicy, EngineState, Network, NetworkBuilder, NetworkGraph,
    PartitionMode, RandomSource, SimConfig, SimulationConfig, SimulationEngine, StopReason,
};
use opinion_events::{CascadeEventType, Polarity, TickSnapshot};

fn ten_and_ten() -> SimConfig {
    let mut config = SimConfig::polarized();
    config.seed = 42;
    config.network.positive_count = 10;
    config.network.negative_count = 10;
    config.network.attachment = 3;
    config.network.cluster_prob = 0.5;
    config.network.cross_link_prob = 0.0;
    config.network.partition = PartitionMode::Construction;
    config.simulation.max_ticks = 5;
    config.simulation.convergence_epsilon = None;
    config
}

#[test]
fn test_ten_and_ten_network_shape() {
    let config = ten_and_ten();
    let network = NetworkBuilder::from_config(&config)
        .build(&mut RandomSource::new(config.seed))
        .unwrap();

    assert_eq!(network.graph.node_count(), 20);
    assert_eq!(network.cross_links, 0);
    assert_eq!(
        network.graph.edge_count(),
        network.positive_edges + network.negative_edges
    );
    // 7 grown nodes per side, at most 3 edges each
    assert!(network.positive_edges <= 21 && network.negative_edges <= 21);
}

#[test]
fn test_ten_and_ten_runs_five_ticks_with_growing_active_set() {
    let config = ten_and_ten();
    let mut engine = SimulationEngine::from_config(&config).unwrap();
    assert_eq!(engine.graph().node_count(), 20);

    let mut previous: Vec<AgentId> = engine.active().to_vec();
    while let Some(report) = engine.step() {
        assert!(report.active_count >= previous.len());
        for id in &previous {
            assert!(engine.agent(*id).unwrap().is_active);
        }
        assert_eq!(&engine.active()[..previous.len()], previous.as_slice());
        previous = engine.active().to_vec();
    }

    assert_eq!(engine.tick(), 5);
    assert_eq!(engine.state(), EngineState::Stopped(StopReason::MaxTicks));
}

fn two_agents(self_belief: f64, b_opinion: f64) -> Network {
    let mut graph = NetworkGraph::with_nodes(2);
    graph.add_edge(AgentId(0), AgentId(1)).unwrap();
    Network {
        population: vec![
            Agent::new(AgentId(0), 0.5, self_belief, 0.6, Polarity::Positive).with_active(true),
            Agent::new(AgentId(1), b_opinion, self_belief, 0.6, Polarity::Negative),
        ],
        graph,
        positive: vec![AgentId(0)],
        negative: vec![AgentId(1)],
        positive_edges: 0,
        negative_edges: 0,
        cross_links: 1,
    }
}

#[test]
fn test_two_agent_single_step() {
    for cascade in [CascadePolicy::ThresholdGated, CascadePolicy::ActivateOnContact] {
        let sb = 0.15;
        let b0 = -0.4;
        let simulation = SimulationConfig {
            max_ticks: 10,
            convergence_epsilon: None,
            cascade,
            focus_agent: None,
        };
        let mut engine = SimulationEngine::from_network(two_agents(sb, b0), simulation).unwrap();

        let report = engine.step().unwrap();
        let b = engine.agent(AgentId(1)).unwrap();
        assert!(b.is_active);
        assert!((b.opinion - (sb * b0 + (1.0 - sb) * 0.5)).abs() < 1e-12);
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].event_type, CascadeEventType::Activated);
        assert_eq!(report.events[0].source_id, 0);
        assert_eq!(engine.agent(AgentId(0)).unwrap().opinion, 0.5);
    }
}

#[test]
fn test_two_agents_converge_under_contact() {
    let simulation = SimulationConfig {
        max_ticks: 200,
        convergence_epsilon: Some(0.01),
        cascade: CascadePolicy::ActivateOnContact,
        focus_agent: Some(0),
    };
    let mut engine = SimulationEngine::from_network(two_agents(0.6, -0.5), simulation).unwrap();
    let summary = engine.run();

    assert_eq!(summary.stop_reason, Some(StopReason::Converged));
    assert!(summary.ticks < 200);
    assert!(summary.opinion_range() < 0.01);
}

#[test]
fn test_presets_run_to_completion() {
    let mut polarized = SimConfig::polarized();
    polarized.simulation.max_ticks = 10;
    let mut engine = SimulationEngine::from_config(&polarized).unwrap();
    let summary = engine.run();
    assert_eq!(engine.population().len(), 100);
    assert!(summary.ticks <= 10);
    assert!(summary.final_active >= summary.initial_active);

    let mut mixed = SimConfig::mixed();
    mixed.network.positive_count = 100;
    mixed.network.negative_count = 100;
    mixed.agents.activation_rate = 0.05;
    mixed.simulation.max_ticks = 10;
    let mut engine = SimulationEngine::from_config(&mixed).unwrap();
    let summary = engine.run();
    assert_eq!(engine.population().len(), 200);
    assert!(summary.ticks <= 10);
    assert!(engine.is_stopped());
}

#[test]
fn test_export_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let config = ten_and_ten();
    let mut engine = SimulationEngine::from_config(&config).unwrap();

    let edge_path = dir.path().join("edgelist.csv");
    let written = write_edge_list_file(&edge_path, engine.graph(), engine.population()).unwrap();
    let records = read_edge_list_file(&edge_path).unwrap();
    assert_eq!(written, engine.graph().edge_count());
    assert_eq!(records.len(), written);
    assert!(records.iter().all(|r| !r.is_cross_link()));

    let snapshot_path = dir.path().join("snapshots.jsonl");
    let mut snapshots = SnapshotLogger::new(&snapshot_path).unwrap();
    let mut events = EventLogger::null();
    let mut stats = StatsCollector::new();

    let initial = engine.snapshot(20);
    snapshots.log(&initial).unwrap();
    stats.record(&initial, &[]);
    while let Some(report) = engine.step() {
        let snapshot = engine.snapshot(20);
        snapshots.log(&snapshot).unwrap();
        events.log_batch(&report.events).unwrap();
        stats.record(&snapshot, &report.events);
    }
    snapshots.flush().unwrap();

    let content = std::fs::read_to_string(&snapshot_path).unwrap();
    let parsed: Vec<TickSnapshot> = content
        .lines()
        .map(|line| TickSnapshot::from_jsonl(line).unwrap())
        .collect();
    assert_eq!(parsed.len(), 6);
    assert_eq!(parsed.last().unwrap().tick, 5);
    assert!(parsed.iter().all(|s| s.histogram.total() == 20));
    assert!(parsed.iter().all(|s| s.focus.as_ref().map(|f| f.agent_id) == Some(0)));

    let run_stats = stats.generate_stats(engine.tick(), Some("max_ticks".to_string()));
    assert_eq!(run_stats.total_events as u64, events.record_count());
    assert_eq!(run_stats.tick_history.len(), 6);
    assert_eq!(run_stats.final_positive + run_stats.final_negative, 20);
}

#[test]
fn test_config_file_drives_engine() {
    let toml = r#"
seed = 9

[network]
positive_count = 15
negative_count = 15
attachment = 2
partition = "construction"
cross_link_prob = 0.0

[agents]
activation_rate = 0.2
self_belief = { kind = "fixed", value = 0.1 }

[simulation]
max_ticks = 4
cascade = "threshold_gated"
"#;
    let config = SimConfig::from_str(toml).unwrap();
    let mut engine = SimulationEngine::from_config(&config).unwrap();
    assert_eq!(engine.population().len(), 30);
    assert!(engine.population().iter().all(|a| a.self_belief == 0.1));
    let summary = engine.run();
    assert_eq!(summary.ticks, 4);
    assert_eq!(summary.stop_reason, Some(StopReason::MaxTicks));
}

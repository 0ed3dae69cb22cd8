//! Opinion Cascade Simulation Library
//!
//! Two scale-free populations of opposite leaning, composed into one
//! network, with an activation cascade that pulls each newly reached agent
//! toward the opinions of its active neighbors.

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod rng;
pub mod setup;
pub mod systems;

pub use components::*;
pub use config::{
    AgentConfig, CascadePolicy, NetworkConfig, OutputConfig, PartitionMode, SelfBelief,
    SimConfig, SimulationConfig,
};
pub use engine::{EngineState, RunSummary, SimulationEngine, StopReason, TickReport};
pub use error::{BuildError, ConfigError, ConfigurationError, OutputError, TopologyError};
pub use rng::{OpinionShape, RandomSource};
pub use setup::{powerlaw_cluster_graph, Network, NetworkBuilder};
pub use systems::{InfluenceBreakdown, InfluenceModel};

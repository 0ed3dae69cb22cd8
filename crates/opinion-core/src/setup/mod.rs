//! Network Setup
//!
//! Agent spawning, power-law subgraph generation and network composition.

pub mod agents;
pub mod network;
pub mod powerlaw;

pub use agents::*;
pub use network::*;
pub use powerlaw::powerlaw_cluster_graph;

//! Components
//!
//! Agent state and the network topology the agents live on.

pub mod agent;
pub mod graph;

pub use agent::*;
pub use graph::*;

//! Shared data contracts for the opinion cascade simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Exporters and renderers consume these types without depending on the engine.

pub mod event;
pub mod polarity;
pub mod snapshot;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

pub use polarity::{ParsePolarityError, Polarity};

// Re-export event types
pub use event::{generate_event_id, ActivationCause, CascadeEvent, CascadeEventType};

// Re-export snapshot types
pub use snapshot::{
    generate_snapshot_id, AgentState, AgentTrace, HistogramSnapshot, RunMetadata, TickSnapshot,
};

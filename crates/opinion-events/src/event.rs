//! Cascade Event Types
//!
//! Records of activation and opinion changes produced by each tick.

use serde::{Deserialize, Serialize};

/// What happened to an agent during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeEventType {
    /// Agent became active and its opinion was updated
    Activated,
    /// Agent became active but kept its opinion (influence below self-belief)
    ActivatedUnchanged,
    /// Already-active agent re-weighted its opinion
    OpinionUpdated,
}

/// Why an agent was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationCause {
    /// Social influence reached the agent's self-belief
    Threshold,
    /// Contact with an active neighbor
    Contact,
}

/// A single change applied by the cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeEvent {
    /// Unique identifier (e.g., "evt_00000042")
    pub event_id: String,
    /// Tick during which the change was applied
    pub tick: u64,
    pub event_type: CascadeEventType,
    /// Agent whose state changed
    pub agent_id: usize,
    /// Active neighbor through which the agent was first reached
    pub source_id: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<ActivationCause>,
    pub opinion_before: f64,
    pub opinion_after: f64,
    /// Combined social influence at evaluation time
    pub influence: f64,
}

impl CascadeEvent {
    /// Opinion shift applied by this event.
    pub fn opinion_delta(&self) -> f64 {
        self.opinion_after - self.opinion_before
    }

    /// Returns true if this event activated the agent.
    pub fn is_activation(&self) -> bool {
        matches!(
            self.event_type,
            CascadeEventType::Activated | CascadeEventType::ActivatedUnchanged
        )
    }

    /// Serializes the event to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}

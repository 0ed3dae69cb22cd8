//! Snapshot Types
//!
//! Serialization structs for per-tick snapshots and run metadata.
//!
//! Snapshots capture the read-only view a renderer needs for one tick:
//! every agent's opinion and activation, the opinion histogram, and an
//! optional trace of a single focus agent.

use serde::{Deserialize, Serialize};

use crate::Polarity;

/// Generates a snapshot ID for the given tick.
pub fn generate_snapshot_id(tick: u64) -> String {
    format!("tick_{:06}", tick)
}

/// State of one agent at a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub agent_id: usize,
    pub opinion: f64,
    pub is_active: bool,
    pub polarity: Polarity,
}

/// Detailed trace of a single agent, including its current social influence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTrace {
    pub agent_id: usize,
    pub opinion: f64,
    pub is_active: bool,
    pub social_influence: f64,
}

/// Equal-width opinion histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSnapshot {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<u32>,
}

impl HistogramSnapshot {
    /// Total number of samples across all bins.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Width of a single bin.
    pub fn bin_width(&self) -> f64 {
        if self.counts.is_empty() {
            0.0
        } else {
            (self.max - self.min) / self.counts.len() as f64
        }
    }
}

/// Complete tick snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub snapshot_id: String,
    pub tick: u64,
    pub active_count: usize,
    pub opinion_min: f64,
    pub opinion_max: f64,
    pub opinion_mean: f64,
    pub histogram: HistogramSnapshot,
    #[serde(default)]
    pub agents: Vec<AgentState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<AgentTrace>,
}

impl TickSnapshot {
    /// Spread between the most positive and most negative opinion.
    pub fn opinion_range(&self) -> f64 {
        self.opinion_max - self.opinion_min
    }

    /// Finds an agent by ID.
    pub fn find_agent(&self, agent_id: usize) -> Option<&AgentState> {
        self.agents.iter().find(|a| a.agent_id == agent_id)
    }

    /// Number of agents currently holding a positive (non-negative) opinion.
    pub fn positive_count(&self) -> usize {
        self.agents
            .iter()
            .filter(|a| Polarity::of(a.opinion) == Polarity::Positive)
            .count()
    }

    /// Serializes the snapshot to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a snapshot from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Summary of how a run was set up and how it ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub seed: u64,
    pub node_count: usize,
    pub edge_count: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub cross_link_count: usize,
    pub max_ticks: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_tick: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> TickSnapshot {
        TickSnapshot {
            snapshot_id: generate_snapshot_id(4),
            tick: 4,
            active_count: 1,
            opinion_min: -0.5,
            opinion_max: 0.75,
            opinion_mean: 0.125,
            histogram: HistogramSnapshot {
                min: -1.0,
                max: 1.0,
                counts: vec![0, 1, 1, 0],
            },
            agents: vec![
                AgentState {
                    agent_id: 0,
                    opinion: 0.75,
                    is_active: true,
                    polarity: Polarity::Positive,
                },
                AgentState {
                    agent_id: 1,
                    opinion: -0.5,
                    is_active: false,
                    polarity: Polarity::Negative,
                },
            ],
            focus: None,
        }
    }

    #[test]
    fn test_snapshot_id_format() {
        assert_eq!(generate_snapshot_id(0), "tick_000000");
        assert_eq!(generate_snapshot_id(42), "tick_000042");
    }

    #[test]
    fn test_snapshot_queries() {
        let snap = snapshot();
        assert!((snap.opinion_range() - 1.25).abs() < 1e-12);
        assert_eq!(snap.positive_count(), 1);
        assert!(snap.find_agent(1).is_some());
        assert!(snap.find_agent(9).is_none());
    }

    #[test]
    fn test_histogram_helpers() {
        let hist = snapshot().histogram;
        assert_eq!(hist.total(), 2);
        assert!((hist.bin_width() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_focus_skipped_when_absent() {
        let line = snapshot().to_jsonl().unwrap();
        assert!(!line.contains("focus"));
        let parsed = TickSnapshot::from_jsonl(&line).unwrap();
        assert_eq!(parsed.tick, 4);
        assert_eq!(parsed.agents.len(), 2);
    }
}

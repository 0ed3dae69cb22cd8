//! Error Types
//!
//! Configuration errors are fatal and surface before any simulation work.
//! Topology misses are recoverable: influence code logs them and carries on.

use thiserror::Error;

use crate::components::AgentId;

/// Invalid construction parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("{side} population size must be positive")]
    EmptyPopulation { side: &'static str },

    #[error("attachment count must be at least 1")]
    ZeroAttachment,

    #[error("attachment count {attachment} exceeds {side} population size {size}")]
    AttachmentExceedsPopulation {
        side: &'static str,
        attachment: usize,
        size: usize,
    },

    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("opinion distribution parameters must be positive and finite (alpha = {alpha}, beta = {beta})")]
    InvalidOpinionShape { alpha: f64, beta: f64 },

    #[error("max_ticks must be at least 1")]
    ZeroTickBudget,

    #[error("histogram needs at least one bin")]
    ZeroHistogramBins,

    #[error("population of {agents} agents does not match a graph of {nodes} nodes")]
    PopulationMismatch { agents: usize, nodes: usize },
}

impl ConfigurationError {
    /// Checks that `value` lies in `[min, max]`, rejecting NaN.
    pub fn check_range(
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    ) -> Result<(), ConfigurationError> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(ConfigurationError::OutOfRange {
                name,
                value,
                min,
                max,
            })
        }
    }
}

/// Graph lookups that reference nodes outside the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("agent {0} is not a node of the network")]
    UnknownNode(AgentId),

    #[error("self-loop on agent {0} is not allowed")]
    SelfLoop(AgentId),
}

/// Errors building the composed network.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("network composition failed: {0}")]
    Topology(#[from] TopologyError),
}

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigurationError),
}

/// Errors writing or reading simulation output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed edge list line {line}: {reason}")]
    MalformedEdge { line: usize, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range() {
        assert!(ConfigurationError::check_range("p", 0.0, 0.0, 1.0).is_ok());
        assert!(ConfigurationError::check_range("p", 1.0, 0.0, 1.0).is_ok());
        assert!(ConfigurationError::check_range("p", 1.01, 0.0, 1.0).is_err());
        assert!(ConfigurationError::check_range("p", f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_messages() {
        let err = ConfigurationError::EmptyPopulation { side: "negative" };
        assert_eq!(err.to_string(), "negative population size must be positive");

        let err = TopologyError::UnknownNode(AgentId(7));
        assert_eq!(err.to_string(), "agent 7 is not a node of the network");
    }
}

//! Configuration System
//!
//! Every parameter of a run is an explicit input: population sizes,
//! network generation, agent initialization, stepping and output. Loaded
//! from TOML so runs can be tuned without recompiling.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, ConfigurationError};
use crate::output::stats::DEFAULT_HISTOGRAM_BINS;
use crate::rng::OpinionShape;

/// Default tuning file path
pub const DEFAULT_CONFIG_PATH: &str = "opinion.toml";

/// How agents are split into the positive and negative populations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PartitionMode {
    /// Opinion sign is assigned at creation; population sizes are exact
    #[default]
    Construction,
    /// Opinions are drawn over [-1, 1] and split by sign afterwards;
    /// side sizes follow the draw
    OpinionSign,
}

/// How self-belief is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelfBelief {
    Fixed { value: f64 },
    Uniform,
}

impl Default for SelfBelief {
    fn default() -> Self {
        SelfBelief::Fixed { value: 0.15 }
    }
}

/// Which neighbors of the active set a tick evaluates, and when they activate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CascadePolicy {
    /// Inactive neighbors activate (and update their opinion) only when
    /// their social influence reaches their self-belief
    #[default]
    ThresholdGated,
    /// Inactive neighbors activate on first contact; any contacted
    /// neighbor updates its opinion when influence reaches self-belief
    ActivateOnContact,
}

/// Network generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Requested size of the positive-leaning population
    pub positive_count: usize,
    /// Requested size of the negative-leaning population
    pub negative_count: usize,
    /// Edges attached per new node (Holme–Kim `m`)
    pub attachment: usize,
    /// Probability of closing a triangle instead of a preferential edge
    pub cluster_prob: f64,
    /// Maximum opinion distance for a cross-population edge, in [0, 2]
    pub cross_link_threshold: f64,
    /// Probability of accepting an eligible cross-population edge
    pub cross_link_prob: f64,
    pub partition: PartitionMode,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            positive_count: 500,
            negative_count: 500,
            attachment: 3,
            cluster_prob: 0.5,
            cross_link_threshold: 0.2,
            cross_link_prob: 0.1,
            partition: PartitionMode::OpinionSign,
        }
    }
}

impl NetworkConfig {
    /// Rejects sizes and rates that cannot produce a network.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.positive_count == 0 {
            return Err(ConfigurationError::EmptyPopulation { side: "positive" });
        }
        if self.negative_count == 0 {
            return Err(ConfigurationError::EmptyPopulation { side: "negative" });
        }
        if self.attachment == 0 {
            return Err(ConfigurationError::ZeroAttachment);
        }
        // Sign-split sides shrink `m` to fit instead.
        if self.partition == PartitionMode::Construction {
            for (side, size) in [
                ("positive", self.positive_count),
                ("negative", self.negative_count),
            ] {
                if self.attachment > size {
                    return Err(ConfigurationError::AttachmentExceedsPopulation {
                        side,
                        attachment: self.attachment,
                        size,
                    });
                }
            }
        }
        ConfigurationError::check_range("cluster_prob", self.cluster_prob, 0.0, 1.0)?;
        ConfigurationError::check_range(
            "cross_link_threshold",
            self.cross_link_threshold,
            0.0,
            2.0,
        )?;
        ConfigurationError::check_range("cross_link_prob", self.cross_link_prob, 0.0, 1.0)?;
        Ok(())
    }
}

/// Agent initialization parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Probability that an agent starts active
    pub activation_rate: f64,
    pub opinion_alpha: f64,
    pub opinion_beta: f64,
    /// Blend weight between opinion similarity and network status
    pub social_influence_factor: f64,
    pub self_belief: SelfBelief,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            activation_rate: 0.005,
            opinion_alpha: 0.4,
            opinion_beta: 0.4,
            social_influence_factor: 0.2,
            self_belief: SelfBelief::Uniform,
        }
    }
}

impl AgentConfig {
    pub fn opinion_shape(&self) -> Result<OpinionShape, ConfigurationError> {
        OpinionShape::new(self.opinion_alpha, self.opinion_beta)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        ConfigurationError::check_range("activation_rate", self.activation_rate, 0.0, 1.0)?;
        ConfigurationError::check_range(
            "social_influence_factor",
            self.social_influence_factor,
            0.0,
            1.0,
        )?;
        if let SelfBelief::Fixed { value } = self.self_belief {
            ConfigurationError::check_range("self_belief", value, 0.0, 1.0)?;
        }
        self.opinion_shape()?;
        Ok(())
    }
}

/// Stepping and termination parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Hard tick budget; the run always stops once reached
    pub max_ticks: u64,
    /// Stop early once max(opinion) - min(opinion) drops below this.
    /// Absent from a config file means no convergence stop.
    #[serde(default)]
    pub convergence_epsilon: Option<f64>,
    pub cascade: CascadePolicy,
    /// Agent traced in every snapshot; absent means no trace
    #[serde(default)]
    pub focus_agent: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_ticks: 100,
            convergence_epsilon: Some(0.1),
            cascade: CascadePolicy::ActivateOnContact,
            focus_agent: Some(0),
        }
    }
}

/// Output parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
    pub histogram_bins: usize,
    pub write_edge_list: bool,
    pub write_snapshots: bool,
    pub write_events: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "output".to_string(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            write_edge_list: true,
            write_snapshots: true,
            write_events: true,
        }
    }
}

/// Top-level configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub agents: AgentConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_seed() -> u64 {
    42
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::mixed()
    }
}

impl SimConfig {
    /// Two fixed-sign populations of 50 with strongly skewed opinions,
    /// no cross-links and a threshold-gated cascade over 50 ticks.
    pub fn polarized() -> Self {
        Self {
            seed: default_seed(),
            network: NetworkConfig {
                positive_count: 50,
                negative_count: 50,
                attachment: 5,
                cluster_prob: 0.5,
                cross_link_threshold: 0.2,
                cross_link_prob: 0.0,
                partition: PartitionMode::Construction,
            },
            agents: AgentConfig {
                activation_rate: 0.3,
                opinion_alpha: 0.2,
                opinion_beta: 0.8,
                social_influence_factor: 0.6,
                self_belief: SelfBelief::Fixed { value: 0.15 },
            },
            simulation: SimulationConfig {
                max_ticks: 50,
                convergence_epsilon: None,
                cascade: CascadePolicy::ThresholdGated,
                focus_agent: Some(0),
            },
            output: OutputConfig::default(),
        }
    }

    /// A population of 1000 split by opinion sign, cross-linked by
    /// opinion proximity, with contact activation and a convergence stop.
    pub fn mixed() -> Self {
        Self {
            seed: default_seed(),
            network: NetworkConfig::default(),
            agents: AgentConfig::default(),
            simulation: SimulationConfig::default(),
            output: OutputConfig::default(),
        }
    }

    /// Looks up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "polarized" => Some(Self::polarized()),
            "mixed" => Some(Self::mixed()),
            _ => None,
        }
    }

    /// Loads and validates configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks every parameter before any simulation work begins.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.network.validate()?;
        self.agents.validate()?;

        if self.simulation.max_ticks == 0 {
            return Err(ConfigurationError::ZeroTickBudget);
        }
        if let Some(epsilon) = self.simulation.convergence_epsilon {
            ConfigurationError::check_range("convergence_epsilon", epsilon, 0.0, 2.0)?;
        }
        if self.output.histogram_bins == 0 {
            return Err(ConfigurationError::ZeroHistogramBins);
        }
        Ok(())
    }
}

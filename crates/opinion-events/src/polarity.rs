//! Opinion polarity.
//!
//! Which of the two seed populations an agent belongs to.
//!
//! ```
//! use opinion_events::Polarity;
//!
//! assert_eq!(Polarity::of(0.0), Polarity::Positive);
//! assert_eq!(Polarity::of(-0.3), Polarity::Negative);
//! assert_eq!("neg".parse::<Polarity>().unwrap(), Polarity::Negative);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Polarity of an agent's seed population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    /// Classifies an opinion by sign. Zero counts as positive.
    pub fn of(opinion: f64) -> Self {
        if opinion >= 0.0 {
            Polarity::Positive
        } else {
            Polarity::Negative
        }
    }

    /// Sign multiplier for this polarity.
    pub fn sign(self) -> f64 {
        match self {
            Polarity::Positive => 1.0,
            Polarity::Negative => -1.0,
        }
    }

    /// Short label used in exports.
    pub fn label(self) -> &'static str {
        match self {
            Polarity::Positive => "pos",
            Polarity::Negative => "neg",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Error parsing a polarity label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePolarityError(pub String);

impl fmt::Display for ParsePolarityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid polarity: {}", self.0)
    }
}

impl std::error::Error for ParsePolarityError {}

impl FromStr for Polarity {
    type Err = ParsePolarityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pos" | "positive" => Ok(Polarity::Positive),
            "neg" | "negative" => Ok(Polarity::Negative),
            _ => Err(ParsePolarityError(s.to_string())),
        }
    }
}

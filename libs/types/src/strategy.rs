//! Trader behaviour profiles
//!
//! Each strategy maps to a fixed parameter pair; nothing is learned.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Constant behaviour parameters of a strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    /// Probability of trading on a given day
    pub trade_chance: f64,
    /// Fraction of the relevant holding used as the base trade size
    pub trade_size_fraction: f64,
}

/// Trader strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Rare, small trades
    Passive,
    #[default]
    Moderate,
    /// Frequent, small trades
    Active,
    /// Rare, large trades
    Whale,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Passive,
        Strategy::Moderate,
        Strategy::Active,
        Strategy::Whale,
    ];

    pub fn params(&self) -> StrategyParams {
        match self {
            Strategy::Passive => StrategyParams { trade_chance: 0.10, trade_size_fraction: 0.10 },
            Strategy::Moderate => StrategyParams { trade_chance: 0.30, trade_size_fraction: 0.25 },
            Strategy::Active => StrategyParams { trade_chance: 0.60, trade_size_fraction: 0.15 },
            Strategy::Whale => StrategyParams { trade_chance: 0.20, trade_size_fraction: 0.50 },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Passive => "passive",
            Strategy::Moderate => "moderate",
            Strategy::Active => "active",
            Strategy::Whale => "whale",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown strategy: {s}"))
    }
}

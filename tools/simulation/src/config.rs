//! Simulation configuration
//!
//! Every section has defaults matching the reference economy (10 000 DAI /
//! 100 000 CLNDAI seed, 0.3% fees, 5% staking entry fee), so a partial JSON
//! document only needs to name what it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use types::fee::{FeeSchedule, DEFAULT_POOL_FEE_PCT, DEFAULT_STAKE_FEE_RATE};

/// Configuration load/validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Initial pool seed and fee schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Initial asset A (DAI) reserve
    pub reserve_a: f64,
    /// Initial asset B (CLNDAI) reserve
    pub reserve_b: f64,
    /// Buy fee in percent
    pub buy_fee_pct: f64,
    /// Sell fee in percent
    pub sell_fee_pct: f64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            reserve_a: 10_000.0,
            reserve_b: 100_000.0,
            buy_fee_pct: DEFAULT_POOL_FEE_PCT,
            sell_fee_pct: DEFAULT_POOL_FEE_PCT,
        }
    }
}

impl PoolConfig {
    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            buy_fee_pct: self.buy_fee_pct,
            sell_fee_pct: self.sell_fee_pct,
        }
    }
}

/// Market simulator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Seed for the simulator's random source
    pub seed: u64,
    /// Populate the roster with the ten default traders on construction/reset
    pub seed_default_roster: bool,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            seed_default_roster: true,
        }
    }
}

/// Staking protocol settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StakeConfig {
    /// Entry fee as a fraction of the gross deposit
    pub fee_rate: f64,
}

impl Default for StakeConfig {
    fn default() -> Self {
        Self {
            fee_rate: DEFAULT_STAKE_FEE_RATE,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub pool: PoolConfig,
    pub market: MarketConfig,
    pub stake: StakeConfig,
}

impl SimulationConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("pool.reserve_a", self.pool.reserve_a),
            ("pool.reserve_b", self.pool.reserve_b),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("reserve must be positive, got {value}"),
                });
            }
        }

        self.pool
            .fee_schedule()
            .validate()
            .map_err(|e| ConfigError::Invalid {
                field: "pool.fees",
                reason: e.to_string(),
            })?;

        let rate = self.stake.fee_rate;
        if !rate.is_finite() || !(0.0..1.0).contains(&rate) {
            return Err(ConfigError::Invalid {
                field: "stake.fee_rate",
                reason: format!("must be within [0, 1), got {rate}"),
            });
        }
        Ok(())
    }
}

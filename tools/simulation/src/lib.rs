//! Tokenomics Simulation Framework
//!
//! Models a constant-product AMM pool traded by a roster of strategy-driven
//! participants, values everyone's exit under joint liquidation, and runs a
//! rating-based staking protocol with scripted comparison scenarios.
//!
//! # Modules
//! - `config`: Serde-backed simulation settings with validation
//! - `rng`: Random source trait, seeded and scripted implementations
//! - `pool`: Constant-product pool with asymmetric buy/sell fees
//! - `market`: Traders, day stepping and daily snapshots
//! - `settlement`: Sequential joint liquidation and pool statistics
//! - `stake`: Rating-weighted staking pool
//! - `scenarios`: Scripted staking presets and comparison runner
//! - `metrics`: Trade counters aggregated from the trade log
//! - `reports`: Crowding and profitability reports
//! - `replay`: Trade log and deterministic replay validation
//! - `export`: Metrics and report JSON export

pub mod config;
pub mod export;
pub mod market;
pub mod metrics;
pub mod pool;
pub mod replay;
pub mod reports;
pub mod rng;
pub mod scenarios;
pub mod settlement;
pub mod stake;

/// Crate version constant
pub const VERSION: &str = "1.0.0";

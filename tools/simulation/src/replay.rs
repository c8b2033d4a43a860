//! Trade log and deterministic replay validation
//!
//! The same config and seed reproduce the same market. A recorded trade log
//! fed back through a fresh pool reproduces the same reserves and balances.

use crate::config::SimulationConfig;
use crate::market::MarketSimulator;
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};
use tracing::debug;
use types::errors::EngineError;
use types::ids::ParticipantId;
use types::trade::{Side, TradeRecord};

/// Balances of one participant at capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub id: ParticipantId,
    pub balance_a: f64,
    pub balance_b: f64,
}

/// A snapshot of market state for comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub reserve_a: f64,
    pub reserve_b: f64,
    pub invariant_k: f64,
    pub trade_count: usize,
    pub total_fees: f64,
    pub total_volume: f64,
    pub balances: Vec<BalanceSnapshot>,
}

/// Capture a snapshot of the simulator state.
pub fn capture_snapshot<R: RandomSource>(sim: &MarketSimulator<R>) -> MarketSnapshot {
    let pool = sim.pool();
    MarketSnapshot {
        reserve_a: pool.reserve_a(),
        reserve_b: pool.reserve_b(),
        invariant_k: pool.invariant_k(),
        trade_count: pool.trade_count(),
        total_fees: pool.total_fees(),
        total_volume: pool.total_volume(),
        balances: sim
            .roster()
            .iter()
            .map(|t| BalanceSnapshot {
                id: t.id,
                balance_a: t.balance_a,
                balance_b: t.balance_b,
            })
            .collect(),
    }
}

/// Build a seeded simulator from `config`, step `days` and snapshot it.
pub fn run_and_snapshot(config: SimulationConfig, days: u32) -> Result<MarketSnapshot, EngineError> {
    let mut sim = MarketSimulator::new(config)?;
    sim.step_days(days);
    Ok(capture_snapshot(&sim))
}

/// Feed a trade log into a fresh simulator built from `config`.
///
/// Participants are matched by id, so the log must come from a simulator
/// whose roster was built the same way.
pub fn replay_trades(config: SimulationConfig, trades: &[TradeRecord]) -> Result<MarketSnapshot, EngineError> {
    let mut sim = MarketSimulator::new(config)?;
    for trade in trades {
        match trade.side {
            Side::BUY => sim.execute_buy(trade.participant_id, trade.amount_in)?,
            Side::SELL => sim.execute_sell(trade.participant_id, trade.amount_in)?,
        };
    }
    debug!(trades = trades.len(), "trade log replayed");
    Ok(capture_snapshot(&sim))
}

/// Result of replay validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayValidation {
    pub matches: bool,
    pub original: MarketSnapshot,
    pub replayed: MarketSnapshot,
}

/// Re-run `days` from `config` and compare against `expected`.
pub fn validate_replay(
    config: SimulationConfig,
    days: u32,
    expected: &MarketSnapshot,
) -> Result<ReplayValidation, EngineError> {
    let replayed = run_and_snapshot(config, days)?;
    Ok(ReplayValidation {
        matches: replayed == *expected,
        original: expected.clone(),
        replayed,
    })
}

/// Replay a trade log and compare against `expected`.
pub fn validate_trade_log(
    config: SimulationConfig,
    trades: &[TradeRecord],
    expected: &MarketSnapshot,
) -> Result<ReplayValidation, EngineError> {
    let replayed = replay_trades(config, trades)?;
    Ok(ReplayValidation {
        matches: replayed == *expected,
        original: expected.clone(),
        replayed,
    })
}

/// Export trade log as JSON.
pub fn export_trade_log(trades: &[TradeRecord]) -> String {
    serde_json::to_string_pretty(trades).unwrap_or_default()
}

/// Import trade log from JSON.
pub fn import_trade_log(json: &str) -> Result<Vec<TradeRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

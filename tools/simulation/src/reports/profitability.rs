//! Profitability report
//!
//! Per-participant cash flow, fees and P/L under both exit valuations.

use crate::market::Trader;
use crate::pool::PoolEngine;
use crate::settlement::SettlementValuator;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use types::ids::ParticipantId;
use types::strategy::Strategy;
use types::trade::{Side, TradeRecord};

/// Per-participant profitability record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantProfit {
    pub id: ParticipantId,
    pub name: String,
    pub strategy: Strategy,
    pub initial_balance_a: f64,
    pub total_spent: f64,
    pub total_received: f64,
    pub buy_count: u64,
    pub sell_count: u64,
    pub fees_paid: f64,
    pub joint_pl: f64,
    pub alone_pl: f64,
}

/// Aggregated profitability report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityReport {
    pub participants: Vec<ParticipantProfit>,
    pub total_spent: f64,
    pub total_received: f64,
    pub total_fees_collected: f64,
    /// Sum of joint P/L
    pub realized_total_pl: f64,
    /// Name of the participant with the best joint P/L
    pub best_performer: Option<String>,
}

#[derive(Debug, Default)]
struct TradeAccum {
    buys: u64,
    sells: u64,
    fees: f64,
}

fn accumulate(trades: &[TradeRecord]) -> HashMap<ParticipantId, TradeAccum> {
    let mut accounts: HashMap<ParticipantId, TradeAccum> = HashMap::new();
    for trade in trades {
        let acc = accounts.entry(trade.participant_id).or_default();
        match trade.side {
            Side::BUY => acc.buys += 1,
            Side::SELL => acc.sells += 1,
        }
        acc.fees += trade.fee;
    }
    accounts
}

/// Generate a profitability report for the roster.
pub fn analyze(pool: &PoolEngine, roster: &[Trader]) -> ProfitabilityReport {
    let valuator = SettlementValuator::new(pool);
    let joint: HashMap<ParticipantId, f64> = valuator
        .valuate_all(roster)
        .into_iter()
        .map(|o| (o.id, o.pl))
        .collect();
    let trades = accumulate(pool.trades());

    let participants: Vec<ParticipantProfit> = roster
        .iter()
        .map(|t| {
            let acc = trades.get(&t.id);
            ParticipantProfit {
                id: t.id,
                name: t.name.clone(),
                strategy: t.strategy,
                initial_balance_a: t.initial_balance_a,
                total_spent: t.total_spent,
                total_received: t.total_received,
                buy_count: acc.map_or(0, |a| a.buys),
                sell_count: acc.map_or(0, |a| a.sells),
                fees_paid: acc.map_or(0.0, |a| a.fees),
                joint_pl: joint.get(&t.id).copied().unwrap_or(0.0),
                alone_pl: valuator.alone_pl(t),
            }
        })
        .collect();

    let best_performer = participants
        .iter()
        .max_by(|a, b| a.joint_pl.total_cmp(&b.joint_pl))
        .map(|p| p.name.clone());

    ProfitabilityReport {
        total_spent: participants.iter().map(|p| p.total_spent).sum(),
        total_received: participants.iter().map(|p| p.total_received).sum(),
        total_fees_collected: pool.total_fees(),
        realized_total_pl: participants.iter().map(|p| p.joint_pl).sum(),
        best_performer,
        participants,
    }
}

/// Export profitability report as JSON.
pub fn export_json(pool: &PoolEngine, roster: &[Trader]) -> String {
    serde_json::to_string_pretty(&analyze(pool, roster)).unwrap_or_default()
}

//! Crowding report
//!
//! For every participant compares three exit values for its asset B:
//! marked at the spot price, sold alone into the current pool, and sold as
//! part of the joint liquidation. Slippage is the gap between spot and the
//! alone sale; crowding is the further loss from selling behind others.

use crate::market::Trader;
use crate::pool::PoolEngine;
use crate::settlement::SettlementValuator;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use types::ids::ParticipantId;

/// Slippage record for a single participant. Values are asset A.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlippageRecord {
    pub id: ParticipantId,
    pub name: String,
    pub balance_b: f64,
    /// `balance_b * price`
    pub spot_proceeds: f64,
    pub alone_proceeds: f64,
    pub joint_proceeds: f64,
    /// `(spot - alone) / spot * 100`, `0` for an empty holding
    pub slippage_pct: f64,
    /// `alone - joint`
    pub crowding_loss: f64,
    pub alone_pl: f64,
    pub joint_pl: f64,
}

/// Aggregated crowding statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlippageReport {
    pub price: f64,
    pub records: Vec<SlippageRecord>,
    pub total_spot_proceeds: f64,
    pub total_alone_proceeds: f64,
    pub total_joint_proceeds: f64,
    /// Mean over holders only
    pub mean_slippage_pct: f64,
    pub max_slippage_pct: f64,
    pub holders_analyzed: usize,
}

fn slippage_pct(spot: f64, alone: f64) -> f64 {
    if spot > 0.0 {
        (spot - alone) / spot * 100.0
    } else {
        0.0
    }
}

/// Build the crowding report for the roster against the pool's current state.
pub fn analyze(pool: &PoolEngine, roster: &[Trader]) -> SlippageReport {
    let price = pool.current_price();
    let valuator = SettlementValuator::new(pool);
    let joint: HashMap<ParticipantId, (f64, f64)> = valuator
        .valuate_all(roster)
        .into_iter()
        .map(|o| (o.id, (o.amount_received, o.pl)))
        .collect();

    let records: Vec<SlippageRecord> = roster
        .iter()
        .map(|t| {
            let spot = t.balance_b * price;
            let alone = valuator.valuate_alone(t);
            let (joint_proceeds, joint_pl) = joint
                .get(&t.id)
                .copied()
                .unwrap_or((0.0, t.balance_a - t.initial_balance_a));
            SlippageRecord {
                id: t.id,
                name: t.name.clone(),
                balance_b: t.balance_b,
                spot_proceeds: spot,
                alone_proceeds: alone,
                joint_proceeds,
                slippage_pct: slippage_pct(spot, alone),
                crowding_loss: alone - joint_proceeds,
                alone_pl: t.balance_a + alone - t.initial_balance_a,
                joint_pl,
            }
        })
        .collect();

    let holders: Vec<&SlippageRecord> = records.iter().filter(|r| r.balance_b > 0.0).collect();
    let mean_slippage_pct = if holders.is_empty() {
        0.0
    } else {
        holders.iter().map(|r| r.slippage_pct).sum::<f64>() / holders.len() as f64
    };
    let max_slippage_pct = holders.iter().map(|r| r.slippage_pct).fold(0.0, f64::max);

    SlippageReport {
        price,
        total_spot_proceeds: records.iter().map(|r| r.spot_proceeds).sum(),
        total_alone_proceeds: records.iter().map(|r| r.alone_proceeds).sum(),
        total_joint_proceeds: records.iter().map(|r| r.joint_proceeds).sum(),
        mean_slippage_pct,
        max_slippage_pct,
        holders_analyzed: holders.len(),
        records,
    }
}

/// Export crowding report as JSON.
pub fn export_json(pool: &PoolEngine, roster: &[Trader]) -> String {
    serde_json::to_string_pretty(&analyze(pool, roster)).unwrap_or_default()
}

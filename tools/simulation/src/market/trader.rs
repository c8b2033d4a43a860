//! Market participant state

use serde::{Deserialize, Serialize};
use types::ids::ParticipantId;
use types::strategy::{Strategy, StrategyParams};

/// Minimum asset A holding for a trader to consider buying
pub const MIN_BUY_BALANCE: f64 = 10.0;
/// Buys smaller than this are dropped as dust
pub const MIN_BUY_SIZE: f64 = 1.0;
/// Sells smaller than this are dropped as dust
pub const MIN_SELL_SIZE: f64 = 0.1;
/// A single trade never uses more than this share of the holding
pub const MAX_TRADE_SHARE: f64 = 0.9;

/// A trader on the AMM.
///
/// Balances only move through [`crate::pool::PoolEngine`] executions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trader {
    pub id: ParticipantId,
    pub name: String,
    /// Spendable asset A (DAI)
    pub balance_a: f64,
    /// Held asset B (CLNDAI)
    pub balance_b: f64,
    /// Starting asset A, the P/L baseline
    pub initial_balance_a: f64,
    pub total_spent: f64,
    pub total_received: f64,
    pub strategy: Strategy,
}

impl Trader {
    pub fn new(id: ParticipantId, name: impl Into<String>, balance_a: f64, strategy: Strategy) -> Self {
        Self {
            id,
            name: name.into(),
            balance_a,
            balance_b: 0.0,
            initial_balance_a: balance_a,
            total_spent: 0.0,
            total_received: 0.0,
            strategy,
        }
    }

    pub fn params(&self) -> StrategyParams {
        self.strategy.params()
    }

    pub fn can_buy(&self) -> bool {
        self.balance_a > MIN_BUY_BALANCE
    }

    pub fn can_sell(&self) -> bool {
        self.balance_b > 0.0
    }

    /// Value at the spot price, ignoring slippage and fees
    pub fn spot_value(&self, price: f64) -> f64 {
        self.balance_a + self.balance_b * price
    }
}

/// Default seed roster: (name, starting DAI, strategy)
pub const DEFAULT_ROSTER: [(&str, f64, Strategy); 10] = [
    ("Whale_Alex", 50_000.0, Strategy::Whale),
    ("Whale_Boris", 30_000.0, Strategy::Whale),
    ("Active_Vika", 5_000.0, Strategy::Active),
    ("Active_Gena", 8_000.0, Strategy::Active),
    ("Moderate_Dasha", 3_000.0, Strategy::Moderate),
    ("Moderate_Evgen", 4_000.0, Strategy::Moderate),
    ("Moderate_Zhenya", 2_500.0, Strategy::Moderate),
    ("Passive_Zina", 10_000.0, Strategy::Passive),
    ("Passive_Igor", 15_000.0, Strategy::Passive),
    ("Newcomer_Katya", 1_000.0, Strategy::Moderate),
];

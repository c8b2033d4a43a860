//! Trading metrics for simulation
//!
//! Trade counts, buy/sell split, volume, fees and the price range, built
//! from the pool's trade log.

use crate::market::StepSummary;
use serde::{Deserialize, Serialize};
use types::trade::{Side, TradeRecord};

/// Aggregated simulation metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimMetrics {
    pub total_trades: u64,
    pub buy_count: u64,
    pub sell_count: u64,
    pub rejected_trades: u64,
    pub days_run: u32,
    /// Asset A spent on buys
    pub buy_volume_a: f64,
    /// Asset A paid out on sells
    pub sell_volume_a: f64,
    pub total_fees: f64,
    /// Price after the first recorded trade
    pub first_price: Option<f64>,
    pub last_price: Option<f64>,
    pub high_price: Option<f64>,
    pub low_price: Option<f64>,
}

impl SimMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build metrics from a trade log.
    pub fn from_trades(trades: &[TradeRecord]) -> Self {
        let mut metrics = Self::new();
        metrics.ingest_trades(trades);
        metrics
    }

    /// Record a single trade into metrics.
    pub fn record_trade(&mut self, trade: &TradeRecord) {
        self.total_trades += 1;
        match trade.side {
            Side::BUY => {
                self.buy_count += 1;
                self.buy_volume_a += trade.amount_in;
            }
            Side::SELL => {
                self.sell_count += 1;
                self.sell_volume_a += trade.amount_out;
            }
        }
        self.total_fees += trade.fee;

        let price = trade.pool_after.price();
        if self.first_price.is_none() {
            self.first_price = Some(price);
        }
        self.last_price = Some(price);
        self.high_price = Some(self.high_price.map_or(price, |p| p.max(price)));
        self.low_price = Some(self.low_price.map_or(price, |p| p.min(price)));
    }

    pub fn ingest_trades(&mut self, trades: &[TradeRecord]) {
        for trade in trades {
            self.record_trade(trade);
        }
    }

    /// Fold in day counts and rejections from a stepping run.
    pub fn record_step(&mut self, summary: &StepSummary) {
        self.days_run += summary.days_run;
        self.rejected_trades += summary.trades_rejected;
    }

    /// Total volume in asset A terms.
    pub fn total_volume_a(&self) -> f64 {
        self.buy_volume_a + self.sell_volume_a
    }

    /// Buys as a fraction of all trades, `0` with no trades.
    pub fn buy_ratio(&self) -> f64 {
        if self.total_trades == 0 {
            return 0.0;
        }
        self.buy_count as f64 / self.total_trades as f64
    }

    pub fn trades_per_day(&self) -> f64 {
        if self.days_run == 0 {
            return 0.0;
        }
        self.total_trades as f64 / self.days_run as f64
    }

    /// Build a summary string.
    pub fn summary(&self) -> String {
        format!(
            "Trades: {} (buy {} / sell {}) | Rejected: {} | Volume: {:.2} | Fees: {:.4} | Days: {}",
            self.total_trades,
            self.buy_count,
            self.sell_count,
            self.rejected_trades,
            self.total_volume_a(),
            self.total_fees,
            self.days_run,
        )
    }
}

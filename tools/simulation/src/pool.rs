//! Constant-product AMM pool
//!
//! `reserve_a * reserve_b = k` with asset A (DAI) as the cash side and asset B
//! (CLNDAI) as the traded token. Buys pay their fee out of the DAI input
//! before it reaches the curve; sells pay theirs out of the DAI the curve
//! releases. Fees leave the pool, so the reserve product stays at the `k`
//! fixed by the last reset.

use crate::market::Trader;
use serde::{Deserialize, Serialize};
use tracing::debug;
use types::errors::{validate_positive, PoolError};
use types::fee::FeeSchedule;
use types::trade::{PoolState, Side, TradeRecord};

/// Cash asset symbol
pub const ASSET_A: &str = "DAI";
/// Traded token symbol
pub const ASSET_B: &str = "CLNDAI";

/// Result of pricing a trade against the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub side: Side,
    pub amount_in: f64,
    pub amount_out: f64,
    pub fee: f64,
    pub effective_price: f64,
    pub projected_reserve_a: f64,
    pub projected_reserve_b: f64,
}

impl Quote {
    pub fn projected_state(&self) -> PoolState {
        PoolState {
            reserve_a: self.projected_reserve_a,
            reserve_b: self.projected_reserve_b,
        }
    }
}

/// Reserve pair plus the invariant it trades along.
///
/// Value type: the settlement valuator copies it and walks the copy forward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reserves {
    pub reserve_a: f64,
    pub reserve_b: f64,
    pub invariant_k: f64,
}

impl Reserves {
    /// Seed reserves and fix `k = a * b`.
    pub fn new(reserve_a: f64, reserve_b: f64) -> Result<Self, PoolError> {
        let reserves = Self {
            reserve_a,
            reserve_b,
            invariant_k: reserve_a * reserve_b,
        };
        reserves.ensure_tradable()?;
        Ok(reserves)
    }

    pub fn price(&self) -> f64 {
        self.state().price()
    }

    pub fn state(&self) -> PoolState {
        PoolState {
            reserve_a: self.reserve_a,
            reserve_b: self.reserve_b,
        }
    }

    fn ensure_tradable(&self) -> Result<(), PoolError> {
        let healthy = |v: f64| v.is_finite() && v > 0.0;
        if healthy(self.reserve_a) && healthy(self.reserve_b) && healthy(self.invariant_k) {
            Ok(())
        } else {
            Err(self.degenerate())
        }
    }

    fn degenerate(&self) -> PoolError {
        PoolError::DegenerateState {
            reserve_a: self.reserve_a,
            reserve_b: self.reserve_b,
        }
    }

    /// Price a DAI -> CLNDAI trade. Pure.
    pub fn quote_buy(&self, amount_in: f64, fees: &FeeSchedule) -> Result<Quote, PoolError> {
        let amount_in = validate_positive(amount_in)?;
        self.ensure_tradable()?;

        let fee = fees.buy_fee(amount_in);
        let net_in = amount_in - fee;
        let new_reserve_a = self.reserve_a + net_in;
        let new_reserve_b = self.invariant_k / new_reserve_a;
        let amount_out = self.reserve_b - new_reserve_b;

        if !(amount_out > 0.0 && new_reserve_b > 0.0) {
            return Err(self.degenerate());
        }

        Ok(Quote {
            side: Side::BUY,
            amount_in,
            amount_out,
            fee,
            effective_price: amount_in / amount_out,
            projected_reserve_a: new_reserve_a,
            projected_reserve_b: new_reserve_b,
        })
    }

    /// Price a CLNDAI -> DAI trade. Pure.
    pub fn quote_sell(&self, amount_in: f64, fees: &FeeSchedule) -> Result<Quote, PoolError> {
        let amount_in = validate_positive(amount_in)?;
        self.ensure_tradable()?;

        let new_reserve_b = self.reserve_b + amount_in;
        let new_reserve_a = self.invariant_k / new_reserve_b;
        let gross_out = self.reserve_a - new_reserve_a;

        if !(gross_out > 0.0 && new_reserve_a > 0.0) {
            return Err(self.degenerate());
        }

        let fee = fees.sell_fee(gross_out);
        let amount_out = gross_out - fee;

        Ok(Quote {
            side: Side::SELL,
            amount_in,
            amount_out,
            fee,
            effective_price: amount_out / amount_in,
            projected_reserve_a: new_reserve_a,
            projected_reserve_b: new_reserve_b,
        })
    }

    /// Commit a quote's projected reserves. `k` is left alone.
    pub fn apply(&mut self, quote: &Quote) {
        self.reserve_a = quote.projected_reserve_a;
        self.reserve_b = quote.projected_reserve_b;
    }
}

/// The AMM pool with fee configuration, counters and trade log.
#[derive(Debug, Clone)]
pub struct PoolEngine {
    reserves: Reserves,
    initial: PoolState,
    fees: FeeSchedule,
    total_fees: f64,
    total_volume: f64,
    trades: Vec<TradeRecord>,
    sequence: u64,
}

impl PoolEngine {
    pub fn new(reserve_a: f64, reserve_b: f64, fees: FeeSchedule) -> Result<Self, PoolError> {
        fees.validate()?;
        let reserves = Reserves::new(reserve_a, reserve_b)?;
        Ok(Self {
            initial: reserves.state(),
            reserves,
            fees,
            total_fees: 0.0,
            total_volume: 0.0,
            trades: Vec::new(),
            sequence: 0,
        })
    }

    pub fn reserves(&self) -> Reserves {
        self.reserves
    }

    pub fn reserve_a(&self) -> f64 {
        self.reserves.reserve_a
    }

    pub fn reserve_b(&self) -> f64 {
        self.reserves.reserve_b
    }

    pub fn invariant_k(&self) -> f64 {
        self.reserves.invariant_k
    }

    /// Reserves as seeded by the last reset.
    pub fn initial_state(&self) -> PoolState {
        self.initial
    }

    pub fn current_price(&self) -> f64 {
        self.reserves.price()
    }

    pub fn fees(&self) -> FeeSchedule {
        self.fees
    }

    pub fn set_fees(&mut self, buy_fee_pct: f64, sell_fee_pct: f64) -> Result<(), PoolError> {
        self.fees = FeeSchedule::new(buy_fee_pct, sell_fee_pct)?;
        Ok(())
    }

    /// Cumulative fees, all denominated in asset A.
    pub fn total_fees(&self) -> f64 {
        self.total_fees
    }

    /// Cumulative asset A volume (DAI in for buys, DAI out for sells).
    pub fn total_volume(&self) -> f64 {
        self.total_volume
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    pub fn quote_buy(&self, amount_in: f64) -> Result<Quote, PoolError> {
        self.reserves.quote_buy(amount_in, &self.fees)
    }

    pub fn quote_sell(&self, amount_in: f64) -> Result<Quote, PoolError> {
        self.reserves.quote_sell(amount_in, &self.fees)
    }

    /// Spend `amount` of the trader's asset A on asset B.
    pub fn execute_buy(&mut self, trader: &mut Trader, amount: f64, day: u32) -> Result<Quote, PoolError> {
        if trader.balance_a < amount {
            return Err(PoolError::InsufficientBalance {
                asset: ASSET_A.to_string(),
                required: amount,
                available: trader.balance_a,
            });
        }
        let quote = self.quote_buy(amount)?;

        trader.balance_a -= amount;
        trader.balance_b += quote.amount_out;
        trader.total_spent += amount;

        self.total_volume += amount;
        self.commit(trader, quote, day);
        Ok(quote)
    }

    /// Sell `amount` of the trader's asset B for asset A.
    pub fn execute_sell(&mut self, trader: &mut Trader, amount: f64, day: u32) -> Result<Quote, PoolError> {
        if trader.balance_b < amount {
            return Err(PoolError::InsufficientBalance {
                asset: ASSET_B.to_string(),
                required: amount,
                available: trader.balance_b,
            });
        }
        let quote = self.quote_sell(amount)?;

        trader.balance_b -= amount;
        trader.balance_a += quote.amount_out;
        trader.total_received += quote.amount_out;

        self.total_volume += quote.amount_out;
        self.commit(trader, quote, day);
        Ok(quote)
    }

    fn commit(&mut self, trader: &Trader, quote: Quote, day: u32) {
        self.reserves.apply(&quote);
        self.total_fees += quote.fee;
        self.sequence += 1;

        debug!(
            day,
            participant = %trader.id,
            side = quote.side.as_str(),
            amount_in = quote.amount_in,
            amount_out = quote.amount_out,
            fee = quote.fee,
            price = self.current_price(),
            "trade executed"
        );

        self.trades.push(TradeRecord {
            sequence: self.sequence,
            day,
            participant_id: trader.id,
            participant_name: trader.name.clone(),
            side: quote.side,
            amount_in: quote.amount_in,
            amount_out: quote.amount_out,
            effective_price: quote.effective_price,
            fee: quote.fee,
            pool_after: self.reserves.state(),
        });
    }

    /// Reseed reserves and recompute `k`. Counters and trade log are kept.
    pub fn reset_pool(&mut self, reserve_a: f64, reserve_b: f64) -> Result<(), PoolError> {
        self.reserves = Reserves::new(reserve_a, reserve_b)?;
        self.initial = self.reserves.state();
        debug!(reserve_a, reserve_b, "pool reset");
        Ok(())
    }

    /// Drop counters and trade log.
    pub fn clear_history(&mut self) {
        self.total_fees = 0.0;
        self.total_volume = 0.0;
        self.trades.clear();
        self.sequence = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::ParticipantId;
    use types::strategy::Strategy;

    fn test_pool() -> PoolEngine {
        PoolEngine::new(10_000.0, 100_000.0, FeeSchedule::default()).unwrap()
    }

    fn trader(balance_a: f64) -> Trader {
        Trader::new(ParticipantId::new(1), "alice", balance_a, Strategy::Moderate)
    }

    #[test]
    fn test_initial_price() {
        let pool = test_pool();
        assert!((pool.current_price() - 0.1).abs() < 1e-12);
        assert_eq!(pool.invariant_k(), 1_000_000_000.0);
    }

    #[test]
    fn test_quote_buy_reference_numbers() {
        let pool = test_pool();
        let quote = pool.quote_buy(1000.0).unwrap();
        assert!((quote.fee - 3.0).abs() < 1e-9);
        assert!((quote.projected_reserve_a - 10_997.0).abs() < 1e-9);
        assert!((quote.projected_reserve_b - 1_000_000_000.0 / 10_997.0).abs() < 1e-6);
        assert!((quote.amount_out - 9066.1089).abs() < 1e-3);
        assert!((quote.effective_price - 1000.0 / quote.amount_out).abs() < 1e-12);
    }

    #[test]
    fn test_quote_is_pure() {
        let pool = test_pool();
        let before = pool.reserves();
        let _ = pool.quote_buy(500.0).unwrap();
        let _ = pool.quote_sell(500.0).unwrap();
        assert_eq!(pool.reserves(), before);
    }

    #[test]
    fn test_sell_fee_taken_from_output() {
        let pool = test_pool();
        let quote = pool.quote_sell(10_000.0).unwrap();
        let gross = 10_000.0 - 1_000_000_000.0 / 110_000.0;
        assert!((quote.fee - gross * 0.003).abs() < 1e-9);
        assert!((quote.amount_out - (gross - quote.fee)).abs() < 1e-9);
        // fee does not touch the curve
        assert!((quote.projected_reserve_a - 1_000_000_000.0 / 110_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_round_trip_loses_value() {
        let mut pool = test_pool();
        let mut alice = trader(1000.0);
        let bought = pool.execute_buy(&mut alice, 1000.0, 1).unwrap();
        let sold = pool.execute_sell(&mut alice, bought.amount_out, 1).unwrap();
        assert!(sold.amount_out < 1000.0);
        assert!(alice.balance_a < 1000.0);
    }

    #[test]
    fn test_execute_buy_updates_everything() {
        let mut pool = test_pool();
        let mut alice = trader(5000.0);
        let quote = pool.execute_buy(&mut alice, 1000.0, 4).unwrap();

        assert_eq!(alice.balance_a, 4000.0);
        assert_eq!(alice.balance_b, quote.amount_out);
        assert_eq!(alice.total_spent, 1000.0);
        assert_eq!(pool.reserve_a(), quote.projected_reserve_a);
        assert_eq!(pool.reserve_b(), quote.projected_reserve_b);
        assert!((pool.total_fees() - 3.0).abs() < 1e-9);
        assert_eq!(pool.total_volume(), 1000.0);

        let record = &pool.trades()[0];
        assert_eq!(record.day, 4);
        assert_eq!(record.side, Side::BUY);
        assert_eq!(record.participant_name, "alice");
        assert_eq!(record.pool_after, pool.reserves().state());
    }

    #[test]
    fn test_insufficient_balance_is_rejected_without_mutation() {
        let mut pool = test_pool();
        let mut alice = trader(100.0);
        let before = pool.reserves();

        let err = pool.execute_buy(&mut alice, 200.0, 1).unwrap_err();
        assert!(matches!(err, PoolError::InsufficientBalance { .. }));
        let err = pool.execute_sell(&mut alice, 1.0, 1).unwrap_err();
        assert!(matches!(err, PoolError::InsufficientBalance { .. }));

        assert_eq!(pool.reserves(), before);
        assert_eq!(alice.balance_a, 100.0);
        assert_eq!(pool.trade_count(), 0);
    }

    #[test]
    fn test_invalid_amount() {
        let mut pool = test_pool();
        let mut alice = trader(100.0);
        assert!(matches!(pool.quote_buy(0.0), Err(PoolError::InvalidAmount(_))));
        assert!(matches!(pool.quote_sell(-1.0), Err(PoolError::InvalidAmount(_))));
        assert!(matches!(pool.quote_buy(f64::NAN), Err(PoolError::InvalidAmount(_))));
        assert!(pool.execute_buy(&mut alice, 0.0, 1).is_err());
        assert_eq!(pool.trade_count(), 0);
    }

    #[test]
    fn test_degenerate_reserves_rejected() {
        assert!(matches!(
            PoolEngine::new(0.0, 100.0, FeeSchedule::default()),
            Err(PoolError::DegenerateState { .. })
        ));
        let reserves = Reserves { reserve_a: 0.0, reserve_b: 10.0, invariant_k: 0.0 };
        assert!(reserves.quote_sell(1.0, &FeeSchedule::zero()).is_err());
    }

    #[test]
    fn test_reset_pool_recomputes_k() {
        let mut pool = test_pool();
        let mut alice = trader(1000.0);
        pool.execute_buy(&mut alice, 500.0, 1).unwrap();
        pool.reset_pool(2000.0, 4000.0).unwrap();
        assert_eq!(pool.invariant_k(), 8_000_000.0);
        assert_eq!(pool.initial_state(), PoolState { reserve_a: 2000.0, reserve_b: 4000.0 });
        assert_eq!(pool.trade_count(), 1);
        pool.clear_history();
        assert_eq!(pool.trade_count(), 0);
        assert_eq!(pool.total_fees(), 0.0);
    }

    #[test]
    fn test_set_fees_validates() {
        let mut pool = test_pool();
        assert!(pool.set_fees(1.0, 2.0).is_ok());
        assert_eq!(pool.fees().sell_fee_pct, 2.0);
        assert!(pool.set_fees(-1.0, 2.0).is_err());
        assert_eq!(pool.fees().buy_fee_pct, 1.0);
    }
}

//! Joint liquidation valuation
//!
//! Answers "what does everyone walk away with if the whole roster sells at
//! once". Sellers are processed one after another against a single copy of
//! the reserves that moves forward with each sale, so later sellers take
//! the slippage left behind by earlier ones. Valuing each holder against
//! the untouched pool overstates the roster's exit value as soon as more
//! than one participant holds asset B.

use crate::market::Trader;
use crate::pool::{PoolEngine, Reserves};
use serde::{Deserialize, Serialize};
use types::fee::FeeSchedule;
use types::ids::ParticipantId;

/// One participant's result in a joint liquidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementOutcome {
    pub id: ParticipantId,
    pub name: String,
    /// Position in the sell cascade; `None` for participants holding no asset B
    pub position: Option<usize>,
    pub amount_sold: f64,
    pub amount_received: f64,
    /// Asset A after liquidation
    pub total_value: f64,
    pub pl: f64,
}

/// Aggregate view over a joint liquidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Asset A reserve drift against the last reset seed
    pub reserve_a_change: f64,
    /// Asset B reserve drift against the last reset seed
    pub reserve_b_change: f64,
    /// Sum of starting balances
    pub total_initial_a: f64,
    /// Sum of post-liquidation asset A
    pub total_final_a: f64,
    /// `total_final_a - total_initial_a`
    pub realized_total_pl: f64,
}

/// Read-only valuator over a pool.
#[derive(Debug, Clone, Copy)]
pub struct SettlementValuator<'a> {
    pool: &'a PoolEngine,
}

impl<'a> SettlementValuator<'a> {
    pub fn new(pool: &'a PoolEngine) -> Self {
        Self { pool }
    }

    /// Asset A released for selling `amount` into `reserves`, and the
    /// reserves after the sale. A sale the curve cannot price releases
    /// nothing and leaves the reserves alone.
    fn sell_into(reserves: &Reserves, fees: &FeeSchedule, amount: f64) -> (f64, Reserves) {
        if amount <= 0.0 {
            return (0.0, *reserves);
        }
        match reserves.quote_sell(amount, fees) {
            Ok(quote) => {
                let mut next = *reserves;
                next.apply(&quote);
                (quote.amount_out.max(0.0), next)
            }
            Err(_) => (0.0, *reserves),
        }
    }

    /// Sequential liquidation of every holder, largest holding first.
    ///
    /// Holders come back in cascade order, followed by non-holders in roster
    /// order. Pure: the pool is never touched.
    pub fn valuate_all(&self, roster: &[Trader]) -> Vec<SettlementOutcome> {
        let fees = self.pool.fees();
        let mut reserves = self.pool.reserves();

        let mut holders: Vec<&Trader> = roster.iter().filter(|t| t.balance_b > 0.0).collect();
        // stable: equal holdings keep roster order
        holders.sort_by(|a, b| b.balance_b.total_cmp(&a.balance_b));

        let mut outcomes = Vec::with_capacity(roster.len());
        for (position, trader) in holders.into_iter().enumerate() {
            let (received, next) = Self::sell_into(&reserves, &fees, trader.balance_b);
            reserves = next;

            let total_value = trader.balance_a + received;
            outcomes.push(SettlementOutcome {
                id: trader.id,
                name: trader.name.clone(),
                position: Some(position),
                amount_sold: trader.balance_b,
                amount_received: received,
                total_value,
                pl: total_value - trader.initial_balance_a,
            });
        }

        outcomes.extend(roster.iter().filter(|t| t.balance_b <= 0.0).map(|t| SettlementOutcome {
            id: t.id,
            name: t.name.clone(),
            position: None,
            amount_sold: 0.0,
            amount_received: 0.0,
            total_value: t.balance_a,
            pl: t.balance_a - t.initial_balance_a,
        }));

        outcomes
    }

    /// Asset A the participant would receive selling everything into the
    /// current, unmutated pool.
    pub fn valuate_alone(&self, trader: &Trader) -> f64 {
        let (received, _) = Self::sell_into(&self.pool.reserves(), &self.pool.fees(), trader.balance_b);
        received
    }

    /// P/L if the participant were the only seller.
    pub fn alone_pl(&self, trader: &Trader) -> f64 {
        trader.balance_a + self.valuate_alone(trader) - trader.initial_balance_a
    }

    /// Joint-liquidation P/L for one participant.
    pub fn joint_pl(&self, roster: &[Trader], id: ParticipantId) -> Option<f64> {
        self.valuate_all(roster)
            .into_iter()
            .find(|o| o.id == id)
            .map(|o| o.pl)
    }

    pub fn pool_stats(&self, roster: &[Trader]) -> PoolStats {
        let initial = self.pool.initial_state();
        let total_initial_a: f64 = roster.iter().map(|t| t.initial_balance_a).sum();
        let total_final_a: f64 = self.valuate_all(roster).iter().map(|o| o.total_value).sum();

        PoolStats {
            reserve_a_change: self.pool.reserve_a() - initial.reserve_a,
            reserve_b_change: self.pool.reserve_b() - initial.reserve_b,
            total_initial_a,
            total_final_a,
            realized_total_pl: total_final_a - total_initial_a,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::strategy::Strategy;

    fn pool() -> PoolEngine {
        PoolEngine::new(10_000.0, 100_000.0, FeeSchedule::default()).unwrap()
    }

    fn holder(id: u64, balance_a: f64, balance_b: f64) -> Trader {
        let mut t = Trader::new(ParticipantId::new(id), format!("p{id}"), balance_a, Strategy::Moderate);
        t.balance_b = balance_b;
        t
    }

    #[test]
    fn test_cascade_order_largest_first() {
        let pool = pool();
        let roster = vec![holder(1, 0.0, 100.0), holder(2, 0.0, 5000.0), holder(3, 50.0, 0.0)];
        let outcomes = SettlementValuator::new(&pool).valuate_all(&roster);

        let ids: Vec<u64> = outcomes.iter().map(|o| o.id.as_u64()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(outcomes[0].position, Some(0));
        assert_eq!(outcomes[2].position, None);
        assert_eq!(outcomes[2].pl, 0.0);
    }

    #[test]
    fn test_later_seller_gets_less() {
        let pool = pool();
        let roster = vec![holder(1, 0.0, 2000.0), holder(2, 0.0, 2000.0)];
        let outcomes = SettlementValuator::new(&pool).valuate_all(&roster);
        assert_eq!(outcomes[0].id, ParticipantId::new(1));
        assert!(outcomes[0].amount_received > outcomes[1].amount_received);
    }

    #[test]
    fn test_first_seller_matches_alone_value() {
        let pool = pool();
        let roster = vec![holder(1, 0.0, 3000.0), holder(2, 0.0, 1000.0)];
        let valuator = SettlementValuator::new(&pool);
        let outcomes = valuator.valuate_all(&roster);
        assert_eq!(outcomes[0].amount_received, valuator.valuate_alone(&roster[0]));
        assert!(outcomes[1].amount_received < valuator.valuate_alone(&roster[1]));
    }

    #[test]
    fn test_valuate_does_not_mutate_pool() {
        let pool = pool();
        let before = pool.reserves();
        let roster = vec![holder(1, 0.0, 3000.0)];
        let valuator = SettlementValuator::new(&pool);
        let first = valuator.valuate_alone(&roster[0]);
        let _ = valuator.valuate_all(&roster);
        assert_eq!(valuator.valuate_alone(&roster[0]), first);
        assert_eq!(pool.reserves(), before);
    }

    #[test]
    fn test_pl_formula() {
        let pool = pool();
        let mut t = holder(1, 400.0, 1000.0);
        t.initial_balance_a = 500.0;
        let valuator = SettlementValuator::new(&pool);
        let outcome = &valuator.valuate_all(std::slice::from_ref(&t))[0];
        assert_eq!(outcome.total_value, 400.0 + outcome.amount_received);
        assert_eq!(outcome.pl, outcome.total_value - 500.0);
        assert_eq!(valuator.alone_pl(&t), outcome.pl);
    }

    #[test]
    fn test_zero_holding_alone_value() {
        let pool = pool();
        assert_eq!(SettlementValuator::new(&pool).valuate_alone(&holder(1, 10.0, 0.0)), 0.0);
    }

    #[test]
    fn test_pool_stats_reduction() {
        let pool = pool();
        let mut a = holder(1, 0.0, 2000.0);
        a.initial_balance_a = 250.0;
        let b = holder(2, 300.0, 0.0);
        let roster = vec![a, b];
        let valuator = SettlementValuator::new(&pool);
        let stats = valuator.pool_stats(&roster);
        let outcomes = valuator.valuate_all(&roster);

        assert_eq!(stats.total_initial_a, 550.0);
        let summed: f64 = outcomes.iter().map(|o| o.pl).sum();
        assert!((stats.realized_total_pl - summed).abs() < 1e-9);
        assert_eq!(stats.reserve_a_change, 0.0);
    }
}

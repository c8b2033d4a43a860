//! Day-stepping market simulator
//!
//! Each day the roster is reshuffled (who trades first gets the better
//! price), every trader rolls against its strategy's trade chance, picks a
//! side and a jittered size, and trades against the pool. After the day a
//! snapshot with joint-settlement P/L is appended.

use crate::config::SimulationConfig;
use crate::market::snapshot::{DailySnapshot, ParticipantSnapshot};
use crate::market::trader::{
    Trader, DEFAULT_ROSTER, MAX_TRADE_SHARE, MIN_BUY_SIZE, MIN_SELL_SIZE,
};
use crate::pool::{PoolEngine, Quote};
use crate::rng::{RandomSource, SeededRandom};
use crate::settlement::{PoolStats, SettlementValuator};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};
use types::errors::{validate_non_negative, EngineError, ParticipantError, PoolError};
use types::ids::{IdSequence, ParticipantId};
use types::strategy::Strategy;
use types::trade::{Side, TradeRecord};

/// A trade a participant decided to place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeIntent {
    pub side: Side,
    pub amount: f64,
}

/// Counters for a `step_days` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepSummary {
    pub days_run: u32,
    pub trades_executed: u64,
    pub trades_rejected: u64,
    pub final_day: u32,
    pub final_price: f64,
}

/// Roll a trader's daily decision.
///
/// Draw order: trade/skip, then side (only when both assets are held), then
/// size jitter.
pub fn decide_trade<R: RandomSource>(rng: &mut R, trader: &Trader) -> Option<TradeIntent> {
    let params = trader.params();
    if rng.next_f64() > params.trade_chance {
        return None;
    }

    let side = match (trader.can_buy(), trader.can_sell()) {
        (true, true) => {
            if rng.next_f64() > 0.5 {
                Side::BUY
            } else {
                Side::SELL
            }
        }
        (true, false) => Side::BUY,
        (false, true) => Side::SELL,
        (false, false) => return None,
    };

    let (holding, min_size) = match side {
        Side::BUY => (trader.balance_a, MIN_BUY_SIZE),
        Side::SELL => (trader.balance_b, MIN_SELL_SIZE),
    };

    let amount = holding * params.trade_size_fraction * (0.5 + rng.next_f64());
    if amount < min_size {
        return None;
    }

    Some(TradeIntent {
        side,
        amount: amount.min(holding * MAX_TRADE_SHARE),
    })
}

/// Owns the pool, the roster and the random source for one simulation.
pub struct MarketSimulator<R: RandomSource = SeededRandom> {
    config: SimulationConfig,
    pool: PoolEngine,
    roster: Vec<Trader>,
    ids: IdSequence,
    day: u32,
    snapshots: Vec<DailySnapshot>,
    rng: R,
}

impl MarketSimulator<SeededRandom> {
    /// Build a simulator seeded from `config.market.seed`.
    pub fn new(config: SimulationConfig) -> Result<Self, PoolError> {
        let rng = SeededRandom::new(config.market.seed);
        Self::with_random(config, rng)
    }

    /// `reset_all` plus rewinding the random stream to the configured seed,
    /// so the next `step_days` repeats the first run exactly.
    pub fn restart_from_seed(&mut self) -> Result<(), PoolError> {
        self.reset_all()?;
        self.rng.reseed();
        debug!(seed = self.rng.seed(), "random stream rewound");
        Ok(())
    }
}

impl<R: RandomSource> MarketSimulator<R> {
    /// Build a simulator around an injected random source.
    pub fn with_random(config: SimulationConfig, rng: R) -> Result<Self, PoolError> {
        let pool = PoolEngine::new(
            config.pool.reserve_a,
            config.pool.reserve_b,
            config.pool.fee_schedule(),
        )?;
        let mut sim = Self {
            config,
            pool,
            roster: Vec::new(),
            ids: IdSequence::new(),
            day: 0,
            snapshots: Vec::new(),
            rng,
        };
        if sim.config.market.seed_default_roster {
            sim.seed_default_roster();
        }
        Ok(sim)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn pool(&self) -> &PoolEngine {
        &self.pool
    }

    pub fn current_day(&self) -> u32 {
        self.day
    }

    pub fn current_price(&self) -> f64 {
        self.pool.current_price()
    }

    pub fn roster(&self) -> &[Trader] {
        &self.roster
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Trader> {
        self.roster.iter().find(|t| t.id == id)
    }

    pub fn snapshots(&self) -> &[DailySnapshot] {
        &self.snapshots
    }

    pub fn trades(&self) -> &[TradeRecord] {
        self.pool.trades()
    }

    pub fn settlement(&self) -> SettlementValuator<'_> {
        SettlementValuator::new(&self.pool)
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.settlement().pool_stats(&self.roster)
    }

    pub fn set_fees(&mut self, buy_fee_pct: f64, sell_fee_pct: f64) -> Result<(), PoolError> {
        self.pool.set_fees(buy_fee_pct, sell_fee_pct)
    }

    pub fn reset_pool(&mut self, reserve_a: f64, reserve_b: f64) -> Result<(), PoolError> {
        self.pool.reset_pool(reserve_a, reserve_b)
    }

    /// Add a trader holding only asset A.
    pub fn add_participant(
        &mut self,
        name: impl Into<String>,
        balance_a: f64,
        strategy: Strategy,
    ) -> Result<Trader, ParticipantError> {
        let balance_a = validate_non_negative(balance_a)?;
        let trader = Trader::new(self.ids.next_id(), name, balance_a, strategy);
        debug!(id = %trader.id, name = %trader.name, balance_a, strategy = %strategy, "participant added");
        self.roster.push(trader.clone());
        Ok(trader)
    }

    /// Append the ten default traders.
    pub fn seed_default_roster(&mut self) {
        for (name, dai, strategy) in DEFAULT_ROSTER {
            let trader = Trader::new(self.ids.next_id(), name, dai, strategy);
            self.roster.push(trader);
        }
    }

    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<Trader, ParticipantError> {
        let idx = self.index_of(id)?;
        let removed = self.roster.remove(idx);
        debug!(id = %id, name = %removed.name, "participant removed");
        Ok(removed)
    }

    fn index_of(&self, id: ParticipantId) -> Result<usize, ParticipantError> {
        self.roster
            .iter()
            .position(|t| t.id == id)
            .ok_or(ParticipantError::Unknown(id))
    }

    /// Manual buy for one participant, tagged with the current day.
    pub fn execute_buy(&mut self, id: ParticipantId, amount: f64) -> Result<Quote, EngineError> {
        let idx = self.index_of(id)?;
        Ok(self.pool.execute_buy(&mut self.roster[idx], amount, self.day)?)
    }

    /// Manual sell for one participant, tagged with the current day.
    pub fn execute_sell(&mut self, id: ParticipantId, amount: f64) -> Result<Quote, EngineError> {
        let idx = self.index_of(id)?;
        Ok(self.pool.execute_sell(&mut self.roster[idx], amount, self.day)?)
    }

    /// Sell the participant's entire asset B holding.
    pub fn sell_all(&mut self, id: ParticipantId) -> Result<Quote, EngineError> {
        let idx = self.index_of(id)?;
        let holding = self.roster[idx].balance_b;
        if holding <= 0.0 {
            return Err(ParticipantError::NothingToSell(id).into());
        }
        Ok(self.pool.execute_sell(&mut self.roster[idx], holding, self.day)?)
    }

    /// Run `days` sequential trading days.
    pub fn step_days(&mut self, days: u32) -> StepSummary {
        let mut summary = StepSummary::default();
        for _ in 0..days {
            let (executed, rejected) = self.simulate_day(self.day + 1);
            self.day += 1;
            self.record_snapshot();

            summary.days_run += 1;
            summary.trades_executed += executed;
            summary.trades_rejected += rejected;
        }
        summary.final_day = self.day;
        summary.final_price = self.current_price();

        info!(
            days_run = summary.days_run,
            day = self.day,
            trades = summary.trades_executed,
            rejected = summary.trades_rejected,
            price = summary.final_price,
            "market stepped"
        );
        summary
    }

    fn simulate_day(&mut self, day: u32) -> (u64, u64) {
        let mut order: Vec<usize> = (0..self.roster.len()).collect();
        self.rng.shuffle(&mut order);

        let mut executed = 0;
        let mut rejected = 0;
        for idx in order {
            let Some(intent) = decide_trade(&mut self.rng, &self.roster[idx]) else {
                continue;
            };
            let trader = &mut self.roster[idx];
            let result = match intent.side {
                Side::BUY => self.pool.execute_buy(trader, intent.amount, day),
                Side::SELL => self.pool.execute_sell(trader, intent.amount, day),
            };
            match result {
                Ok(_) => executed += 1,
                Err(err) => {
                    rejected += 1;
                    debug!(day, participant = %trader.id, error = %err, "simulated trade rejected");
                }
            }
        }
        (executed, rejected)
    }

    /// Append a snapshot for the current day.
    pub fn record_snapshot(&mut self) {
        let price = self.current_price();
        let realized: HashMap<ParticipantId, f64> = self
            .settlement()
            .valuate_all(&self.roster)
            .into_iter()
            .map(|outcome| (outcome.id, outcome.pl))
            .collect();

        let participants = self
            .roster
            .iter()
            .map(|t| ParticipantSnapshot {
                id: t.id,
                name: t.name.clone(),
                balance_a: t.balance_a,
                balance_b: t.balance_b,
                total_value: t.spot_value(price),
                pl: realized
                    .get(&t.id)
                    .copied()
                    .unwrap_or(t.balance_a - t.initial_balance_a),
            })
            .collect();

        self.snapshots.push(DailySnapshot {
            day: self.day,
            price,
            participants,
        });
    }

    /// Restore the configured pool seed and clear roster, history and day.
    ///
    /// The random source keeps its position.
    pub fn reset_all(&mut self) -> Result<(), PoolError> {
        self.pool = PoolEngine::new(
            self.config.pool.reserve_a,
            self.config.pool.reserve_b,
            self.config.pool.fee_schedule(),
        )?;
        self.roster.clear();
        self.ids.reset();
        self.day = 0;
        self.snapshots.clear();
        if self.config.market.seed_default_roster {
            self.seed_default_roster();
        }
        info!("market reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarketConfig;
    use crate::rng::ScriptedRandom;

    fn empty_config() -> SimulationConfig {
        SimulationConfig {
            market: MarketConfig {
                seed: 42,
                seed_default_roster: false,
            },
            ..Default::default()
        }
    }

    fn trader(balance_a: f64, balance_b: f64, strategy: Strategy) -> Trader {
        let mut t = Trader::new(ParticipantId::new(1), "t", balance_a, strategy);
        t.balance_b = balance_b;
        t
    }

    #[test]
    fn test_decide_skips_above_trade_chance() {
        let mut rng = ScriptedRandom::new(vec![0.95]);
        assert!(decide_trade(&mut rng, &trader(1000.0, 0.0, Strategy::Active)).is_none());
    }

    #[test]
    fn test_decide_forced_buy_and_size() {
        // trade roll, size jitter 0.5 -> factor 1.0
        let mut rng = ScriptedRandom::new(vec![0.05, 0.5]);
        let intent = decide_trade(&mut rng, &trader(1000.0, 0.0, Strategy::Moderate)).unwrap();
        assert_eq!(intent.side, Side::BUY);
        assert!((intent.amount - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_decide_random_side_when_holding_both() {
        let mut rng = ScriptedRandom::new(vec![0.0, 0.4, 0.5]);
        let intent = decide_trade(&mut rng, &trader(1000.0, 500.0, Strategy::Whale)).unwrap();
        assert_eq!(intent.side, Side::SELL);
        assert!((intent.amount - 250.0).abs() < 1e-9);

        let mut rng = ScriptedRandom::new(vec![0.0, 0.6, 0.5]);
        let intent = decide_trade(&mut rng, &trader(1000.0, 500.0, Strategy::Whale)).unwrap();
        assert_eq!(intent.side, Side::BUY);
    }

    #[test]
    fn test_decide_size_stays_under_cap() {
        // largest jitter for the largest fraction: 0.5 * 1.5 of the holding
        let mut rng = ScriptedRandom::new(vec![0.0, 0.999_999]);
        let intent = decide_trade(&mut rng, &trader(0.0, 100.0, Strategy::Whale)).unwrap();
        assert_eq!(intent.side, Side::SELL);
        assert!(intent.amount <= 100.0 * MAX_TRADE_SHARE);
        assert!((intent.amount - 100.0 * 0.5 * 1.499_999).abs() < 1e-6);
    }

    #[test]
    fn test_decide_drops_dust() {
        // passive sell: 0.5 * 0.1 * 1.0 = 0.05 < 0.1
        let mut rng = ScriptedRandom::new(vec![0.0, 0.5]);
        assert!(decide_trade(&mut rng, &trader(0.0, 0.5, Strategy::Passive)).is_none());
    }

    #[test]
    fn test_decide_nothing_held() {
        let mut rng = ScriptedRandom::new(vec![0.0]);
        assert!(decide_trade(&mut rng, &trader(5.0, 0.0, Strategy::Active)).is_none());
    }

    #[test]
    fn test_default_roster_seeded() {
        let sim = MarketSimulator::new(SimulationConfig::default()).unwrap();
        assert_eq!(sim.roster().len(), 10);
        assert_eq!(sim.roster()[0].name, "Whale_Alex");
        assert_eq!(sim.roster()[9].id, ParticipantId::new(10));
    }

    #[test]
    fn test_add_and_remove_participant() {
        let mut sim = MarketSimulator::new(empty_config()).unwrap();
        let a = sim.add_participant("a", 100.0, Strategy::Passive).unwrap();
        let b = sim.add_participant("b", 200.0, Strategy::Whale).unwrap();
        assert!(b.id > a.id);
        assert!(sim.add_participant("c", -1.0, Strategy::Passive).is_err());

        sim.remove_participant(a.id).unwrap();
        assert_eq!(sim.roster().len(), 1);
        assert_eq!(
            sim.remove_participant(a.id),
            Err(ParticipantError::Unknown(a.id))
        );
    }

    #[test]
    fn test_manual_trades_and_sell_all() {
        let mut sim = MarketSimulator::new(empty_config()).unwrap();
        let a = sim.add_participant("a", 1000.0, Strategy::Passive).unwrap();

        assert!(matches!(
            sim.sell_all(a.id),
            Err(EngineError::Participant(ParticipantError::NothingToSell(_)))
        ));

        sim.execute_buy(a.id, 500.0).unwrap();
        let quote = sim.sell_all(a.id).unwrap();
        assert!(quote.amount_out < 500.0);
        assert_eq!(sim.participant(a.id).unwrap().balance_b, 0.0);
        assert_eq!(sim.trades().len(), 2);

        assert!(matches!(
            sim.execute_buy(ParticipantId::new(99), 1.0),
            Err(EngineError::Participant(ParticipantError::Unknown(_)))
        ));
    }

    #[test]
    fn test_step_days_records_snapshots() {
        let mut sim = MarketSimulator::new(SimulationConfig::default()).unwrap();
        let summary = sim.step_days(7);
        assert_eq!(summary.days_run, 7);
        assert_eq!(sim.current_day(), 7);
        assert_eq!(sim.snapshots().len(), 7);
        assert_eq!(sim.snapshots()[6].day, 7);
        assert_eq!(sim.snapshots()[0].participants.len(), 10);
        assert_eq!(summary.trades_executed as usize, sim.trades().len());
        assert!(sim.trades().iter().all(|t| (1..=7).contains(&t.day)));
    }

    #[test]
    fn test_always_trading_script_buys_on_day_one() {
        let config = empty_config();
        let mut sim = MarketSimulator::with_random(config, ScriptedRandom::constant(0.0)).unwrap();
        let a = sim.add_participant("a", 1000.0, Strategy::Moderate).unwrap();
        sim.step_days(1);
        // draw 0.0: trades, forced buy, size 1000 * 0.25 * 0.5
        let t = &sim.trades()[0];
        assert_eq!(t.participant_id, a.id);
        assert_eq!(t.side, Side::BUY);
        assert!((t.amount_in - 125.0).abs() < 1e-9);
        assert_eq!(t.day, 1);
    }

    #[test]
    fn test_roster_reshuffled_each_day() {
        let mut sim = MarketSimulator::with_random(
            empty_config(),
            ScriptedRandom::new(vec![
                // day 1: shuffle keeps [a, b]; each rolls then jitters
                0.9, 0.0, 0.5, 0.0, 0.5,
                // day 2: shuffle swaps to [b, a]; roll, side (buy), jitter
                0.0, 0.0, 0.9, 0.5, 0.0, 0.9, 0.5,
            ]),
        )
        .unwrap();
        let a = sim.add_participant("a", 1000.0, Strategy::Moderate).unwrap();
        let b = sim.add_participant("b", 1000.0, Strategy::Moderate).unwrap();
        sim.step_days(2);

        let order = |day: u32| -> Vec<ParticipantId> {
            sim.trades().iter().filter(|t| t.day == day).map(|t| t.participant_id).collect()
        };
        assert_eq!(order(1), vec![a.id, b.id]);
        assert_eq!(order(2), vec![b.id, a.id]);
        assert!(sim.trades().iter().all(|t| t.side == Side::BUY));
    }

    #[test]
    fn test_restart_from_seed_repeats_run() {
        let mut sim = MarketSimulator::new(SimulationConfig::default()).unwrap();
        sim.step_days(8);
        let first = sim.trades().to_vec();
        assert!(!first.is_empty());

        sim.restart_from_seed().unwrap();
        sim.step_days(8);
        assert_eq!(sim.trades(), first.as_slice());

        // without rewinding the stream the rerun diverges
        sim.reset_all().unwrap();
        sim.step_days(8);
        assert_ne!(sim.trades(), first.as_slice());
    }

    #[test]
    fn test_reset_all() {
        let mut sim = MarketSimulator::new(SimulationConfig::default()).unwrap();
        sim.step_days(5);
        sim.reset_pool(1.0, 1.0).unwrap();
        sim.reset_all().unwrap();
        assert_eq!(sim.current_day(), 0);
        assert!(sim.snapshots().is_empty());
        assert!(sim.trades().is_empty());
        assert_eq!(sim.roster().len(), 10);
        assert_eq!(sim.roster()[0].id, ParticipantId::new(1));
        assert!((sim.current_price() - 0.1).abs() < 1e-12);
    }
}

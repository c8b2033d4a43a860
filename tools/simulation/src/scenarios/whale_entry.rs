//! Whale entry
//!
//! Small farmers build up rating, then a large non-farming depositor joins.
//! The whale's deposit backs the farmers' extra rating, so the farmers exit
//! above their deposits while the whale's share drops below its stake.

use crate::scenarios::ScenarioResult;
use crate::stake::StakeEngine;
use types::errors::StakeError;

#[derive(Debug, Clone)]
pub struct WhaleEntryConfig {
    pub farmer_count: usize,
    pub farmer_deposit: f64,
    pub farm_rate: f64,
    pub whale_deposit: f64,
    /// Periods farmed before the whale arrives
    pub periods_before: u32,
    pub periods_after: u32,
}

impl Default for WhaleEntryConfig {
    fn default() -> Self {
        Self {
            farmer_count: 3,
            farmer_deposit: 1000.0,
            farm_rate: 10.0,
            whale_deposit: 100_000.0,
            periods_before: 5,
            periods_after: 1,
        }
    }
}

pub fn run(engine: &mut StakeEngine, config: &WhaleEntryConfig) -> Result<ScenarioResult, StakeError> {
    let mut farmers = Vec::with_capacity(config.farmer_count);
    for i in 0..config.farmer_count {
        farmers.push(engine.add_participant(format!("Farmer_{}", i + 1), config.farmer_deposit, config.farm_rate)?);
    }
    engine.step_periods(config.periods_before);
    let share_before = match farmers.first() {
        Some(f) => engine.withdrawal_share(f.id)?,
        None => 0.0,
    };

    let whale = engine.add_participant("Whale", config.whale_deposit, 0.0)?;
    engine.step_periods(config.periods_after);
    let whale_view = engine.participant_view(whale.id)?;

    for farmer in &farmers {
        engine.exit_participant(farmer.id)?;
    }

    let passed = whale_view.withdrawal_share < whale.deposit
        && engine.exited().iter().all(|r| r.withdrawal_amount > r.deposit);
    let details = format!(
        "Farmer share {:.2} before the whale; whale owed {:.2} on a {:.2} net deposit before the farmers left.",
        share_before, whale_view.withdrawal_share, whale.deposit,
    );
    Ok(ScenarioResult::collect("whale_entry", engine, passed, details))
}

//! Early vs late entrant
//!
//! Two stakers with the same deposit and farm rate, one joining several
//! periods ahead of the other. The early one has farmed longer and takes
//! the larger share when both leave.

use crate::scenarios::ScenarioResult;
use crate::stake::StakeEngine;
use types::errors::StakeError;

#[derive(Debug, Clone)]
pub struct EarlyVsLateConfig {
    pub dai_deposit: f64,
    pub farm_rate: f64,
    /// Periods the early staker runs alone
    pub head_start: u32,
    /// Periods both run together before exiting
    pub shared_periods: u32,
}

impl Default for EarlyVsLateConfig {
    fn default() -> Self {
        Self {
            dai_deposit: 1000.0,
            farm_rate: 10.0,
            head_start: 5,
            shared_periods: 5,
        }
    }
}

pub fn run(engine: &mut StakeEngine, config: &EarlyVsLateConfig) -> Result<ScenarioResult, StakeError> {
    let early = engine.add_participant("Early", config.dai_deposit, config.farm_rate)?;
    engine.step_periods(config.head_start);
    let late = engine.add_participant("Late", config.dai_deposit, config.farm_rate)?;
    engine.step_periods(config.shared_periods);

    let early_exit = engine.exit_participant(early.id)?;
    let late_exit = engine.exit_participant(late.id)?;

    let passed = early_exit.withdrawal_amount > late_exit.withdrawal_amount;
    let details = format!(
        "Early (joined {}) withdrew {:.2}, late (joined {}) withdrew {:.2}.",
        early_exit.entry_period,
        early_exit.withdrawal_amount,
        late_exit.entry_period,
        late_exit.withdrawal_amount,
    );
    Ok(ScenarioResult::collect("early_vs_late", engine, passed, details))
}

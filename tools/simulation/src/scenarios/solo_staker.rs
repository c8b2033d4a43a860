//! Solo staker
//!
//! One participant farms and exits alone. With the whole pool to itself the
//! rating cancels out and the withdrawal is exactly the net deposit.

use crate::scenarios::ScenarioResult;
use crate::stake::StakeEngine;
use types::errors::StakeError;

#[derive(Debug, Clone)]
pub struct SoloStakerConfig {
    pub dai_deposit: f64,
    pub farm_rate: f64,
    pub periods: u32,
}

impl Default for SoloStakerConfig {
    fn default() -> Self {
        Self {
            dai_deposit: 1000.0,
            farm_rate: 50.0,
            periods: 1,
        }
    }
}

pub fn run(engine: &mut StakeEngine, config: &SoloStakerConfig) -> Result<ScenarioResult, StakeError> {
    let solo = engine.add_participant("Solo", config.dai_deposit, config.farm_rate)?;
    engine.step_periods(config.periods);
    let rating = engine.rating(solo.id)?;
    let exit = engine.exit_participant(solo.id)?;

    let passed = (exit.withdrawal_amount - solo.deposit).abs() < 1e-9;
    let details = format!(
        "Deposit {:.2}, rating {:.4} after {} periods, withdrawal {:.2} (P/L {:.2}).",
        solo.deposit, rating, config.periods, exit.withdrawal_amount, exit.profit_loss_at_exit,
    );
    Ok(ScenarioResult::collect("solo_staker", engine, passed, details))
}

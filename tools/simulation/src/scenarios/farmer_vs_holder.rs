//! Farmer vs holder
//!
//! Equal deposits, one participant farming every period and one just
//! holding. The farmer exits first and takes part of the holder's stake;
//! the holder then exits alone against its own deposit.

use crate::scenarios::ScenarioResult;
use crate::stake::StakeEngine;
use types::errors::StakeError;

#[derive(Debug, Clone)]
pub struct FarmerVsHolderConfig {
    pub dai_deposit: f64,
    pub farm_rate: f64,
    pub periods: u32,
}

impl Default for FarmerVsHolderConfig {
    fn default() -> Self {
        Self {
            dai_deposit: 1000.0,
            farm_rate: 100.0,
            periods: 5,
        }
    }
}

pub fn run(engine: &mut StakeEngine, config: &FarmerVsHolderConfig) -> Result<ScenarioResult, StakeError> {
    let farmer = engine.add_participant("Farmer", config.dai_deposit, config.farm_rate)?;
    let holder = engine.add_participant("Holder", config.dai_deposit, 0.0)?;
    engine.step_periods(config.periods);

    let holder_share_before = engine.withdrawal_share(holder.id)?;
    let farmer_exit = engine.exit_participant(farmer.id)?;
    let holder_exit = engine.exit_participant(holder.id)?;

    let passed = farmer_exit.withdrawal_amount > holder_share_before;
    let details = format!(
        "Farmer withdrew {:.2}; holder was owed {:.2} while both were staked and withdrew {:.2} alone. Solvency gap {:.2}.",
        farmer_exit.withdrawal_amount,
        holder_share_before,
        holder_exit.withdrawal_amount,
        engine.stats().solvency_gap,
    );
    Ok(ScenarioResult::collect("farmer_vs_holder", engine, passed, details))
}

//! Bank run
//!
//! A group of equal depositors with different farm rates all leave one after
//! another, highest farmer first. Each exit reprices the rest.

use crate::scenarios::ScenarioResult;
use crate::stake::StakeEngine;
use types::errors::StakeError;

#[derive(Debug, Clone)]
pub struct BankRunConfig {
    pub dai_deposit: f64,
    /// One staker per entry
    pub farm_rates: Vec<f64>,
    pub periods: u32,
}

impl Default for BankRunConfig {
    fn default() -> Self {
        Self {
            dai_deposit: 1000.0,
            farm_rates: vec![0.0, 5.0, 10.0, 15.0, 20.0],
            periods: 3,
        }
    }
}

pub fn run(engine: &mut StakeEngine, config: &BankRunConfig) -> Result<ScenarioResult, StakeError> {
    let mut stakers = Vec::with_capacity(config.farm_rates.len());
    for (i, rate) in config.farm_rates.iter().enumerate() {
        stakers.push(engine.add_participant(format!("Staker_{}", i + 1), config.dai_deposit, *rate)?);
    }
    engine.step_periods(config.periods);

    stakers.sort_by(|a, b| b.farm_rate_per_period.total_cmp(&a.farm_rate_per_period));
    let mut last = None;
    for staker in &stakers {
        last = Some(engine.exit_participant(staker.id)?);
    }

    // whoever is left last faces only its own deposit
    let passed = match &last {
        Some(record) => (record.withdrawal_amount - record.deposit).abs() < 1e-9,
        None => false,
    };
    let stats = engine.stats();
    let details = format!(
        "{} exits paid {:.2} against {:.2} net deposits (gap {:.2}).",
        stats.exited_count,
        stats.total_withdrawn,
        stats.total_dai_in - stats.total_fees,
        stats.solvency_gap,
    );
    Ok(ScenarioResult::collect("bank_run", engine, passed, details))
}

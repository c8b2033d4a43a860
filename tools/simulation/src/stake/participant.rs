//! Staker state and exit records

use serde::{Deserialize, Serialize};
use types::ids::ParticipantId;

/// `R = 1 + farmed / deposit`, or `1` for a zero deposit.
pub fn rating(deposit: f64, farmed_units: f64) -> f64 {
    if deposit > 0.0 {
        1.0 + farmed_units / deposit
    } else {
        1.0
    }
}

/// An active participant in the staking protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staker {
    pub id: ParticipantId,
    pub name: String,
    /// Gross DAI brought in
    pub dai_deposited: f64,
    /// Entry fee taken from `dai_deposited`
    pub fee: f64,
    /// Net stake, the participant's weight in the pool
    pub deposit: f64,
    pub farmed_units: f64,
    pub farm_rate_per_period: f64,
    pub entry_period: u32,
}

impl Staker {
    pub fn rating(&self) -> f64 {
        rating(self.deposit, self.farmed_units)
    }

    /// `deposit * rating`, which equals `deposit + farmed_units` for a
    /// positive deposit.
    pub fn effective_rating(&self) -> f64 {
        self.deposit * self.rating()
    }
}

/// Immutable record of a completed exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitRecord {
    pub id: ParticipantId,
    pub name: String,
    pub dai_deposited: f64,
    pub fee: f64,
    pub deposit: f64,
    pub farm_rate_per_period: f64,
    pub entry_period: u32,
    pub exit_period: u32,
    pub rating_at_exit: f64,
    pub withdrawal_amount: f64,
    pub freed_farmed_units: f64,
    /// `withdrawal_amount - dai_deposited`
    pub profit_loss_at_exit: f64,
}

impl ExitRecord {
    pub(crate) fn from_staker(staker: Staker, exit_period: u32, withdrawal_amount: f64) -> Self {
        let rating_at_exit = staker.rating();
        Self {
            id: staker.id,
            name: staker.name,
            dai_deposited: staker.dai_deposited,
            fee: staker.fee,
            deposit: staker.deposit,
            farm_rate_per_period: staker.farm_rate_per_period,
            entry_period: staker.entry_period,
            exit_period,
            rating_at_exit,
            withdrawal_amount,
            freed_farmed_units: staker.farmed_units,
            profit_loss_at_exit: withdrawal_amount - staker.dai_deposited,
        }
    }

    pub fn periods_held(&self) -> u32 {
        self.exit_period.saturating_sub(self.entry_period)
    }
}

/// Derived figures for an active participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakerView {
    pub id: ParticipantId,
    pub name: String,
    pub deposit: f64,
    pub farmed_units: f64,
    pub rating: f64,
    pub effective_rating: f64,
    /// Withdrawal if the participant exited now
    pub withdrawal_share: f64,
    /// `withdrawal_share - dai_deposited`
    pub profit_loss: f64,
}

//! Rating-based staking protocol
//!
//! Participants deposit DAI (minus an entry fee) and farm units in the game.
//! The pool is the sum of active net deposits and is split by effective
//! rating `deposit * (1 + farmed / deposit)`. Shares are recomputed on
//! demand because any farm, join or exit moves every other share.

use crate::config::StakeConfig;
use crate::stake::participant::{rating, ExitRecord, Staker, StakerView};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use types::errors::{validate_positive, StakeError};
use types::fee::DEFAULT_STAKE_FEE_RATE;
use types::ids::{IdSequence, ParticipantId};

/// Protocol-wide figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakeStats {
    pub period: u32,
    pub active_count: usize,
    pub exited_count: usize,
    /// Sum of active net deposits
    pub total_pool: f64,
    pub total_effective_rating: f64,
    /// Gross DAI ever deposited
    pub total_dai_in: f64,
    pub total_fees: f64,
    pub total_withdrawn: f64,
    /// Farmed units released by exits
    pub liquid_units: f64,
    /// `total_withdrawn + total_pool - (total_dai_in - total_fees)`;
    /// positive when exits have been paid more than the net deposits cover
    pub solvency_gap: f64,
}

#[derive(Debug, Clone)]
pub struct StakeEngine {
    fee_rate: f64,
    period: u32,
    active: Vec<Staker>,
    exited: Vec<ExitRecord>,
    ids: IdSequence,
    total_dai_in: f64,
    total_fees: f64,
    total_withdrawn: f64,
    liquid_units: f64,
    cached_effective_total: f64,
}

impl Default for StakeEngine {
    fn default() -> Self {
        Self::with_fee_rate(DEFAULT_STAKE_FEE_RATE)
    }
}

impl StakeEngine {
    /// Engine with a validated entry fee rate in `[0, 1)`.
    pub fn new(fee_rate: f64) -> Result<Self, StakeError> {
        if !fee_rate.is_finite() || !(0.0..1.0).contains(&fee_rate) {
            return Err(StakeError::InvalidFeeRate(fee_rate));
        }
        Ok(Self::with_fee_rate(fee_rate))
    }

    pub fn from_config(config: &StakeConfig) -> Result<Self, StakeError> {
        Self::new(config.fee_rate)
    }

    fn with_fee_rate(fee_rate: f64) -> Self {
        Self {
            fee_rate,
            period: 0,
            active: Vec::new(),
            exited: Vec::new(),
            ids: IdSequence::new(),
            total_dai_in: 0.0,
            total_fees: 0.0,
            total_withdrawn: 0.0,
            liquid_units: 0.0,
            cached_effective_total: 0.0,
        }
    }

    pub fn fee_rate(&self) -> f64 {
        self.fee_rate
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    pub fn active(&self) -> &[Staker] {
        &self.active
    }

    pub fn exited(&self) -> &[ExitRecord] {
        &self.exited
    }

    pub fn liquid_units(&self) -> f64 {
        self.liquid_units
    }

    /// Effective-rating total kept current by joins, farming and period
    /// closes. After an exit it holds the pre-removal total that priced the
    /// withdrawal.
    pub fn cached_effective_total(&self) -> f64 {
        self.cached_effective_total
    }

    fn index_of(&self, id: ParticipantId) -> Result<usize, StakeError> {
        match self.active.iter().position(|s| s.id == id) {
            Some(idx) => Ok(idx),
            None if self.exited.iter().any(|r| r.id == id) => Err(StakeError::AlreadyExited(id)),
            None => Err(StakeError::UnknownParticipant(id)),
        }
    }

    pub fn participant(&self, id: ParticipantId) -> Result<&Staker, StakeError> {
        self.index_of(id).map(|idx| &self.active[idx])
    }

    pub fn exit_record(&self, id: ParticipantId) -> Option<&ExitRecord> {
        self.exited.iter().find(|r| r.id == id)
    }

    /// Join with a gross DAI deposit; the entry fee is taken immediately.
    pub fn add_participant(
        &mut self,
        name: impl Into<String>,
        dai_deposit: f64,
        farm_rate_per_period: f64,
    ) -> Result<Staker, StakeError> {
        let dai_deposit = validate_positive(dai_deposit)?;
        if !farm_rate_per_period.is_finite() || farm_rate_per_period < 0.0 {
            return Err(StakeError::InvalidFarmRate(farm_rate_per_period));
        }

        let fee = dai_deposit * self.fee_rate;
        let staker = Staker {
            id: self.ids.next_id(),
            name: name.into(),
            dai_deposited: dai_deposit,
            fee,
            deposit: dai_deposit - fee,
            farmed_units: 0.0,
            farm_rate_per_period,
            entry_period: self.period,
        };

        self.total_dai_in += dai_deposit;
        self.total_fees += fee;
        debug!(
            id = %staker.id,
            name = %staker.name,
            dai_deposit,
            deposit = staker.deposit,
            farm_rate_per_period,
            period = self.period,
            "staker joined"
        );
        self.active.push(staker.clone());
        self.cached_effective_total = self.total_effective_rating();
        Ok(staker)
    }

    /// Credit farmed units outside the per-period accrual.
    pub fn farm(&mut self, id: ParticipantId, amount: f64) -> Result<f64, StakeError> {
        let amount = validate_positive(amount)?;
        let idx = self.index_of(id)?;
        self.active[idx].farmed_units += amount;
        self.cached_effective_total = self.total_effective_rating();
        Ok(self.active[idx].farmed_units)
    }

    pub fn rating(&self, id: ParticipantId) -> Result<f64, StakeError> {
        Ok(self.participant(id)?.rating())
    }

    pub fn effective_rating(&self, id: ParticipantId) -> Result<f64, StakeError> {
        Ok(self.participant(id)?.effective_rating())
    }

    /// Sum of active net deposits.
    pub fn total_pool(&self) -> f64 {
        self.active.iter().map(|s| s.deposit).sum()
    }

    pub fn total_effective_rating(&self) -> f64 {
        self.active.iter().map(Staker::effective_rating).sum()
    }

    /// `pool * effective / total_effective`, `0` when the total is zero.
    fn share_of(&self, effective: f64) -> f64 {
        let total = self.total_effective_rating();
        if total > 0.0 {
            self.total_pool() * effective / total
        } else {
            0.0
        }
    }

    /// What the participant would withdraw by exiting now.
    pub fn withdrawal_share(&self, id: ParticipantId) -> Result<f64, StakeError> {
        let staker = self.participant(id)?;
        Ok(self.share_of(staker.effective_rating()))
    }

    pub fn participant_view(&self, id: ParticipantId) -> Result<StakerView, StakeError> {
        let staker = self.participant(id)?;
        Ok(self.view_of(staker))
    }

    /// Views for every active participant, in join order.
    pub fn views(&self) -> Vec<StakerView> {
        self.active.iter().map(|s| self.view_of(s)).collect()
    }

    fn view_of(&self, staker: &Staker) -> StakerView {
        let effective_rating = staker.effective_rating();
        let withdrawal_share = self.share_of(effective_rating);
        StakerView {
            id: staker.id,
            name: staker.name.clone(),
            deposit: staker.deposit,
            farmed_units: staker.farmed_units,
            rating: rating(staker.deposit, staker.farmed_units),
            effective_rating,
            withdrawal_share,
            profit_loss: withdrawal_share - staker.dai_deposited,
        }
    }

    /// Pay out the participant's share and retire it.
    ///
    /// The share is computed over the active set including the leaver.
    pub fn exit_participant(&mut self, id: ParticipantId) -> Result<ExitRecord, StakeError> {
        let idx = self.index_of(id)?;
        self.cached_effective_total = self.total_effective_rating();
        let withdrawal = self.share_of(self.active[idx].effective_rating());

        let staker = self.active.remove(idx);
        let record = ExitRecord::from_staker(staker, self.period, withdrawal);

        self.total_withdrawn += withdrawal;
        self.liquid_units += record.freed_farmed_units;

        info!(
            id = %record.id,
            name = %record.name,
            period = self.period,
            rating = record.rating_at_exit,
            withdrawal,
            pl = record.profit_loss_at_exit,
            "staker exited"
        );
        self.exited.push(record.clone());
        Ok(record)
    }

    /// Close the current period: accrue farming for every active
    /// participant with a positive rate.
    pub fn step_period(&mut self) {
        self.period += 1;
        for staker in self.active.iter_mut().filter(|s| s.farm_rate_per_period > 0.0) {
            staker.farmed_units += staker.farm_rate_per_period;
        }
        self.cached_effective_total = self.total_effective_rating();
        debug!(
            period = self.period,
            active = self.active.len(),
            pool = self.total_pool(),
            effective_total = self.cached_effective_total,
            "period closed"
        );
    }

    pub fn step_periods(&mut self, periods: u32) {
        for _ in 0..periods {
            self.step_period();
        }
    }

    pub fn stats(&self) -> StakeStats {
        let total_pool = self.total_pool();
        StakeStats {
            period: self.period,
            active_count: self.active.len(),
            exited_count: self.exited.len(),
            total_pool,
            total_effective_rating: self.total_effective_rating(),
            total_dai_in: self.total_dai_in,
            total_fees: self.total_fees,
            total_withdrawn: self.total_withdrawn,
            liquid_units: self.liquid_units,
            solvency_gap: self.total_withdrawn + total_pool - (self.total_dai_in - self.total_fees),
        }
    }

    /// Back to period zero with no participants; the fee rate is kept.
    pub fn reset(&mut self) {
        *self = Self::with_fee_rate(self.fee_rate);
        debug!("stake engine reset");
    }
}

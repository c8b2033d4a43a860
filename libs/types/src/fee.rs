//! Fee calculation types
//!
//! Pool fees are expressed in percent (`0.3` means 0.3%). Buys are charged
//! on the input leg, sells on the output leg.

use crate::errors::PoolError;
use serde::{Deserialize, Serialize};

/// Default pool fee for both directions, in percent
pub const DEFAULT_POOL_FEE_PCT: f64 = 0.3;

/// Default staking entry fee, as a fraction of the gross deposit
pub const DEFAULT_STAKE_FEE_RATE: f64 = 0.05;

/// Buy/sell fee configuration for the AMM pool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub buy_fee_pct: f64,
    pub sell_fee_pct: f64,
}

impl FeeSchedule {
    /// Build a validated schedule
    pub fn new(buy_fee_pct: f64, sell_fee_pct: f64) -> Result<Self, PoolError> {
        let schedule = Self { buy_fee_pct, sell_fee_pct };
        schedule.validate()?;
        Ok(schedule)
    }

    /// A schedule that charges nothing
    pub fn zero() -> Self {
        Self { buy_fee_pct: 0.0, sell_fee_pct: 0.0 }
    }

    /// Both rates must be finite and within `[0, 100)`
    pub fn validate(&self) -> Result<(), PoolError> {
        for fee_pct in [self.buy_fee_pct, self.sell_fee_pct] {
            if !fee_pct.is_finite() || !(0.0..100.0).contains(&fee_pct) {
                return Err(PoolError::InvalidFee { fee_pct });
            }
        }
        Ok(())
    }

    /// Fee taken from a buy's asset A input
    pub fn buy_fee(&self, amount_in: f64) -> f64 {
        amount_in * (self.buy_fee_pct / 100.0)
    }

    /// Fee taken from a sell's gross asset A output
    pub fn sell_fee(&self, gross_out: f64) -> f64 {
        gross_out * (self.sell_fee_pct / 100.0)
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            buy_fee_pct: DEFAULT_POOL_FEE_PCT,
            sell_fee_pct: DEFAULT_POOL_FEE_PCT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fee_calculation() {
        let schedule = FeeSchedule::default();
        assert!((schedule.buy_fee(1000.0) - 3.0).abs() < 1e-12);
        assert!((schedule.sell_fee(500.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_schedule() {
        let schedule = FeeSchedule::zero();
        assert_eq!(schedule.buy_fee(1000.0), 0.0);
        assert_eq!(schedule.sell_fee(1000.0), 0.0);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(FeeSchedule::new(-0.1, 0.3).is_err());
        assert!(FeeSchedule::new(0.3, 100.0).is_err());
        assert!(FeeSchedule::new(f64::NAN, 0.3).is_err());
        assert!(FeeSchedule::new(1.0, 2.5).is_ok());
    }

    proptest! {
        #[test]
        fn prop_fee_never_exceeds_amount(pct in 0.0f64..100.0, amount in 0.0f64..1e12) {
            let schedule = FeeSchedule::new(pct, pct).unwrap();
            let fee = schedule.buy_fee(amount);
            prop_assert!(fee >= 0.0);
            prop_assert!(fee <= amount);
            prop_assert_eq!(schedule.sell_fee(amount), fee);
        }
    }
}

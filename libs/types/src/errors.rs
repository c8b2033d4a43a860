//! Error types for the tokenomics engines
//!
//! Comprehensive error taxonomy using thiserror. Every rejection leaves the
//! engine state untouched.

use crate::ids::ParticipantId;
use thiserror::Error;

/// Top-level engine error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Participant error: {0}")]
    Participant(#[from] ParticipantError),

    #[error("Stake error: {0}")]
    Stake(#[from] StakeError),
}

/// Amount validation errors shared by every engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmountError {
    #[error("Amount must be positive: {0}")]
    NonPositive(f64),

    #[error("Amount must not be negative: {0}")]
    Negative(f64),

    #[error("Amount must be a finite number")]
    NotFinite,
}

/// Pool (AMM curve) errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoolError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("Insufficient {asset} balance: required {required}, available {available}")]
    InsufficientBalance {
        asset: String,
        required: f64,
        available: f64,
    },

    #[error("Degenerate pool state: reserve_a {reserve_a}, reserve_b {reserve_b}")]
    DegenerateState { reserve_a: f64, reserve_b: f64 },

    #[error("Invalid fee: {fee_pct}% (must be within [0, 100))")]
    InvalidFee { fee_pct: f64 },
}

/// Market roster errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParticipantError {
    #[error("Unknown participant: {0}")]
    Unknown(ParticipantId),

    #[error("Invalid starting balance: {0}")]
    InvalidBalance(#[from] AmountError),

    #[error("Participant {0} holds nothing to sell")]
    NothingToSell(ParticipantId),
}

/// Staking protocol errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StakeError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("Unknown participant: {0}")]
    UnknownParticipant(ParticipantId),

    #[error("Participant {0} has already exited")]
    AlreadyExited(ParticipantId),

    #[error("Invalid farm rate: {0}")]
    InvalidFarmRate(f64),

    #[error("Invalid fee rate: {0} (must be within [0, 1))")]
    InvalidFeeRate(f64),
}

/// Check that an amount is finite and strictly positive.
pub fn validate_positive(amount: f64) -> Result<f64, AmountError> {
    if !amount.is_finite() {
        return Err(AmountError::NotFinite);
    }
    if amount <= 0.0 {
        return Err(AmountError::NonPositive(amount));
    }
    Ok(amount)
}

/// Check that an amount is finite and not negative.
pub fn validate_non_negative(amount: f64) -> Result<f64, AmountError> {
    if !amount.is_finite() {
        return Err(AmountError::NotFinite);
    }
    if amount < 0.0 {
        return Err(AmountError::Negative(amount));
    }
    Ok(amount)
}

//! Staking protocol
//!
//! Deposits weighted by a farming rating share a common pool; exits are
//! paid out of whatever the active set has deposited.

pub mod engine;
pub mod participant;

pub use engine::{StakeEngine, StakeStats};
pub use participant::{rating, ExitRecord, Staker, StakerView};

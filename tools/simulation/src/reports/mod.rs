//! Report modules for simulation output
//!
//! Crowding (spot vs realized exit value) and per-participant profitability.

pub mod profitability;
pub mod slippage;

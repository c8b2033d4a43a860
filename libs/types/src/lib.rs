//! Types library for the tokenomics engines
//!
//! Shared value types used by the AMM pool, market simulator, settlement
//! valuator and staking engine.
//!
//! # Modules
//! - `ids`: Participant identifiers and the monotonic id allocator
//! - `trade`: Trade side, trade log records and pool state captures
//! - `fee`: Pool fee schedule and staking fee defaults
//! - `strategy`: Trader strategies and their constant parameters
//! - `errors`: Error taxonomy

// Public modules
pub mod ids;
pub mod trade;
pub mod fee;
pub mod strategy;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::trade::*;
    pub use crate::fee::*;
    pub use crate::strategy::*;
    pub use crate::errors::*;
}

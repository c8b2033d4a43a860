//! Market simulation
//!
//! A roster of strategy-driven traders stepping day by day against the AMM
//! pool, with trade history and daily joint-settlement snapshots.

pub mod simulator;
pub mod snapshot;
pub mod trader;

pub use simulator::{decide_trade, MarketSimulator, StepSummary, TradeIntent};
pub use snapshot::{DailySnapshot, ParticipantSnapshot};
pub use trader::{Trader, DEFAULT_ROSTER};

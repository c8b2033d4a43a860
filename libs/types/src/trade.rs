//! Trade execution records
//!
//! A trade is always between one participant and the pool; asset A is the
//! cash side (DAI), asset B the held token (CLNDAI).

use crate::ids::ParticipantId;
use serde::{Deserialize, Serialize};

/// Trade direction from the participant's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Asset A in, asset B out
    BUY,
    /// Asset B in, asset A out
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::BUY => "BUY",
            Side::SELL => "SELL",
        }
    }
}

/// Pool reserves captured right after a trade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolState {
    pub reserve_a: f64,
    pub reserve_b: f64,
}

impl PoolState {
    /// Spot price of asset B in units of asset A
    pub fn price(&self) -> f64 {
        if self.reserve_b > 0.0 {
            self.reserve_a / self.reserve_b
        } else {
            0.0
        }
    }
}

/// Immutable trade log entry.
///
/// `amount_in` is denominated in the asset the participant paid
/// (A for buys, B for sells), `amount_out` in the asset received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub sequence: u64,
    pub day: u32,
    pub participant_id: ParticipantId,
    pub participant_name: String,
    pub side: Side,
    pub amount_in: f64,
    pub amount_out: f64,
    pub effective_price: f64,
    pub fee: f64,
    pub pool_after: PoolState,
}

impl TradeRecord {
    /// Asset A value that crossed the pool boundary (the volume figure)
    pub fn volume_a(&self) -> f64 {
        match self.side {
            Side::BUY => self.amount_in,
            Side::SELL => self.amount_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(side: Side) -> TradeRecord {
        TradeRecord {
            sequence: 1,
            day: 3,
            participant_id: ParticipantId::new(1),
            participant_name: "alice".to_string(),
            side,
            amount_in: 100.0,
            amount_out: 900.0,
            effective_price: 100.0 / 900.0,
            fee: 0.3,
            pool_after: PoolState { reserve_a: 10_100.0, reserve_b: 99_100.0 },
        }
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::BUY.opposite(), Side::SELL);
        assert_eq!(Side::SELL.opposite(), Side::BUY);
    }

    #[test]
    fn test_side_serialization() {
        assert_eq!(serde_json::to_string(&Side::BUY).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&Side::SELL).unwrap(), "\"SELL\"");
    }

    #[test]
    fn test_volume_is_asset_a_leg() {
        assert_eq!(record(Side::BUY).volume_a(), 100.0);
        assert_eq!(record(Side::SELL).volume_a(), 900.0);
    }

    #[test]
    fn test_pool_state_price() {
        let state = PoolState { reserve_a: 10_000.0, reserve_b: 100_000.0 };
        assert!((state.price() - 0.1).abs() < 1e-12);
        let empty = PoolState { reserve_a: 10.0, reserve_b: 0.0 };
        assert_eq!(empty.price(), 0.0);
    }
}

//! Daily valuation snapshots

use serde::{Deserialize, Serialize};
use types::ids::ParticipantId;

/// One participant's position at the end of a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSnapshot {
    pub id: ParticipantId,
    pub name: String,
    pub balance_a: f64,
    pub balance_b: f64,
    /// Spot valuation `balance_a + balance_b * price`
    pub total_value: f64,
    /// Realized P/L if every participant liquidated at once
    pub pl: f64,
}

/// End-of-day record, one per simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub day: u32,
    pub price: f64,
    pub participants: Vec<ParticipantSnapshot>,
}

impl DailySnapshot {
    pub fn participant(&self, id: ParticipantId) -> Option<&ParticipantSnapshot> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Sum of joint-settlement P/L across the roster
    pub fn total_pl(&self) -> f64 {
        self.participants.iter().map(|p| p.pl).sum()
    }
}

//! Identifier types for simulation participants
//!
//! Ids are plain monotonic integers handed out by the engine that owns the
//! roster, so two runs with the same inputs produce the same ids.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a market trader or a staker
///
/// Unique only within the engine that allocated it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(u64);

impl ParticipantId {
    /// Wrap a raw id value
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ParticipantId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Monotonic id allocator.
///
/// The first id handed out is `1`; `reset` starts the sequence over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSequence {
    last: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id
    pub fn next_id(&mut self) -> ParticipantId {
        self.last += 1;
        ParticipantId(self.last)
    }

    /// Last id allocated, if any
    pub fn last(&self) -> Option<ParticipantId> {
        (self.last > 0).then_some(ParticipantId(self.last))
    }

    pub fn reset(&mut self) {
        self.last = 0;
    }
}

//! Snapshot serialization — read-only view of a race in flight.
//!
//! A snapshot is a deep copy: mutating it never affects the engine.

use crate::{
    engine::RaceStatus,
    participant::Participant,
    types::{ElapsedMs, ParticipantId, Tick},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RaceSnapshot {
    pub tick:         Tick,
    pub status:       RaceStatus,
    pub elapsed_ms:   ElapsedMs,
    pub segments:     u32,
    pub participants: Vec<Participant>,
    pub finish_order: Vec<ParticipantId>,
}

impl RaceSnapshot {
    /// Current leader by progress; earliest-registered wins ties.
    pub fn leader(&self) -> Option<&Participant> {
        self.participants
            .iter()
            .reduce(|best, p| if p.progress > best.progress { p } else { best })
    }
}

//! Outbound notifications — the race engine's external contract.
//!
//! RULE: Payloads are snapshots. Observers get clones of participant
//! state, never a live reference into the engine.

use crate::{
    catalog::EventDefinition,
    config::{RaceType, TrackLength},
    participant::Participant,
    standings::Standing,
    types::{ElapsedMs, Tick},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RaceEvent {
    Initialized {
        participants: Vec<Participant>,
        race_type:    RaceType,
        track_length: TrackLength,
        segments:     u32,
    },
    RaceStart {
        participants: Vec<Participant>,
        start_time:   DateTime<Utc>,
    },
    TickUpdate {
        tick:         Tick,
        participants: Vec<Participant>,
    },
    RacerFinish {
        tick:        Tick,
        /// 1-based crossing order.
        place:       u32,
        participant: Participant,
    },
    EventHappened {
        tick:           Tick,
        participant:    Participant,
        event:          EventDefinition,
        description:    String,
        progress_delta: f64,
    },
    LogEvent {
        message:    String,
        highlight:  bool,
        elapsed_ms: ElapsedMs,
    },
    RaceEnd {
        standings:   Vec<Standing>,
        duration_ms: ElapsedMs,
        ticks:       Tick,
        /// True when the tick safety valve ended the race.
        forced:      bool,
    },
}

impl RaceEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Initialized { .. }   => EventKind::Initialized,
            Self::RaceStart { .. }     => EventKind::RaceStart,
            Self::TickUpdate { .. }    => EventKind::TickUpdate,
            Self::RacerFinish { .. }   => EventKind::RacerFinish,
            Self::EventHappened { .. } => EventKind::EventHappened,
            Self::LogEvent { .. }      => EventKind::LogEvent,
            Self::RaceEnd { .. }       => EventKind::RaceEnd,
        }
    }
}

/// Subscription key, one per `RaceEvent` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Initialized,
    RaceStart,
    TickUpdate,
    RacerFinish,
    EventHappened,
    LogEvent,
    RaceEnd,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        Self::Initialized,
        Self::RaceStart,
        Self::TickUpdate,
        Self::RacerFinish,
        Self::EventHappened,
        Self::LogEvent,
        Self::RaceEnd,
    ];

    /// Stable wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialized   => "initialized",
            Self::RaceStart     => "raceStart",
            Self::TickUpdate    => "tickUpdate",
            Self::RacerFinish   => "racerFinish",
            Self::EventHappened => "eventHappened",
            Self::LogEvent      => "logEvent",
            Self::RaceEnd       => "raceEnd",
        }
    }
}

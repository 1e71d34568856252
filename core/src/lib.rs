//! derby-core — tick-driven race simulation engine.
//!
//! Entrants advance along a fixed-length track, buffeted by random events
//! and time-limited effects, until everyone finishes or the tick safety
//! limit is reached. Hosts drive `RaceEngine::tick` at their own cadence
//! and observe the race through the typed event bus.

pub mod bus;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod effects;
pub mod engine;
pub mod error;
pub mod event;
pub mod event_engine;
pub mod movement;
pub mod name_generator;
pub mod participant;
pub mod race;
pub mod rng;
pub mod snapshot;
pub mod speed;
pub mod standings;
pub mod types;

pub use bus::{EventBus, SubscriptionId};
pub use config::{EngineSettings, EventOdds, RaceConfig, RaceType, TrackLength};
pub use engine::{RaceEngine, RaceStatus};
pub use error::{RaceError, RaceResult};
pub use event::{EventKind, RaceEvent};
pub use participant::{Participant, ParticipantInput, Stats};
pub use rng::{RaceRng, RandomSource};
pub use standings::Standing;

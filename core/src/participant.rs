//! Race entrants — inbound records and live participant state.

use crate::{
    effects::Effect,
    movement::{MotionHint, MovementPattern},
    types::{Asset, ElapsedMs, ParticipantId, Tick},
};
use serde::{Deserialize, Serialize};

/// Stat bundle produced by the character-generation collaborator.
/// Documented range is 1–10 inclusive; values outside it are not rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub speed:        i32,
    pub strength:     i32,
    pub wisdom:       i32,
    pub recklessness: i32,
    pub stamina:      i32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            speed:        5,
            strength:     5,
            wisdom:       5,
            recklessness: 5,
            stamina:      5,
        }
    }
}

/// One entrant as handed to `init_race`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInput {
    pub id:     ParticipantId,
    #[serde(default)]
    pub name:   Option<String>,
    pub stats:  Stats,
    #[serde(default)]
    pub sprite: Asset,
    #[serde(default)]
    pub image:  Asset,
}

impl ParticipantInput {
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>, stats: Stats) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            stats,
            sprite: Asset::Null,
            image: Asset::Null,
        }
    }
}

/// Live race state for one entrant. Owned and mutated by the engine only;
/// observers receive clones inside bus notifications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id:             ParticipantId,
    pub name:           String,
    pub stats:          Stats,
    pub sprite:         Asset,
    pub image:          Asset,
    /// Segments covered. Never negative; equals `segments` once finished.
    pub progress:       f64,
    /// `progress / segments * 100`, display only.
    pub position:       f64,
    /// Effective advancement this tick.
    pub speed:          f64,
    pub base_speed:     f64,
    pub finished:       bool,
    pub finish_time:    Option<ElapsedMs>,
    pub finish_tick:    Option<Tick>,
    /// Insertion order = application order.
    pub active_effects: Vec<Effect>,
    pub movement:       MovementPattern,
    pub motion:         MotionHint,
    /// Animation tag of the last event that hit this participant.
    pub cosmetic:       Option<String>,
}

impl Participant {
    pub fn new(input: ParticipantInput, name: String, base_speed: f64) -> Self {
        Self {
            id: input.id,
            name,
            stats: input.stats,
            sprite: input.sprite,
            image: input.image,
            progress: 0.0,
            position: 0.0,
            speed: base_speed,
            base_speed,
            finished: false,
            finish_time: None,
            finish_tick: None,
            active_effects: Vec::new(),
            movement: MovementPattern::Normal,
            motion: MotionHint::default(),
            cosmetic: None,
        }
    }
}

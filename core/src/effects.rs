//! Effect processor — time-limited modifiers attached to a participant.
//!
//! Every tick, for each racing participant, before progress is computed:
//!   1. speed ← base_speed, movement ← normal
//!   2. apply effects in attachment order (multipliers compound,
//!      the last movement effect wins)
//!   3. decrement every effect; prune those that reach zero
//!   4. clamp speed to SPEED_FLOOR

use crate::{config::SPEED_FLOOR, movement::MovementPattern, participant::Participant};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum EffectKind {
    SpeedMultiplier(f64),
    Movement(MovementPattern),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    pub name:       String,
    pub kind:       EffectKind,
    pub ticks_left: u32,
}

/// Resolve this tick's effects. Returns the effects that expired, in
/// attachment order, for the caller to announce.
pub fn apply_effects(participant: &mut Participant) -> Vec<Effect> {
    participant.speed = participant.base_speed;
    participant.movement = MovementPattern::Normal;

    for effect in &mut participant.active_effects {
        match effect.kind {
            EffectKind::SpeedMultiplier(m) => participant.speed *= m,
            EffectKind::Movement(pattern) => participant.movement = pattern,
        }
        effect.ticks_left = effect.ticks_left.saturating_sub(1);
    }

    let mut expired = Vec::new();
    participant.active_effects.retain(|e| {
        if e.ticks_left == 0 {
            expired.push(e.clone());
            false
        } else {
            true
        }
    });

    participant.speed = participant.speed.max(SPEED_FLOOR);
    expired
}

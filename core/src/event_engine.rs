//! Random event engine.
//!
//! Draw order per attempt (fixed; seeded replays depend on it):
//!   1. fire?      U[0,1) < chaos_factor
//!   2. tier       U[0,1) < CHAOS_TIER_PROBABILITY → chaos, else standard
//!   3. polarity   U[0,1) < positive_event_probability → positive
//!   4. pick       uniform over the matching catalog entries
//!   5. apply      instant progress draw (if any), then effects attach

use crate::{
    catalog::{EventCatalog, EventDefinition, Polarity, Tier},
    config::{EventOdds, CHAOS_TIER_PROBABILITY, EVENT_TICK_INTERVAL},
    participant::Participant,
    rng::RandomSource,
    types::Tick,
};

/// Outcome of an event that fired.
#[derive(Debug, Clone, PartialEq)]
pub struct FiredEvent {
    pub definition:     EventDefinition,
    pub description:    String,
    pub progress_delta: f64,
}

/// Events are throttled to even ticks.
pub fn is_event_tick(tick: Tick) -> bool {
    tick % EVENT_TICK_INTERVAL == 0
}

pub fn maybe_fire_event(
    participant: &mut Participant,
    odds: &EventOdds,
    catalog: &EventCatalog,
    rng: &mut dyn RandomSource,
) -> Option<FiredEvent> {
    if rng.next_f64() >= odds.chaos_factor {
        return None;
    }

    let tier = if rng.chance(CHAOS_TIER_PROBABILITY) {
        Tier::Chaos
    } else {
        Tier::Standard
    };
    let polarity = if rng.chance(odds.positive_event_probability) {
        Polarity::Positive
    } else {
        Polarity::Negative
    };

    let candidates: Vec<&EventDefinition> = catalog.candidates(tier, polarity).collect();
    if candidates.is_empty() {
        log::warn!("no {polarity:?} events in the {tier:?} tier; skipping roll");
        return None;
    }
    let definition = (*candidates.get(rng.index_below(candidates.len()))?).clone();

    let progress_delta = definition.apply(participant, rng);
    participant.cosmetic = Some(definition.animation.clone());
    let description = definition.describe(&participant.name);

    Some(FiredEvent {
        definition,
        description,
        progress_delta,
    })
}

//! Event catalog — the fixed table of random occurrences.
//!
//! Definitions are pure data: an optional instant progress range plus
//! zero or more effect descriptors. `EventDefinition::apply` is the only
//! place those descriptors are interpreted.
//!
//! RULE: Every tier × polarity combination must have at least one entry.
//! `builtin()` satisfies this by construction; loaded catalogs are checked.

use crate::{
    effects::{Effect, EffectKind},
    error::{RaceError, RaceResult},
    movement::MovementPattern,
    participant::Participant,
    rng::RandomSource,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Substituted with the participant's name in descriptions.
pub const NAME_PLACEHOLDER: &str = "{name}";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Standard,
    Chaos,
}

/// Inclusive-exclusive range of an instant progress change, in segments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DeltaRange {
    pub min: f64,
    pub max: f64,
}

/// Effect attached when the event fires.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectSpec {
    pub name:  String,
    pub kind:  EffectKind,
    pub ticks: u32,
}

impl EffectSpec {
    pub fn instantiate(&self) -> Effect {
        Effect {
            name:       self.name.clone(),
            kind:       self.kind,
            ticks_left: self.ticks,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EventEffect {
    #[serde(default)]
    pub progress: Option<DeltaRange>,
    #[serde(default)]
    pub effects:  Vec<EffectSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventDefinition {
    pub name:        String,
    /// Contains `{name}` where the participant's name goes.
    pub description: String,
    pub polarity:    Polarity,
    pub tier:        Tier,
    /// Renderer-only animation tag.
    pub animation:   String,
    pub effect:      EventEffect,
}

impl EventDefinition {
    pub fn validate(&self) -> RaceResult<()> {
        let invalid = |reason: String| -> RaceResult<()> {
            Err(RaceError::InvalidConfig(format!("event {:?}: {reason}", self.name)))
        };
        if let Some(range) = self.effect.progress {
            if !range.min.is_finite() || !range.max.is_finite() {
                return invalid(format!("progress range {}..{} is not finite", range.min, range.max));
            }
            if range.min > range.max {
                return invalid(format!("progress range {}..{} is inverted", range.min, range.max));
            }
        }
        for spec in &self.effect.effects {
            if spec.ticks == 0 {
                return invalid(format!("effect {:?} lasts zero ticks", spec.name));
            }
            if let EffectKind::SpeedMultiplier(m) = spec.kind {
                if !m.is_finite() || m < 0.0 {
                    return invalid(format!("effect {:?} has multiplier {m}", spec.name));
                }
            }
        }
        Ok(())
    }

    pub fn describe(&self, participant_name: &str) -> String {
        self.description.replace(NAME_PLACEHOLDER, participant_name)
    }

    /// Apply this event to `participant`. Returns the net progress change
    /// after clamping at zero.
    pub fn apply(&self, participant: &mut Participant, rng: &mut dyn RandomSource) -> f64 {
        let before = participant.progress;
        if let Some(range) = self.effect.progress {
            let delta = rng.uniform(range.min, range.max);
            participant.progress = (before + delta).max(0.0);
        }
        participant
            .active_effects
            .extend(self.effect.effects.iter().map(EffectSpec::instantiate));
        participant.progress - before
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventCatalog {
    events: Vec<EventDefinition>,
}

impl EventCatalog {
    pub fn new(events: Vec<EventDefinition>) -> RaceResult<Self> {
        let catalog = Self { events };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> RaceResult<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> RaceResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Every tier × polarity bucket is populated and every definition is
    /// well formed: finite, ordered progress ranges; finite, non-negative
    /// multipliers; effects lasting at least one tick.
    pub fn validate(&self) -> RaceResult<()> {
        for event in &self.events {
            event.validate()?;
        }
        for tier in [Tier::Standard, Tier::Chaos] {
            for polarity in [Polarity::Positive, Polarity::Negative] {
                if self.candidates(tier, polarity).next().is_none() {
                    return Err(RaceError::IncompleteCatalog { tier, polarity });
                }
            }
        }
        Ok(())
    }

    pub fn events(&self) -> &[EventDefinition] {
        &self.events
    }

    pub fn candidates(
        &self,
        tier: Tier,
        polarity: Polarity,
    ) -> impl Iterator<Item = &EventDefinition> + '_ {
        self.events
            .iter()
            .filter(move |e| e.tier == tier && e.polarity == polarity)
    }

    /// The shipped event table.
    pub fn builtin() -> Self {
        use MovementPattern::{Confused, Dazed, Warped};
        use Polarity::{Negative, Positive};
        use Tier::{Chaos, Standard};

        let events = vec![
            // ── Standard, positive ─────────────────────────────
            def("Tailwind", "A gust of wind pushes {name} forward!", Positive, Standard, "wind",
                None, vec![speed("Tailwind", 1.5, 3)]),
            def("Second Wind", "{name} finds a second wind!", Positive, Standard, "sparkle",
                Some((0.5, 1.5)), vec![]),
            def("Shortcut", "{name} spots a shortcut through the hedge!", Positive, Standard, "dash",
                Some((1.0, 2.0)), vec![]),
            def("Energy Drink", "{name} chugs an energy drink!", Positive, Standard, "glow",
                None, vec![speed("Energy Drink", 1.3, 4)]),
            // ── Standard, negative ─────────────────────────────
            def("Stumble", "{name} trips over their own feet!", Negative, Standard, "stumble",
                Some((-1.5, -0.5)), vec![]),
            def("Muddy Patch", "{name} gets stuck in a muddy patch!", Negative, Standard, "mud",
                None, vec![speed("Muddy Patch", 0.6, 3)]),
            def("Distracted", "{name} stops to look at a butterfly.", Negative, Standard, "question",
                None, vec![speed("Distracted", 0.5, 2), moving("Distracted", Confused, 2)]),
            def("Cramp", "{name} pulls up with a cramp!", Negative, Standard, "sweat",
                Some((-0.8, -0.3)), vec![speed("Cramp", 0.7, 3)]),
            // ── Chaos, positive ────────────────────────────────
            def("Wormhole", "A wormhole swallows {name} and spits them out further ahead!",
                Positive, Chaos, "portal",
                Some((2.0, 4.0)), vec![moving("Warped", Warped, 2)]),
            def("Rocket Boots", "{name} straps on rocket boots!", Positive, Chaos, "rocket",
                None, vec![speed("Rocket Boots", 2.5, 3)]),
            def("Sugar Rush", "{name} raids the snack table!", Positive, Chaos, "sugar",
                None, vec![speed("Sugar Rush", 1.8, 4), moving("Jittery", Confused, 4)]),
            // ── Chaos, negative ────────────────────────────────
            def("Banana Storm", "It's raining bananas on {name}!", Negative, Chaos, "banana",
                Some((-4.0, -2.0)), vec![moving("Dazed", Dazed, 3)]),
            def("Gravity Flip", "Gravity flips for {name}!", Negative, Chaos, "flip",
                None, vec![speed("Gravity Flip", 0.3, 3), moving("Upside Down", Warped, 3)]),
            def("Black Hole", "{name} is dragged back by a tiny black hole!", Negative, Chaos, "vortex",
                Some((-5.0, -3.0)), vec![]),
        ];

        Self { events }
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn def(
    name: &str,
    description: &str,
    polarity: Polarity,
    tier: Tier,
    animation: &str,
    progress: Option<(f64, f64)>,
    effects: Vec<EffectSpec>,
) -> EventDefinition {
    EventDefinition {
        name: name.to_string(),
        description: description.to_string(),
        polarity,
        tier,
        animation: animation.to_string(),
        effect: EventEffect {
            progress: progress.map(|(min, max)| DeltaRange { min, max }),
            effects,
        },
    }
}

fn speed(name: &str, multiplier: f64, ticks: u32) -> EffectSpec {
    EffectSpec { name: name.to_string(), kind: EffectKind::SpeedMultiplier(multiplier), ticks }
}

fn moving(name: &str, pattern: MovementPattern, ticks: u32) -> EffectSpec {
    EffectSpec { name: name.to_string(), kind: EffectKind::Movement(pattern), ticks }
}

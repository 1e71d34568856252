//! Race configuration — closed category/length tables and engine settings.
//!
//! RULE: The literal values in this file define observable race pacing.
//! Change them only deliberately; tests pin several of them.

use crate::{
    clock::TimeSource,
    error::{RaceError, RaceResult},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ── Load-bearing constants ─────────────────────────────────────────

/// Effective speed never drops below this after effects are applied.
pub const SPEED_FLOOR: f64 = 0.05;
/// Progress added per tick is at least this, even at floor speed.
pub const MIN_PROGRESS_PER_TICK: f64 = 0.15;
/// Share of fired events drawn from the chaos tier.
pub const CHAOS_TIER_PROBABILITY: f64 = 0.3;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 600;
/// Race is forced to end once the tick counter exceeds `segments × this`.
pub const SAFETY_TICK_MULTIPLIER: u64 = 10;
pub const MIN_PARTICIPANTS: usize = 2;
/// Random events roll only on ticks divisible by this.
pub const EVENT_TICK_INTERVAL: u64 = 2;

// ── Race category ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RaceType {
    #[default]
    Standard,
    Chaos,
    Endurance,
}

/// Per-category event odds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EventOdds {
    /// Probability an event fires per eligible tick, per participant.
    pub chaos_factor: f64,
    /// Probability a fired event is beneficial.
    pub positive_event_probability: f64,
}

impl EventOdds {
    pub fn validate(&self) -> RaceResult<()> {
        for (label, p) in [
            ("chaos_factor", self.chaos_factor),
            ("positive_event_probability", self.positive_event_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(RaceError::InvalidConfig(format!(
                    "{label} must be within [0, 1], got {p}"
                )));
            }
        }
        Ok(())
    }
}

impl RaceType {
    pub const ALL: [RaceType; 3] = [Self::Standard, Self::Chaos, Self::Endurance];

    pub fn odds(&self) -> EventOdds {
        match self {
            Self::Standard  => EventOdds { chaos_factor: 0.25, positive_event_probability: 0.5 },
            Self::Chaos     => EventOdds { chaos_factor: 0.6,  positive_event_probability: 0.4 },
            Self::Endurance => EventOdds { chaos_factor: 0.15, positive_event_probability: 0.55 },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard  => "standard",
            Self::Chaos     => "chaos",
            Self::Endurance => "endurance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name().eq_ignore_ascii_case(s))
    }
}

// ── Track length ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrackLength {
    #[default]
    Short,
    Medium,
    Long,
}

impl TrackLength {
    pub const ALL: [TrackLength; 3] = [Self::Short, Self::Medium, Self::Long];

    pub fn segments(&self) -> u32 {
        match self {
            Self::Short  => 20,
            Self::Medium => 35,
            Self::Long   => 50,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Short  => "short",
            Self::Medium => "medium",
            Self::Long   => "long",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name().eq_ignore_ascii_case(s))
    }
}

// ── Resolved race configuration ────────────────────────────────────

/// Resolved once at `init_race`; immutable for the rest of the race.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RaceConfig {
    pub race_type:    RaceType,
    pub track_length: TrackLength,
    pub segments:     u32,
    pub odds:         EventOdds,
}

impl RaceConfig {
    pub fn resolve(race_type: RaceType, track_length: TrackLength) -> Self {
        Self {
            race_type,
            track_length,
            segments: track_length.segments(),
            odds: race_type.odds(),
        }
    }

    /// Replace the category's event odds.
    pub fn with_odds(mut self, odds: EventOdds) -> Self {
        self.odds = odds;
        self
    }

    pub fn segments_f64(&self) -> f64 {
        f64::from(self.segments)
    }

    /// The tick count past which the race is forced to end.
    pub fn safety_tick_limit(&self) -> u64 {
        u64::from(self.segments) * SAFETY_TICK_MULTIPLIER
    }
}

// ── Engine settings ────────────────────────────────────────────────

/// Host-facing engine settings. Loadable from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub tick_interval_ms: u64,
    /// `None` draws a fresh seed per race.
    pub seed:             Option<u64>,
    pub time_source:      TimeSource,
    /// Overrides the race category's odds for every race this engine runs.
    pub odds_override:    Option<EventOdds>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            seed:             None,
            time_source:      TimeSource::Wall,
            odds_override:    None,
        }
    }
}

impl EngineSettings {
    /// Deterministic settings: fixed seed, simulated time.
    pub fn deterministic(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            time_source: TimeSource::Simulated,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> RaceResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> RaceResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> RaceResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(RaceError::InvalidConfig(
                "tick_interval_ms must be > 0".to_string(),
            ));
        }
        if let Some(odds) = &self.odds_override {
            odds.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_maps_literal_tables() {
        let cfg = RaceConfig::resolve(RaceType::Chaos, TrackLength::Long);
        assert_eq!(cfg.segments, 50);
        assert_eq!(cfg.odds, RaceType::Chaos.odds());
        assert_eq!(cfg.safety_tick_limit(), 500);
    }

    #[test]
    fn every_category_has_valid_odds() {
        for t in RaceType::ALL {
            t.odds().validate().unwrap();
        }
    }

    #[test]
    fn parse_round_trips_names() {
        for t in RaceType::ALL {
            assert_eq!(RaceType::parse(t.name()), Some(t));
        }
        for l in TrackLength::ALL {
            assert_eq!(TrackLength::parse(l.name()), Some(l));
        }
        assert_eq!(TrackLength::parse("MEDIUM"), Some(TrackLength::Medium));
        assert_eq!(RaceType::parse("drag"), None);
    }

    #[test]
    fn settings_load_from_partial_json() {
        let s = EngineSettings::from_json_str(
            r#"{ "seed": 42, "time_source": "simulated",
                 "odds_override": { "chaos_factor": 1.0, "positive_event_probability": 0.0 } }"#,
        )
        .unwrap();
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);
        assert_eq!(s.time_source, TimeSource::Simulated);
    }

    #[test]
    fn settings_reject_bad_odds() {
        let err = EngineSettings::from_json_str(
            r#"{ "odds_override": { "chaos_factor": 1.5, "positive_event_probability": 0.5 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, RaceError::InvalidConfig(_)));
    }

    #[test]
    fn settings_reject_zero_interval() {
        let err = EngineSettings::from_json_str(r#"{ "tick_interval_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, RaceError::InvalidConfig(_)));
    }
}

//! Race state — the mutable entity set for one race.

use crate::{
    config::{RaceConfig, SPEED_FLOOR},
    name_generator::NameGenerator,
    participant::{Participant, ParticipantInput},
    rng::RandomSource,
    speed::calculate_base_speed,
    standings::Standing,
    types::ParticipantId,
};

/// A name that was replaced during initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRepair {
    pub id:          ParticipantId,
    pub original:    Option<String>,
    pub replacement: String,
}

#[derive(Debug, Clone)]
pub struct RaceState {
    pub config:       RaceConfig,
    /// Registration order; ticks process participants in this order.
    pub participants: Vec<Participant>,
    /// Ids in the order they crossed the line.
    pub finish_order: Vec<ParticipantId>,
    /// Set once, when the race finishes.
    pub standings:    Option<Vec<Standing>>,
}

impl RaceState {
    /// Build fresh participants from inbound records. Draws, per entrant
    /// in order: fallback name (only when repairing), then base speed.
    pub fn init(
        inputs: Vec<ParticipantInput>,
        config: RaceConfig,
        rng: &mut dyn RandomSource,
    ) -> (Self, Vec<NameRepair>) {
        let mut repairs = Vec::new();
        let participants = inputs
            .into_iter()
            .map(|input| {
                let name = match input.name.as_deref() {
                    n if NameGenerator::needs_repair(n) => {
                        let replacement = NameGenerator::generate_racer_name(rng);
                        repairs.push(NameRepair {
                            id:          input.id.clone(),
                            original:    input.name.clone(),
                            replacement: replacement.clone(),
                        });
                        replacement
                    }
                    n => n.unwrap_or_default().trim().to_string(),
                };
                let base_speed = calculate_base_speed(&input.stats, rng);
                let mut participant = Participant::new(input, name, base_speed);
                participant.speed = base_speed.max(SPEED_FLOOR);
                participant
            })
            .collect();

        let state = Self {
            config,
            participants,
            finish_order: Vec::new(),
            standings: None,
        };
        (state, repairs)
    }

    pub fn all_finished(&self) -> bool {
        self.participants.iter().all(|p| p.finished)
    }

    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RaceType, TrackLength};
    use crate::movement::MovementPattern;
    use crate::participant::Stats;
    use crate::rng::RaceRng;

    fn config() -> RaceConfig {
        RaceConfig::resolve(RaceType::Standard, TrackLength::Short)
    }

    #[test]
    fn init_builds_fresh_participants() {
        let inputs = vec![
            ParticipantInput::new("1", "Ada", Stats::default()),
            ParticipantInput::new("2", "  Bo  ", Stats::default()),
        ];
        let (state, repairs) = RaceState::init(inputs, config(), &mut RaceRng::seeded(5));
        assert!(repairs.is_empty());
        assert_eq!(state.participants.len(), 2);
        assert_eq!(state.participants[1].name, "Bo");
        for p in &state.participants {
            assert_eq!(p.progress, 0.0);
            assert!(!p.finished);
            assert!(p.finish_time.is_none());
            assert!(p.active_effects.is_empty());
            assert_eq!(p.movement, MovementPattern::Normal);
            assert!(p.base_speed > 0.0);
            assert_eq!(p.speed, p.base_speed);
        }
        assert!(state.finish_order.is_empty());
        assert!(!state.all_finished());
    }

    #[test]
    fn corrupted_names_are_repaired_not_rejected() {
        let mut missing = ParticipantInput::new("2", "x", Stats::default());
        missing.name = None;
        let inputs = vec![
            ParticipantInput::new("1", "{name}", Stats::default()),
            missing,
            ParticipantInput::new("3", "Cleo", Stats::default()),
        ];
        let (state, repairs) = RaceState::init(inputs, config(), &mut RaceRng::seeded(5));
        assert_eq!(repairs.len(), 2);
        assert_eq!(repairs[0].id, "1");
        assert_eq!(repairs[0].original.as_deref(), Some("{name}"));
        assert_eq!(repairs[1].original, None);
        assert_eq!(state.participants[0].name, repairs[0].replacement);
        assert_eq!(state.participant("3").map(|p| p.name.as_str()), Some("Cleo"));
    }

    #[test]
    fn out_of_range_stats_still_respect_the_floor() {
        let wild = Stats { speed: -20, recklessness: 0, ..Stats::default() };
        let inputs = vec![ParticipantInput::new("1", "Slug", wild)];
        let (state, _) = RaceState::init(inputs, config(), &mut RaceRng::seeded(5));
        assert_eq!(state.participants[0].speed, SPEED_FLOOR);
    }
}

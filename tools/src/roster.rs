//! Demo roster — stands in for the character generator when the runner
//! is used on its own.

use derby_core::{ParticipantInput, RandomSource, Stats};

const NAMES: &[&str] = &[
    "Bolt", "Marzipan", "Sir Trots", "Gravel", "Nova", "Pickles", "Dash", "Mildred",
    "Thunderbun", "Quill", "Rocket", "Biscuit", "Comet", "Noodle", "Ziggy", "Pepper",
];

/// `count` entrants with stats drawn uniformly from 1–10.
pub fn demo_roster(count: usize, rng: &mut dyn RandomSource) -> Vec<ParticipantInput> {
    (0..count)
        .map(|i| {
            let base = NAMES.get(i % NAMES.len()).copied().unwrap_or("Racer");
            let name = if i < NAMES.len() {
                base.to_string()
            } else {
                format!("{base} {}", i / NAMES.len() + 1)
            };
            let mut stat = || i32::try_from(rng.index_below(10)).unwrap_or(0) + 1;
            let stats = Stats {
                speed:        stat(),
                strength:     stat(),
                wisdom:       stat(),
                recklessness: stat(),
                stamina:      stat(),
            };
            ParticipantInput::new(format!("entrant-{}", i + 1), name, stats)
        })
        .collect()
}

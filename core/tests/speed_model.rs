//! Speed model bounds and the stat-favourite scenario.

use derby_core::{
    participant::Stats,
    speed::{base_speed_bounds, calculate_base_speed},
    EngineSettings, ParticipantInput, RaceEngine, RaceRng, RaceType, TrackLength,
};
use proptest::prelude::*;

#[test]
fn max_speed_min_everything_else_stays_in_documented_interval() {
    let stats = Stats { speed: 10, strength: 1, wisdom: 1, recklessness: 1, stamina: 1 };
    // (0.25 + 10×0.05 ± 1×0.02) × (1 + 1×0.03) × (1 ± 0.075)
    let lo = (0.75 - 0.02) * 1.03 * 0.925;
    let hi = (0.75 + 0.02) * 1.03 * 1.075;
    let mut rng = RaceRng::seeded(2024);
    for _ in 0..10_000 {
        let v = calculate_base_speed(&stats, &mut rng);
        assert!(v >= lo - 1e-12 && v <= hi + 1e-12, "{v} outside [{lo}, {hi}]");
    }
}

proptest! {
    #[test]
    fn in_range_stats_give_positive_bounded_speed(
        speed in 1i32..=10,
        recklessness in 1i32..=10,
        stamina in 1i32..=10,
        seed in any::<u64>(),
    ) {
        let stats = Stats { speed, strength: 5, wisdom: 5, recklessness, stamina };
        let (lo, hi) = base_speed_bounds(&stats);
        let v = calculate_base_speed(&stats, &mut RaceRng::seeded(seed));
        prop_assert!(v > 0.0);
        prop_assert!(v >= lo - 1e-12 && v <= hi + 1e-12);
    }
}

#[test]
fn fast_high_stamina_racer_usually_wins() {
    const TRIALS: u64 = 200;
    let mut a_ahead = 0;
    for seed in 0..TRIALS {
        let mut engine = RaceEngine::new(EngineSettings::deterministic(seed)).unwrap();
        engine
            .init_race(
                vec![
                    ParticipantInput::new(
                        "1", "A",
                        Stats { speed: 10, strength: 5, wisdom: 5, recklessness: 1, stamina: 10 },
                    ),
                    ParticipantInput::new(
                        "2", "B",
                        Stats { speed: 1, strength: 5, wisdom: 5, recklessness: 1, stamina: 1 },
                    ),
                ],
                RaceType::Standard,
                TrackLength::Short,
            )
            .unwrap();
        let standings = engine.run_to_completion().unwrap();
        if standings.first().map(|s| s.id.as_str()) == Some("1") {
            a_ahead += 1;
        }
    }
    assert!(a_ahead >= TRIALS * 9 / 10, "A led only {a_ahead}/{TRIALS} races");
}

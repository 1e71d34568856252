//! Speed model — stat bundle to per-tick base speed.
//!
//!   base           = 0.25 + speed × 0.05
//!   reckless_bonus = U(0, recklessness × 0.04) − recklessness × 0.02
//!   stamina_factor = 1 + stamina × 0.03
//!   random_factor  = 1 + U(−0.075, 0.075)
//!   result         = (base + reckless_bonus) × stamina_factor × random_factor
//!
//! Draw order is fixed (recklessness swing, then random factor) so seeded
//! races replay identically.

use crate::{participant::Stats, rng::RandomSource};

pub const BASE_SPEED: f64 = 0.25;
pub const SPEED_PER_POINT: f64 = 0.05;
pub const RECKLESS_SWING_PER_POINT: f64 = 0.04;
pub const STAMINA_PER_POINT: f64 = 0.03;
pub const RANDOM_SWING: f64 = 0.075;

pub fn calculate_base_speed(stats: &Stats, rng: &mut dyn RandomSource) -> f64 {
    let speed = f64::from(stats.speed);
    let recklessness = f64::from(stats.recklessness);
    let stamina = f64::from(stats.stamina);

    let base = BASE_SPEED + speed * SPEED_PER_POINT;
    let swing = recklessness * RECKLESS_SWING_PER_POINT;
    let reckless_bonus = rng.uniform(0.0, swing) - swing / 2.0;
    let stamina_factor = 1.0 + stamina * STAMINA_PER_POINT;
    let random_factor = 1.0 + rng.uniform(-RANDOM_SWING, RANDOM_SWING);

    (base + reckless_bonus) * stamina_factor * random_factor
}

/// Closed interval every `calculate_base_speed` result for `stats` falls in.
pub fn base_speed_bounds(stats: &Stats) -> (f64, f64) {
    let base = BASE_SPEED + f64::from(stats.speed) * SPEED_PER_POINT;
    let half_swing = f64::from(stats.recklessness) * RECKLESS_SWING_PER_POINT / 2.0;
    let stamina_factor = 1.0 + f64::from(stats.stamina) * STAMINA_PER_POINT;
    (
        (base - half_swing) * stamina_factor * (1.0 - RANDOM_SWING),
        (base + half_swing) * stamina_factor * (1.0 + RANDOM_SWING),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always returns the same draw.
    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_f64(&mut self) -> f64 {
            self.0
        }
    }

    const STATS: Stats = Stats {
        speed:        10,
        strength:     1,
        wisdom:       1,
        recklessness: 1,
        stamina:      1,
    };

    #[test]
    fn midpoint_draws_give_the_deterministic_core() {
        // U(a, b) at 0.5 is the midpoint: both swing terms vanish.
        let v = calculate_base_speed(&STATS, &mut Fixed(0.5));
        let expected = (0.25 + 10.0 * 0.05) * (1.0 + 0.03);
        assert!((v - expected).abs() < 1e-12, "{v} != {expected}");
    }

    #[test]
    fn extreme_draws_hit_the_bounds() {
        let (lo, hi) = base_speed_bounds(&STATS);
        let low = calculate_base_speed(&STATS, &mut Fixed(0.0));
        assert!((low - lo).abs() < 1e-12);
        let high = calculate_base_speed(&STATS, &mut Fixed(1.0 - f64::EPSILON));
        assert!(high <= hi && (hi - high) < 1e-9);
    }

    #[test]
    fn strength_and_wisdom_do_not_matter() {
        let other = Stats { strength: 10, wisdom: 10, ..STATS };
        assert_eq!(
            calculate_base_speed(&STATS, &mut Fixed(0.3)).to_bits(),
            calculate_base_speed(&other, &mut Fixed(0.3)).to_bits(),
        );
    }
}

//! Injectable random number generation.
//!
//! RULE: Nothing in the race engine may call a platform RNG directly.
//! Every draw flows through a RandomSource owned by the engine, so a
//! seeded RaceRng (or a scripted double in tests) fully determines the
//! branch taken at each decision point.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// Source of uniform draws. Implementors only need `next_f64`.
pub trait RandomSource {
    /// Roll a float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64;

    /// Roll a float in [low, high).
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    /// Bernoulli trial: returns true with probability p.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Roll an index in [0, n). `n` must be > 0.
    fn index_below(&mut self, n: usize) -> usize {
        debug_assert!(n > 0, "n must be > 0");
        let idx = (self.next_f64() * n as f64) as usize;
        idx.min(n.saturating_sub(1))
    }
}

/// PCG-backed deterministic RNG for a single race.
pub struct RaceRng {
    seed:  u64,
    inner: Pcg64Mcg,
}

impl RaceRng {
    /// Reproducible stream: same seed, same race.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Fresh stream for an unseeded race. The drawn seed is kept so the
    /// race can still be replayed from the log.
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random::<u64>())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        use rand::RngCore;
        self.inner.next_u64()
    }
}

impl RandomSource for RaceRng {
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

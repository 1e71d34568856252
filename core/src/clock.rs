//! Race clock — owns the tick counter and elapsed race time.
//!
//! Wall-clock time is display-only (finish times); termination is
//! decided by the tick counter alone.

use crate::types::{ElapsedMs, Tick};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimeSource {
    /// Monotonic wall clock, measured from `start()`.
    #[default]
    Wall,
    /// `tick × interval`; deterministic, for tests and fast-forward runs.
    Simulated,
}

#[derive(Debug, Clone)]
pub struct RaceClock {
    pub current_tick: Tick,
    interval_ms:      u64,
    source:           TimeSource,
    started_at:       Option<Instant>,
}

impl RaceClock {
    pub fn new(interval_ms: u64, source: TimeSource) -> Self {
        Self {
            current_tick: 0,
            interval_ms,
            source,
            started_at: None,
        }
    }

    /// Mark the start of the race. Elapsed time is measured from here.
    pub fn start(&mut self) {
        self.current_tick = 0;
        self.started_at = Some(Instant::now());
    }

    /// Advance one tick. Returns the new tick number.
    pub fn advance(&mut self) -> Tick {
        self.current_tick += 1;
        self.current_tick
    }

    pub fn elapsed_ms(&self) -> ElapsedMs {
        match self.source {
            TimeSource::Simulated => self.current_tick.saturating_mul(self.interval_ms),
            TimeSource::Wall => self
                .started_at
                .map(|t| u64::try_from(t.elapsed().as_millis()).unwrap_or(u64::MAX))
                .unwrap_or(0),
        }
    }
}

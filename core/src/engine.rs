//! The race engine — tick scheduler and sole owner of race state.
//!
//! LIFECYCLE: NotStarted → Running → Finished (terminal).
//!
//! PER-TICK ORDER (fixed, documented, never reordered), for every
//! unfinished participant in registration order:
//!   1. Effect resolution   (effects::apply_effects)
//!   2. Progress advance    (max(MIN_PROGRESS_PER_TICK, speed))
//!   3. Event roll          (even ticks only)
//!   4. Finish check
//!   5. Position derivation
//!   6. Movement hint
//! then one TickUpdate, then the race-finished predicate.
//!
//! RULES:
//!   - The host drives time: it calls tick() once per interval (or in a
//!     tight loop for fast-forward). The engine owns no timer.
//!   - Once Finished, tick() is a no-op. stop() is idempotent.
//!   - All randomness flows through the injected RandomSource.
//!   - Observers only ever receive snapshots through the bus.

use crate::{
    bus::{EventBus, SubscriptionId},
    catalog::{EventCatalog, Tier},
    clock::RaceClock,
    config::{
        EngineSettings, RaceConfig, RaceType, TrackLength, MIN_PARTICIPANTS,
        MIN_PROGRESS_PER_TICK,
    },
    effects::apply_effects,
    error::{RaceError, RaceResult},
    event::{EventKind, RaceEvent},
    event_engine::{is_event_tick, maybe_fire_event},
    movement::motion_hint,
    participant::ParticipantInput,
    race::RaceState,
    rng::{RaceRng, RandomSource},
    snapshot::RaceSnapshot,
    standings::{compute_standings, Standing},
    types::{ElapsedMs, Tick},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RaceStatus {
    NotStarted,
    Running,
    Finished,
}

pub struct RaceEngine {
    settings: EngineSettings,
    catalog:  EventCatalog,
    rng:      Box<dyn RandomSource>,
    seed:     Option<u64>,
    clock:    RaceClock,
    bus:      EventBus,
    status:   RaceStatus,
    race:     Option<RaceState>,
}

impl RaceEngine {
    /// Engine with the built-in catalog. Seeds from `settings.seed`, or
    /// from fresh entropy when unset.
    pub fn new(settings: EngineSettings) -> RaceResult<Self> {
        let rng = match settings.seed {
            Some(seed) => RaceRng::seeded(seed),
            None => RaceRng::from_entropy(),
        };
        let seed = rng.seed();
        let mut engine = Self::with_rng(settings, Box::new(rng))?;
        engine.seed = Some(seed);
        Ok(engine)
    }

    /// Engine drawing from a caller-supplied source. `settings.seed` is ignored.
    pub fn with_rng(settings: EngineSettings, rng: Box<dyn RandomSource>) -> RaceResult<Self> {
        settings.validate()?;
        Ok(Self {
            clock: RaceClock::new(settings.tick_interval_ms, settings.time_source),
            settings,
            catalog: EventCatalog::builtin(),
            rng,
            seed: None,
            bus: EventBus::new(),
            status: RaceStatus::NotStarted,
            race: None,
        })
    }

    pub fn with_catalog(mut self, catalog: EventCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    // ── Subscriptions ──────────────────────────────────────────

    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&RaceEvent) + 'static,
    {
        self.bus.on(kind, handler)
    }

    pub fn off(&mut self, kind: EventKind, id: SubscriptionId) -> bool {
        self.bus.off(kind, id)
    }

    // ── Lifecycle ──────────────────────────────────────────────

    /// Register entrants for a new race, resolving the category and track.
    pub fn init_race(
        &mut self,
        inputs: Vec<ParticipantInput>,
        race_type: RaceType,
        track_length: TrackLength,
    ) -> RaceResult<()> {
        let mut config = RaceConfig::resolve(race_type, track_length);
        if let Some(odds) = self.settings.odds_override {
            config = config.with_odds(odds);
        }
        self.init_race_with_config(inputs, config)
    }

    /// As `init_race`, with an explicit (possibly customised) config.
    pub fn init_race_with_config(
        &mut self,
        inputs: Vec<ParticipantInput>,
        config: RaceConfig,
    ) -> RaceResult<()> {
        if self.status == RaceStatus::Running {
            return Err(RaceError::RaceInProgress);
        }
        config.odds.validate()?;
        if config.segments == 0 {
            return Err(RaceError::InvalidConfig("segments must be > 0".to_string()));
        }

        let (state, repairs) = RaceState::init(inputs, config, self.rng.as_mut());
        self.clock = RaceClock::new(self.settings.tick_interval_ms, self.settings.time_source);
        self.status = RaceStatus::NotStarted;

        for repair in &repairs {
            log::warn!(
                "participant {} had unusable name {:?}; racing as {}",
                repair.id,
                repair.original,
                repair.replacement
            );
            publish(
                &mut self.bus,
                log_event(
                    format!(
                        "Entrant {} arrived without a usable name and races as {}",
                        repair.id, repair.replacement
                    ),
                    false,
                    0,
                ),
            );
        }

        let mut seen = HashSet::new();
        for p in &state.participants {
            if !seen.insert(p.id.as_str()) {
                log::warn!("participant id {:?} is registered more than once", p.id);
            }
        }

        log::info!(
            "race initialized: {} participants, {} track ({} segments), {} rules, seed={:?}",
            state.participants.len(),
            state.config.track_length.name(),
            state.config.segments,
            state.config.race_type.name(),
            self.seed
        );
        publish(
            &mut self.bus,
            RaceEvent::Initialized {
                participants: state.participants.clone(),
                race_type:    state.config.race_type,
                track_length: state.config.track_length,
                segments:     state.config.segments,
            },
        );

        self.race = Some(state);
        Ok(())
    }

    pub fn start_race(&mut self) -> RaceResult<()> {
        let Some(race) = self.race.as_ref() else {
            return Err(RaceError::NotInitialized);
        };
        if self.status != RaceStatus::NotStarted {
            return Err(RaceError::AlreadyStarted);
        }
        let registered = race.participants.len();
        if registered < MIN_PARTICIPANTS {
            return Err(RaceError::NotEnoughParticipants {
                registered,
                required: MIN_PARTICIPANTS,
            });
        }

        self.clock.start();
        self.status = RaceStatus::Running;

        let message = format!(
            "And they're off! {registered} racers on a {} {} track.",
            race.config.track_length.name(),
            race.config.race_type.name()
        );
        log::info!("{message}");
        let events = [
            RaceEvent::RaceStart {
                participants: race.participants.clone(),
                start_time:   Utc::now(),
            },
            log_event(message, true, 0),
        ];
        for event in events {
            publish(&mut self.bus, event);
        }
        Ok(())
    }

    /// Advance one tick. The core simulation step.
    pub fn tick(&mut self) -> RaceResult<RaceStatus> {
        match self.status {
            RaceStatus::Finished => return Ok(RaceStatus::Finished),
            RaceStatus::NotStarted if self.race.is_none() => return Err(RaceError::NotInitialized),
            RaceStatus::NotStarted => return Err(RaceError::NotRunning),
            RaceStatus::Running => {}
        }
        let Some(race) = self.race.as_mut() else {
            return Err(RaceError::NotInitialized);
        };

        let tick = self.clock.advance();
        let elapsed = self.clock.elapsed_ms();
        let segments = race.config.segments_f64();
        let mut outbox: Vec<RaceEvent> = Vec::new();

        for p in race.participants.iter_mut().filter(|p| !p.finished) {
            // 1. Effects
            for expired in apply_effects(p) {
                log::debug!("tick={tick} {} lost {}", p.name, expired.name);
                outbox.push(log_event(
                    format!("{} wore off for {}.", expired.name, p.name),
                    false,
                    elapsed,
                ));
            }

            // 2. Progress
            p.progress += p.speed.max(MIN_PROGRESS_PER_TICK);

            // 3. Random event
            if is_event_tick(tick) {
                if let Some(fired) =
                    maybe_fire_event(p, &race.config.odds, &self.catalog, self.rng.as_mut())
                {
                    log::debug!(
                        "tick={tick} {} hit {} (delta {:+.2})",
                        p.name,
                        fired.definition.name,
                        fired.progress_delta
                    );
                    let highlight = fired.definition.tier == Tier::Chaos;
                    outbox.push(RaceEvent::EventHappened {
                        tick,
                        participant:    p.clone(),
                        event:          fired.definition,
                        description:    fired.description.clone(),
                        progress_delta: fired.progress_delta,
                    });
                    outbox.push(log_event(fired.description, highlight, elapsed));
                }
            }

            // 4. Finish
            if p.progress >= segments {
                p.finished = true;
                p.progress = segments;
                p.finish_time = Some(elapsed);
                p.finish_tick = Some(tick);
                race.finish_order.push(p.id.clone());
                let place = u32::try_from(race.finish_order.len()).unwrap_or(u32::MAX);
                log::debug!("tick={tick} {} finished in place {place} after {elapsed}ms", p.name);

                // 5–6 for the finisher, so the notification carries final state.
                p.position = 100.0;
                p.motion = motion_hint(p.movement, tick);
                outbox.push(RaceEvent::RacerFinish {
                    tick,
                    place,
                    participant: p.clone(),
                });
                outbox.push(log_event(
                    format!("{} crosses the finish line in {} place!", p.name, ordinal(place)),
                    true,
                    elapsed,
                ));
                continue;
            }

            // 5. Position (display only)
            p.position = p.progress / segments * 100.0;

            // 6. Movement hint (cosmetic only)
            p.motion = motion_hint(p.movement, tick);
        }

        log::trace!("tick={tick} elapsed={elapsed}ms finished={}", race.finish_order.len());
        outbox.push(RaceEvent::TickUpdate {
            tick,
            participants: race.participants.clone(),
        });

        let all_finished = race.all_finished();
        if all_finished || tick > race.config.safety_tick_limit() {
            if !all_finished {
                log::warn!(
                    "tick safety limit ({}) exceeded; forcing race end",
                    race.config.safety_tick_limit()
                );
            }
            outbox.extend(finish_race(race, &mut self.status, tick, elapsed, !all_finished));
        }

        for event in outbox {
            publish(&mut self.bus, event);
        }
        Ok(self.status)
    }

    /// Host-initiated stop. A running race ends immediately with current
    /// standings; otherwise nothing happens.
    pub fn stop(&mut self) -> RaceStatus {
        if self.status != RaceStatus::Running {
            return self.status;
        }
        let Some(race) = self.race.as_mut() else {
            return self.status;
        };
        let tick = self.clock.current_tick;
        let elapsed = self.clock.elapsed_ms();
        log::info!("race stopped by host at tick {tick}");
        let forced = !race.all_finished();
        for event in finish_race(race, &mut self.status, tick, elapsed, forced) {
            publish(&mut self.bus, event);
        }
        self.status
    }

    /// Start (if needed) and tick synchronously until the race finishes.
    /// Used for testing and fast-forward.
    pub fn run_to_completion(&mut self) -> RaceResult<Vec<Standing>> {
        if self.status == RaceStatus::NotStarted {
            self.start_race()?;
        }
        while self.tick()? != RaceStatus::Finished {}
        Ok(self.standings().map(<[Standing]>::to_vec).unwrap_or_default())
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn status(&self) -> RaceStatus {
        self.status
    }

    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    /// Seed of the internal RNG; `None` when a source was injected.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.settings.tick_interval_ms)
    }

    pub fn config(&self) -> Option<&RaceConfig> {
        self.race.as_ref().map(|r| &r.config)
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    /// Final standings, once the race has finished.
    pub fn standings(&self) -> Option<&[Standing]> {
        self.race.as_ref()?.standings.as_deref()
    }

    pub fn snapshot(&self) -> Option<RaceSnapshot> {
        self.race.as_ref().map(|race| RaceSnapshot {
            tick:         self.clock.current_tick,
            status:       self.status,
            elapsed_ms:   self.clock.elapsed_ms(),
            segments:     race.config.segments,
            participants: race.participants.clone(),
            finish_order: race.finish_order.clone(),
        })
    }
}

/// Compute standings, flip to Finished, and return the closing events.
fn finish_race(
    race: &mut RaceState,
    status: &mut RaceStatus,
    tick: Tick,
    elapsed: ElapsedMs,
    forced: bool,
) -> Vec<RaceEvent> {
    let standings = compute_standings(&race.finish_order, &race.participants);
    *status = RaceStatus::Finished;
    race.standings = Some(standings.clone());

    let message = match standings.first() {
        Some(winner) if winner.finished => format!("Race over! {} takes the win.", winner.name),
        Some(leader) => format!("Race called! {} was furthest ahead.", leader.name),
        None => "Race over!".to_string(),
    };
    log::info!("race finished after {tick} ticks ({elapsed}ms), forced={forced}");

    vec![
        log_event(message, true, elapsed),
        RaceEvent::RaceEnd {
            standings,
            duration_ms: elapsed,
            ticks: tick,
            forced,
        },
    ]
}

/// Emit on the bus, mirroring log-channel messages to the `log` facade.
fn publish(bus: &mut EventBus, event: RaceEvent) {
    if let RaceEvent::LogEvent { message, highlight, elapsed_ms } = &event {
        if *highlight {
            log::info!("[{elapsed_ms}ms] {message}");
        } else {
            log::debug!("[{elapsed_ms}ms] {message}");
        }
    }
    bus.emit(&event);
}

fn log_event(message: String, highlight: bool, elapsed_ms: ElapsedMs) -> RaceEvent {
    RaceEvent::LogEvent {
        message,
        highlight,
        elapsed_ms,
    }
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::Stats;

    fn inputs(n: usize) -> Vec<ParticipantInput> {
        (0..n)
            .map(|i| ParticipantInput::new(i.to_string(), format!("Racer {i}"), Stats::default()))
            .collect()
    }

    fn engine() -> RaceEngine {
        RaceEngine::new(EngineSettings::deterministic(0xFEED)).unwrap()
    }

    #[test]
    fn ordinals() {
        let got: Vec<_> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 101, 111].map(ordinal).into();
        assert_eq!(
            got,
            ["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "101st", "111th"]
        );
    }

    #[test]
    fn start_requires_init() {
        let mut e = engine();
        assert!(matches!(e.start_race(), Err(RaceError::NotInitialized)));
        assert!(matches!(e.tick(), Err(RaceError::NotInitialized)));
    }

    #[test]
    fn start_refuses_single_participant() {
        let mut e = engine();
        e.init_race(inputs(1), RaceType::Standard, TrackLength::Short).unwrap();
        let err = e.start_race().unwrap_err();
        assert!(matches!(
            err,
            RaceError::NotEnoughParticipants { registered: 1, required: 2 }
        ));
        assert_eq!(e.status(), RaceStatus::NotStarted);
        assert!(matches!(e.tick(), Err(RaceError::NotRunning)));
    }

    #[test]
    fn cannot_start_twice_or_reinit_while_running() {
        let mut e = engine();
        e.init_race(inputs(2), RaceType::Standard, TrackLength::Short).unwrap();
        e.start_race().unwrap();
        assert!(matches!(e.start_race(), Err(RaceError::AlreadyStarted)));
        assert!(matches!(
            e.init_race(inputs(2), RaceType::Standard, TrackLength::Short),
            Err(RaceError::RaceInProgress)
        ));
    }

    #[test]
    fn finished_race_ignores_further_ticks() {
        let mut e = engine();
        e.init_race(inputs(3), RaceType::Chaos, TrackLength::Short).unwrap();
        e.run_to_completion().unwrap();
        let tick = e.current_tick();
        let before = e.snapshot().unwrap();
        for _ in 0..5 {
            assert_eq!(e.tick().unwrap(), RaceStatus::Finished);
        }
        assert_eq!(e.current_tick(), tick);
        assert_eq!(e.snapshot().unwrap(), before);
        assert_eq!(e.stop(), RaceStatus::Finished);
    }

    #[test]
    fn stop_ends_a_running_race_once() {
        let mut e = engine();
        e.init_race(inputs(2), RaceType::Standard, TrackLength::Long).unwrap();
        e.start_race().unwrap();
        e.tick().unwrap();
        assert_eq!(e.stop(), RaceStatus::Finished);
        let standings = e.standings().unwrap();
        assert_eq!(standings.len(), 2);
        assert!(standings.iter().all(|s| !s.finished));
        assert_eq!(e.stop(), RaceStatus::Finished);
    }

    #[test]
    fn race_can_be_reinitialized_after_finishing() {
        let mut e = engine();
        e.init_race(inputs(2), RaceType::Standard, TrackLength::Short).unwrap();
        e.run_to_completion().unwrap();
        e.init_race(inputs(4), RaceType::Endurance, TrackLength::Medium).unwrap();
        assert_eq!(e.status(), RaceStatus::NotStarted);
        assert_eq!(e.current_tick(), 0);
        assert!(e.standings().is_none());
        assert_eq!(e.snapshot().unwrap().participants.len(), 4);
    }

    #[test]
    fn snapshot_is_detached() {
        let mut e = engine();
        e.init_race(inputs(2), RaceType::Standard, TrackLength::Short).unwrap();
        let mut snap = e.snapshot().unwrap();
        snap.participants[0].progress = 99.0;
        assert_eq!(e.snapshot().unwrap().participants[0].progress, 0.0);
    }
}

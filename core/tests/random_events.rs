//! Event-roll scenarios: forced odds and same-tick finishes.

use derby_core::{
    catalog::Polarity, EngineSettings, EventKind, EventOdds, ParticipantInput, RaceConfig,
    RaceEngine, RaceEvent, RaceType, RandomSource, Stats, TrackLength,
};
use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

fn roster() -> Vec<ParticipantInput> {
    vec![
        ParticipantInput::new("a", "Ace", Stats { speed: 10, stamina: 10, ..Stats::default() }),
        ParticipantInput::new("b", "Bea", Stats::default()),
        ParticipantInput::new("c", "Cid", Stats { speed: 1, stamina: 1, ..Stats::default() }),
    ]
}

#[test]
fn forced_odds_fire_a_negative_event_on_every_even_tick_for_every_racer() {
    let settings = EngineSettings {
        odds_override: Some(EventOdds { chaos_factor: 1.0, positive_event_probability: 0.0 }),
        ..EngineSettings::deterministic(0xC4A0)
    };
    let mut engine = RaceEngine::new(settings).unwrap();

    let fired = Rc::new(RefCell::new(Vec::new()));
    {
        let fired = Rc::clone(&fired);
        engine.on(EventKind::EventHappened, move |e: &RaceEvent| {
            if let RaceEvent::EventHappened { tick, participant, event, .. } = e {
                fired.borrow_mut().push((*tick, participant.id.clone(), event.polarity));
            }
        });
    }

    engine.init_race(roster(), RaceType::Standard, TrackLength::Short).unwrap();
    engine.run_to_completion().unwrap();
    let last_tick = engine.current_tick();
    let snapshot = engine.snapshot().unwrap();

    let fired = fired.borrow();
    assert!(fired.iter().all(|(_, _, polarity)| *polarity == Polarity::Negative));

    let got: BTreeSet<(u64, String)> =
        fired.iter().map(|(tick, id, _)| (*tick, id.clone())).collect();
    assert_eq!(got.len(), fired.len(), "at most one event per racer per tick");

    let mut expected = BTreeSet::new();
    for tick in (2..=last_tick).step_by(2) {
        for p in &snapshot.participants {
            if p.finish_tick.map_or(true, |f| f >= tick) {
                expected.insert((tick, p.id.clone()));
            }
        }
    }
    assert_eq!(got, expected);
}

#[test]
fn zero_chaos_factor_never_fires() {
    let settings = EngineSettings {
        odds_override: Some(EventOdds { chaos_factor: 0.0, positive_event_probability: 0.5 }),
        ..EngineSettings::deterministic(3)
    };
    let mut engine = RaceEngine::new(settings).unwrap();
    let count = Rc::new(RefCell::new(0usize));
    {
        let count = Rc::clone(&count);
        engine.on(EventKind::EventHappened, move |_: &RaceEvent| *count.borrow_mut() += 1);
    }
    engine.init_race(roster(), RaceType::Chaos, TrackLength::Medium).unwrap();
    engine.run_to_completion().unwrap();
    assert_eq!(*count.borrow(), 0);
    assert!(engine.standings().unwrap().iter().all(|s| s.finished));
}

/// Every draw is 0.0: every roll fires, picks the chaos tier, picks the
/// positive polarity, and takes the first candidate at its minimum delta.
struct AlwaysZero;

impl RandomSource for AlwaysZero {
    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

#[test]
fn racer_pushed_over_the_line_by_an_event_finishes_that_tick() {
    let mut engine =
        RaceEngine::with_rng(EngineSettings::deterministic(0), Box::new(AlwaysZero)).unwrap();
    let order = Rc::new(RefCell::new(Vec::new()));
    for kind in [EventKind::EventHappened, EventKind::RacerFinish] {
        let order = Rc::clone(&order);
        engine.on(kind, move |e: &RaceEvent| match e {
            RaceEvent::EventHappened { tick, participant, .. } => {
                order.borrow_mut().push((*tick, participant.id.clone(), "event"));
            }
            RaceEvent::RacerFinish { tick, participant, .. } => {
                order.borrow_mut().push((*tick, participant.id.clone(), "finish"));
            }
            _ => {}
        });
    }

    // Base speed ≈ 0.43/tick, so two ticks of running fall short of the
    // 2-segment line; the tick-2 wormhole (+2.0) carries each racer over.
    let config = RaceConfig {
        segments: 2,
        ..RaceConfig::resolve(RaceType::Standard, TrackLength::Short)
    }
    .with_odds(EventOdds { chaos_factor: 1.0, positive_event_probability: 1.0 });
    let entrants = vec![
        ParticipantInput::new("x", "Xia", Stats::default()),
        ParticipantInput::new("y", "Yul", Stats::default()),
    ];
    engine.init_race_with_config(entrants, config).unwrap();
    engine.run_to_completion().unwrap();

    assert_eq!(engine.current_tick(), 2);
    assert_eq!(
        *order.borrow(),
        vec![
            (2, "x".to_string(), "event"),
            (2, "x".to_string(), "finish"),
            (2, "y".to_string(), "event"),
            (2, "y".to_string(), "finish"),
        ]
    );
    for p in engine.snapshot().unwrap().participants {
        assert_eq!(p.progress, 2.0);
        assert_eq!(p.finish_tick, Some(2));
        assert_eq!(p.cosmetic.as_deref(), Some("portal"));
    }
}

//! race-runner: headless host for the derby race engine.
//!
//! Usage:
//!   race-runner --seed 12345 --race-type chaos --track medium --entrants 6
//!   race-runner --realtime                 (tick at the engine interval)
//!   race-runner --json                     (every notification as a JSON line)
//!   race-runner --db results.db            (persist outcomes; default :memory:)
//!   race-runner --config settings.json     (EngineSettings as JSON)
//!   race-runner --catalog events.json      (replace the built-in event table)

mod ledger;
mod roster;

use anyhow::{bail, Result};
use chrono::Utc;
use derby_core::{
    catalog::EventCatalog, clock::TimeSource, EngineSettings, EventKind, RaceEngine, RaceEvent,
    RaceRng, RaceStatus, RaceType, Standing, TrackLength,
};
use ledger::{RaceRecord, ResultsLedger};
use std::{cell::RefCell, env, rc::Rc};

/// What the runner keeps from `raceEnd` for the ledger.
struct RaceOutcome {
    standings:   Vec<Standing>,
    duration_ms: u64,
    ticks:       u64,
    forced:      bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let realtime = args.iter().any(|a| a == "--realtime");
    let json = args.iter().any(|a| a == "--json");
    let entrants = parse_arg(&args, "--entrants", 6usize);
    let db = string_arg(&args, "--db").unwrap_or(":memory:");

    let race_type = match string_arg(&args, "--race-type") {
        None => RaceType::Standard,
        Some(s) => match RaceType::parse(s) {
            Some(t) => t,
            None => bail!("unknown race type {s:?} (standard | chaos | endurance)"),
        },
    };
    let track = match string_arg(&args, "--track") {
        None => TrackLength::Short,
        Some(s) => match TrackLength::parse(s) {
            Some(t) => t,
            None => bail!("unknown track length {s:?} (short | medium | long)"),
        },
    };

    let mut settings = match string_arg(&args, "--config") {
        Some(path) => EngineSettings::load(path)?,
        None => EngineSettings::default(),
    };
    if let Some(seed) = string_arg(&args, "--seed") {
        settings.seed = Some(seed.parse()?);
    }
    settings.time_source = if realtime { TimeSource::Wall } else { TimeSource::Simulated };

    let mut engine = RaceEngine::new(settings)?;
    if let Some(path) = string_arg(&args, "--catalog") {
        let catalog = EventCatalog::load(path)?;
        log::info!("loaded {} events from {path}", catalog.events().len());
        engine = engine.with_catalog(catalog);
    }
    let seed = engine.seed().unwrap_or_default();

    if !json {
        println!("Derby race-runner");
        println!("  seed:      {seed}");
        println!("  race type: {}", race_type.name());
        println!("  track:     {} ({} segments)", track.name(), track.segments());
        println!("  entrants:  {entrants}");
        println!("  db:        {db}");
        println!();
    }

    let outcome: Rc<RefCell<Option<RaceOutcome>>> = Rc::new(RefCell::new(None));
    subscribe(&mut engine, json, Rc::clone(&outcome));

    // Roster stats come from their own stream so they don't perturb the race.
    let mut roster_rng = RaceRng::seeded(seed ^ 0x9e37_79b9_7f4a_7c15);
    let roster = roster::demo_roster(entrants, &mut roster_rng);

    engine.init_race(roster, race_type, track)?;
    engine.start_race()?;
    if realtime {
        let interval = engine.tick_interval();
        while engine.tick()? != RaceStatus::Finished {
            std::thread::sleep(interval);
        }
    } else {
        engine.run_to_completion()?;
    }

    let Some(outcome) = outcome.borrow_mut().take() else {
        bail!("race finished without a raceEnd notification");
    };

    let mut ledger = ResultsLedger::open(db)?;
    ledger.migrate()?;
    let record = RaceRecord {
        race_id:      uuid::Uuid::new_v4().to_string(),
        seed:         engine.seed(),
        race_type,
        track_length: track,
        segments:     track.segments(),
        ticks:        outcome.ticks,
        duration_ms:  outcome.duration_ms,
        forced:       outcome.forced,
        recorded_at:  Utc::now(),
    };
    ledger.record_race(&record, &outcome.standings)?;
    log::info!("recorded race {} ({} races in ledger)", record.race_id, ledger.race_count()?);

    if !json {
        print_summary(&ledger, &record, &outcome)?;
    }
    Ok(())
}

fn subscribe(engine: &mut RaceEngine, json: bool, outcome: Rc<RefCell<Option<RaceOutcome>>>) {
    if json {
        for kind in EventKind::ALL {
            engine.on(kind, |event: &RaceEvent| match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => log::error!("failed to serialize {}: {e}", event.kind().name()),
            });
        }
    } else {
        engine.on(EventKind::LogEvent, |event: &RaceEvent| {
            if let RaceEvent::LogEvent { message, highlight, elapsed_ms } = event {
                let marker = if *highlight { '*' } else { ' ' };
                println!("[{:>6.1}s]{marker} {message}", *elapsed_ms as f64 / 1000.0);
            }
        });
    }

    engine.on(EventKind::RaceEnd, move |event: &RaceEvent| {
        if let RaceEvent::RaceEnd { standings, duration_ms, ticks, forced } = event {
            *outcome.borrow_mut() = Some(RaceOutcome {
                standings:   standings.clone(),
                duration_ms: *duration_ms,
                ticks:       *ticks,
                forced:      *forced,
            });
        }
    });
}

fn print_summary(ledger: &ResultsLedger, record: &RaceRecord, outcome: &RaceOutcome) -> Result<()> {
    println!();
    println!("=== RESULTS ===");
    println!("  race_id:  {}", record.race_id);
    println!("  ticks:    {}", outcome.ticks);
    println!("  duration: {:.1}s", outcome.duration_ms as f64 / 1000.0);
    if outcome.forced {
        println!("  (race called before every entrant finished)");
    }
    println!();
    for s in &outcome.standings {
        let result = match s.finish_time {
            Some(ms) => format!("{:.1}s", ms as f64 / 1000.0),
            None => format!("DNF at {:.1}", s.progress),
        };
        let career = ledger
            .entrant(&s.id)?
            .map(|e| format!("{} races, {} wins", e.races, e.wins))
            .unwrap_or_default();
        println!("  {:>2}. {:<14} {:>12}   {career}", s.rank, s.name, result);
    }
    Ok(())
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    string_arg(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

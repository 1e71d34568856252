//! SQLite results ledger — the persistence side of `raceEnd`.
//!
//! RULE: Only ledger.rs talks to the database.
//! The race engine never sees it; the runner hands over finished
//! standings once the race is over.

use chrono::{DateTime, Utc};
use derby_core::{RaceType, Standing, TrackLength};
use rusqlite::{params, Connection, OptionalExtension};

/// One finished race, as recorded.
#[derive(Debug, Clone)]
pub struct RaceRecord {
    pub race_id:      String,
    pub seed:         Option<u64>,
    pub race_type:    RaceType,
    pub track_length: TrackLength,
    pub segments:     u32,
    pub ticks:        u64,
    pub duration_ms:  u64,
    pub forced:       bool,
    pub recorded_at:  DateTime<Utc>,
}

/// Lifetime counters for one entrant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrantRecord {
    pub participant_id: String,
    pub name:           String,
    pub races:          i64,
    pub wins:           i64,
}

pub struct ResultsLedger {
    conn: Connection,
}

impl ResultsLedger {
    /// Open (or create) the ledger database at `path`.
    pub fn open(path: &str) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn in_memory() -> rusqlite::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> rusqlite::Result<()> {
        self.conn
            .execute_batch(include_str!("../migrations/001_results.sql"))
    }

    /// Record a finished race: the race row, one result row per entrant,
    /// and the entrants' race/win counters. The winner is rank 1, and
    /// only if they actually crossed the line.
    pub fn record_race(
        &mut self,
        race: &RaceRecord,
        standings: &[Standing],
    ) -> rusqlite::Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO race (race_id, seed, race_type, track_length, segments,
                               ticks, duration_ms, forced, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                race.race_id,
                race.seed.map(|s| s as i64),
                race.race_type.name(),
                race.track_length.name(),
                race.segments,
                to_i64(race.ticks),
                to_i64(race.duration_ms),
                race.forced,
                race.recorded_at.to_rfc3339(),
            ],
        )?;

        for standing in standings {
            tx.execute(
                "INSERT INTO race_result (race_id, participant_id, name, rank,
                                          finished, finish_time_ms, progress)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    race.race_id,
                    standing.id,
                    standing.name,
                    standing.rank,
                    standing.finished,
                    standing.finish_time.map(to_i64),
                    standing.progress,
                ],
            )?;

            let won = standing.rank == 1 && standing.finished;
            tx.execute(
                "INSERT INTO entrant (participant_id, name, races, wins)
                 VALUES (?1, ?2, 1, ?3)
                 ON CONFLICT(participant_id) DO UPDATE SET
                     name  = excluded.name,
                     races = races + 1,
                     wins  = wins + excluded.wins",
                params![standing.id, standing.name, i64::from(won)],
            )?;
        }

        tx.commit()
    }

    pub fn entrant(&self, participant_id: &str) -> rusqlite::Result<Option<EntrantRecord>> {
        self.conn
            .query_row(
                "SELECT participant_id, name, races, wins FROM entrant
                 WHERE participant_id = ?1",
                params![participant_id],
                |row| {
                    Ok(EntrantRecord {
                        participant_id: row.get(0)?,
                        name:           row.get(1)?,
                        races:          row.get(2)?,
                        wins:           row.get(3)?,
                    })
                },
            )
            .optional()
    }

    pub fn race_count(&self) -> rusqlite::Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM race", [], |row| row.get(0))
    }
}

fn to_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

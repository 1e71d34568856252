use crate::catalog::{Polarity, Tier};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RaceError {
    #[error("Cannot start race: {registered} participant(s) registered, at least {required} required")]
    NotEnoughParticipants { registered: usize, required: usize },

    #[error("Race not initialized")]
    NotInitialized,

    #[error("Race already started")]
    AlreadyStarted,

    #[error("Race in progress; cannot re-initialize until it finishes")]
    RaceInProgress,

    #[error("Race is not running")]
    NotRunning,

    #[error("Event catalog has no {polarity:?} events in the {tier:?} tier")]
    IncompleteCatalog { tier: Tier, polarity: Polarity },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RaceResult<T> = Result<T, RaceError>;

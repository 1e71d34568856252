//! Shared primitive types used across the entire race engine.

/// A simulation tick. One tick = one scheduler invocation.
pub type Tick = u64;

/// Opaque, stable entrant identifier. Used as the join key with the
/// character-generation and persistence collaborators.
pub type ParticipantId = String;

/// Elapsed wall-clock milliseconds since the race started.
pub type ElapsedMs = u64;

/// Opaque renderable payload (sprite, portrait) passed through untouched.
pub type Asset = serde_json::Value;

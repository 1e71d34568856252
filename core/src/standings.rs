//! Final standings: finishers by finish time, then everyone else by
//! progress. Both sorts are stable, so exact ties keep their incoming
//! order (finish order for finishers, registration order otherwise).

use crate::{
    participant::Participant,
    types::{ElapsedMs, ParticipantId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    /// 1-based.
    pub rank:        u32,
    pub id:          ParticipantId,
    pub name:        String,
    pub finished:    bool,
    pub finish_time: Option<ElapsedMs>,
    pub progress:    f64,
}

impl Standing {
    fn from_participant(rank: u32, p: &Participant) -> Self {
        Self {
            rank,
            id: p.id.clone(),
            name: p.name.clone(),
            finished: p.finished,
            finish_time: p.finish_time,
            progress: p.progress,
        }
    }
}

/// Every participant appears exactly once. Each `finish_order` id claims
/// the earliest unclaimed finished participant with that id, so repeated
/// ids cannot hide an entrant; finished participants missing from
/// `finish_order` follow in registration order.
pub fn compute_standings(
    finish_order: &[ParticipantId],
    participants: &[Participant],
) -> Vec<Standing> {
    let mut claimed = vec![false; participants.len()];
    let mut finishers: Vec<&Participant> = Vec::with_capacity(finish_order.len());

    for id in finish_order {
        let slot = participants
            .iter()
            .enumerate()
            .position(|(i, p)| !claimed[i] && p.finished && &p.id == id);
        if let Some(i) = slot {
            claimed[i] = true;
            finishers.push(&participants[i]);
        }
    }
    for (i, p) in participants.iter().enumerate() {
        if p.finished && !claimed[i] {
            claimed[i] = true;
            finishers.push(p);
        }
    }
    finishers.sort_by_key(|p| p.finish_time.unwrap_or(ElapsedMs::MAX));

    let mut rest: Vec<&Participant> = participants
        .iter()
        .zip(&claimed)
        .filter(|(_, claimed)| !**claimed)
        .map(|(p, _)| p)
        .collect();
    rest.sort_by(|a, b| b.progress.total_cmp(&a.progress));

    finishers
        .into_iter()
        .chain(rest)
        .zip(1u32..)
        .map(|(p, rank)| Standing::from_participant(rank, p))
        .collect()
}

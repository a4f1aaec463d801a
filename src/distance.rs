// src/distance.rs
//! Circular distance engine.
//!
//! For every door, count the not-contracted roster entries strictly between
//! the door's position and the user's, walking forward with wraparound.
//! Doors and user are matched by censo key, not by full chapa.

use std::collections::HashMap;

use serde::Serialize;

use crate::chapa::{self, CensoKey, Chapa};
use crate::error::{Error, Result};
use crate::snapshot::{Door, Roster, Snapshot};

/// How equal distances are ordered in the ranking.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// First door in `LAB, FES, NOC, NOC-FES` order wins.
    #[default]
    DoorOrder,
    /// Listed doors win over unlisted ones, earlier over later.
    Priority(Vec<Door>),
}

impl TieBreak {
    fn rank(&self, door: Door) -> usize {
        match self {
            TieBreak::DoorOrder => door.index(),
            TieBreak::Priority(list) => match list.iter().position(|d| *d == door) {
                Some(p) => p,
                None => list.len() + door.index(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoorResult {
    pub door: Door,
    pub door_chapa: Chapa,
    pub distance: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub door_idx: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_idx: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMeta {
    pub total_chapas: usize,
    pub no_contratadas: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceReport {
    pub user_chapa: Chapa,
    pub user_censo_key: CensoKey,
    /// One per door in the map, resolved or not.
    pub results: Vec<DoorResult>,
    pub recommended: Option<DoorResult>,
    /// Resolved doors, best first.
    pub ranked: Vec<DoorResult>,
    pub meta: ReportMeta,
}

impl DistanceReport {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// censo key → first roster position carrying it.
pub fn build_index(roster: &Roster) -> HashMap<CensoKey, usize> {
    let mut index = HashMap::with_capacity(roster.len());
    for (pos, entry) in roster.entries().iter().enumerate() {
        index.entry(chapa::censo_key(&entry.normalized)).or_insert(pos);
    }
    index
}

/// Not-contracted entries strictly between `from` and `to`, walking forward.
/// `None` when either position is outside the roster.
pub fn forward_distance(roster: &Roster, from: usize, to: usize) -> Option<usize> {
    let n = roster.len();
    if from >= n || to >= n {
        return None;
    }
    if from == to {
        return Some(0);
    }
    let entries = roster.entries();
    let mut count = 0;
    let mut i = (from + 1) % n;
    while i != to {
        if entries[i].no_contratado {
            count += 1;
        }
        i = (i + 1) % n;
    }
    Some(count)
}

pub fn compute_distances(user_raw: &str, snapshot: &Snapshot) -> Result<DistanceReport> {
    compute_distances_with(user_raw, snapshot, &TieBreak::DoorOrder)
}

pub fn compute_distances_with(
    user_raw: &str,
    snapshot: &Snapshot,
    tie_break: &TieBreak,
) -> Result<DistanceReport> {
    let user = chapa::normalize(user_raw).ok_or_else(|| Error::InvalidInput(s!(user_raw.trim())))?;
    let user_key = user.censo_key();

    let roster = snapshot.ordered();
    if roster.is_empty() {
        return Err(Error::InvalidSnapshot(s!("roster is empty")));
    }

    let index = build_index(roster);
    let user_idx = *index.get(&user_key).ok_or_else(|| Error::UserNotFound {
        chapa: user.clone(),
        key: user_key.clone(),
    })?;
    logd!("Distance: user {} (censo {}) at {}/{}", user, user_key, user_idx, roster.len());

    let results: Vec<DoorResult> = snapshot
        .doors()
        .iter()
        .map(|(door, door_chapa)| {
            let key = door_chapa.censo_key();
            match index.get(&key) {
                Some(&door_idx) => DoorResult {
                    door,
                    door_chapa: door_chapa.clone(),
                    distance: forward_distance(roster, door_idx, user_idx),
                    error: None,
                    door_idx: Some(door_idx),
                    user_idx: Some(user_idx),
                },
                None => {
                    logd!("Distance: door {} ({}) not in roster", door, door_chapa);
                    DoorResult {
                        door,
                        door_chapa: door_chapa.clone(),
                        distance: None,
                        error: Some(format!("door chapa {} (censo {}) not found in roster", door_chapa, key)),
                        door_idx: None,
                        user_idx: None,
                    }
                }
            }
        })
        .collect();

    let mut ranked: Vec<DoorResult> = results.iter().filter(|r| r.distance.is_some()).cloned().collect();
    ranked.sort_by_key(|r| (r.distance, tie_break.rank(r.door)));
    let recommended = ranked.first().cloned();

    match &recommended {
        Some(r) => logf!(
            "Distance: user {} → recommend {} (distance {:?}, {} doors resolved)",
            user, r.door, r.distance, ranked.len()
        ),
        None => logf!("Distance: user {} → no door resolved", user),
    }

    Ok(DistanceReport {
        user_chapa: user,
        user_censo_key: user_key,
        results,
        recommended,
        ranked,
        meta: ReportMeta {
            total_chapas: roster.len(),
            no_contratadas: roster.no_contratado_count(),
        },
    })
}

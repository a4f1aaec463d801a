// src/snapshot.rs
//! Snapshot data model: door map + ordered roster.
//!
//! The JSON shape is shared with every other producer of snapshots
//! (manual paste, bookmarklet, cross-frame transfer):
//!
//! ```text
//! { "doors":   { "LAB": "72636", "FES": "71990", ... },
//!   "ordered": [ { "raw": "2636", "norm": "72636", "isNoContratado": false }, ... ] }
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

use crate::chapa::{self, Chapa};
use crate::config::consts::DOOR_LABELS;
use crate::error::{Error, Result};

/* ---------------- Doors ---------------- */

/// The four shift categories, in report order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Door {
    Lab,
    Fes,
    Noc,
    NocFes,
}

impl Door {
    pub const ALL: [Door; 4] = [Door::Lab, Door::Fes, Door::Noc, Door::NocFes];

    pub fn label(self) -> &'static str {
        DOOR_LABELS[self.index()]
    }

    pub fn index(self) -> usize {
        match self {
            Door::Lab => 0,
            Door::Fes => 1,
            Door::Noc => 2,
            Door::NocFes => 3,
        }
    }

    /// Case-insensitive label lookup (`"noc-fes"` → `NocFes`).
    pub fn from_label(s: &str) -> Option<Door> {
        let t = s.trim();
        Door::ALL.into_iter().find(|d| d.label().eq_ignore_ascii_case(t))
    }
}

impl fmt::Display for Door {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

impl Serialize for Door {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(self.label())
    }
}

/// Door → chapa. Iterates in [`Door::ALL`] order regardless of insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DoorMap {
    slots: [Option<Chapa>; 4],
}

impl DoorMap {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, door: Door, chapa: Chapa) {
        self.slots[door.index()] = Some(chapa);
    }

    pub fn get(&self, door: Door) -> Option<&Chapa> {
        self.slots[door.index()].as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Door, &Chapa)> + '_ {
        Door::ALL
            .into_iter()
            .filter_map(move |d| self.get(d).map(|c| (d, c)))
    }

    pub fn len(&self) -> usize { self.slots.iter().flatten().count() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn missing(&self) -> Vec<Door> {
        Door::ALL.into_iter().filter(|d| self.get(*d).is_none()).collect()
    }
}

impl Serialize for DoorMap {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = s.serialize_map(Some(self.len()))?;
        for (door, chapa) in self.iter() {
            map.serialize_entry(door.label(), chapa)?;
        }
        map.end()
    }
}

/* ---------------- Roster ---------------- */

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub raw: String,
    #[serde(rename = "norm")]
    pub normalized: Chapa,
    #[serde(rename = "isNoContratado")]
    pub no_contratado: bool,
}

impl RosterEntry {
    /// `None` when `raw` does not normalize.
    pub fn new<S: Into<String>>(raw: S, no_contratado: bool) -> Option<Self> {
        let raw = raw.into();
        let normalized = chapa::normalize(&raw)?;
        Some(Self { raw, normalized, no_contratado })
    }
}

/// Ordered, deduplicated roster. Positions are stable for the lifetime of
/// the value; at most one entry per normalized chapa.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    entries: Vec<RosterEntry>,
    #[serde(skip)]
    by_norm: HashMap<Chapa, usize>,
}

impl Roster {
    pub fn new() -> Self { Self::default() }

    /// Build from observations in first-seen order, OR-merging duplicates.
    pub fn from_entries<I: IntoIterator<Item = RosterEntry>>(entries: I) -> Self {
        let mut roster = Self::new();
        for e in entries {
            roster.merge(e);
        }
        roster
    }

    /// Add one observation. A repeated chapa keeps its first position; a
    /// not-contracted sighting upgrades a contracted one (and its `raw`
    /// follows the upgrading sighting), never the reverse.
    pub fn merge(&mut self, entry: RosterEntry) {
        match self.by_norm.get(&entry.normalized) {
            Some(&pos) => {
                let prev = &mut self.entries[pos];
                if entry.no_contratado && !prev.no_contratado {
                    *prev = entry;
                }
            }
            None => {
                self.by_norm.insert(entry.normalized.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn entries(&self) -> &[RosterEntry] { &self.entries }

    pub fn get(&self, pos: usize) -> Option<&RosterEntry> { self.entries.get(pos) }

    pub fn position_of(&self, chapa: &Chapa) -> Option<usize> {
        self.by_norm.get(chapa).copied()
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn no_contratado_count(&self) -> usize {
        self.entries.iter().filter(|e| e.no_contratado).count()
    }
}

/* ---------------- Snapshot ---------------- */

/// One extraction result. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    doors: DoorMap,
    ordered: Roster,
}

impl Snapshot {
    pub fn new(doors: DoorMap, ordered: Roster) -> Self {
        Self { doors, ordered }
    }

    pub fn doors(&self) -> &DoorMap { &self.doors }

    pub fn ordered(&self) -> &Roster { &self.ordered }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Accept a snapshot produced elsewhere.
    ///
    /// Door values and entries are re-normalized (`norm` wins over `raw`
    /// when both are present); whatever fails to normalize is dropped.
    /// At least one door and one entry must survive.
    pub fn from_json(text: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(text.trim())
            .map_err(|e| Error::InvalidSnapshot(format!("not valid JSON ({e})")))?;

        let mut doors = DoorMap::new();
        if let Some(obj) = root.get("doors").and_then(Value::as_object) {
            for (label, v) in obj {
                let Some(door) = Door::from_label(label) else {
                    logd!("Snapshot: ignoring unknown door label {:?}", label);
                    continue;
                };
                match value_text(v).and_then(chapa::normalize) {
                    Some(c) => doors.insert(door, c),
                    None => logd!("Snapshot: door {} has no usable chapa ({})", door, v),
                }
            }
        }

        let mut dropped = 0usize;
        let mut ordered = Roster::new();
        if let Some(items) = root.get("ordered").and_then(Value::as_array) {
            for item in items {
                let raw = item.get("raw").and_then(value_text).unwrap_or_default();
                let norm_src = item
                    .get("norm")
                    .and_then(value_text)
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| raw.clone());
                let flag = item.get("isNoContratado").map(truthy).unwrap_or(false);
                match chapa::normalize(&norm_src) {
                    Some(normalized) => ordered.merge(RosterEntry { raw, normalized, no_contratado: flag }),
                    None => dropped += 1,
                }
            }
        }
        if dropped > 0 {
            logd!("Snapshot: dropped {} entries without a usable chapa", dropped);
        }

        if ordered.is_empty() {
            return Err(Error::InvalidSnapshot(s!("no chapas in \"ordered\"")));
        }
        if doors.is_empty() {
            return Err(Error::InvalidSnapshot(s!("no doors in \"doors\"")));
        }
        logf!("Snapshot: parsed doors={} ordered={}", doors.len(), ordered.len());
        Ok(Self { doors, ordered })
    }
}

fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}
